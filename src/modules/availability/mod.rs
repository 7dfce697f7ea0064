//! Availability module.
//!
//! Home of the conflict arbitration primitive that guards every resource
//! mutation in the system, plus the read-only occupancy query surface shared
//! with other subsystems (e.g. student makeup-session flows).

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
