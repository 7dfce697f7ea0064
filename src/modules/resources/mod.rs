//! Resources module.
//!
//! Read-only catalog of bookable rooms and virtual links. Resource CRUD is
//! handled by the general administration surface; the workflow only needs to
//! resolve and validate resources here.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
