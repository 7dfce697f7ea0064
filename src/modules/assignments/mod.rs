//! Teaching assignments module.
//!
//! Owns the (session, teacher) assignment records. Mutations are reserved for
//! the change-request workflow; the HTTP surface is read-only.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
