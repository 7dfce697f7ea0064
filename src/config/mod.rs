//! Configuration modules for the Praxeum API.
//!
//! Each submodule handles one concern, loaded from environment variables:
//!
//! - [`cors`]: allowed origins for browser clients
//! - [`database`]: PostgreSQL connection pool + migrations
//! - [`email`]: SMTP settings for notification dispatch
//! - [`jwt`]: token verification configuration

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
