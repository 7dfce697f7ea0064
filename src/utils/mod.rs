//! Shared utilities for the Praxeum API.
//!
//! - [`auth_helpers`]: identity resolution and role checks used by services
//! - [`email`]: SMTP notification dispatch
//! - [`jwt`]: token creation and verification

pub mod auth_helpers;
pub mod email;
pub mod jwt;
