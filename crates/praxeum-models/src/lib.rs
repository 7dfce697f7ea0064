//! # Praxeum Models
//!
//! Domain entities, DTOs, and shared value types for the Praxeum API.
//!
//! - [`ids`]: strongly-typed UUID newtypes per entity
//! - [`enums`]: text-backed database enums (statuses, kinds, modalities)
//! - [`auth`]: JWT claims
//! - per-domain entity/DTO modules ([`requests`], [`sessions`],
//!   [`assignments`], [`resources`], [`timeslots`], [`classes`], [`users`])

pub mod assignments;
pub mod auth;
pub mod classes;
pub mod enums;
pub mod ids;
pub mod requests;
pub mod resources;
pub mod sessions;
pub mod timeslots;
pub mod users;
