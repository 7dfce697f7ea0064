//! # Praxeum API
//!
//! A training-center operations backend built with Rust, Axum, and
//! PostgreSQL. The heart of the service is the **teacher schedule-change
//! workflow**: a request/approval state machine that lets a teacher ask to
//! reschedule a session, swap it to another teacher, or change its modality
//! (in-person ↔ virtual), while a conflict arbiter guarantees that no
//! resource is ever double-booked for the same date and timeslot.
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture:
//!
//! ```text
//! src/
//! ├── config/           # Configuration modules (database, JWT, email, CORS)
//! ├── middleware/       # Auth extractors (AuthUser, RequireStaff, RequireTeacher)
//! ├── modules/          # Feature modules
//! │   ├── requests/     # The schedule-change workflow (the core)
//! │   ├── sessions/     # Session lifecycle and read surface
//! │   ├── assignments/  # Teaching assignments per session
//! │   ├── availability/ # Conflict arbitration + occupancy queries
//! │   └── resources/    # Bookable resource catalog (read-only)
//! └── utils/            # Shared utilities (JWT, email, auth helpers)
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs
//! - `router.rs`: Axum router configuration
//!
//! ## The change-request state machine
//!
//! ```text
//! PENDING ──approve──▶ APPROVED                 (reschedule, modality change)
//! PENDING ──reject───▶ REJECTED                 (terminal)
//! PENDING ──approve──▶ WAITING_CONFIRM          (swap: staff nominates)
//! WAITING_CONFIRM ──confirm──▶ APPROVED         (nominee accepts)
//! WAITING_CONFIRM ──decline──▶ PENDING          (nominee declines, re-decidable)
//! ```
//!
//! Every decision executes as one transaction; the availability check runs on
//! the deciding connection and a partial unique index on
//! `class_sessions (resource_id, session_date, timeslot_id)` arbitrates
//! concurrent writers at the storage layer.
//!
//! ## Identity
//!
//! Requests carry a bearer JWT. Token issuance is external; this service only
//! verifies tokens and resolves roles (staff vs. teacher) for authorization.
//!
//! ## API Documentation
//!
//! When the server is running, documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod config;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;

// Re-export workspace crates for convenience
pub use praxeum_core;
pub use praxeum_models;
