//! JWT claims carried by authenticated requests.
//!
//! Token issuance lives outside this service; the claims shape is shared so
//! the verifier, the extractors, and test tooling agree on it.

use crate::enums::UserRole;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject: the user's ID as a UUID string.
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Expiry, seconds since epoch.
    pub exp: usize,
    /// Issued at, seconds since epoch.
    pub iat: usize,
}
