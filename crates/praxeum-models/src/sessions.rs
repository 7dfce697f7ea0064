//! Class session models.
//!
//! A session is one occurrence of a class on a date at a timeslot, optionally
//! holding a resource. Non-cancelled sessions holding a resource are what the
//! occupancy invariant ranges over.

use crate::enums::{Modality, SessionStatus};
use crate::ids::{BranchId, ClassId, ResourceId, SessionId, TimeslotId};
use chrono::NaiveDate;
use praxeum_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A scheduled occurrence of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassSession {
    pub id: SessionId,
    pub class_id: ClassId,
    pub session_date: NaiveDate,
    pub timeslot_id: TimeslotId,
    pub resource_id: Option<ResourceId>,
    pub modality: Modality,
    pub status: SessionStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Session joined with its class, branch, timeslot, and resource names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SessionWithContext {
    pub id: SessionId,
    pub class_id: ClassId,
    pub class_name: String,
    pub branch_id: BranchId,
    pub session_date: NaiveDate,
    pub timeslot_id: TimeslotId,
    pub timeslot_name: String,
    pub resource_id: Option<ResourceId>,
    pub resource_name: Option<String>,
    pub modality: Modality,
    pub status: SessionStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct SessionFilterParams {
    /// Filter by owning class
    pub class_id: Option<ClassId>,
    /// Filter by status
    pub status: Option<SessionStatus>,
    /// Only sessions on or after this date
    pub from_date: Option<NaiveDate>,
    /// Only sessions on or before this date
    pub to_date: Option<NaiveDate>,
    /// Pagination parameters
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing sessions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedSessionsResponse {
    pub data: Vec<SessionWithContext>,
    pub meta: PaginationMeta,
}
