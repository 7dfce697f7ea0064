//! Resource models and the availability query DTOs.
//!
//! A resource is a bookable room or virtual link scoped to a branch. The
//! availability DTOs are the request/response shapes of the shared
//! conflict-check primitive.

use crate::enums::ResourceKind;
use crate::ids::{BranchId, ResourceId, SessionId, TimeslotId};
use chrono::NaiveDate;
use praxeum_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A bookable room or virtual link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resource {
    pub id: ResourceId,
    pub branch_id: BranchId,
    pub name: String,
    pub kind: ResourceKind,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Query parameters for listing resources.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ResourceFilterParams {
    /// Filter by branch
    pub branch_id: Option<BranchId>,
    /// Filter by kind (room or virtual)
    pub kind: Option<ResourceKind>,
    /// Filter by active flag
    pub is_active: Option<bool>,
    /// Pagination parameters
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing resources.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResourcesResponse {
    pub data: Vec<Resource>,
    pub meta: PaginationMeta,
}

/// Query parameters for the availability check primitive.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct AvailabilityQuery {
    pub resource_id: ResourceId,
    pub date: NaiveDate,
    pub timeslot_id: TimeslotId,
    /// Session to ignore while scanning, so a session can keep its own slot.
    pub exclude_session_id: Option<SessionId>,
}

/// Result of an availability check.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub resource_id: ResourceId,
    pub date: NaiveDate,
    pub timeslot_id: TimeslotId,
    pub available: bool,
}

/// Query parameters for the day-occupancy listing.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct OccupancyQuery {
    pub date: NaiveDate,
    /// Restrict to one branch's resources.
    pub branch_id: Option<BranchId>,
}

/// One occupied (resource, timeslot) pair on a given date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OccupiedSlot {
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub timeslot_id: TimeslotId,
    pub timeslot_name: String,
    pub session_id: SessionId,
    pub class_name: String,
}
