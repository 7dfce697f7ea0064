//! Schedule-change request models and DTOs.
//!
//! A change request is a teacher-initiated ask to reschedule a session, swap
//! it to another teacher, or change its modality. The kind decides which
//! payload columns are populated; the database CHECK constraint mirrors the
//! per-kind shape enforced here.

use crate::enums::{RequestKind, RequestStatus};
use crate::ids::{ChangeRequestId, ResourceId, SessionId, TimeslotId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use praxeum_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A teacher's schedule-change request. Never physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChangeRequest {
    pub id: ChangeRequestId,
    /// The requesting teacher (owner).
    pub teacher_id: UserId,
    /// The session being changed.
    pub session_id: SessionId,
    pub kind: RequestKind,
    pub status: RequestStatus,
    /// RESCHEDULE payload: proposed new date.
    pub proposed_date: Option<NaiveDate>,
    /// RESCHEDULE payload: proposed new timeslot.
    pub proposed_timeslot_id: Option<TimeslotId>,
    /// RESCHEDULE and MODALITY_CHANGE payload: proposed resource.
    pub proposed_resource_id: Option<ResourceId>,
    /// SWAP payload: nominated replacement teacher. Cleared on decline.
    pub replacement_teacher_id: Option<UserId>,
    /// Set when an approved reschedule created a replacement session.
    pub new_session_id: Option<SessionId>,
    pub note: Option<String>,
    pub rejection_reason: Option<String>,
    pub decided_by: Option<UserId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChangeRequest {
    /// Machine-readable marker appended to the note when a nominee declines,
    /// so the decline survives re-nomination for audit.
    pub fn decline_marker(declined_by: UserId, reason: &str) -> String {
        format!("[swap-declined by={}: {}]", declined_by, reason)
    }
}

/// Request joined with requester, session, and nominee context for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChangeRequestWithContext {
    pub id: ChangeRequestId,
    pub teacher_id: UserId,
    pub teacher_name: String,
    pub session_id: SessionId,
    pub session_date: NaiveDate,
    pub timeslot_name: String,
    pub class_name: String,
    pub kind: RequestKind,
    pub status: RequestStatus,
    pub proposed_date: Option<NaiveDate>,
    pub proposed_timeslot_id: Option<TimeslotId>,
    pub proposed_resource_id: Option<ResourceId>,
    pub replacement_teacher_id: Option<UserId>,
    pub replacement_teacher_name: Option<String>,
    pub new_session_id: Option<SessionId>,
    pub note: Option<String>,
    pub rejection_reason: Option<String>,
    pub decided_by: Option<UserId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for submitting a new change request.
///
/// The payload fields required depend on `kind`; the workflow rejects
/// submissions whose payload does not match.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitChangeRequestDto {
    pub session_id: SessionId,
    pub kind: RequestKind,
    /// Required for RESCHEDULE
    pub proposed_date: Option<NaiveDate>,
    /// Required for RESCHEDULE
    pub proposed_timeslot_id: Option<TimeslotId>,
    /// Required for RESCHEDULE and MODALITY_CHANGE
    pub proposed_resource_id: Option<ResourceId>,
    /// Required for SWAP
    pub replacement_teacher_id: Option<UserId>,
    /// Free-form note to the deciding staff member
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// DTO for approving a request. Staff may override parts of the proposed
/// payload (e.g. nominate a different replacement after a decline).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ApproveChangeRequestDto {
    pub proposed_date: Option<NaiveDate>,
    pub proposed_timeslot_id: Option<TimeslotId>,
    pub proposed_resource_id: Option<ResourceId>,
    pub replacement_teacher_id: Option<UserId>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// DTO for rejecting a request.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RejectChangeRequestDto {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// DTO for a nominee declining a swap.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeclineSwapDto {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Query parameters for listing change requests.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ChangeRequestFilterParams {
    /// Filter by requesting teacher
    pub teacher_id: Option<UserId>,
    /// Filter by target session
    pub session_id: Option<SessionId>,
    /// Filter by status
    pub status: Option<RequestStatus>,
    /// Filter by kind
    pub kind: Option<RequestKind>,
    /// Pagination parameters
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing change requests.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedChangeRequestsResponse {
    pub data: Vec<ChangeRequest>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decline_marker_is_machine_readable() {
        let teacher = UserId::from_u128(0x1234);
        let marker = ChangeRequest::decline_marker(teacher, "double-booked that day");
        assert!(marker.starts_with("[swap-declined by="));
        assert!(marker.contains(&teacher.to_string()));
        assert!(marker.ends_with("double-booked that day]"));
    }

    #[test]
    fn test_submit_dto_note_length() {
        let dto = SubmitChangeRequestDto {
            session_id: SessionId::new(),
            kind: RequestKind::Swap,
            proposed_date: None,
            proposed_timeslot_id: None,
            proposed_resource_id: None,
            replacement_teacher_id: Some(UserId::new()),
            note: Some("x".repeat(501)),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_reject_dto_requires_reason() {
        let dto = RejectChangeRequestDto {
            reason: String::new(),
        };
        assert!(dto.validate().is_err());

        let dto = RejectChangeRequestDto {
            reason: "room unavailable all week".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
