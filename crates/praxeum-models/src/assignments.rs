//! Teaching assignment models: which teacher is responsible for a session
//! occurrence and in what capacity.

use crate::enums::AssignmentStatus;
use crate::ids::{SessionId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One teacher's assignment to one session. Keyed on (session, teacher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeachingAssignment {
    pub session_id: SessionId,
    pub teacher_id: UserId,
    pub status: AssignmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Assignment joined with the teacher's name and email for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssignmentWithTeacher {
    pub session_id: SessionId,
    pub teacher_id: UserId,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub teacher_email: String,
    pub status: AssignmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TeachingAssignment {
    /// Whether this assignment makes the teacher the session's active teacher.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            AssignmentStatus::Scheduled | AssignmentStatus::Substituted
        )
    }
}
