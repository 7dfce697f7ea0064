//! Timeslot models. A timeslot is a named start/end time template shared by
//! all sessions at a branch (e.g. "Mon-A 08:00-10:00").

use crate::ids::{BranchId, TimeslotId};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Timeslot {
    pub id: TimeslotId,
    pub branch_id: BranchId,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
