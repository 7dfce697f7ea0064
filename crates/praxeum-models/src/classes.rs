//! Course class models.
//!
//! A class owns its scheduled sessions. The class-level `modality` is the
//! default delivery mode; per-session modality can diverge from it through an
//! approved modality-change request without this field ever being touched.

use crate::enums::Modality;
use crate::ids::{BranchId, ClassId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseClass {
    pub id: ClassId,
    pub branch_id: BranchId,
    pub name: String,
    pub modality: Modality,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
