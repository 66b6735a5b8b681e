use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::duty_acknowledgement::AckStatus;

/// 1:1 acknowledgement state for a `PodDutyAssignment`. Shares the
/// `AckStatus` enum with `duty_acknowledgements` but is its own table for the
/// same reason that table is separate — see its doc comment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pod_duty_acknowledgements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pod_duty_assignment_id: i64,
    pub status: AckStatus,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pod_duty_assignment::Entity",
        from = "Column::PodDutyAssignmentId",
        to = "super::pod_duty_assignment::Column::Id",
        on_delete = "Cascade"
    )]
    PodDutyAssignment,
}

impl Related<super::pod_duty_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PodDutyAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
