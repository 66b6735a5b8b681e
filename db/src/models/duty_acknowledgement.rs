use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 1:1 acknowledgement state for a `DutyAssignment`. Kept as its own table
/// (rather than a single table shared with `PodDutyAcknowledgement`) — a
/// polymorphic acknowledgement table would need a discriminator plus a
/// nullable foreign key per duty kind, so each duty kind gets its own
/// acknowledgement table instead.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "duty_acknowledgements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub duty_assignment_id: i64,
    pub status: AckStatus,
    /// Required iff `status = Unavailable`.
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ack_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AckStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "unavailable")]
    Unavailable,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::duty_assignment::Entity",
        from = "Column::DutyAssignmentId",
        to = "super::duty_assignment::Column::Id",
        on_delete = "Cascade"
    )]
    DutyAssignment,
}

impl Related<super::duty_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DutyAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
