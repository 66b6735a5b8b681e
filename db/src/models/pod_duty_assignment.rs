use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A grade-pod duty slot. Unique per `(assignment_date, teacher_id,
/// slot_type, period)` — `period` is `None` for break slots, so two break
/// rows for the same teacher on the same day still collide correctly.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pod_duty_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: String,
    pub assignment_date: NaiveDate,
    pub grade: i32,
    pub pod: String,
    pub slot_type: SlotType,
    pub period: Option<i32>,
    pub teacher_id: i64,
    /// Required for break slots when grade is 6, 7, or 10.
    pub break_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "slot_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SlotType {
    #[sea_orm(string_value = "period")]
    Period,
    #[sea_orm(string_value = "break")]
    Break,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_one = "super::pod_duty_acknowledgement::Entity")]
    Acknowledgement,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::pod_duty_acknowledgement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Acknowledgement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
