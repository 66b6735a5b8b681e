use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One (teacher, day, period) cell of the weekly schedule grid.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: String,
    pub teacher_id: i64,
    pub day_code: DayCode,
    /// Canonicalized period, e.g. "P1", "Homeroom", or the raw label verbatim
    /// when it did not match the canonicalization table.
    pub period: String,
    /// Original, uncanonicalized label as loaded from the source sheet.
    pub period_raw: String,
    pub details: String,
    /// Grade detected in `details` via the grade pattern, if any.
    pub grade_detected: Option<String>,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "day_code")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DayCode {
    Mo,
    Tu,
    We,
    Th,
    Fr,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
