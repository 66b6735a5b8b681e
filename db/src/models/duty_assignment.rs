use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A daily duty (morning or dismissal) assignment. Unique per
/// `(assignment_date, duty_type, teacher_id)`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "duty_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: String,
    pub assignment_date: NaiveDate,
    pub duty_type: DutyType,
    pub location: String,
    pub teacher_id: i64,
}

#[derive(Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "duty_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DutyType {
    #[sea_orm(string_value = "morning")]
    Morning,
    #[sea_orm(string_value = "dismissal")]
    Dismissal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_one = "super::duty_acknowledgement::Entity")]
    Acknowledgement,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::duty_acknowledgement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Acknowledgement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
