use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A teacher within a tenant. Email is unique per tenant, not globally.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
    pub email: String,
    /// Slug used for exclusion lists and cover tie-breaking, derived from name.
    pub slug: String,
    pub subject: String,
    /// Grade level as a numeric string, e.g. "10".
    pub grade_level: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Roles control which duty slots a teacher may fill. `GradeLead` carries the
/// grade it leads since the role is parameterised (`grade_lead_G`).
#[derive(Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "teacher_role")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "pa")]
    Pa,
    #[sea_orm(string_value = "slt")]
    Slt,
    #[sea_orm(string_value = "administrator")]
    Administrator,
    #[sea_orm(string_value = "grade_lead_6")]
    GradeLead6,
    #[sea_orm(string_value = "grade_lead_7")]
    GradeLead7,
    #[sea_orm(string_value = "grade_lead_10")]
    GradeLead10,
    #[sea_orm(string_value = "grade_lead_11")]
    GradeLead11,
    #[sea_orm(string_value = "grade_lead_12")]
    GradeLead12,
}

impl Role {
    /// The grade this role leads, if it is a grade-lead role.
    pub fn leads_grade(&self) -> Option<u8> {
        match self {
            Role::GradeLead6 => Some(6),
            Role::GradeLead7 => Some(7),
            Role::GradeLead10 => Some(10),
            Role::GradeLead11 => Some(11),
            Role::GradeLead12 => Some(12),
            _ => None,
        }
    }

    /// Whether this role may reach reviewer-only write endpoints (leave
    /// review, cover edit/backfill, duty/pod assignment). `Pa` is read-only
    /// at every level, not just within leave review, so it is excluded here
    /// alongside plain `Teacher` rather than only at the service layer.
    pub fn can_review(&self) -> bool {
        !matches!(self, Role::Teacher | Role::Pa)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
    #[sea_orm(has_many = "super::schedule_entry::Entity")]
    ScheduleEntry,
    #[sea_orm(has_many = "super::leave_request::Entity")]
    LeaveRequest,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::schedule_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleEntry.def()
    }
}

impl Related<super::leave_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
