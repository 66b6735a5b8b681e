use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The schedule service's own record of a leave, ingested from the webhook
/// in §4.9. Deliberately separate from `leave_requests`: this table is keyed
/// by the leave service's string `request_id`, not our integer primary key,
/// because the two services only ever communicate over the wire.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incoming_leave_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: String,
    #[sea_orm(unique)]
    pub request_id: String,
    pub teacher_email: String,
    pub teacher_name: Option<String>,
    pub leave_start: NaiveDate,
    pub leave_end: NaiveDate,
    pub status: String,
    #[sea_orm(column_type = "Json")]
    pub raw_payload: serde_json::Value,
    pub forward_status: Option<ForwardStatus>,
    pub forward_detail: Option<String>,
    pub forwarded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "forward_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ForwardStatus {
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "failed")]
    Failed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
