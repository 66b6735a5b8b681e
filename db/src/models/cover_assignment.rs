use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single period's cover for an absent teacher, produced by the cover
/// assignment engine (C8). Unique per `(date, request_id, slot_key)`; the
/// engine relies on that constraint to make repeated assign-for-record calls
/// idempotent no-ops.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cover_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: String,
    pub date: NaiveDate,
    /// `period_label|period_raw|class_time`, derived by the engine.
    pub slot_key: String,
    /// Weakly references `incoming_leave_records.request_id`; the leave may
    /// since have been deleted, in which case this assignment is orphaned
    /// history rather than deleted itself.
    pub request_id: String,
    pub day_label: String,

    pub absent_teacher: String,
    pub absent_email: String,

    pub cover_teacher: Option<String>,
    pub cover_email: Option<String>,
    pub cover_slug: Option<String>,
    pub cover_subject: Option<String>,
    pub cover_free_periods: Option<i32>,
    pub cover_scheduled: Option<i32>,
    pub cover_max_periods: Option<i32>,

    pub class_subject: Option<String>,
    pub class_grade: Option<String>,
    pub class_details: Option<String>,
    pub period_label: Option<String>,
    pub period_raw: Option<String>,
    pub class_time: Option<String>,

    pub status: String,
    pub cover_assigned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
