use crate::models::absence_threshold_attempt::{Column, Entity};
use crate::repositories::repository::Repository;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct AbsenceThresholdAttemptFilter {
    pub tenant_id: Option<String>,
    pub teacher_id: Option<i64>,
    pub attempted_leave_date: Option<NaiveDate>,
}

pub struct AbsenceThresholdAttemptRepository {
    db: DatabaseConnection,
}

impl AbsenceThresholdAttemptRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, AbsenceThresholdAttemptFilter> for AbsenceThresholdAttemptRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &AbsenceThresholdAttemptFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(date) = filter.attempted_leave_date {
            query = query.filter(Column::AttemptedLeaveDate.eq(date));
        }
        query
    }
}
