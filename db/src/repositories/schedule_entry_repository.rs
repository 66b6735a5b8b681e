use crate::models::schedule_entry::{Column, DayCode, Entity};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct ScheduleEntryFilter {
    pub tenant_id: Option<String>,
    pub teacher_id: Option<i64>,
    pub day_code: Option<DayCode>,
    pub period: Option<String>,
}

pub struct ScheduleEntryRepository {
    db: DatabaseConnection,
}

impl ScheduleEntryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, ScheduleEntryFilter> for ScheduleEntryRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &ScheduleEntryFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(day_code) = &filter.day_code {
            query = query.filter(Column::DayCode.eq(day_code.clone()));
        }
        if let Some(period) = &filter.period {
            query = query.filter(Column::Period.eq(period.clone()));
        }
        query
    }
}
