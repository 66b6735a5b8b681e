use crate::models::cover_assignment::{Column, Entity};
use crate::repositories::repository::Repository;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct CoverAssignmentFilter {
    pub tenant_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub request_id: Option<String>,
    pub slot_key: Option<String>,
}

pub struct CoverAssignmentRepository {
    db: DatabaseConnection,
}

impl CoverAssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, CoverAssignmentFilter> for CoverAssignmentRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &CoverAssignmentFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(date) = filter.date {
            query = query.filter(Column::Date.eq(date));
        }
        if let Some(request_id) = &filter.request_id {
            query = query.filter(Column::RequestId.eq(request_id.clone()));
        }
        if let Some(slot_key) = &filter.slot_key {
            query = query.filter(Column::SlotKey.eq(slot_key.clone()));
        }
        query
    }
}
