use crate::models::incoming_leave_record::{Column, Entity};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct IncomingLeaveRecordFilter {
    pub tenant_id: Option<String>,
    pub request_id: Option<String>,
}

pub struct IncomingLeaveRecordRepository {
    db: DatabaseConnection,
}

impl IncomingLeaveRecordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, IncomingLeaveRecordFilter> for IncomingLeaveRecordRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &IncomingLeaveRecordFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(request_id) = &filter.request_id {
            query = query.filter(Column::RequestId.eq(request_id.clone()));
        }
        query
    }
}
