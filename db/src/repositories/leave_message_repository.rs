use crate::models::leave_message::{Column, Entity};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, QueryOrder, Select};

#[derive(Default, Clone)]
pub struct LeaveMessageFilter {
    pub tenant_id: Option<String>,
    pub excuse_id: Option<i64>,
}

pub struct LeaveMessageRepository {
    db: DatabaseConnection,
}

impl LeaveMessageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, LeaveMessageFilter> for LeaveMessageRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &LeaveMessageFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(excuse_id) = filter.excuse_id {
            query = query.filter(Column::ExcuseId.eq(excuse_id));
        }
        query.order_by_asc(Column::CreatedAt)
    }
}
