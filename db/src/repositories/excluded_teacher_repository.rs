use crate::models::excluded_teacher::{Column, Entity};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct ExcludedTeacherFilter {
    pub tenant_id: Option<String>,
}

pub struct ExcludedTeacherRepository {
    db: DatabaseConnection,
}

impl ExcludedTeacherRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, ExcludedTeacherFilter> for ExcludedTeacherRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &ExcludedTeacherFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        query
    }
}
