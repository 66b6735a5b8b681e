use crate::models::teacher::{Column, Entity, Role};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct TeacherFilter {
    pub tenant_id: Option<String>,
    pub email: Option<String>,
    pub slug: Option<String>,
    pub role: Option<Role>,
}

pub struct TeacherRepository {
    db: DatabaseConnection,
}

impl TeacherRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, TeacherFilter> for TeacherRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &TeacherFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(email) = &filter.email {
            query = query.filter(Column::Email.eq(email.clone()));
        }
        if let Some(slug) = &filter.slug {
            query = query.filter(Column::Slug.eq(slug.clone()));
        }
        if let Some(role) = &filter.role {
            query = query.filter(Column::Role.eq(role.clone()));
        }
        query
    }
}
