use crate::models::notifier_token::{Column, Entity};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct NotifierTokenFilter {
    pub tenant_id: Option<String>,
    pub profile: Option<String>,
}

pub struct NotifierTokenRepository {
    db: DatabaseConnection,
}

impl NotifierTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, NotifierTokenFilter> for NotifierTokenRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &NotifierTokenFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(profile) = &filter.profile {
            query = query.filter(Column::Profile.eq(profile.clone()));
        }
        query
    }
}
