use crate::models::duty_acknowledgement::{AckStatus, Column, Entity};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct DutyAcknowledgementFilter {
    pub duty_assignment_id: Option<i64>,
    pub status: Option<AckStatus>,
}

pub struct DutyAcknowledgementRepository {
    db: DatabaseConnection,
}

impl DutyAcknowledgementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, DutyAcknowledgementFilter> for DutyAcknowledgementRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &DutyAcknowledgementFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(id) = filter.duty_assignment_id {
            query = query.filter(Column::DutyAssignmentId.eq(id));
        }
        if let Some(status) = &filter.status {
            query = query.filter(Column::Status.eq(status.clone()));
        }
        query
    }
}
