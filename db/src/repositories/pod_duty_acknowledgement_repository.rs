use crate::models::pod_duty_acknowledgement::{AckStatus, Column, Entity};
use crate::repositories::repository::Repository;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct PodDutyAcknowledgementFilter {
    pub pod_duty_assignment_id: Option<i64>,
    pub status: Option<AckStatus>,
}

pub struct PodDutyAcknowledgementRepository {
    db: DatabaseConnection,
}

impl PodDutyAcknowledgementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, PodDutyAcknowledgementFilter> for PodDutyAcknowledgementRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &PodDutyAcknowledgementFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(id) = filter.pod_duty_assignment_id {
            query = query.filter(Column::PodDutyAssignmentId.eq(id));
        }
        if let Some(status) = &filter.status {
            query = query.filter(Column::Status.eq(status.clone()));
        }
        query
    }
}
