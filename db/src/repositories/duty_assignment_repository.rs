use crate::models::duty_assignment::{Column, DutyType, Entity};
use crate::repositories::repository::Repository;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct DutyAssignmentFilter {
    pub tenant_id: Option<String>,
    pub assignment_date: Option<NaiveDate>,
    pub duty_type: Option<DutyType>,
    pub teacher_id: Option<i64>,
}

pub struct DutyAssignmentRepository {
    db: DatabaseConnection,
}

impl DutyAssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, DutyAssignmentFilter> for DutyAssignmentRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &DutyAssignmentFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(date) = filter.assignment_date {
            query = query.filter(Column::AssignmentDate.eq(date));
        }
        if let Some(duty_type) = &filter.duty_type {
            query = query.filter(Column::DutyType.eq(duty_type.clone()));
        }
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(Column::TeacherId.eq(teacher_id));
        }
        query
    }
}
