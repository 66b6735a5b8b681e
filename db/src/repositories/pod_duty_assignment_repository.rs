use crate::models::pod_duty_assignment::{Column, Entity, SlotType};
use crate::repositories::repository::Repository;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct PodDutyAssignmentFilter {
    pub tenant_id: Option<String>,
    pub assignment_date: Option<NaiveDate>,
    pub grade: Option<i32>,
    pub slot_type: Option<SlotType>,
    pub teacher_id: Option<i64>,
}

pub struct PodDutyAssignmentRepository {
    db: DatabaseConnection,
}

impl PodDutyAssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, PodDutyAssignmentFilter> for PodDutyAssignmentRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &PodDutyAssignmentFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(date) = filter.assignment_date {
            query = query.filter(Column::AssignmentDate.eq(date));
        }
        if let Some(grade) = filter.grade {
            query = query.filter(Column::Grade.eq(grade));
        }
        if let Some(slot_type) = &filter.slot_type {
            query = query.filter(Column::SlotType.eq(slot_type.clone()));
        }
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(Column::TeacherId.eq(teacher_id));
        }
        query
    }
}
