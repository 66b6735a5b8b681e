use crate::models::leave_request::{Column, Entity, LeaveStatus, LeaveType};
use crate::repositories::repository::Repository;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryFilter, Select};

#[derive(Default, Clone)]
pub struct LeaveRequestFilter {
    pub tenant_id: Option<String>,
    pub teacher_id: Option<i64>,
    pub leave_date: Option<NaiveDate>,
    pub status: Option<LeaveStatus>,
    pub leave_type: Option<LeaveType>,
}

pub struct LeaveRequestRepository {
    db: DatabaseConnection,
}

impl LeaveRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl Repository<Entity, LeaveRequestFilter> for LeaveRequestRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<Entity>, filter: &LeaveRequestFilter) -> Select<Entity> {
        let mut query = query;
        if let Some(tenant_id) = &filter.tenant_id {
            query = query.filter(Column::TenantId.eq(tenant_id.clone()));
        }
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(leave_date) = filter.leave_date {
            query = query.filter(Column::LeaveDate.eq(leave_date));
        }
        if let Some(status) = &filter.status {
            query = query.filter(Column::Status.eq(status.clone()));
        }
        if let Some(leave_type) = &filter.leave_type {
            query = query.filter(Column::LeaveType.eq(leave_type.clone()));
        }
        query
    }
}
