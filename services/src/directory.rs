//! Identity directory (C2): teachers with email, subject, grade, level, role.

use crate::error::{ServiceError, ServiceResult};
use db::models::teacher::{Model as Teacher, Role};
use db::repositories::repository::Repository;
use db::repositories::teacher_repository::{TeacherFilter, TeacherRepository};
use sea_orm::DatabaseConnection;

pub struct DirectoryService {
    teachers: TeacherRepository,
}

impl DirectoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            teachers: TeacherRepository::new(db),
        }
    }

    pub async fn by_email(&self, tenant_id: &str, email: &str) -> ServiceResult<Option<Teacher>> {
        let filter = TeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
            email: Some(email.to_string()),
            slug: None,
            role: None,
        };
        Ok(self.teachers.find_one(filter).await?)
    }

    pub async fn by_slug(&self, tenant_id: &str, slug: &str) -> ServiceResult<Option<Teacher>> {
        let filter = TeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
            email: None,
            slug: Some(slug.to_string()),
            role: None,
        };
        Ok(self.teachers.find_one(filter).await?)
    }

    pub async fn by_id(&self, id: i64) -> ServiceResult<Teacher> {
        self.teachers
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("teacher {id} not found")))
    }

    pub async fn all(&self, tenant_id: &str) -> ServiceResult<Vec<Teacher>> {
        let filter = TeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
            email: None,
            slug: None,
            role: None,
        };
        Ok(self.teachers.find_all(filter).await?)
    }

    pub async fn with_role(&self, tenant_id: &str, role: Role) -> ServiceResult<Vec<Teacher>> {
        let filter = TeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
            email: None,
            slug: None,
            role: Some(role),
        };
        Ok(self.teachers.find_all(filter).await?)
    }

    /// A super-admin is `role=admin` with no teacher linkage — spec §4.6's
    /// "restricted to super admin" check. An admin-role actor still linked
    /// to a teacher row is scoped like any other reviewer, not a super
    /// admin. Called by `leave_manager::review` to gate the whole operation.
    pub fn is_super_admin(role: &Role, teacher_id: Option<i64>) -> bool {
        matches!(role, Role::Admin) && teacher_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::create_test_db;

    async fn seed_teacher(db: &sea_orm::DatabaseConnection, tenant: &str, email: &str) -> Teacher {
        use db::models::teacher::ActiveModel;
        use sea_orm::{ActiveModelTrait, Set};
        let now = chrono::Utc::now();
        ActiveModel {
            tenant_id: Set(tenant.into()),
            name: Set("Jane Doe".into()),
            email: Set(email.into()),
            slug: Set("jane-doe".into()),
            subject: Set("Math".into()),
            grade_level: Set("10".into()),
            role: Set(Role::Teacher),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn finds_teacher_by_email_within_tenant() {
        let db = create_test_db().await;
        seed_teacher(&db, "tenant-a", "t1@x.com").await;
        let svc = DirectoryService::new(db);

        let found = svc.by_email("tenant-a", "t1@x.com").await.unwrap();
        assert!(found.is_some());

        let missing = svc.by_email("tenant-b", "t1@x.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn only_teacherless_admin_is_super_admin() {
        assert!(DirectoryService::is_super_admin(&Role::Admin, None));
        assert!(!DirectoryService::is_super_admin(&Role::Admin, Some(7)));
        assert!(!DirectoryService::is_super_admin(&Role::Pa, None));
        assert!(!DirectoryService::is_super_admin(&Role::GradeLead6, None));
    }
}
