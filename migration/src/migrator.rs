use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601010001_create_tenants::Migration),
            Box::new(migrations::m202601010002_create_teachers::Migration),
            Box::new(migrations::m202601010003_create_students::Migration),
            Box::new(migrations::m202601010004_create_schedule_entries::Migration),
            Box::new(migrations::m202601010005_create_leave_requests::Migration),
            Box::new(migrations::m202601010006_create_leave_messages::Migration),
            Box::new(migrations::m202601010007_create_incoming_leave_records::Migration),
            Box::new(migrations::m202601010008_create_cover_assignments::Migration),
            Box::new(migrations::m202601010009_create_duty_assignments::Migration),
            Box::new(migrations::m202601010010_create_duty_acknowledgements::Migration),
            Box::new(migrations::m202601010011_create_pod_duty_assignments::Migration),
            Box::new(migrations::m202601010012_create_pod_duty_acknowledgements::Migration),
            Box::new(migrations::m202601010013_create_absence_threshold_attempts::Migration),
            Box::new(migrations::m202601010014_create_excluded_teachers::Migration),
            Box::new(migrations::m202601010015_create_notifier_tokens::Migration),
        ]
    }
}
