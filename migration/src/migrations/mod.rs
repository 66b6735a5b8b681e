pub mod m202601010001_create_tenants;
pub mod m202601010002_create_teachers;
pub mod m202601010003_create_students;
pub mod m202601010004_create_schedule_entries;
pub mod m202601010005_create_leave_requests;
pub mod m202601010006_create_leave_messages;
pub mod m202601010007_create_incoming_leave_records;
pub mod m202601010008_create_cover_assignments;
pub mod m202601010009_create_duty_assignments;
pub mod m202601010010_create_duty_acknowledgements;
pub mod m202601010011_create_pod_duty_assignments;
pub mod m202601010012_create_pod_duty_acknowledgements;
pub mod m202601010013_create_absence_threshold_attempts;
pub mod m202601010014_create_excluded_teachers;
pub mod m202601010015_create_notifier_tokens;
