pub mod repository;

pub mod absence_threshold_attempt_repository;
pub mod cover_assignment_repository;
pub mod duty_acknowledgement_repository;
pub mod duty_assignment_repository;
pub mod excluded_teacher_repository;
pub mod incoming_leave_record_repository;
pub mod leave_message_repository;
pub mod leave_request_repository;
pub mod notifier_token_repository;
pub mod pod_duty_acknowledgement_repository;
pub mod pod_duty_assignment_repository;
pub mod schedule_entry_repository;
pub mod teacher_repository;

pub use repository::Repository;
