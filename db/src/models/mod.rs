pub mod tenant;
pub mod teacher;
pub mod student;
pub mod schedule_entry;
pub mod leave_request;
pub mod leave_message;
pub mod incoming_leave_record;
pub mod cover_assignment;
pub mod duty_assignment;
pub mod duty_acknowledgement;
pub mod pod_duty_assignment;
pub mod pod_duty_acknowledgement;
pub mod absence_threshold_attempt;
pub mod excluded_teacher;
pub mod notifier_token;

pub use tenant::Entity as Tenant;
pub use teacher::Entity as Teacher;
pub use student::Entity as Student;
pub use schedule_entry::Entity as ScheduleEntry;
pub use leave_request::Entity as LeaveRequest;
pub use leave_message::Entity as LeaveMessage;
pub use incoming_leave_record::Entity as IncomingLeaveRecord;
pub use cover_assignment::Entity as CoverAssignment;
pub use duty_assignment::Entity as DutyAssignment;
pub use duty_acknowledgement::Entity as DutyAcknowledgement;
pub use pod_duty_assignment::Entity as PodDutyAssignment;
pub use pod_duty_acknowledgement::Entity as PodDutyAcknowledgement;
pub use absence_threshold_attempt::Entity as AbsenceThresholdAttempt;
pub use excluded_teacher::Entity as ExcludedTeacher;
pub use notifier_token::Entity as NotifierToken;
