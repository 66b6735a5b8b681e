//! Duty scheduler (C9): daily-duty (morning/dismissal) and grade-pod-duty
//! rosters, per-assignment acknowledgement, and auto-assignment candidates
//! drawn from an external availability API (spec §4.8).

use crate::error::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use db::models::duty_acknowledgement::{AckStatus, Model as DutyAck};
use db::models::duty_assignment::{DutyType, Model as DutyAssignment};
use db::models::pod_duty_acknowledgement::Model as PodDutyAck;
use db::models::pod_duty_assignment::{Model as PodDutyAssignment, SlotType};
use db::models::schedule_entry::DayCode;
use db::models::teacher::Role;
use db::repositories::duty_acknowledgement_repository::{DutyAcknowledgementFilter, DutyAcknowledgementRepository};
use db::repositories::duty_assignment_repository::{DutyAssignmentFilter, DutyAssignmentRepository};
use db::repositories::excluded_teacher_repository::{ExcludedTeacherFilter, ExcludedTeacherRepository};
use db::repositories::pod_duty_acknowledgement_repository::{PodDutyAcknowledgementFilter, PodDutyAcknowledgementRepository};
use db::repositories::pod_duty_assignment_repository::{PodDutyAssignmentFilter, PodDutyAssignmentRepository};
use db::repositories::repository::Repository;
use db::repositories::teacher_repository::{TeacherFilter, TeacherRepository};
use sea_orm::{DatabaseConnection, Set};
use std::collections::HashSet;
use std::time::Duration;

/// Daily-duty physical locations (spec §4.8: gates, courtyards, floors, canteen).
pub const DAILY_DUTY_LOCATIONS: &[&str] = &[
    "Main Gate",
    "Side Gate",
    "Courtyard A",
    "Courtyard B",
    "Upper Floor",
    "Lower Floor",
    "Canteen",
];

/// Break-duty locations for grade-pod rosters.
pub const BREAK_LOCATIONS: &[&str] = &["Courtyard A", "Courtyard B", "Canteen Gate", "Upper Floor"];

/// Grades that run a grade-pod roster, and the period count for each
/// (spec §4.8: 6 for G6/G7, 7 for G10/G11/G12).
pub fn periods_for_grade(grade: i32) -> ServiceResult<u32> {
    match grade {
        6 | 7 => Ok(6),
        10 | 11 | 12 => Ok(7),
        other => Err(ServiceError::Validation(format!("grade {other} has no pod-duty roster"))),
    }
}

/// Whether a break slot for this grade requires a `break_location`.
pub fn break_location_required(grade: i32) -> bool {
    matches!(grade, 6 | 7 | 10)
}

fn pod_name(grade: i32, pod_index: u8) -> String {
    format!("G{grade} Pod {pod_index}")
}

/// Whether `role` may be assigned to a daily-duty (morning/dismissal) slot.
/// Administrators are excluded from every daily-duty roster.
fn can_fill_daily_duty(role: &Role) -> bool {
    !matches!(role, Role::Administrator)
}

/// Whether `role` may fill a pod-duty slot of the given `slot_type`.
/// Administrators are excluded from every pod slot; SLT is excluded from
/// break slots only.
fn can_fill_pod_slot(role: &Role, slot_type: SlotType) -> bool {
    if matches!(role, Role::Administrator) {
        return false;
    }
    if slot_type == SlotType::Break && matches!(role, Role::Slt) {
        return false;
    }
    true
}

/// Whether `role` may edit the grade-pod roster for `grade` — the grade's
/// own lead, or super admin (spec §3: "grade_lead_G is the only role
/// (besides admin) permitted to edit that grade's pod-duty roster").
pub fn can_edit_pod_roster(role: &Role, grade: i32) -> bool {
    matches!(role, Role::Admin) || role.leads_grade() == Some(grade as u8)
}

pub struct DutyScheduler {
    duty_assignments: DutyAssignmentRepository,
    duty_acks: DutyAcknowledgementRepository,
    pod_assignments: PodDutyAssignmentRepository,
    pod_acks: PodDutyAcknowledgementRepository,
    excluded: ExcludedTeacherRepository,
    teachers: TeacherRepository,
    http: reqwest::Client,
}

impl DutyScheduler {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            duty_assignments: DutyAssignmentRepository::new(db.clone()),
            duty_acks: DutyAcknowledgementRepository::new(db.clone()),
            pod_assignments: PodDutyAssignmentRepository::new(db.clone()),
            pod_acks: PodDutyAcknowledgementRepository::new(db.clone()),
            excluded: ExcludedTeacherRepository::new(db.clone()),
            teachers: TeacherRepository::new(db),
            http: reqwest::Client::new(),
        }
    }

    // ---- Daily duty ----------------------------------------------------

    pub async fn assign_daily(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        duty_type: DutyType,
        location: &str,
        teacher_id: i64,
    ) -> ServiceResult<DutyAssignment> {
        let teacher = self.require_teacher(tenant_id, teacher_id).await?;
        if !can_fill_daily_duty(&teacher.role) {
            return Err(ServiceError::Validation(format!(
                "{} may not be assigned to daily duty",
                teacher.role
            )));
        }

        let filter = DutyAssignmentFilter {
            tenant_id: Some(tenant_id.to_string()),
            assignment_date: Some(date),
            duty_type: Some(duty_type.clone()),
            teacher_id: Some(teacher_id),
        };
        if !self.duty_assignments.find_all(filter).await?.is_empty() {
            return Err(ServiceError::ConflictDuplicate(format!(
                "{} is already assigned to {duty_type} duty on {date}",
                teacher.name
            )));
        }

        use db::models::duty_assignment::ActiveModel;
        let am = ActiveModel {
            tenant_id: Set(tenant_id.to_string()),
            assignment_date: Set(date),
            duty_type: Set(duty_type),
            location: Set(location.to_string()),
            teacher_id: Set(teacher_id),
            ..Default::default()
        };
        let row = self.duty_assignments.create(am).await?;
        self.create_daily_ack(row.id).await?;
        Ok(row)
    }

    async fn create_daily_ack(&self, duty_assignment_id: i64) -> ServiceResult<DutyAck> {
        use db::models::duty_acknowledgement::ActiveModel;
        let am = ActiveModel {
            duty_assignment_id: Set(duty_assignment_id),
            status: Set(AckStatus::Pending),
            note: Set(None),
            updated_at: Set(chrono::Utc::now()),
        };
        Ok(self.duty_acks.create(am).await?)
    }

    /// Admin or the assigned teacher may acknowledge a daily-duty slot
    /// (spec §4.8); `actor_role`/`actor_teacher_id` identify the caller so
    /// a teacher can only transition their own assignment.
    pub async fn acknowledge_daily(
        &self,
        duty_assignment_id: i64,
        actor_role: &Role,
        actor_teacher_id: Option<i64>,
        status: AckStatus,
        note: Option<String>,
    ) -> ServiceResult<DutyAck> {
        if status == AckStatus::Unavailable && note.as_deref().unwrap_or("").trim().is_empty() {
            return Err(ServiceError::Validation("a note is required to mark unavailable".into()));
        }
        let assignment = self
            .duty_assignments
            .find_by_id(duty_assignment_id)
            .await?
            .ok_or_else(|| ServiceError::Validation("no duty assignment with this id".into()))?;
        if !matches!(actor_role, Role::Admin) && actor_teacher_id != Some(assignment.teacher_id) {
            return Err(ServiceError::Validation(
                "only an admin or the assigned teacher may acknowledge this duty".into(),
            ));
        }

        let filter = DutyAcknowledgementFilter {
            duty_assignment_id: Some(duty_assignment_id),
            status: None,
        };
        let existing = self
            .duty_acks
            .find_one(filter)
            .await?
            .ok_or_else(|| ServiceError::Validation("no acknowledgement row for this duty assignment".into()))?;

        use sea_orm::IntoActiveModel;
        let mut am = existing.into_active_model();
        am.status = Set(status);
        am.note = Set(note);
        am.updated_at = Set(chrono::Utc::now());
        Ok(self.duty_acks.update(am).await?)
    }

    // ---- Grade-pod duty -------------------------------------------------

    pub async fn assign_pod_slot(&self, tenant_id: &str, input: PodSlotInput) -> ServiceResult<PodDutyAssignment> {
        self.validate_pod_slot(&input)?;
        let teacher = self.require_teacher(tenant_id, input.teacher_id).await?;
        if !can_fill_pod_slot(&teacher.role, input.slot_type) {
            return Err(ServiceError::Validation(format!(
                "{} may not be assigned to this pod slot",
                teacher.role
            )));
        }

        let filter = PodDutyAssignmentFilter {
            tenant_id: Some(tenant_id.to_string()),
            assignment_date: Some(input.date),
            grade: None,
            slot_type: Some(input.slot_type.clone()),
            teacher_id: Some(input.teacher_id),
        };
        let conflict = self
            .pod_assignments
            .find_all(filter)
            .await?
            .into_iter()
            .any(|row| row.period == input.period);
        if conflict {
            return Err(ServiceError::ConflictDuplicate(format!(
                "{} is already assigned to that slot on {}",
                teacher.name, input.date
            )));
        }

        use db::models::pod_duty_assignment::ActiveModel;
        let am = ActiveModel {
            tenant_id: Set(tenant_id.to_string()),
            assignment_date: Set(input.date),
            grade: Set(input.grade),
            pod: Set(input.pod),
            slot_type: Set(input.slot_type),
            period: Set(input.period),
            teacher_id: Set(input.teacher_id),
            break_location: Set(input.break_location),
            ..Default::default()
        };
        let row = self.pod_assignments.create(am).await?;
        self.create_pod_ack(row.id).await?;
        Ok(row)
    }

    fn validate_pod_slot(&self, input: &PodSlotInput) -> ServiceResult<()> {
        let n_periods = periods_for_grade(input.grade)?;
        match input.slot_type {
            SlotType::Period => {
                let period = input
                    .period
                    .ok_or_else(|| ServiceError::Validation("period slots require a period number".into()))?;
                if period < 1 || period as u32 > n_periods {
                    return Err(ServiceError::Validation(format!(
                        "grade {} only has {n_periods} periods",
                        input.grade
                    )));
                }
            }
            SlotType::Break => {
                if input.period.is_some() {
                    return Err(ServiceError::Validation("break slots do not carry a period".into()));
                }
                if break_location_required(input.grade) && input.break_location.is_none() {
                    return Err(ServiceError::Validation(format!(
                        "grade {} break slots require a break_location",
                        input.grade
                    )));
                }
            }
        }
        Ok(())
    }

    async fn create_pod_ack(&self, pod_duty_assignment_id: i64) -> ServiceResult<PodDutyAck> {
        use db::models::pod_duty_acknowledgement::ActiveModel;
        let am = ActiveModel {
            pod_duty_assignment_id: Set(pod_duty_assignment_id),
            status: Set(AckStatus::Pending),
            note: Set(None),
            updated_at: Set(chrono::Utc::now()),
        };
        Ok(self.pod_acks.create(am).await?)
    }

    /// Admin or the assigned teacher may acknowledge a pod-duty slot (spec
    /// §4.8), mirroring `acknowledge_daily`'s ownership check.
    pub async fn acknowledge_pod(
        &self,
        pod_duty_assignment_id: i64,
        actor_role: &Role,
        actor_teacher_id: Option<i64>,
        status: AckStatus,
        note: Option<String>,
    ) -> ServiceResult<PodDutyAck> {
        if status == AckStatus::Unavailable && note.as_deref().unwrap_or("").trim().is_empty() {
            return Err(ServiceError::Validation("a note is required to mark unavailable".into()));
        }
        let assignment = self
            .pod_assignments
            .find_by_id(pod_duty_assignment_id)
            .await?
            .ok_or_else(|| ServiceError::Validation("no pod duty assignment with this id".into()))?;
        if !matches!(actor_role, Role::Admin) && actor_teacher_id != Some(assignment.teacher_id) {
            return Err(ServiceError::Validation(
                "only an admin or the assigned teacher may acknowledge this duty".into(),
            ));
        }

        let filter = PodDutyAcknowledgementFilter {
            pod_duty_assignment_id: Some(pod_duty_assignment_id),
            status: None,
        };
        let existing = self
            .pod_acks
            .find_one(filter)
            .await?
            .ok_or_else(|| ServiceError::Validation("no acknowledgement row for this pod duty assignment".into()))?;

        use sea_orm::IntoActiveModel;
        let mut am = existing.into_active_model();
        am.status = Set(status);
        am.note = Set(note);
        am.updated_at = Set(chrono::Utc::now());
        Ok(self.pod_acks.update(am).await?)
    }

    /// Diff `desired` against the persisted roster for `(tenant, date,
    /// grade)`: delete rows (and their acknowledgements) absent from
    /// `desired`, insert rows absent from the existing set. Rows present in
    /// both are left untouched (spec §4.8 Bulk replace, scenario S6).
    pub async fn bulk_replace_pod(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        grade: i32,
        desired: Vec<PodSlotInput>,
    ) -> ServiceResult<PodRosterDiff> {
        for input in &desired {
            self.validate_pod_slot(input)?;
        }

        let existing = self
            .pod_assignments
            .find_all(PodDutyAssignmentFilter {
                tenant_id: Some(tenant_id.to_string()),
                assignment_date: Some(date),
                grade: Some(grade),
                slot_type: None,
                teacher_id: None,
            })
            .await?;

        let desired_keys: HashSet<PodSlotKey> = desired.iter().map(PodSlotKey::from_input).collect();
        let existing_keys: HashSet<PodSlotKey> = existing.iter().map(PodSlotKey::from_row).collect();

        let mut diff = PodRosterDiff::default();

        for row in &existing {
            if !desired_keys.contains(&PodSlotKey::from_row(row)) {
                self.pod_assignments.delete(row.id).await?;
                diff.removed += 1;
            }
        }

        for input in desired {
            if existing_keys.contains(&PodSlotKey::from_input(&input)) {
                continue;
            }
            match self.assign_pod_slot(tenant_id, input).await {
                Ok(_) => diff.added += 1,
                Err(e) => diff.rejected.push(e.to_string()),
            }
        }

        Ok(diff)
    }

    // ---- Availability (external) ---------------------------------------

    /// Candidates from the external availability API for `(day, period)`,
    /// ordered by "not yet assigned today" then alphabetical name. Falls
    /// back to all known teachers (minus exclusions/role filters) when the
    /// API is unreachable (spec §4.8).
    pub async fn availability_candidates(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        day: DayCode,
        period: &str,
        slot_type: SlotType,
    ) -> ServiceResult<Vec<db::models::teacher::Model>> {
        let exclusion_set = self.exclusion_set(tenant_id).await?;
        let already_assigned_today = self.assigned_today(tenant_id, date).await?;

        let emails = self.fetch_availability_emails(day, period).await;

        let mut candidates: Vec<db::models::teacher::Model> = match emails {
            Some(emails) => {
                let all = self.all_teachers(tenant_id).await?;
                all.into_iter().filter(|t| emails.contains(&t.email)).collect()
            }
            None => self.all_teachers(tenant_id).await?,
        };

        candidates.retain(|t| !exclusion_set.contains(&t.slug) && can_fill_pod_slot(&t.role, slot_type));
        candidates.sort_by(|a, b| {
            let a_assigned = already_assigned_today.contains(&a.id);
            let b_assigned = already_assigned_today.contains(&b.id);
            a_assigned.cmp(&b_assigned).then_with(|| a.name.cmp(&b.name))
        });
        Ok(candidates)
    }

    async fn fetch_availability_emails(&self, day: DayCode, period: &str) -> Option<HashSet<String>> {
        let base = common::config::Config::get().availability_api_url.clone()?;
        let timeout = common::config::Config::get().availability_api_timeout_secs;
        let url = format!("{base}/api/check-availability?day={day}&period={period}");

        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(timeout))
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let body: AvailabilityResponse = resp.json().await.ok()?;
        Some(body.available.into_iter().map(|c| c.email).collect())
    }

    async fn assigned_today(&self, tenant_id: &str, date: NaiveDate) -> ServiceResult<HashSet<i64>> {
        let mut ids = HashSet::new();
        let daily = self
            .duty_assignments
            .find_all(DutyAssignmentFilter {
                tenant_id: Some(tenant_id.to_string()),
                assignment_date: Some(date),
                duty_type: None,
                teacher_id: None,
            })
            .await?;
        ids.extend(daily.into_iter().map(|r| r.teacher_id));

        let pod = self
            .pod_assignments
            .find_all(PodDutyAssignmentFilter {
                tenant_id: Some(tenant_id.to_string()),
                assignment_date: Some(date),
                grade: None,
                slot_type: None,
                teacher_id: None,
            })
            .await?;
        ids.extend(pod.into_iter().map(|r| r.teacher_id));
        Ok(ids)
    }

    async fn exclusion_set(&self, tenant_id: &str) -> ServiceResult<HashSet<String>> {
        let rows = self
            .excluded
            .find_all(ExcludedTeacherFilter {
                tenant_id: Some(tenant_id.to_string()),
            })
            .await?;
        Ok(rows.into_iter().map(|r| r.teacher_slug).collect())
    }

    async fn all_teachers(&self, tenant_id: &str) -> ServiceResult<Vec<db::models::teacher::Model>> {
        Ok(self
            .teachers
            .find_all(TeacherFilter {
                tenant_id: Some(tenant_id.to_string()),
                email: None,
                slug: None,
                role: None,
            })
            .await?)
    }

    async fn require_teacher(&self, tenant_id: &str, teacher_id: i64) -> ServiceResult<db::models::teacher::Model> {
        let teacher = self
            .teachers
            .find_by_id(teacher_id)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("teacher {teacher_id} not found")))?;
        if teacher.tenant_id != tenant_id {
            return Err(ServiceError::Validation(format!("teacher {teacher_id} not found")));
        }
        Ok(teacher)
    }
}

#[derive(Clone)]
pub struct PodSlotInput {
    pub date: NaiveDate,
    pub grade: i32,
    pub pod: String,
    pub slot_type: SlotType,
    pub period: Option<i32>,
    pub teacher_id: i64,
    pub break_location: Option<String>,
}

impl PodSlotInput {
    pub fn period_slot(date: NaiveDate, grade: i32, pod_index: u8, period: i32, teacher_id: i64) -> Self {
        Self {
            date,
            grade,
            pod: pod_name(grade, pod_index),
            slot_type: SlotType::Period,
            period: Some(period),
            teacher_id,
            break_location: None,
        }
    }

    pub fn break_slot(date: NaiveDate, grade: i32, teacher_id: i64, break_location: Option<String>) -> Self {
        Self {
            date,
            grade,
            pod: "GRADE_BREAK".into(),
            slot_type: SlotType::Break,
            period: None,
            teacher_id,
            break_location,
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
struct PodSlotKey {
    slot_type: SlotType,
    pod: String,
    period: Option<i32>,
    teacher_id: i64,
    break_location: Option<String>,
}

impl PodSlotKey {
    fn from_input(input: &PodSlotInput) -> Self {
        Self {
            slot_type: input.slot_type.clone(),
            pod: input.pod.clone(),
            period: input.period,
            teacher_id: input.teacher_id,
            break_location: input.break_location.clone(),
        }
    }

    fn from_row(row: &PodDutyAssignment) -> Self {
        Self {
            slot_type: row.slot_type.clone(),
            pod: row.pod.clone(),
            period: row.period,
            teacher_id: row.teacher_id,
            break_location: row.break_location.clone(),
        }
    }
}

#[derive(Default, Debug)]
pub struct PodRosterDiff {
    pub added: usize,
    pub removed: usize,
    pub rejected: Vec<String>,
}

#[derive(serde::Deserialize)]
struct AvailabilityResponse {
    available: Vec<AvailabilityCandidate>,
}

#[derive(serde::Deserialize)]
struct AvailabilityCandidate {
    email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_for_grade_matches_spec_table() {
        assert_eq!(periods_for_grade(6).unwrap(), 6);
        assert_eq!(periods_for_grade(7).unwrap(), 6);
        assert_eq!(periods_for_grade(10).unwrap(), 7);
        assert_eq!(periods_for_grade(12).unwrap(), 7);
        assert!(periods_for_grade(8).is_err());
    }

    #[test]
    fn break_location_required_for_6_7_10_only() {
        assert!(break_location_required(6));
        assert!(break_location_required(7));
        assert!(break_location_required(10));
        assert!(!break_location_required(11));
        assert!(!break_location_required(12));
    }

    #[test]
    fn administrator_excluded_from_daily_and_pod() {
        assert!(!can_fill_daily_duty(&Role::Administrator));
        assert!(!can_fill_pod_slot(&Role::Administrator, SlotType::Period));
        assert!(!can_fill_pod_slot(&Role::Administrator, SlotType::Break));
    }

    #[test]
    fn slt_excluded_from_break_only() {
        assert!(can_fill_pod_slot(&Role::Slt, SlotType::Period));
        assert!(!can_fill_pod_slot(&Role::Slt, SlotType::Break));
        assert!(can_fill_daily_duty(&Role::Slt));
    }

    #[test]
    fn grade_lead_edits_only_their_grade() {
        assert!(can_edit_pod_roster(&Role::GradeLead10, 10));
        assert!(!can_edit_pod_roster(&Role::GradeLead10, 11));
        assert!(can_edit_pod_roster(&Role::Admin, 6));
    }

    #[test]
    fn pod_slot_key_diff_replaces_only_changed_teacher() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        let existing = vec![
            PodSlotInput::period_slot(date, 10, 1, 1, 1),
            PodSlotInput::period_slot(date, 10, 1, 2, 1),
        ];
        let desired = vec![
            PodSlotInput::period_slot(date, 10, 1, 1, 1),
            PodSlotInput::period_slot(date, 10, 1, 2, 3),
        ];
        let existing_keys: HashSet<PodSlotKey> = existing.iter().map(PodSlotKey::from_input).collect();
        let desired_keys: HashSet<PodSlotKey> = desired.iter().map(PodSlotKey::from_input).collect();

        let removed: Vec<_> = existing_keys.difference(&desired_keys).collect();
        let added: Vec<_> = desired_keys.difference(&existing_keys).collect();
        assert_eq!(removed.len(), 1);
        assert_eq!(added.len(), 1);
        assert_eq!(removed[0].teacher_id, 1);
        assert_eq!(added[0].teacher_id, 3);
    }
}
