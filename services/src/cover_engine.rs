//! Cover assignment engine (C8): for each weekday an approved leave spans,
//! select a replacement teacher per scheduled period using availability,
//! load, subject, and cycle-match constraints with deterministic
//! tie-breaking (spec §4.7).

use crate::error::{ServiceError, ServiceResult};
use crate::schedule::{Cycle, ScheduleService};
use chrono::{Duration, NaiveDate};
use db::models::cover_assignment::{ActiveModel as CoverActiveModel, Model as CoverAssignment};
use db::models::incoming_leave_record::Model as IncomingLeaveRecord;
use db::models::schedule_entry::{DayCode, Model as ScheduleEntry};
use db::models::teacher::{Model as Teacher, Role};
use db::repositories::cover_assignment_repository::{CoverAssignmentFilter, CoverAssignmentRepository};
use db::repositories::excluded_teacher_repository::{ExcludedTeacherFilter, ExcludedTeacherRepository};
use db::repositories::incoming_leave_record_repository::{IncomingLeaveRecordFilter, IncomingLeaveRecordRepository};
use db::repositories::repository::Repository;
use db::repositories::teacher_repository::{TeacherFilter, TeacherRepository};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DatabaseConnection, Set};
use std::collections::{HashMap, HashSet};

static TIME_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}\s*-\s*\d{1,2}:\d{2}").unwrap());

/// A slot to fill, derived either from a schedule entry or synthesized when
/// the absent teacher has no rows on that day (spec §4.7 step 1).
struct CoverSlot {
    period_label: String,
    period_raw: String,
    class_time: String,
    subject: String,
    grade: Option<String>,
    details: String,
}

impl CoverSlot {
    fn from_entry(entry: &ScheduleEntry) -> Self {
        let class_time = TIME_RANGE
            .find(&entry.period_raw)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        CoverSlot {
            period_label: entry.period.clone(),
            period_raw: entry.period_raw.clone(),
            class_time,
            subject: entry.subject.clone(),
            grade: entry.grade_detected.clone(),
            details: entry.details.clone(),
        }
    }

    fn general(absent_teacher: &Teacher) -> Self {
        CoverSlot {
            period_label: "General".into(),
            period_raw: "General".into(),
            class_time: String::new(),
            subject: absent_teacher.subject.clone(),
            grade: None,
            details: "Full day absence".into(),
        }
    }

    fn slot_key(&self) -> String {
        format!("{}|{}|{}", self.period_label, self.period_raw, self.class_time)
    }

    /// Whether the period is canonical enough to filter candidates by
    /// `TeachersAvailable` — synthesized "General" slots skip that filter
    /// entirely (spec §4.7 step 3a).
    fn has_canonical_period(&self) -> bool {
        self.period_label != "General"
    }
}

fn normalize_subject(s: &str) -> String {
    s.trim().to_lowercase()
}

/// `(tier, course_total, name)` — the engine picks the candidate that
/// minimises this tuple (spec §4.7 step 3b/c).
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TieBreak {
    tier: u8,
    course_total: i64,
    name: String,
}

fn tier_for(candidate_subject: &str, candidate_cycle: Cycle, slot_subject: &str, absent_cycle: Cycle) -> u8 {
    let subject_match = normalize_subject(candidate_subject) == normalize_subject(slot_subject);
    let cycle_match = candidate_cycle.overlaps(&absent_cycle);
    match (subject_match, cycle_match) {
        (true, true) => 1,
        (true, false) => 2,
        (false, true) => 3,
        (false, false) => 4,
    }
}

pub struct CoverEngine {
    schedule: ScheduleService,
    assignments: CoverAssignmentRepository,
    excluded: ExcludedTeacherRepository,
    teachers: TeacherRepository,
    incoming: IncomingLeaveRecordRepository,
}

impl CoverEngine {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            schedule: ScheduleService::new(db.clone()),
            assignments: CoverAssignmentRepository::new(db.clone()),
            excluded: ExcludedTeacherRepository::new(db.clone()),
            teachers: TeacherRepository::new(db.clone()),
            incoming: IncomingLeaveRecordRepository::new(db),
        }
    }

    /// Compute and persist cover assignments for every weekday `record`
    /// spans. Idempotent: a second call for the same record only fills in
    /// slots that previously had no candidate or weren't yet persisted,
    /// thanks to the unique `(date, request_id, slot_key)` constraint.
    pub async fn assign_for_record(
        &self,
        tenant_id: &str,
        record: &IncomingLeaveRecord,
    ) -> ServiceResult<Vec<CoverAssignment>> {
        if record.status != "approved" {
            return Ok(Vec::new());
        }

        let absent_teacher = self.find_teacher_by_email(tenant_id, &record.teacher_email).await?;
        let exclusion_set = self.exclusion_set(tenant_id).await?;
        let absent_cycle = self.schedule.cycle(tenant_id, absent_teacher.id).await?;

        let mut created = Vec::new();
        let mut day = record.leave_start;
        while day <= record.leave_end {
            if let Some(day_code) = util::calendar::weekday_code(day).and_then(|s| s.parse::<DayCode>().ok()) {
                let mut day_created = self
                    .assign_for_day(tenant_id, record, &absent_teacher, absent_cycle, day, day_code, &exclusion_set)
                    .await?;
                created.append(&mut day_created);
            }
            day += Duration::days(1);
        }
        Ok(created)
    }

    async fn assign_for_day(
        &self,
        tenant_id: &str,
        record: &IncomingLeaveRecord,
        absent_teacher: &Teacher,
        absent_cycle: Cycle,
        day: NaiveDate,
        day_code: DayCode,
        exclusion_set: &HashSet<String>,
    ) -> ServiceResult<Vec<CoverAssignment>> {
        let entries = self.schedule.schedule_for_day(tenant_id, absent_teacher.id, day_code).await?;
        let slots: Vec<CoverSlot> = if entries.is_empty() {
            vec![CoverSlot::general(absent_teacher)]
        } else {
            entries.iter().map(CoverSlot::from_entry).collect()
        };

        let absent_emails = self.absent_emails_for_day(tenant_id, day, &record.request_id).await?;
        let all_teachers = self.all_teachers(tenant_id).await?;

        let day_filter = CoverAssignmentFilter {
            tenant_id: Some(tenant_id.to_string()),
            date: Some(day),
            request_id: None,
            slot_key: None,
        };
        let existing_today = self.assignments.find_all(day_filter).await?;
        let mut load: HashMap<String, u32> = HashMap::new();
        for row in &existing_today {
            if let Some(email) = &row.cover_email {
                *load.entry(email.clone()).or_insert(0) += 1;
            }
        }
        let existing_keys: HashSet<(String, String)> = existing_today
            .iter()
            .map(|r| (r.request_id.clone(), r.slot_key.clone()))
            .collect();

        let mut created = Vec::new();
        for slot in slots {
            let slot_key = slot.slot_key();
            if existing_keys.contains(&(record.request_id.clone(), slot_key.clone())) {
                continue;
            }

            let slot_subject = if slot.subject.trim().is_empty() {
                absent_teacher.subject.as_str()
            } else {
                slot.subject.as_str()
            };

            let mut best: Option<(TieBreak, &Teacher, u32, u32, u32)> = None;
            for candidate in &all_teachers {
                if candidate.id == absent_teacher.id {
                    continue;
                }
                if absent_emails.contains(&candidate.email) {
                    continue;
                }
                if exclusion_set.contains(&candidate.slug) {
                    continue;
                }
                if slot.has_canonical_period() {
                    let available = self.schedule.teachers_available(tenant_id, day_code, &slot.period_label).await?;
                    if !available.iter().any(|t| t.id == candidate.id) {
                        continue;
                    }
                }

                let summary = self.schedule.day_summary(tenant_id, candidate.id, day_code).await?;
                if summary.free_periods == 0 {
                    continue;
                }
                let total_covers = *load.get(&candidate.email).unwrap_or(&0);
                if total_covers >= 2 {
                    continue;
                }
                let cycle = self.schedule.cycle(tenant_id, candidate.id).await?;
                if matches!(cycle, Cycle::High | Cycle::Mixed) {
                    let cap = cycle.max_periods(day_code);
                    if summary.scheduled_count + total_covers + 1 >= cap {
                        continue;
                    }
                }

                let tier = tier_for(&candidate.subject, cycle, slot_subject, absent_cycle);
                let tie = TieBreak {
                    tier,
                    course_total: (summary.scheduled_count + total_covers) as i64,
                    name: candidate.name.clone(),
                };

                let replace = match &best {
                    None => true,
                    Some((current, ..)) => tie < *current,
                };
                if replace {
                    best = Some((tie, candidate, summary.free_periods, summary.scheduled_count, summary.max_periods));
                }
            }

            let Some((_, cover, free_periods, scheduled, max_periods)) = best else {
                tracing::warn!(
                    tenant = tenant_id,
                    request_id = %record.request_id,
                    date = %day,
                    slot = %slot_key,
                    "no cover candidate available for slot"
                );
                continue;
            };

            let now = chrono::Utc::now();
            let am = CoverActiveModel {
                tenant_id: Set(tenant_id.to_string()),
                date: Set(day),
                slot_key: Set(slot_key.clone()),
                request_id: Set(record.request_id.clone()),
                day_label: Set(util::calendar::weekday_code(day).unwrap_or_default().to_string()),
                absent_teacher: Set(absent_teacher.name.clone()),
                absent_email: Set(absent_teacher.email.clone()),
                cover_teacher: Set(Some(cover.name.clone())),
                cover_email: Set(Some(cover.email.clone())),
                cover_slug: Set(Some(cover.slug.clone())),
                cover_subject: Set(Some(cover.subject.clone())),
                cover_free_periods: Set(Some(free_periods as i32)),
                cover_scheduled: Set(Some(scheduled as i32)),
                cover_max_periods: Set(Some(max_periods as i32)),
                class_subject: Set(Some(slot_subject.to_string())),
                class_grade: Set(slot.grade.clone()),
                class_details: Set(Some(slot.details.clone())),
                period_label: Set(Some(slot.period_label.clone())),
                period_raw: Set(Some(slot.period_raw.clone())),
                class_time: Set(Some(slot.class_time.clone())),
                status: Set("assigned".into()),
                cover_assigned_at: Set(Some(now)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            let row = self.assignments.create(am).await?;
            *load.entry(cover.email.clone()).or_insert(0) += 1;
            created.push(row);
        }

        Ok(created)
    }

    /// Iterate every persisted approved leave with no cover assignments yet
    /// and run the per-day assignment pass for it (spec §4.7 Backfill).
    pub async fn backfill(&self, tenant_id: &str) -> ServiceResult<usize> {
        let filter = IncomingLeaveRecordFilter {
            tenant_id: Some(tenant_id.to_string()),
            request_id: None,
        };
        let records = self.incoming.find_all(filter).await?;
        let mut total = 0;
        for record in records.into_iter().filter(|r| r.status == "approved") {
            let existing = self
                .assignments
                .find_all(CoverAssignmentFilter {
                    tenant_id: Some(tenant_id.to_string()),
                    date: None,
                    request_id: Some(record.request_id.clone()),
                    slot_key: None,
                })
                .await?;
            if !existing.is_empty() {
                continue;
            }
            match self.assign_for_record(tenant_id, &record).await {
                Ok(created) => total += created.len(),
                Err(e) => tracing::warn!(request_id = %record.request_id, error = %e, "backfill failed for record, continuing"),
            }
        }
        Ok(total)
    }

    async fn find_teacher_by_email(&self, tenant_id: &str, email: &str) -> ServiceResult<Teacher> {
        let filter = TeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
            email: Some(email.to_string()),
            slug: None,
            role: None,
        };
        self.teachers
            .find_one(filter)
            .await?
            .ok_or_else(|| ServiceError::Validation(format!("no teacher known for email {email}")))
    }

    async fn all_teachers(&self, tenant_id: &str) -> ServiceResult<Vec<Teacher>> {
        let filter = TeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
            email: None,
            slug: None,
            role: None,
        };
        Ok(self.teachers.find_all(filter).await?)
    }

    async fn exclusion_set(&self, tenant_id: &str) -> ServiceResult<HashSet<String>> {
        let filter = ExcludedTeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
        };
        let rows = self.excluded.find_all(filter).await?;
        Ok(rows.into_iter().map(|r| r.teacher_slug).collect())
    }

    /// Emails of teachers with an approved leave (other than `exclude_request_id`)
    /// covering `day`. Mirrors the schedule service's own local record of
    /// other absences — it does not consult the leave service directly.
    async fn absent_emails_for_day(
        &self,
        tenant_id: &str,
        day: NaiveDate,
        exclude_request_id: &str,
    ) -> ServiceResult<HashSet<String>> {
        let filter = IncomingLeaveRecordFilter {
            tenant_id: Some(tenant_id.to_string()),
            request_id: None,
        };
        let rows = self.incoming.find_all(filter).await?;
        Ok(rows
            .into_iter()
            .filter(|r| r.status == "approved" && r.request_id != exclude_request_id)
            .filter(|r| r.leave_start <= day && day <= r.leave_end)
            .map(|r| r.teacher_email)
            .collect())
    }

    /// Admin patch of a persisted assignment's editable fields (spec §4.7
    /// Edit operation). If `cover_slug` changes, recompute the cover's
    /// free/scheduled/max periods for the assignment's day.
    pub async fn edit_assignment(&self, tenant_id: &str, id: i64, patch: CoverAssignmentPatch) -> ServiceResult<CoverAssignment> {
        use sea_orm::IntoActiveModel;

        let existing = self
            .assignments
            .find_by_id(id)
            .await?
            .filter(|row| row.tenant_id == tenant_id)
            .ok_or_else(|| ServiceError::Validation(format!("cover assignment {id} not found")))?;

        let day_code = util::calendar::weekday_code(existing.date).and_then(|s| s.parse::<DayCode>().ok());
        let mut am = existing.clone().into_active_model();

        if let Some(status) = patch.status {
            am.status = Set(status);
        }
        if let Some(cover_teacher) = patch.cover_teacher {
            am.cover_teacher = Set(Some(cover_teacher));
        }
        if let Some(cover_email) = patch.cover_email {
            am.cover_email = Set(Some(cover_email));
        }
        if let Some(class_subject) = patch.class_subject {
            am.class_subject = Set(Some(class_subject));
        }
        if let Some(class_grade) = patch.class_grade {
            am.class_grade = Set(Some(class_grade));
        }
        if let Some(class_details) = patch.class_details {
            am.class_details = Set(Some(class_details));
        }
        if let Some(period_label) = patch.period_label {
            am.period_label = Set(Some(period_label));
        }
        if let Some(period_raw) = patch.period_raw {
            am.period_raw = Set(Some(period_raw));
        }
        if let Some(class_time) = patch.class_time {
            am.class_time = Set(Some(class_time));
        }

        if let Some(cover_slug) = patch.cover_slug {
            let cover = self
                .teachers
                .find_one(TeacherFilter {
                    tenant_id: Some(tenant_id.to_string()),
                    email: None,
                    slug: Some(cover_slug.clone()),
                    role: None,
                })
                .await?
                .ok_or_else(|| ServiceError::Validation(format!("no teacher with slug {cover_slug}")))?;
            am.cover_slug = Set(Some(cover.slug.clone()));
            am.cover_subject = Set(Some(cover.subject.clone()));
            am.cover_teacher = Set(Some(cover.name.clone()));
            am.cover_email = Set(Some(cover.email.clone()));

            if let Some(day_code) = day_code {
                let summary = self.schedule.day_summary(tenant_id, cover.id, day_code).await?;
                am.cover_free_periods = Set(Some(summary.free_periods as i32));
                am.cover_scheduled = Set(Some(summary.scheduled_count as i32));
                am.cover_max_periods = Set(Some(summary.max_periods as i32));
            }
        }

        am.updated_at = Set(chrono::Utc::now());
        let updated = self.assignments.update(am).await?;
        Ok(updated)
    }
}

/// Editable fields an admin may patch on a persisted `CoverAssignment`
/// (spec §4.7 Edit operation).
#[derive(Default)]
pub struct CoverAssignmentPatch {
    pub status: Option<String>,
    pub cover_teacher: Option<String>,
    pub cover_email: Option<String>,
    pub cover_slug: Option<String>,
    pub class_subject: Option<String>,
    pub class_grade: Option<String>,
    pub class_details: Option<String>,
    pub period_label: Option<String>,
    pub period_raw: Option<String>,
    pub class_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Cycle;

    #[test]
    fn tier_1_requires_subject_and_cycle_match() {
        assert_eq!(tier_for("Math", Cycle::High, "math", Cycle::High), 1);
        assert_eq!(tier_for("Math", Cycle::Middle, "math", Cycle::High), 2);
        assert_eq!(tier_for("Science", Cycle::High, "math", Cycle::High), 3);
        assert_eq!(tier_for("Science", Cycle::Middle, "math", Cycle::High), 4);
    }

    #[test]
    fn slot_key_joins_period_fields() {
        let slot = CoverSlot {
            period_label: "P3".into(),
            period_raw: "P3 9:10 - 10:00".into(),
            class_time: "9:10 - 10:00".into(),
            subject: "Math".into(),
            grade: Some("10".into()),
            details: "G10 Math".into(),
        };
        assert_eq!(slot.slot_key(), "P3|P3 9:10 - 10:00|9:10 - 10:00");
    }

    #[test]
    fn tie_break_orders_by_tier_then_course_total_then_name() {
        let a = TieBreak { tier: 1, course_total: 12, name: "A".into() };
        let b = TieBreak { tier: 2, course_total: 5, name: "B".into() };
        let c = TieBreak { tier: 1, course_total: 8, name: "C".into() };
        assert!(a < b);
        assert!(c < a);
    }
}
