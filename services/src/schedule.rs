//! Schedule catalog (C3): weekly period grid per teacher, period
//! canonicalization, availability, and cycle/fairness summaries.

use crate::error::ServiceResult;
use db::models::schedule_entry::{DayCode, Model as ScheduleEntry};
use db::models::teacher::Model as Teacher;
use db::repositories::repository::Repository;
use db::repositories::schedule_entry_repository::{ScheduleEntryFilter, ScheduleEntryRepository};
use db::repositories::teacher_repository::{TeacherFilter, TeacherRepository};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;

/// Known raw → canonical period labels. Anything not in this table is kept
/// verbatim (and sorts after every known period, per spec §4.2).
const CANONICAL_PERIODS: &[(&str, &str)] = &[
    ("HOMEROOM", "Homeroom"),
    ("P1", "P1"),
    ("P2", "P2"),
    ("P3", "P3"),
    ("P4", "P4"),
    ("P5", "P5"),
    ("P6", "P6"),
    ("P7", "P7"),
];

static PERIOD_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(homeroom|p[1-7])").unwrap());
static GRADE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bg(6|7|10|11|12)\b").unwrap());

/// Canonicalize a raw period label such as `"P1 7:30 - 8:20"` or
/// `"Period 1 7:50 - 8:45"` into `"P1"`. Idempotent: `canonicalize_period(canonicalize_period(x)) == canonicalize_period(x)`.
pub fn canonicalize_period(raw: &str) -> String {
    let trimmed = raw.trim();
    let normalized = trimmed.replace("Period ", "P").replace("period ", "P");
    if let Some(m) = PERIOD_PREFIX.find(&normalized) {
        let key = m.as_str().to_uppercase();
        if let Some((_, canon)) = CANONICAL_PERIODS.iter().find(|(k, _)| *k == key) {
            return canon.to_string();
        }
    }
    trimmed.to_string()
}

/// Grade numbers mentioned in a schedule detail string, e.g. `"G10 Biology"` → `[10]`.
pub fn detect_grades(details: &str) -> Vec<u8> {
    GRADE_PATTERN
        .captures_iter(details)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    High,
    Middle,
    Mixed,
    General,
}

const MIDDLE_GRADES: [u8; 2] = [6, 7];
const HIGH_GRADES: [u8; 3] = [10, 11, 12];

fn cycle_for_grades(grades: &[u8]) -> Cycle {
    let has_middle = grades.iter().any(|g| MIDDLE_GRADES.contains(g));
    let has_high = grades.iter().any(|g| HIGH_GRADES.contains(g));
    match (has_middle, has_high) {
        (true, true) => Cycle::Mixed,
        (false, true) => Cycle::High,
        (true, false) => Cycle::Middle,
        (false, false) => Cycle::General,
    }
}

impl Cycle {
    /// Whether two cycles "overlap" for cover tie-breaking (spec §4.7 tier 1/3).
    pub fn overlaps(&self, other: &Cycle) -> bool {
        use Cycle::*;
        match (self, other) {
            (General, _) | (_, General) => false,
            (a, b) => a == b || matches!((a, b), (Mixed, _) | (_, Mixed)),
        }
    }

    /// Max scheduled+cover load for a weekday under this cycle (spec §4.2).
    pub fn max_periods(&self, day: DayCode) -> u32 {
        match self {
            Cycle::High | Cycle::Mixed => {
                if day == DayCode::Fr {
                    5
                } else {
                    7
                }
            }
            Cycle::Middle | Cycle::General => {
                if day == DayCode::Fr {
                    3
                } else {
                    6
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DaySummary {
    pub scheduled_count: u32,
    pub max_periods: u32,
    pub free_periods: u32,
}

pub struct ScheduleService {
    entries: ScheduleEntryRepository,
    teachers: TeacherRepository,
}

impl ScheduleService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            entries: ScheduleEntryRepository::new(db.clone()),
            teachers: TeacherRepository::new(db),
        }
    }

    async fn entries_for(&self, tenant_id: &str, teacher_id: i64) -> ServiceResult<Vec<ScheduleEntry>> {
        let filter = ScheduleEntryFilter {
            tenant_id: Some(tenant_id.to_string()),
            teacher_id: Some(teacher_id),
            day_code: None,
            period: None,
        };
        Ok(self.entries.find_all(filter).await?)
    }

    /// Raw schedule rows for `teacher_id` on `day` (C8 reads this directly
    /// to build per-slot cover candidates; most callers want
    /// [`ScheduleService::day_summary`] instead).
    pub async fn schedule_for_day(
        &self,
        tenant_id: &str,
        teacher_id: i64,
        day: DayCode,
    ) -> ServiceResult<Vec<ScheduleEntry>> {
        self.entries_for_day(tenant_id, teacher_id, day).await
    }

    async fn entries_for_day(
        &self,
        tenant_id: &str,
        teacher_id: i64,
        day: DayCode,
    ) -> ServiceResult<Vec<ScheduleEntry>> {
        let filter = ScheduleEntryFilter {
            tenant_id: Some(tenant_id.to_string()),
            teacher_id: Some(teacher_id),
            day_code: Some(day),
            period: None,
        };
        Ok(self.entries.find_all(filter).await?)
    }

    /// Teachers with no schedule row at (day, period).
    pub async fn teachers_available(
        &self,
        tenant_id: &str,
        day: DayCode,
        period: &str,
    ) -> ServiceResult<Vec<Teacher>> {
        let occupied = self.teachers_occupied(tenant_id, day, period).await?;
        let occupied_ids: HashSet<i64> = occupied.iter().map(|(t, _)| t.id).collect();

        let filter = TeacherFilter {
            tenant_id: Some(tenant_id.to_string()),
            email: None,
            slug: None,
            role: None,
        };
        let all = self.teachers.find_all(filter).await?;
        Ok(all.into_iter().filter(|t| !occupied_ids.contains(&t.id)).collect())
    }

    /// Teachers occupied at (day, period), with the schedule detail.
    pub async fn teachers_occupied(
        &self,
        tenant_id: &str,
        day: DayCode,
        period: &str,
    ) -> ServiceResult<Vec<(Teacher, String)>> {
        let filter = ScheduleEntryFilter {
            tenant_id: Some(tenant_id.to_string()),
            teacher_id: None,
            day_code: Some(day),
            period: Some(period.to_string()),
        };
        let rows = self.entries.find_all(filter).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(t) = self.teachers.find_by_id(row.teacher_id).await? {
                out.push((t, row.details.clone()));
            }
        }
        Ok(out)
    }

    pub async fn day_summary(
        &self,
        tenant_id: &str,
        teacher_id: i64,
        day: DayCode,
    ) -> ServiceResult<DaySummary> {
        let rows = self.entries_for_day(tenant_id, teacher_id, day).await?;
        let scheduled_count = rows.len() as u32;
        let cycle = self.cycle(tenant_id, teacher_id).await?;
        let max_periods = cycle.max_periods(day);
        Ok(DaySummary {
            scheduled_count,
            max_periods,
            free_periods: max_periods.saturating_sub(scheduled_count),
        })
    }

    pub async fn grade_levels(&self, tenant_id: &str, teacher_id: i64) -> ServiceResult<Vec<u8>> {
        let rows = self.entries_for(tenant_id, teacher_id).await?;
        let mut grades: Vec<u8> = rows
            .iter()
            .filter_map(|r| r.grade_detected.as_deref())
            .filter_map(|g| g.parse().ok())
            .collect();
        grades.sort_unstable();
        grades.dedup();
        Ok(grades)
    }

    pub async fn cycle(&self, tenant_id: &str, teacher_id: i64) -> ServiceResult<Cycle> {
        let grades = self.grade_levels(tenant_id, teacher_id).await?;
        Ok(cycle_for_grades(&grades))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_is_idempotent_and_maps_known_labels() {
        let raw = "P1 7:30 - 8:20";
        let once = canonicalize_period(raw);
        assert_eq!(once, "P1");
        assert_eq!(canonicalize_period(&once), once);

        let period_word = canonicalize_period("Period 1 7:50 - 8:45");
        assert_eq!(period_word, "P1");
    }

    #[test]
    fn canonicalize_preserves_unknown_labels() {
        let raw = "Assembly";
        assert_eq!(canonicalize_period(raw), "Assembly");
        assert_eq!(canonicalize_period(&canonicalize_period(raw)), "Assembly");
    }

    #[test]
    fn detect_grades_matches_gN_tokens() {
        assert_eq!(detect_grades("G10 Biology"), vec![10]);
        assert_eq!(detect_grades("no grade here"), Vec::<u8>::new());
    }

    #[test]
    fn cycle_classification_matches_grade_mix() {
        assert_eq!(cycle_for_grades(&[10, 11]), Cycle::High);
        assert_eq!(cycle_for_grades(&[6, 7]), Cycle::Middle);
        assert_eq!(cycle_for_grades(&[6, 10]), Cycle::Mixed);
        assert_eq!(cycle_for_grades(&[]), Cycle::General);
    }

    #[test]
    fn max_periods_follows_fri_reduction() {
        assert_eq!(Cycle::High.max_periods(DayCode::Fr), 5);
        assert_eq!(Cycle::High.max_periods(DayCode::Mo), 7);
        assert_eq!(Cycle::Middle.max_periods(DayCode::Fr), 3);
        assert_eq!(Cycle::Middle.max_periods(DayCode::Mo), 6);
    }
}
