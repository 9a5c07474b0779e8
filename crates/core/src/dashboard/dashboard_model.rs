//! Progress metrics shown on the dashboard.

use serde::{Deserialize, Serialize};

use crate::constants::{ATTENTION_PROGRESS_THRESHOLD, CRITICAL_PROGRESS_THRESHOLD};
use crate::pprs::{Activity, Product, SubProduct};
use crate::schedules::{Month, PprSchedule};

/// Rounds to two decimals, the precision every percentage is reported with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressStatus {
    #[serde(rename = "CRÍTICO")]
    Critical,
    #[serde(rename = "ATENCIÓN")]
    Attention,
    #[serde(rename = "OK")]
    Ok,
}

impl ProgressStatus {
    pub fn classify(percentage: f64) -> Self {
        if percentage < CRITICAL_PROGRESS_THRESHOLD {
            ProgressStatus::Critical
        } else if percentage < ATTENTION_PROGRESS_THRESHOLD {
            ProgressStatus::Attention
        } else {
            ProgressStatus::Ok
        }
    }
}

/// Optional month/year restriction on the schedule used for progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ScheduleFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Outcome of picking a sub-product's schedule under a filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduleSelection<'a> {
    /// The requested month does not exist; the sub-product is ignored.
    Skipped,
    Missing,
    Found(&'a PprSchedule),
}

impl ScheduleFilter {
    pub fn is_month_filtered(&self) -> bool {
        self.month.is_some()
    }

    /// Latest qualifying schedule, by `updated_at` then `created_at`.
    pub fn select<'a>(&self, schedules: &[&'a PprSchedule]) -> ScheduleSelection<'a> {
        let month = match self.month {
            Some(number) => match Month::from_number(number) {
                Some(month) => Some(month),
                None => return ScheduleSelection::Skipped,
            },
            None => None,
        };
        schedules
            .iter()
            .copied()
            .filter(|s| self.year.map_or(true, |year| s.year == year))
            .filter(|s| month.map_or(true, |m| s.programmed.value_or_zero(m) > 0.0))
            .max_by_key(|s| (s.updated_at, s.created_at))
            .map_or(ScheduleSelection::Missing, ScheduleSelection::Found)
    }
}

/// Progress percentage of a schedule; `None` without a positive target.
pub fn progress_percentage(schedule: &PprSchedule) -> Option<f64> {
    let target = schedule.annual_target.filter(|t| *t > 0.0)?;
    Some(schedule.executed.total() / target * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub overall_progress: f64,
    pub critical: usize,
    pub ok: usize,
    pub attention: usize,
}

/// Running tally behind [`DashboardMetrics`].
#[derive(Debug, Default)]
pub struct MetricsTally {
    progress_sum: f64,
    measured: usize,
    critical: usize,
    ok: usize,
    attention: usize,
}

impl MetricsTally {
    /// Counts one sub-product. Without a measurable schedule it is held for
    /// attention and stays out of the average.
    pub fn record(&mut self, schedule: Option<&PprSchedule>) {
        match schedule.and_then(progress_percentage) {
            Some(percentage) => {
                self.progress_sum += percentage;
                self.measured += 1;
                match ProgressStatus::classify(percentage) {
                    ProgressStatus::Critical => self.critical += 1,
                    ProgressStatus::Attention => self.attention += 1,
                    ProgressStatus::Ok => self.ok += 1,
                }
            }
            None => self.attention += 1,
        }
    }

    pub fn finish(self) -> DashboardMetrics {
        let overall = if self.measured > 0 {
            self.progress_sum / self.measured as f64
        } else {
            0.0
        };
        DashboardMetrics {
            overall_progress: round2(overall),
            critical: self.critical,
            ok: self.ok,
            attention: self.attention,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PprProgressSummary {
    pub id: i32,
    pub name: String,
    #[serde(flatten)]
    pub metrics: DashboardMetrics,
}

/// One sub-product line of the dashboard tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubProductProgress {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub unit: String,
    pub annual_target: f64,
    pub current_progress: f64,
    pub gap: f64,
    pub progress_percentage: f64,
    pub status: ProgressStatus,
    pub product_id: i32,
    pub product_name: String,
    pub activity_id: i32,
    pub activity_name: String,
}

impl SubProductProgress {
    pub fn build(
        sub: &SubProduct,
        activity: &Activity,
        product: &Product,
        schedule: Option<&PprSchedule>,
    ) -> Self {
        let target = schedule.and_then(|s| s.annual_target).unwrap_or(0.0);
        let progress = schedule.map_or(0.0, |s| s.executed.total());
        let (gap, percentage) = if target > 0.0 {
            (target - progress, progress / target * 100.0)
        } else {
            (0.0, 0.0)
        };
        SubProductProgress {
            id: sub.id,
            code: sub.code.clone(),
            name: sub.name.clone(),
            unit: sub.unit_of_measure.clone(),
            annual_target: target,
            current_progress: progress,
            gap,
            progress_percentage: round2(percentage),
            status: ProgressStatus::classify(percentage),
            product_id: product.id,
            product_name: product.name.clone(),
            activity_id: activity.id,
            activity_name: activity.name.clone(),
        }
    }
}
