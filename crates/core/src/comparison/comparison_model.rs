//! PPR versus CEPLAN difference models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::COMPARISON_TOLERANCE;
use crate::errors::{Error, Result};
use crate::schedules::{CeplanSchedule, MonthlyValues, PprSchedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceStatus {
    Ok,
    Alerta,
    PendienteRevision,
}

impl DifferenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceStatus::Ok => "ok",
            DifferenceStatus::Alerta => "alerta",
            DifferenceStatus::PendienteRevision => "pendiente_revision",
        }
    }
}

impl fmt::Display for DifferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifferenceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ok" => Ok(DifferenceStatus::Ok),
            "alerta" => Ok(DifferenceStatus::Alerta),
            "pendiente_revision" => Ok(DifferenceStatus::PendienteRevision),
            other => Err(Error::invalid(format!("Estado de diferencia inválido: {other}"))),
        }
    }
}

/// Monthly `ppr − ceplan` values for one sub-product and year.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDifference {
    pub sub_product_id: i32,
    pub year: i32,
    pub programmed: MonthlyValues,
    pub executed: MonthlyValues,
    pub status: DifferenceStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub id: i32,
    pub sub_product_id: i32,
    pub year: i32,
    pub programmed: MonthlyValues,
    pub executed: MonthlyValues,
    pub status: DifferenceStatus,
    pub created_at: NaiveDateTime,
}

impl Difference {
    /// True when no month carries a non-zero difference.
    pub fn is_flat(&self) -> bool {
        self.programmed
            .iter()
            .chain(self.executed.iter())
            .all(|(_, v)| v.unwrap_or(0.0) == 0.0)
    }
}

fn subtract(left: &MonthlyValues, right: &MonthlyValues) -> MonthlyValues {
    let mut out = MonthlyValues::default();
    for (month, value) in left.iter() {
        out.set(month, value.zip(right.get(month)).map(|(l, r)| l - r));
    }
    out
}

/// `alerta` when any monthly difference exceeds the tolerance.
pub fn classify(programmed: &MonthlyValues, executed: &MonthlyValues) -> DifferenceStatus {
    let over = programmed
        .iter()
        .chain(executed.iter())
        .filter_map(|(_, v)| v)
        .any(|v| v.abs() > COMPARISON_TOLERANCE);
    if over {
        DifferenceStatus::Alerta
    } else {
        DifferenceStatus::Ok
    }
}

pub fn compute_difference(ppr: &PprSchedule, ceplan: &CeplanSchedule) -> NewDifference {
    let programmed = subtract(&ppr.programmed, &ceplan.programmed);
    let executed = subtract(&ppr.executed, &ceplan.executed);
    NewDifference {
        sub_product_id: ppr.sub_product_id,
        year: ppr.year,
        status: classify(&programmed, &executed),
        programmed,
        executed,
    }
}

/// Serialized as `{"ene": {"prog": .., "ejec": ..}, ...}` in calendar order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyDifferences {
    pub programmed: MonthlyValues,
    pub executed: MonthlyValues,
}

impl Serialize for MonthlyDifferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Pair {
            prog: Option<f64>,
            ejec: Option<f64>,
        }

        let mut map = serializer.serialize_map(Some(12))?;
        for (month, prog) in self.programmed.iter() {
            let pair = Pair {
                prog,
                ejec: self.executed.get(month),
            };
            map.serialize_entry(month.code(), &pair)?;
        }
        map.end()
    }
}

/// One line of the comparison report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub difference_id: i32,
    pub sub_product_id: i32,
    pub sub_product_code: Option<String>,
    pub sub_product_name: Option<String>,
    pub year: i32,
    pub status: DifferenceStatus,
    pub ppr_annual_target: f64,
    pub ceplan_annual_target: f64,
    pub ppr_programmed: MonthlyValues,
    pub ppr_executed: MonthlyValues,
    pub ceplan_programmed: MonthlyValues,
    pub ceplan_executed: MonthlyValues,
    pub differences: MonthlyDifferences,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRun {
    pub message: String,
    pub total_differences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub total_differences: usize,
    pub ok: usize,
    pub alert: usize,
    pub pending_review: usize,
    pub completion_percentage: f64,
}

impl ComparisonSummary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let count = |status: DifferenceStatus| rows.iter().filter(|r| r.status == status).count();
        let total = rows.len();
        let ok = count(DifferenceStatus::Ok);
        let alert = count(DifferenceStatus::Alerta);
        let pending_review = count(DifferenceStatus::PendienteRevision);
        let completion_percentage = if total > 0 {
            (ok + alert + pending_review) as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        ComparisonSummary {
            total_differences: total,
            ok,
            alert,
            pending_review,
            completion_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedules::Month;

    fn at() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn ppr(programmed: MonthlyValues, executed: MonthlyValues) -> PprSchedule {
        PprSchedule {
            id: 1,
            sub_product_id: 9,
            year: 2025,
            annual_target: Some(120.0),
            programmed,
            executed,
            created_at: at(),
            updated_at: None,
        }
    }

    fn ceplan(programmed: MonthlyValues, executed: MonthlyValues) -> CeplanSchedule {
        CeplanSchedule {
            id: 1,
            sub_product_id: 9,
            year: 2025,
            programmed,
            executed,
            created_at: at(),
            updated_at: None,
        }
    }

    #[test]
    fn differences_within_tolerance_are_ok() {
        let mut close = MonthlyValues::from_array([10.0; 12]);
        close.set(Month::Feb, Some(10.05));
        let diff = compute_difference(
            &ppr(close, MonthlyValues::zeros()),
            &ceplan(MonthlyValues::from_array([10.0; 12]), MonthlyValues::zeros()),
        );
        assert_eq!(diff.status, DifferenceStatus::Ok);
        assert_eq!(diff.sub_product_id, 9);
    }

    #[test]
    fn missing_sides_yield_null_and_large_gaps_alert() {
        let mut with_gap = MonthlyValues::zeros();
        with_gap.set(Month::Mar, None);
        let mut executed = MonthlyValues::zeros();
        executed.set(Month::Dic, Some(5.0));

        let diff = compute_difference(
            &ppr(with_gap, executed),
            &ceplan(MonthlyValues::zeros(), MonthlyValues::zeros()),
        );
        assert_eq!(diff.programmed.get(Month::Mar), None);
        assert_eq!(diff.executed.get(Month::Dic), Some(5.0));
        assert_eq!(diff.status, DifferenceStatus::Alerta);
    }

    #[test]
    fn differences_serialize_by_month() {
        let mut programmed = MonthlyValues::zeros();
        programmed.set(Month::Ene, Some(-2.0));
        let json = serde_json::to_value(MonthlyDifferences {
            programmed,
            executed: MonthlyValues::default(),
        })
        .unwrap();
        assert_eq!(json["ene"]["prog"], -2.0);
        assert!(json["ene"]["ejec"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 12);
    }

    #[test]
    fn status_parses_stored_names() {
        assert_eq!(
            "pendiente_revision".parse::<DifferenceStatus>().unwrap(),
            DifferenceStatus::PendienteRevision
        );
        assert!("bien".parse::<DifferenceStatus>().is_err());
    }
}
