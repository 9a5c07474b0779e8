//! Monthly schedule domain models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Error, Result};

/// Calendar month, identified on the wire by its three-letter Spanish code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Ene,
    Feb,
    Mar,
    Abr,
    May,
    Jun,
    Jul,
    Ago,
    Sep,
    Oct,
    Nov,
    Dic,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Ene,
        Month::Feb,
        Month::Mar,
        Month::Abr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Ago,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dic,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Month::Ene => "ene",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Abr => "abr",
            Month::May => "may",
            Month::Jun => "jun",
            Month::Jul => "jul",
            Month::Ago => "ago",
            Month::Sep => "sep",
            Month::Oct => "oct",
            Month::Nov => "nov",
            Month::Dic => "dic",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Month::Ene => "Enero",
            Month::Feb => "Febrero",
            Month::Mar => "Marzo",
            Month::Abr => "Abril",
            Month::May => "Mayo",
            Month::Jun => "Junio",
            Month::Jul => "Julio",
            Month::Ago => "Agosto",
            Month::Sep => "Septiembre",
            Month::Oct => "Octubre",
            Month::Nov => "Noviembre",
            Month::Dic => "Diciembre",
        }
    }

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// 0-based position, usable as an array index.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_number(number: u32) -> Option<Month> {
        if (1..=12).contains(&number) {
            Some(Month::ALL[(number - 1) as usize])
        } else {
            None
        }
    }

    /// Like [`Month::from_number`], rejecting invalid input with a validation error.
    pub fn try_from_number(number: u32) -> Result<Month> {
        Month::from_number(number).ok_or_else(|| Error::invalid("Mes inválido proporcionado"))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| m.code() == needle)
            .ok_or_else(|| Error::invalid(format!("Mes desconocido: {s}")))
    }
}

/// Twelve optional monthly values, serialized as an object keyed by month code.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyValues(pub [Option<f64>; 12]);

impl MonthlyValues {
    pub fn zeros() -> Self {
        MonthlyValues([Some(0.0); 12])
    }

    pub fn from_array(values: [f64; 12]) -> Self {
        MonthlyValues(values.map(Some))
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.0[month.index()]
    }

    pub fn set(&mut self, month: Month, value: Option<f64>) {
        self.0[month.index()] = value;
    }

    /// Value for the month, reading missing entries as zero.
    pub fn value_or_zero(&self, month: Month) -> f64 {
        self.get(month).unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().flatten().sum()
    }

    /// Copy with every missing entry replaced by zero.
    pub fn filled(&self) -> Self {
        MonthlyValues(self.0.map(|v| Some(v.unwrap_or(0.0))))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Option<f64>)> + '_ {
        Month::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

impl Serialize for MonthlyValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(12))?;
        for (month, value) in self.iter() {
            map.serialize_entry(month.code(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MonthlyValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MonthlyVisitor;

        impl<'de> Visitor<'de> for MonthlyVisitor {
            type Value = MonthlyValues;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by month code (ene..dic)")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut values = MonthlyValues::default();
                while let Some((key, value)) = access.next_entry::<String, Option<f64>>()? {
                    let month = key
                        .parse::<Month>()
                        .map_err(|e| serde::de::Error::custom(e.to_string()))?;
                    values.set(month, value);
                }
                Ok(values)
            }
        }

        deserializer.deserialize_map(MonthlyVisitor)
    }
}

/// Planned and executed quantities of a sub-product for one year, as
/// declared by the program itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PprSchedule {
    pub id: i32,
    pub sub_product_id: i32,
    pub year: i32,
    pub annual_target: Option<f64>,
    pub programmed: MonthlyValues,
    pub executed: MonthlyValues,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// The CEPLAN counterpart of [`PprSchedule`], without an annual target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeplanSchedule {
    pub id: i32,
    pub sub_product_id: i32,
    pub year: i32,
    pub programmed: MonthlyValues,
    pub executed: MonthlyValues,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl CeplanSchedule {
    pub fn annual_target(&self) -> f64 {
        self.programmed.total()
    }
}

/// Body of a single-month progress update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub month: u32,
    pub year: i32,
    pub programmed: Option<f64>,
    pub executed: Option<f64>,
}

/// Partial overwrite of a sub-product's PPR schedule, keyed by month code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverride {
    #[serde(default)]
    pub programmed: BTreeMap<String, f64>,
    #[serde(default)]
    pub executed: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverrideRequest {
    pub ppr: ScheduleOverride,
}

/// One month of a sub-product's recent activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSnapshot {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    pub programmed: f64,
    pub executed: f64,
}

/// The given (year, month) followed by the two months before it, newest first.
pub fn trailing_months(year: i32, month: Month) -> [(i32, Month); 3] {
    let mut out = [(year, month); 3];
    for (offset, slot) in out.iter_mut().enumerate() {
        let back = month.index() as i32 - offset as i32;
        let (y, idx) = if back < 0 {
            (year - 1, back + 12)
        } else {
            (year, back)
        };
        *slot = (y, Month::ALL[idx as usize]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lookup_accepts_codes_and_numbers() {
        assert_eq!("ENE".parse::<Month>().unwrap(), Month::Ene);
        assert_eq!(Month::from_number(12), Some(Month::Dic));
        assert_eq!(Month::from_number(0), None);
        assert!(Month::try_from_number(13).is_err());
        assert_eq!(Month::Sep.full_name(), "Septiembre");
    }

    #[test]
    fn monthly_values_serialize_as_month_map() {
        let mut values = MonthlyValues::zeros();
        values.set(Month::Mar, Some(7.0));
        values.set(Month::Dic, None);
        let json = serde_json::to_value(values).unwrap();
        assert_eq!(json["mar"], 7.0);
        assert!(json["dic"].is_null());
        let back: MonthlyValues = serde_json::from_value(json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn unknown_month_key_is_rejected() {
        let err = serde_json::from_str::<MonthlyValues>(r#"{"xyz": 1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn trailing_months_wrap_into_previous_year() {
        let months = trailing_months(2025, Month::Feb);
        assert_eq!(
            months,
            [(2025, Month::Feb), (2025, Month::Ene), (2024, Month::Dic)]
        );
        let months = trailing_months(2025, Month::Jul);
        assert_eq!(months[2], (2025, Month::May));
    }

    #[test]
    fn total_skips_missing_months() {
        let mut values = MonthlyValues::default();
        values.set(Month::Ene, Some(2.0));
        values.set(Month::Feb, Some(3.0));
        assert_eq!(values.total(), 5.0);
        assert_eq!(values.filled().value_or_zero(Month::Oct), 0.0);
    }
}
