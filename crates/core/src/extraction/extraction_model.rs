//! Results of parsing uploaded workbooks, staged for preview before commit.

use serde::{Deserialize, Serialize};

use crate::cartera::NewCarteraEntry;
use crate::schedules::MonthlyValues;

/// Program identity read from the sheet banner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInfo {
    pub code: String,
    pub name: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSubProduct {
    pub code: String,
    pub name: String,
    pub unit_of_measure: String,
    pub annual_target: f64,
    pub programmed: MonthlyValues,
    pub executed: MonthlyValues,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedActivity {
    pub code: String,
    pub name: String,
    pub sub_products: Vec<ExtractedSubProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedProduct {
    pub code: String,
    pub name: String,
    pub activities: Vec<ExtractedActivity>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PprExtraction {
    pub ppr: ProgramInfo,
    pub products: Vec<ExtractedProduct>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl PprExtraction {
    pub fn sub_product_count(&self) -> usize {
        self.products
            .iter()
            .flat_map(|p| &p.activities)
            .map(|a| a.sub_products.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeplanExtraction {
    pub sub_products: Vec<ExtractedSubProduct>,
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarteraExtraction {
    pub entries: Vec<NewCarteraEntry>,
    pub total_records: usize,
}
