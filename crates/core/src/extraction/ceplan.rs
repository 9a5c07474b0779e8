//! CEPLAN workbook extraction.
//!
//! Every sub-product occupies two consecutive rows: programmed values first,
//! executed values right below. Column A carries a composite identifier such
//! as `AOI00162600455 - 0087901 - ADOLESCENTE CON SUPLEMENTO`.

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use super::extraction_model::{CeplanExtraction, ExtractedSubProduct};
use super::sheet::Sheet;
use crate::constants::DEFAULT_UNIT_OF_MEASURE;
use crate::schedules::{Month, MonthlyValues};

const FIRST_MONTH_COL: usize = 8;
const NAME_COL: usize = 3;
const UNIT_COL: usize = 5;

lazy_static! {
    static ref SUB_PRODUCT_CODE: Regex = Regex::new(r"\d{5,7}").expect("Invalid regex pattern");
    static ref NUMERIC_RUN: Regex = Regex::new(r"[\d,.]+").expect("Invalid regex pattern");
}

pub fn extract_ceplan(sheet: &Sheet) -> CeplanExtraction {
    info!("Starting CEPLAN extraction over {} rows", sheet.height());
    let mut sub_products = Vec::new();

    let mut row = 0;
    while row + 1 < sheet.height() {
        let Some(code) = sheet.text(row, 0).and_then(|t| sub_product_code(&t)) else {
            row += 1;
            continue;
        };
        debug!("Found sub-product '{}' at row {}", code, row);

        let mut programmed = MonthlyValues::zeros();
        let mut executed = MonthlyValues::zeros();
        for month in Month::ALL {
            let col = FIRST_MONTH_COL + month.index();
            programmed.set(month, Some(monthly_value(sheet, row, col)));
            executed.set(month, Some(monthly_value(sheet, row + 1, col)));
        }

        sub_products.push(ExtractedSubProduct {
            name: sheet
                .text(row, NAME_COL)
                .unwrap_or_else(|| format!("Subproducto {code}")),
            unit_of_measure: sheet
                .text(row, UNIT_COL)
                .unwrap_or_else(|| DEFAULT_UNIT_OF_MEASURE.to_string()),
            annual_target: programmed.total(),
            programmed,
            executed,
            warnings: Vec::new(),
            code,
        });
        row += 2;
    }

    info!(
        "CEPLAN extraction completed. Found {} sub-products.",
        sub_products.len()
    );
    CeplanExtraction {
        sub_products,
        logs: Vec::new(),
    }
}

/// Sub-product code out of a column A identifier.
pub fn sub_product_code(text: &str) -> Option<String> {
    if let Some(second) = text.split(" - ").nth(1) {
        let second = second.trim();
        if second.len() >= 5 && second.chars().all(|c| c.is_ascii_digit()) {
            return Some(second.to_string());
        }
        if let Some(m) = SUB_PRODUCT_CODE.find(second) {
            return Some(m.as_str().to_string());
        }
    }
    SUB_PRODUCT_CODE.find(text).map(|m| m.as_str().to_string())
}

/// First numeric run of the cell, rounded; zero when there is none.
fn monthly_value(sheet: &Sheet, row: usize, col: usize) -> f64 {
    sheet
        .text(row, col)
        .and_then(|text| {
            let run = NUMERIC_RUN.find(&text)?;
            run.as_str().replace(',', ".").parse::<f64>().ok()
        })
        .filter(|v| v.is_finite())
        .map(f64::round_ties_even)
        .unwrap_or(0.0)
}
