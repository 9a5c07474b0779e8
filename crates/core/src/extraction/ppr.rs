//! PPR workbook extraction.
//!
//! Program sheets are exported by hand and their layout drifts between
//! programs and years. Columns are located by scanning the first rows for
//! header-like text; when nothing is recognised a fixed legacy layout is
//! assumed. The hierarchy is then read top to bottom as a state machine:
//! a product row opens a product, an activity row opens an activity under
//! it, and every sub-product row attaches to the open activity.

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;

use super::catalog::PprCatalog;
use super::extraction_model::{
    ExtractedActivity, ExtractedProduct, ExtractedSubProduct, PprExtraction, ProgramInfo,
};
use super::normalize::normalize_text;
use super::sheet::Sheet;
use crate::constants::DEFAULT_UNIT_OF_MEASURE;
use crate::schedules::{Month, MonthlyValues};

const PROGRAM_SEARCH_ROWS: usize = 10;
const HEADER_SEARCH_ROWS: usize = 20;
const MONTH_SEARCH_ROWS: usize = 25;
const MONTH_LOOKAHEAD_COLS: usize = 20;
const FIXED_LAYOUT_DATA_ROW: usize = 11;
const DEFAULT_DATA_ROW: usize = 10;
const DEFAULT_PROGRAMMED_COL: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    ProductCode,
    ProductName,
    ActivityCode,
    ActivityName,
    SubProductCode,
    SubProductName,
    Unit,
    Target,
}

impl Column {
    const ALL: [Column; 8] = [
        Column::ProductCode,
        Column::ProductName,
        Column::ActivityCode,
        Column::ActivityName,
        Column::SubProductCode,
        Column::SubProductName,
        Column::Unit,
        Column::Target,
    ];

    fn default_index(self) -> usize {
        self as usize
    }

    fn patterns(self) -> &'static [&'static str] {
        match self {
            Column::ProductCode => &[
                r"cod\.?[\s_\-]*prod",
                r"codigo[\s_\-]*prod",
                r"prod[\s_\-]*cod",
                "codprod",
            ],
            Column::ProductName => &[r"prod(?:ucto)?", r"nombre[\s_\-]*prod", "producto"],
            Column::ActivityCode => &[
                r"cod\.?[\s_\-]*act",
                r"codigo[\s_\-]*act",
                r"act[\s_\-]*cod",
                "codact",
            ],
            Column::ActivityName => &[r"act(?:ividad)?", r"nombre[\s_\-]*act", "actividad"],
            Column::SubProductCode => &[
                r"cod\.?[\s_\-]*sub",
                r"codigo[\s_\-]*sub",
                r"sub[\s_\-]*cod",
                r"cod\.?[\s_\-]*subp",
                "subproducto",
                "subprod",
            ],
            Column::SubProductName => &[r"subp(?:roducto)?", "subproducto", "subprod"],
            Column::Unit => &[r"unidad[\s_\-]*med", "umed", r"unid\.?", "unidad"],
            Column::Target => &["meta", "indicador", "cantidad"],
        }
    }
}

lazy_static! {
    static ref HEADER_PATTERNS: Vec<(Column, Vec<Regex>)> = Column::ALL
        .iter()
        .map(|column| {
            let regexes = column
                .patterns()
                .iter()
                .map(|p| Regex::new(p).expect("Invalid regex pattern"))
                .collect();
            (*column, regexes)
        })
        .collect();
}

/// Column positions recognised from header text.
#[derive(Debug, Clone, Default, PartialEq)]
struct DetectedHeaders {
    columns: [Option<usize>; 8],
    programmed_start: Option<usize>,
    data_start: Option<usize>,
}

impl DetectedHeaders {
    fn is_empty(&self) -> bool {
        self.columns.iter().all(Option::is_none) && self.programmed_start.is_none()
    }

    fn resolve(&self) -> Layout {
        let col = |c: Column| self.columns[c as usize].unwrap_or(c.default_index());
        Layout {
            product_code: col(Column::ProductCode),
            product_name: col(Column::ProductName),
            activity_code: col(Column::ActivityCode),
            activity_name: col(Column::ActivityName),
            sub_product_code: col(Column::SubProductCode),
            sub_product: SubProductColumns {
                name: col(Column::SubProductName),
                unit: col(Column::Unit),
                target: col(Column::Target),
                programmed_start: self.programmed_start.unwrap_or(DEFAULT_PROGRAMMED_COL),
            },
            data_start: self.data_start.unwrap_or(DEFAULT_DATA_ROW),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SubProductColumns {
    name: usize,
    unit: usize,
    target: usize,
    programmed_start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    product_code: usize,
    product_name: usize,
    activity_code: usize,
    activity_name: usize,
    sub_product_code: usize,
    sub_product: SubProductColumns,
    data_start: usize,
}

/// How unparseable numbers in a sub-product row are handled.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberPolicy {
    /// Read them as zero.
    Lenient,
    /// Reject the whole row.
    Strict,
}

/// Parses a PPR workbook sheet. `year` is stamped on the program info.
pub fn extract_ppr(sheet: &Sheet, catalog: &PprCatalog, year: i32) -> PprExtraction {
    info!(
        "Starting PPR extraction over {} rows and {} columns",
        sheet.height(),
        sheet.width()
    );
    let ppr = detect_program(sheet, catalog, year);
    debug!("Detected program {:?}", ppr);

    let headers = detect_headers(sheet);
    let builder = if headers.is_empty() {
        warn!("Could not find expected headers, using fixed layout");
        scan_fixed_layout(sheet)
    } else {
        debug!("Header positions found: {:?}", headers);
        scan_detected_layout(sheet, headers.resolve())
    };
    let (products, logs) = builder.finish();

    info!("PPR extraction completed. Found {} products.", products.len());
    PprExtraction {
        ppr,
        products,
        logs,
    }
}

fn detect_program(sheet: &Sheet, catalog: &PprCatalog, year: i32) -> ProgramInfo {
    let mut info = ProgramInfo {
        code: String::new(),
        name: String::new(),
        year,
    };
    let rows = sheet.height().min(PROGRAM_SEARCH_ROWS);

    for row in 0..rows {
        let cells = sheet.row_texts(row);
        if cells.is_empty() {
            continue;
        }
        let raw = cells
            .iter()
            .map(|(_, t)| t.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let normalized = normalize_text(&raw);

        for (code, name) in catalog.entries() {
            let normalized_name = normalize_text(name);
            if !normalized_name.is_empty() && normalized.contains(&normalized_name) {
                info.code = zero_pad(code);
                info.name = name.to_string();
                return info;
            }
            if raw.contains(code) {
                info.code = zero_pad(code);
                info.name = name.to_string();
                for (_, text) in &cells {
                    if let Some((_, rest)) = text.split_once(code) {
                        let rest = rest.trim();
                        if rest.chars().count() > 2 {
                            info.name = rest.to_string();
                            break;
                        }
                    }
                }
                return info;
            }
        }
    }

    // "PROGRAMA PRESUPUESTAL" | ":" | "0017 NOMBRE"
    for row in 0..rows {
        let label = normalize_text(&sheet.text(row, 0).unwrap_or_default()).replace(' ', "");
        let separator = sheet.text(row, 1).unwrap_or_default();
        if !label.contains("programapresupuestal") || separator != ":" {
            continue;
        }
        let value = sheet.text(row, 2).unwrap_or_default();
        if let Some((code, name)) = value.split_once(' ') {
            let (code, name) = (code.trim(), name.trim());
            let valid_code =
                (3..=4).contains(&code.len()) && code.chars().all(|c| c.is_ascii_digit());
            if valid_code && !name.is_empty() {
                info.code = zero_pad(code);
                info.name = name.to_string();
                return info;
            }
        }
    }

    info
}

fn zero_pad(code: &str) -> String {
    format!("{code:0>3}")
}

fn detect_headers(sheet: &Sheet) -> DetectedHeaders {
    let mut headers = DetectedHeaders::default();

    for row in 0..sheet.height().min(HEADER_SEARCH_ROWS) {
        for (col, text) in sheet.row_texts(row) {
            let normalized = normalize_text(&text);
            for (column, regexes) in HEADER_PATTERNS.iter() {
                if regexes.iter().any(|re| re.is_match(&normalized)) {
                    headers.columns[*column as usize] = Some(col);
                }
            }
        }
    }

    'rows: for row in 0..sheet.height().min(MONTH_SEARCH_ROWS) {
        for (col, text) in sheet.row_texts(row) {
            if !normalize_text(&text).contains("ene") {
                continue;
            }
            let end = sheet.width().min(col + MONTH_LOOKAHEAD_COLS);
            for next in col..end {
                let Some(candidate) = sheet.text(row, next) else {
                    continue;
                };
                if candidate.eq_ignore_ascii_case("p")
                    || normalize_text(&candidate).contains("programado")
                {
                    headers.programmed_start = Some(next);
                    headers.data_start = Some(row + 1);
                    break 'rows;
                }
            }
        }
    }

    headers
}

fn is_product_code(code: &str) -> bool {
    let digits: String = code.chars().filter(|c| *c != '.' && *c != '-').collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Sub-product codes are 5 to 7 digits.
fn is_sub_product_code(code: &str) -> bool {
    let code = code.trim();
    (5..=7).contains(&code.len()) && code.chars().all(|c| c.is_ascii_digit())
}

fn scan_detected_layout(sheet: &Sheet, layout: Layout) -> HierarchyBuilder {
    let mut builder = HierarchyBuilder::default();

    for row in layout.data_start..sheet.height() {
        if sheet.row_is_empty(row) {
            continue;
        }

        if let Some(code) = sheet.text(row, layout.product_code) {
            if is_product_code(&code) {
                let name = sheet
                    .text(row, layout.product_name)
                    .unwrap_or_else(|| format!("Producto {code}"));
                builder.open_product(code, name);
            }
        }

        if let Some(code) = sheet.text(row, layout.activity_code) {
            let name = sheet
                .text(row, layout.activity_name)
                .unwrap_or_else(|| format!("Actividad {code}"));
            builder.open_activity(code, name);
        }

        if let Some(code) = sheet.text(row, layout.sub_product_code) {
            if is_sub_product_code(&code) {
                if let Some(sub) =
                    read_sub_product(sheet, row, code, layout.sub_product, NumberPolicy::Lenient)
                {
                    builder.attach_sub_product(row, sub);
                }
            }
        }
    }

    builder
}

fn scan_fixed_layout(sheet: &Sheet) -> HierarchyBuilder {
    const SHIFTED: SubProductColumns = SubProductColumns {
        name: 4,
        unit: 5,
        target: 7,
        programmed_start: 8,
    };
    const STANDARD: SubProductColumns = SubProductColumns {
        name: 5,
        unit: 6,
        target: 8,
        programmed_start: 9,
    };
    let mut builder = HierarchyBuilder::default();

    for row in FIXED_LAYOUT_DATA_ROW..sheet.height() {
        if sheet.row_is_empty(row) {
            continue;
        }

        if let Some(code) = sheet.text(row, 0) {
            let name =
                nearby_product_name(sheet, row).unwrap_or_else(|| format!("Producto {code}"));
            builder.open_product(code, name);
        }

        if let Some(code) = sheet.text(row, 2) {
            let name = sheet
                .text(row, 3)
                .unwrap_or_else(|| format!("Actividad {code}"));
            builder.open_activity(code, name);
        }

        let candidate = [(3, SHIFTED), (4, STANDARD)]
            .into_iter()
            .find_map(|(col, columns)| {
                sheet
                    .text(row, col)
                    .filter(|code| is_sub_product_code(code))
                    .map(|code| (code, columns))
            });
        if let Some((code, columns)) = candidate {
            match read_sub_product(sheet, row, code, columns, NumberPolicy::Strict) {
                Some(sub) => builder.attach_sub_product(row, sub),
                None => warn!("Row {}: could not parse sub-product values", row),
            }
        }
    }

    builder
}

/// First non-numeric text longer than four characters next to or below the
/// product code.
fn nearby_product_name(sheet: &Sheet, row: usize) -> Option<String> {
    [(row, 1), (row, 2), (row + 1, 1), (row + 1, 2)]
        .into_iter()
        .filter_map(|(r, c)| sheet.text(r, c))
        .find(|text| !text.chars().all(char::is_numeric) && text.chars().count() > 4)
}

fn read_number(sheet: &Sheet, row: usize, col: usize, policy: NumberPolicy) -> Option<f64> {
    let cell = sheet.cell(row, col);
    if cell.is_empty() {
        return Some(0.0);
    }
    match (cell.rounded(), policy) {
        (Some(value), _) => Some(value),
        (None, NumberPolicy::Lenient) => Some(0.0),
        (None, NumberPolicy::Strict) => None,
    }
}

fn read_sub_product(
    sheet: &Sheet,
    row: usize,
    code: String,
    columns: SubProductColumns,
    policy: NumberPolicy,
) -> Option<ExtractedSubProduct> {
    let name = sheet
        .text(row, columns.name)
        .unwrap_or_else(|| format!("Subproducto {code}"));
    let unit_of_measure = sheet
        .text(row, columns.unit)
        .unwrap_or_else(|| DEFAULT_UNIT_OF_MEASURE.to_string());
    let annual_target = read_number(sheet, row, columns.target, policy)?;

    let mut programmed = MonthlyValues::zeros();
    let mut executed = MonthlyValues::zeros();
    for month in Month::ALL {
        let col = columns.programmed_start + month.index() * 2;
        programmed.set(month, Some(read_number(sheet, row, col, policy)?));
        executed.set(month, Some(read_number(sheet, row, col + 1, policy)?));
    }

    let warnings = schedule_warnings(annual_target, &programmed, &executed);
    Some(ExtractedSubProduct {
        code,
        name,
        unit_of_measure,
        annual_target,
        programmed,
        executed,
        warnings,
    })
}

/// Consistency warnings shown next to each sub-product in the preview.
fn schedule_warnings(
    annual_target: f64,
    programmed: &MonthlyValues,
    executed: &MonthlyValues,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let total_programmed = programmed.total();
    let total_executed = executed.total();

    if annual_target == 0.0 && total_programmed > 0.0 {
        warnings.push("Meta anual es 0 pero hay valores programados".to_string());
    }
    if programmed.iter().any(|(_, v)| v.unwrap_or(0.0) < 0.0) {
        warnings.push("Se encontraron valores negativos en programación mensual".to_string());
    }
    if executed.iter().any(|(_, v)| v.unwrap_or(0.0) < 0.0) {
        warnings.push("Se encontraron valores negativos en ejecución mensual".to_string());
    }
    if annual_target > 0.0 && total_programmed > annual_target * 1.2 {
        warnings.push(format!(
            "Total programado ({total_programmed}) excede significativamente la meta anual ({annual_target})"
        ));
    }
    if total_executed > total_programmed {
        warnings.push(format!(
            "Total ejecutado ({total_executed}) excede total programado ({total_programmed})"
        ));
    }
    if programmed.iter().all(|(_, v)| v.unwrap_or(0.0) == 0.0) {
        warnings.push("No se encontraron valores programados".to_string());
    }
    if executed.iter().all(|(_, v)| v.unwrap_or(0.0) == 0.0) {
        warnings.push("No se encontraron valores ejecutados".to_string());
    }
    warnings
}

struct ActivityDraft {
    code: String,
    name: String,
    sub_products: Vec<ExtractedSubProduct>,
}

struct ProductDraft {
    code: String,
    name: String,
    activities: Vec<ActivityDraft>,
}

/// Accumulates the hierarchy in first-seen order. Re-opening a code that was
/// already seen continues the existing entry.
#[derive(Default)]
struct HierarchyBuilder {
    products: Vec<ProductDraft>,
    current_product: Option<usize>,
    current_activity: Option<usize>,
}

impl HierarchyBuilder {
    fn open_product(&mut self, code: String, name: String) {
        let index = match self.products.iter().position(|p| p.code == code) {
            Some(index) => index,
            None => {
                self.products.push(ProductDraft {
                    code,
                    name,
                    activities: Vec::new(),
                });
                self.products.len() - 1
            }
        };
        self.current_product = Some(index);
        self.current_activity = None;
    }

    fn open_activity(&mut self, code: String, name: String) {
        let Some(product) = self.current_product.and_then(|i| self.products.get_mut(i)) else {
            return;
        };
        let index = match product.activities.iter().position(|a| a.code == code) {
            Some(index) => index,
            None => {
                product.activities.push(ActivityDraft {
                    code,
                    name,
                    sub_products: Vec::new(),
                });
                product.activities.len() - 1
            }
        };
        self.current_activity = Some(index);
    }

    fn attach_sub_product(&mut self, row: usize, sub: ExtractedSubProduct) {
        let activity = self
            .current_product
            .zip(self.current_activity)
            .and_then(|(p, a)| self.products.get_mut(p)?.activities.get_mut(a));
        match activity {
            Some(activity) => activity.sub_products.push(sub),
            None => warn!(
                "Row {}: found sub-product '{}' but no current activity or product context",
                row, sub.code
            ),
        }
    }

    /// Drops activities without sub-products and products left without
    /// activities, recording each discard.
    fn finish(self) -> (Vec<ExtractedProduct>, Vec<String>) {
        let mut logs = Vec::new();
        let mut products = Vec::new();
        let total = self.products.len();

        for product in self.products {
            if product.code.is_empty() || product.name.is_empty() {
                logs.push(format!(
                    "[Descartado] Producto sin código o nombre: {}",
                    product.code
                ));
                continue;
            }
            let mut activities = Vec::new();
            for activity in product.activities {
                if activity.sub_products.is_empty() {
                    logs.push(format!(
                        "[Descartado] Actividad '{}' del producto '{}' no tiene subproductos.",
                        activity.code, product.code
                    ));
                } else {
                    activities.push(ExtractedActivity {
                        code: activity.code,
                        name: activity.name,
                        sub_products: activity.sub_products,
                    });
                }
            }
            if activities.is_empty() {
                logs.push(format!(
                    "[Descartado] Producto '{}' no tiene actividades con subproductos.",
                    product.code
                ));
            } else {
                products.push(ExtractedProduct {
                    code: product.code,
                    name: product.name,
                    activities,
                });
            }
        }

        info!(
            "Validation complete. Discarded {} products.",
            total - products.len()
        );
        (products, logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::sheet::Cell;

    fn t(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn n(v: f64) -> Cell {
        Cell::Number(v)
    }

    fn row(cells: &[(usize, Cell)]) -> Vec<Cell> {
        let width = cells.iter().map(|(c, _)| c + 1).max().unwrap_or(0);
        let mut out = vec![Cell::Empty; width];
        for (col, cell) in cells {
            out[*col] = cell.clone();
        }
        out
    }

    fn with_months(mut cells: Vec<(usize, Cell)>, start: usize, prog: [f64; 12], ejec: [f64; 12]) -> Vec<(usize, Cell)> {
        for i in 0..12 {
            cells.push((start + i * 2, n(prog[i])));
            cells.push((start + i * 2 + 1, n(ejec[i])));
        }
        cells
    }

    fn headed_sheet() -> Sheet {
        let mut ejec = [1.0; 12];
        ejec[11] = 2.5;
        Sheet::from_rows(vec![
            row(&[
                (0, t("PROGRAMA PRESUPUESTAL")),
                (1, t(":")),
                (2, t("0017 ENFERMEDADES METAXÉNICAS Y ZOONOSIS")),
            ]),
            vec![],
            row(&[
                (0, t("COD. PROD")),
                (1, t("DESCRIPCION PRODUCTO")),
                (2, t("COD. ACT")),
                (3, t("DESCRIPCION ACTIVIDAD")),
                (4, t("COD. SUB")),
                (5, t("DESCRIPCION")),
                (6, t("UNIDAD MEDIDA")),
                (7, t("META ANUAL")),
                (8, t("PROGRAMADO ENE")),
                (9, t("EJECUTADO ENE")),
            ]),
            row(&[(0, n(3000001.0)), (1, t("ACCIONES COMUNES"))]),
            row(&[(2, t("5000001")), (3, t("PLANEAMIENTO"))]),
            row(&with_months(
                vec![
                    (4, t("0215001")),
                    (5, t("VIGILANCIA")),
                    (6, t("INFORME")),
                    (7, n(12.0)),
                ],
                8,
                [1.0; 12],
                ejec,
            )),
            row(&[(2, t("5000002")), (3, t("SIN HIJOS"))]),
            row(&[(0, t("3000002")), (1, t("PRODUCTO VACIO"))]),
            row(&[(4, t("0215002")), (5, t("HUERFANO"))]),
        ])
    }

    #[test]
    fn detected_layout_builds_hierarchy() {
        let result = extract_ppr(&headed_sheet(), &PprCatalog::builtin(), 2025);

        assert_eq!(result.ppr.code, "0017");
        assert_eq!(result.ppr.name, "Enfermedades metaxenicas y zoonosis");
        assert_eq!(result.ppr.year, 2025);

        assert_eq!(result.products.len(), 1);
        let product = &result.products[0];
        assert_eq!(product.code, "3000001");
        assert_eq!(product.name, "ACCIONES COMUNES");
        assert_eq!(product.activities.len(), 1);
        let sub = &product.activities[0].sub_products[0];
        assert_eq!(sub.code, "0215001");
        assert_eq!(sub.unit_of_measure, "INFORME");
        assert_eq!(sub.annual_target, 12.0);
        assert_eq!(sub.executed.get(Month::Dic), Some(2.0));
        assert_eq!(
            sub.warnings,
            vec!["Total ejecutado (13) excede total programado (12)".to_string()]
        );

        assert_eq!(
            result.logs,
            vec![
                "[Descartado] Actividad '5000002' del producto '3000001' no tiene subproductos."
                    .to_string(),
                "[Descartado] Producto '3000002' no tiene actividades con subproductos."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn banner_row_identifies_unknown_program() {
        let sheet = Sheet::from_rows(vec![row(&[
            (0, t("Programa Presupuestal")),
            (1, t(":")),
            (2, t("0999 PROGRAMA NUEVO")),
        ])]);
        let info = detect_program(&sheet, &PprCatalog::builtin(), 2024);
        assert_eq!(info.code, "0999");
        assert_eq!(info.name, "PROGRAMA NUEVO");
    }

    #[test]
    fn catalog_code_match_takes_trailing_name() {
        let sheet = Sheet::from_rows(vec![row(&[(0, t("PPR 0131 SALUD MENTAL COMUNITARIA"))])]);
        let info = detect_program(&sheet, &PprCatalog::builtin(), 2024);
        assert_eq!(info.code, "0131");
        assert_eq!(info.name, "SALUD MENTAL COMUNITARIA");
    }

    #[test]
    fn unrecognised_program_is_left_blank() {
        let sheet = Sheet::from_rows(vec![row(&[(0, t("REPORTE MENSUAL"))])]);
        let info = detect_program(&sheet, &PprCatalog::builtin(), 2024);
        assert!(info.code.is_empty() && info.name.is_empty());
    }

    #[test]
    fn fixed_layout_handles_standard_and_shifted_rows() {
        let mut rows: Vec<Vec<Cell>> = vec![row(&[(0, t("REPORTE"))])];
        rows.resize(11, Vec::new());
        rows.push(row(&[(0, t("4000001")), (1, t("VIGILANCIA SANITARIA"))]));
        rows.push(row(&[(2, t("5000010")), (3, t("CONTROL VECTORIAL"))]));
        rows.push(row(&with_months(
            vec![
                (4, t("0123456")),
                (5, t("FUMIGACION")),
                (6, t("VIVIENDA")),
                (8, n(100.0)),
            ],
            9,
            [10.0; 12],
            [5.0; 12],
        )));
        rows.push(row(&[
            (3, t("0123457")),
            (4, t("NEBULIZACION")),
            (5, t("VIVIENDA")),
            (7, n(50.0)),
        ]));
        rows.push(row(&[(4, t("0123458")), (8, t("mucho"))]));

        let result = extract_ppr(&Sheet::from_rows(rows), &PprCatalog::builtin(), 2025);
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].name, "VIGILANCIA SANITARIA");
        let subs = &result.products[0].activities[0].sub_products;
        assert_eq!(subs.len(), 2);

        assert_eq!(subs[0].code, "0123456");
        assert_eq!(subs[0].annual_target, 100.0);
        assert_eq!(subs[0].programmed.total(), 120.0);
        assert!(subs[0].warnings.is_empty());

        assert_eq!(subs[1].code, "0123457");
        assert_eq!(subs[1].name, "NEBULIZACION");
        assert_eq!(subs[1].annual_target, 50.0);
        assert_eq!(
            subs[1].warnings,
            vec![
                "No se encontraron valores programados".to_string(),
                "No se encontraron valores ejecutados".to_string(),
            ]
        );
    }

    #[test]
    fn warnings_cover_targets_and_negatives() {
        let mut programmed = MonthlyValues::zeros();
        programmed.set(Month::Ene, Some(150.0));
        let mut executed = MonthlyValues::zeros();
        executed.set(Month::Feb, Some(-1.0));
        let warnings = schedule_warnings(100.0, &programmed, &executed);
        assert!(warnings.contains(&"Se encontraron valores negativos en ejecución mensual".to_string()));
        assert!(warnings.contains(
            &"Total programado (150) excede significativamente la meta anual (100)".to_string()
        ));

        let warnings = schedule_warnings(0.0, &programmed, &MonthlyValues::zeros());
        assert_eq!(warnings[0], "Meta anual es 0 pero hay valores programados");
    }

    #[test]
    fn code_shapes() {
        assert!(is_product_code("3000001"));
        assert!(is_product_code("3.000-001"));
        assert!(!is_product_code("TOTAL"));
        assert!(is_sub_product_code("0215001"));
        assert!(!is_sub_product_code("1234"));
        assert!(!is_sub_product_code("12345678"));
    }
}
