//! Service portfolio workbook extraction.
//!
//! Each of the program, product, activity and sub-product columns holds a
//! combined `"<code> <name>"` value, e.g. `3000001 ACCIONES COMUNES`.

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;

use super::extraction_model::CarteraExtraction;
use super::normalize::normalize_header;
use super::sheet::Sheet;
use crate::cartera::NewCarteraEntry;
use crate::errors::ExtractionError;

const HEADER_SEARCH_ROWS: usize = 10;

const MISSING_HEADERS: &str = "No valid headers found. Expected columns: Programa, Producto, \
     Actividad, Sub Producto, Trazador, Unidad de Medida";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Program,
    Product,
    Activity,
    SubProduct,
    Tracer,
    Unit,
}

impl Field {
    const ALL: [Field; 6] = [
        Field::Program,
        Field::Product,
        Field::Activity,
        Field::SubProduct,
        Field::Tracer,
        Field::Unit,
    ];

    fn patterns(self) -> &'static [&'static str] {
        match self {
            Field::Program => &[
                "programa",
                "codigo programa",
                "cod programa",
                "ppr",
                "codigo ppr",
                "cod ppr",
                "codprograma",
                "codppr",
                "codigo",
                "cod",
                "programa presupuestal",
                "ppr.codigo",
            ],
            Field::Product => &[
                "producto",
                "codigo producto",
                "cod producto",
                "prod",
                "codigo prod",
                "cod prod",
                "codproducto",
                "codprod",
                "producto.codigo",
                "prod.codigo",
            ],
            Field::Activity => &[
                "actividad",
                "codigo actividad",
                "cod actividad",
                "act",
                "codigo act",
                "cod act",
                "codactividad",
                "codact",
                "actividad.codigo",
                "act.codigo",
            ],
            Field::SubProduct => &[
                "subproducto",
                "sub producto",
                "subproducto.codigo",
                "sub producto.codigo",
                "codigo subproducto",
                "codigo sub producto",
                "cod subproducto",
                "cod sub producto",
                "subprod",
                "codigo subprod",
                "cod subprod",
            ],
            Field::Tracer => &[
                "trazador",
                "indicador",
                "traz",
                "codigo trazador",
                "cod trazador",
                "trazador.codigo",
                "indicador.codigo",
            ],
            Field::Unit => &[
                "unidad de medida",
                "unidad medida",
                "umed",
                "u.m.",
                "unidad",
                "medida",
                "umedida",
                "unidad.medida",
                "um",
            ],
        }
    }
}

lazy_static! {
    static ref CODE_AND_NAME: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?)\s+(.+)$").expect("Invalid regex pattern");
    /// Normalised header patterns. Patterns that fold to a single character
    /// (`u.m.` becomes `m`) would match almost any header and are left out.
    static ref HEADER_PATTERNS: Vec<(Field, Vec<String>)> = Field::ALL
        .iter()
        .map(|field| {
            let patterns = field
                .patterns()
                .iter()
                .map(|p| normalize_header(p))
                .filter(|p| p.chars().count() >= 2)
                .collect();
            (*field, patterns)
        })
        .collect();
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    program: usize,
    product: usize,
    activity: usize,
    sub_product: usize,
    tracer: usize,
    unit: usize,
    data_start: usize,
}

fn locate_columns(sheet: &Sheet) -> Option<Columns> {
    let mut found: [Option<usize>; 6] = [None; 6];

    for row in 0..sheet.height().min(HEADER_SEARCH_ROWS) {
        for (col, text) in sheet.row_texts(row) {
            let normalized = normalize_header(&text);
            for (field, patterns) in HEADER_PATTERNS.iter() {
                let slot = &mut found[*field as usize];
                if slot.is_none() && patterns.iter().any(|p| normalized.contains(p.as_str())) {
                    debug!("Found {:?} header at row {}, col {}: '{}'", field, row, col, text);
                    *slot = Some(col);
                }
            }
        }

        if let [Some(program), Some(product), Some(activity), Some(sub_product), Some(tracer), Some(unit)] =
            found
        {
            return Some(Columns {
                program,
                product,
                activity,
                sub_product,
                tracer,
                unit,
                data_start: row + 1,
            });
        }
    }

    let missing: Vec<_> = Field::ALL
        .iter()
        .filter(|f| found[**f as usize].is_none())
        .collect();
    warn!("Could not find all required headers. Missing: {:?}", missing);
    None
}

/// Splits `"3000001 ACCIONES COMUNES"` into code and name. Without a leading
/// code the whole text is the name.
pub fn split_code_name(text: &str) -> (String, String) {
    let text = text.trim();
    match CODE_AND_NAME.captures(text) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
        None => (String::new(), text.to_string()),
    }
}

pub fn extract_cartera(sheet: &Sheet) -> Result<CarteraExtraction, ExtractionError> {
    info!("Starting service portfolio extraction over {} rows", sheet.height());
    let columns = locate_columns(sheet)
        .ok_or_else(|| ExtractionError::Layout(MISSING_HEADERS.to_string()))?;

    let mut entries = Vec::new();
    for row in columns.data_start..sheet.height() {
        if sheet.row_is_empty(row) {
            continue;
        }
        let read = |col: usize| sheet.text(row, col).unwrap_or_default();
        let program = read(columns.program);
        let product = read(columns.product);
        let activity = read(columns.activity);
        let sub_product = read(columns.sub_product);
        if [&program, &product, &activity, &sub_product]
            .iter()
            .all(|v| v.is_empty())
        {
            continue;
        }

        let (program_code, program_name) = split_code_name(&program);
        let (product_code, product_name) = split_code_name(&product);
        let (activity_code, activity_name) = split_code_name(&activity);
        let (sub_product_code, sub_product_name) = split_code_name(&sub_product);
        entries.push(NewCarteraEntry {
            program_code,
            program_name,
            product_code,
            product_name,
            activity_code,
            activity_name,
            sub_product_code,
            sub_product_name,
            tracer: read(columns.tracer),
            unit_of_measure: read(columns.unit),
        });
    }

    info!("Extracted {} service portfolio records", entries.len());
    Ok(CarteraExtraction {
        total_records: entries.len(),
        entries,
    })
}
