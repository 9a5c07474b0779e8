//! Extraction module - workbook parsing for PPR, CEPLAN and service portfolio files.

mod catalog;
mod cartera;
mod ceplan;
mod extraction_model;
mod normalize;
mod ppr;
mod sheet;

pub use cartera::{extract_cartera, split_code_name};
pub use catalog::PprCatalog;
pub use ceplan::{extract_ceplan, sub_product_code};
pub use extraction_model::{
    CarteraExtraction, CeplanExtraction, ExtractedActivity, ExtractedProduct, ExtractedSubProduct,
    PprExtraction, ProgramInfo,
};
pub use normalize::{normalize_header, normalize_text};
pub use ppr::extract_ppr;
pub use sheet::{Cell, Sheet};
