//! SQLite storage implementation for programs and their hierarchy.

mod model;
mod repository;

pub use model::{ActivityDB, NewPprDB, PprDB, ProductDB, SubProductDB};
pub(crate) use repository::{upsert_activity, upsert_product, upsert_sub_product, SubProductUpsert};
pub use repository::PprRepository;
