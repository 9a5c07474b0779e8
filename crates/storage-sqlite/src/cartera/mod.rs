//! SQLite storage implementation for the service portfolio.

mod model;
mod repository;

pub use model::{CarteraEntryDB, NewCarteraEntryDB};
pub use repository::CarteraRepository;
