//! SQLite storage for committed PPR and CEPLAN imports.

mod repository;

pub use repository::ImportRepository;
