//! Cartera module - service portfolio rows and program generation from them.

mod cartera_model;
mod cartera_service;
mod cartera_traits;

pub use cartera_model::{
    group_entries, CarteraActivity, CarteraEntry, CarteraPprCreation, CarteraProduct,
    CarteraProgram, CarteraSubProduct, CreatedPpr, NewCarteraEntry,
};
pub use cartera_service::CarteraService;
pub use cartera_traits::{CarteraRepositoryTrait, CarteraServiceTrait};
