//! PPR module - program hierarchy models, catalogue service and traits.

mod pprs_model;
mod pprs_service;
mod pprs_traits;

pub use pprs_model::{
    Activity, ActivityNode, NewPpr, Ppr, PprDetail, PprHierarchy, PprStatus, PprStructure,
    Product, ProductNode, ScheduleView, StructureActivity, StructureProduct, StructureSubProduct,
    SubProduct,
};
pub(crate) use pprs_service::ppr_not_found;
pub use pprs_service::PprService;
pub use pprs_traits::{PprRepositoryTrait, PprServiceTrait};
