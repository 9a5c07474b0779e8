//! SQLite storage implementation for PPR and CEPLAN schedules.

mod model;
mod repository;

pub use model::{CeplanScheduleDB, CeplanScheduleValuesDB, PprScheduleDB, PprScheduleValuesDB};
pub(crate) use repository::{insert_ppr_schedule, upsert_ceplan_schedule};
pub use repository::ScheduleRepository;
