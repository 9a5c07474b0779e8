//! Database models for service portfolio rows.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use monitor_ppr_core::cartera::{CarteraEntry, NewCarteraEntry};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::cartera_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CarteraEntryDB {
    pub id: i32,
    pub program_code: String,
    pub program_name: String,
    pub product_code: String,
    pub product_name: String,
    pub activity_code: String,
    pub activity_name: String,
    pub sub_product_code: String,
    pub sub_product_name: String,
    pub tracer: String,
    pub unit_of_measure: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::cartera_entries)]
pub struct NewCarteraEntryDB {
    pub program_code: String,
    pub program_name: String,
    pub product_code: String,
    pub product_name: String,
    pub activity_code: String,
    pub activity_name: String,
    pub sub_product_code: String,
    pub sub_product_name: String,
    pub tracer: String,
    pub unit_of_measure: String,
    pub created_at: NaiveDateTime,
}

impl NewCarteraEntryDB {
    pub fn from_domain(entry: NewCarteraEntry, now: NaiveDateTime) -> Self {
        Self {
            program_code: entry.program_code,
            program_name: entry.program_name,
            product_code: entry.product_code,
            product_name: entry.product_name,
            activity_code: entry.activity_code,
            activity_name: entry.activity_name,
            sub_product_code: entry.sub_product_code,
            sub_product_name: entry.sub_product_name,
            tracer: entry.tracer,
            unit_of_measure: entry.unit_of_measure,
            created_at: now,
        }
    }
}

impl From<CarteraEntryDB> for CarteraEntry {
    fn from(db: CarteraEntryDB) -> Self {
        Self {
            id: db.id,
            entry: NewCarteraEntry {
                program_code: db.program_code,
                program_name: db.program_name,
                product_code: db.product_code,
                product_name: db.product_name,
                activity_code: db.activity_code,
                activity_name: db.activity_name,
                sub_product_code: db.sub_product_code,
                sub_product_name: db.sub_product_name,
                tracer: db.tracer,
                unit_of_measure: db.unit_of_measure,
            },
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
