//! Database models for programs and their hierarchy.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use monitor_ppr_core::pprs::{Activity, NewPpr, Ppr, Product, SubProduct};

/// Database model for programs
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::pprs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PprDB {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub year: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::pprs)]
pub struct NewPprDB {
    pub code: String,
    pub name: String,
    pub year: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Full replacement of the editable program fields.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::pprs)]
pub struct PprChangesDB {
    pub code: String,
    pub name: String,
    pub year: i32,
    pub status: String,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(PprDB, foreign_key = ppr_id))]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: i32,
    pub ppr_id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProductDB<'a> {
    pub ppr_id: i32,
    pub code: &'a str,
    pub name: &'a str,
}

#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(ProductDB, foreign_key = product_id))]
#[diesel(table_name = crate::schema::activities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityDB {
    pub id: i32,
    pub product_id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::activities)]
pub struct NewActivityDB<'a> {
    pub product_id: i32,
    pub code: &'a str,
    pub name: &'a str,
}

#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(ActivityDB, foreign_key = activity_id))]
#[diesel(table_name = crate::schema::sub_products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubProductDB {
    pub id: i32,
    pub activity_id: i32,
    pub code: String,
    pub name: String,
    pub unit_of_measure: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::sub_products)]
pub struct NewSubProductDB<'a> {
    pub activity_id: i32,
    pub code: &'a str,
    pub name: &'a str,
    pub unit_of_measure: &'a str,
}

impl From<PprDB> for Ppr {
    fn from(db: PprDB) -> Self {
        Self {
            id: db.id,
            code: db.code,
            name: db.name,
            year: db.year,
            status: db.status.parse().unwrap_or_default(),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl NewPprDB {
    pub fn from_domain(domain: NewPpr, now: NaiveDateTime) -> Self {
        Self {
            code: domain.code.trim().to_string(),
            name: domain.name.trim().to_string(),
            year: domain.year,
            status: domain.status.as_str().to_string(),
            created_at: now,
        }
    }
}

impl PprChangesDB {
    pub fn from_domain(domain: NewPpr, now: NaiveDateTime) -> Self {
        Self {
            code: domain.code.trim().to_string(),
            name: domain.name.trim().to_string(),
            year: domain.year,
            status: domain.status.as_str().to_string(),
            updated_at: Some(now),
        }
    }
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Self {
            id: db.id,
            ppr_id: db.ppr_id,
            code: db.code,
            name: db.name,
        }
    }
}

impl From<ActivityDB> for Activity {
    fn from(db: ActivityDB) -> Self {
        Self {
            id: db.id,
            product_id: db.product_id,
            code: db.code,
            name: db.name,
        }
    }
}

impl From<SubProductDB> for SubProduct {
    fn from(db: SubProductDB) -> Self {
        Self {
            id: db.id,
            activity_id: db.activity_id,
            code: db.code,
            name: db.name,
            unit_of_measure: db.unit_of_measure,
        }
    }
}
