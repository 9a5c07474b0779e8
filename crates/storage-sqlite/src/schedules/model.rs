//! Database models for monthly schedules.
//!
//! Each month is a nullable column (`prog_ene` ... `ejec_dic`); the domain
//! side carries them as [`MonthlyValues`].

use chrono::NaiveDateTime;
use diesel::prelude::*;
use monitor_ppr_core::schedules::{CeplanSchedule, MonthlyValues, PprSchedule};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ppr_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PprScheduleDB {
    pub id: i32,
    pub sub_product_id: i32,
    pub year: i32,
    pub annual_target: Option<f64>,
    pub prog_ene: Option<f64>,
    pub prog_feb: Option<f64>,
    pub prog_mar: Option<f64>,
    pub prog_abr: Option<f64>,
    pub prog_may: Option<f64>,
    pub prog_jun: Option<f64>,
    pub prog_jul: Option<f64>,
    pub prog_ago: Option<f64>,
    pub prog_sep: Option<f64>,
    pub prog_oct: Option<f64>,
    pub prog_nov: Option<f64>,
    pub prog_dic: Option<f64>,
    pub ejec_ene: Option<f64>,
    pub ejec_feb: Option<f64>,
    pub ejec_mar: Option<f64>,
    pub ejec_abr: Option<f64>,
    pub ejec_may: Option<f64>,
    pub ejec_jun: Option<f64>,
    pub ejec_jul: Option<f64>,
    pub ejec_ago: Option<f64>,
    pub ejec_sep: Option<f64>,
    pub ejec_oct: Option<f64>,
    pub ejec_nov: Option<f64>,
    pub ejec_dic: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Monthly columns of a PPR schedule, used for inserts and updates alike.
#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::ppr_schedules)]
#[diesel(treat_none_as_null = true)]
pub struct PprScheduleValuesDB {
    pub annual_target: Option<f64>,
    pub prog_ene: Option<f64>,
    pub prog_feb: Option<f64>,
    pub prog_mar: Option<f64>,
    pub prog_abr: Option<f64>,
    pub prog_may: Option<f64>,
    pub prog_jun: Option<f64>,
    pub prog_jul: Option<f64>,
    pub prog_ago: Option<f64>,
    pub prog_sep: Option<f64>,
    pub prog_oct: Option<f64>,
    pub prog_nov: Option<f64>,
    pub prog_dic: Option<f64>,
    pub ejec_ene: Option<f64>,
    pub ejec_feb: Option<f64>,
    pub ejec_mar: Option<f64>,
    pub ejec_abr: Option<f64>,
    pub ejec_may: Option<f64>,
    pub ejec_jun: Option<f64>,
    pub ejec_jul: Option<f64>,
    pub ejec_ago: Option<f64>,
    pub ejec_sep: Option<f64>,
    pub ejec_oct: Option<f64>,
    pub ejec_nov: Option<f64>,
    pub ejec_dic: Option<f64>,
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ceplan_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CeplanScheduleDB {
    pub id: i32,
    pub sub_product_id: i32,
    pub year: i32,
    pub prog_ene: Option<f64>,
    pub prog_feb: Option<f64>,
    pub prog_mar: Option<f64>,
    pub prog_abr: Option<f64>,
    pub prog_may: Option<f64>,
    pub prog_jun: Option<f64>,
    pub prog_jul: Option<f64>,
    pub prog_ago: Option<f64>,
    pub prog_sep: Option<f64>,
    pub prog_oct: Option<f64>,
    pub prog_nov: Option<f64>,
    pub prog_dic: Option<f64>,
    pub ejec_ene: Option<f64>,
    pub ejec_feb: Option<f64>,
    pub ejec_mar: Option<f64>,
    pub ejec_abr: Option<f64>,
    pub ejec_may: Option<f64>,
    pub ejec_jun: Option<f64>,
    pub ejec_jul: Option<f64>,
    pub ejec_ago: Option<f64>,
    pub ejec_sep: Option<f64>,
    pub ejec_oct: Option<f64>,
    pub ejec_nov: Option<f64>,
    pub ejec_dic: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::ceplan_schedules)]
#[diesel(treat_none_as_null = true)]
pub struct CeplanScheduleValuesDB {
    pub prog_ene: Option<f64>,
    pub prog_feb: Option<f64>,
    pub prog_mar: Option<f64>,
    pub prog_abr: Option<f64>,
    pub prog_may: Option<f64>,
    pub prog_jun: Option<f64>,
    pub prog_jul: Option<f64>,
    pub prog_ago: Option<f64>,
    pub prog_sep: Option<f64>,
    pub prog_oct: Option<f64>,
    pub prog_nov: Option<f64>,
    pub prog_dic: Option<f64>,
    pub ejec_ene: Option<f64>,
    pub ejec_feb: Option<f64>,
    pub ejec_mar: Option<f64>,
    pub ejec_abr: Option<f64>,
    pub ejec_may: Option<f64>,
    pub ejec_jun: Option<f64>,
    pub ejec_jul: Option<f64>,
    pub ejec_ago: Option<f64>,
    pub ejec_sep: Option<f64>,
    pub ejec_oct: Option<f64>,
    pub ejec_nov: Option<f64>,
    pub ejec_dic: Option<f64>,
}

impl PprScheduleValuesDB {
    pub fn new(
        annual_target: Option<f64>,
        programmed: &MonthlyValues,
        executed: &MonthlyValues,
    ) -> Self {
        let [
            prog_ene,
            prog_feb,
            prog_mar,
            prog_abr,
            prog_may,
            prog_jun,
            prog_jul,
            prog_ago,
            prog_sep,
            prog_oct,
            prog_nov,
            prog_dic,
        ] = programmed.0;
        let [
            ejec_ene,
            ejec_feb,
            ejec_mar,
            ejec_abr,
            ejec_may,
            ejec_jun,
            ejec_jul,
            ejec_ago,
            ejec_sep,
            ejec_oct,
            ejec_nov,
            ejec_dic,
        ] = executed.0;
        Self {
            annual_target,
            prog_ene,
            prog_feb,
            prog_mar,
            prog_abr,
            prog_may,
            prog_jun,
            prog_jul,
            prog_ago,
            prog_sep,
            prog_oct,
            prog_nov,
            prog_dic,
            ejec_ene,
            ejec_feb,
            ejec_mar,
            ejec_abr,
            ejec_may,
            ejec_jun,
            ejec_jul,
            ejec_ago,
            ejec_sep,
            ejec_oct,
            ejec_nov,
            ejec_dic,
        }
    }
}

impl CeplanScheduleValuesDB {
    pub fn new(programmed: &MonthlyValues, executed: &MonthlyValues) -> Self {
        let [
            prog_ene,
            prog_feb,
            prog_mar,
            prog_abr,
            prog_may,
            prog_jun,
            prog_jul,
            prog_ago,
            prog_sep,
            prog_oct,
            prog_nov,
            prog_dic,
        ] = programmed.0;
        let [
            ejec_ene,
            ejec_feb,
            ejec_mar,
            ejec_abr,
            ejec_may,
            ejec_jun,
            ejec_jul,
            ejec_ago,
            ejec_sep,
            ejec_oct,
            ejec_nov,
            ejec_dic,
        ] = executed.0;
        Self {
            prog_ene,
            prog_feb,
            prog_mar,
            prog_abr,
            prog_may,
            prog_jun,
            prog_jul,
            prog_ago,
            prog_sep,
            prog_oct,
            prog_nov,
            prog_dic,
            ejec_ene,
            ejec_feb,
            ejec_mar,
            ejec_abr,
            ejec_may,
            ejec_jun,
            ejec_jul,
            ejec_ago,
            ejec_sep,
            ejec_oct,
            ejec_nov,
            ejec_dic,
        }
    }
}

impl From<PprScheduleDB> for PprSchedule {
    fn from(db: PprScheduleDB) -> Self {
        Self {
            id: db.id,
            sub_product_id: db.sub_product_id,
            year: db.year,
            annual_target: db.annual_target,
            programmed: MonthlyValues([
                db.prog_ene,
                db.prog_feb,
                db.prog_mar,
                db.prog_abr,
                db.prog_may,
                db.prog_jun,
                db.prog_jul,
                db.prog_ago,
                db.prog_sep,
                db.prog_oct,
                db.prog_nov,
                db.prog_dic,
            ]),
            executed: MonthlyValues([
                db.ejec_ene,
                db.ejec_feb,
                db.ejec_mar,
                db.ejec_abr,
                db.ejec_may,
                db.ejec_jun,
                db.ejec_jul,
                db.ejec_ago,
                db.ejec_sep,
                db.ejec_oct,
                db.ejec_nov,
                db.ejec_dic,
            ]),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<CeplanScheduleDB> for CeplanSchedule {
    fn from(db: CeplanScheduleDB) -> Self {
        Self {
            id: db.id,
            sub_product_id: db.sub_product_id,
            year: db.year,
            programmed: MonthlyValues([
                db.prog_ene,
                db.prog_feb,
                db.prog_mar,
                db.prog_abr,
                db.prog_may,
                db.prog_jun,
                db.prog_jul,
                db.prog_ago,
                db.prog_sep,
                db.prog_oct,
                db.prog_nov,
                db.prog_dic,
            ]),
            executed: MonthlyValues([
                db.ejec_ene,
                db.ejec_feb,
                db.ejec_mar,
                db.ejec_abr,
                db.ejec_may,
                db.ejec_jun,
                db.ejec_jul,
                db.ejec_ago,
                db.ejec_sep,
                db.ejec_oct,
                db.ejec_nov,
                db.ejec_dic,
            ]),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
