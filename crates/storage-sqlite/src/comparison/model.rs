//! Database models for schedule differences.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use monitor_ppr_core::comparison::{Difference, NewDifference};
use monitor_ppr_core::schedules::MonthlyValues;
use monitor_ppr_core::Error;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::schedule_differences)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DifferenceDB {
    pub id: i32,
    pub sub_product_id: i32,
    pub year: i32,
    pub dif_prog_ene: Option<f64>,
    pub dif_prog_feb: Option<f64>,
    pub dif_prog_mar: Option<f64>,
    pub dif_prog_abr: Option<f64>,
    pub dif_prog_may: Option<f64>,
    pub dif_prog_jun: Option<f64>,
    pub dif_prog_jul: Option<f64>,
    pub dif_prog_ago: Option<f64>,
    pub dif_prog_sep: Option<f64>,
    pub dif_prog_oct: Option<f64>,
    pub dif_prog_nov: Option<f64>,
    pub dif_prog_dic: Option<f64>,
    pub dif_ejec_ene: Option<f64>,
    pub dif_ejec_feb: Option<f64>,
    pub dif_ejec_mar: Option<f64>,
    pub dif_ejec_abr: Option<f64>,
    pub dif_ejec_may: Option<f64>,
    pub dif_ejec_jun: Option<f64>,
    pub dif_ejec_jul: Option<f64>,
    pub dif_ejec_ago: Option<f64>,
    pub dif_ejec_sep: Option<f64>,
    pub dif_ejec_oct: Option<f64>,
    pub dif_ejec_nov: Option<f64>,
    pub dif_ejec_dic: Option<f64>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::schedule_differences)]
#[diesel(treat_none_as_null = true)]
pub struct NewDifferenceDB {
    pub sub_product_id: i32,
    pub year: i32,
    pub dif_prog_ene: Option<f64>,
    pub dif_prog_feb: Option<f64>,
    pub dif_prog_mar: Option<f64>,
    pub dif_prog_abr: Option<f64>,
    pub dif_prog_may: Option<f64>,
    pub dif_prog_jun: Option<f64>,
    pub dif_prog_jul: Option<f64>,
    pub dif_prog_ago: Option<f64>,
    pub dif_prog_sep: Option<f64>,
    pub dif_prog_oct: Option<f64>,
    pub dif_prog_nov: Option<f64>,
    pub dif_prog_dic: Option<f64>,
    pub dif_ejec_ene: Option<f64>,
    pub dif_ejec_feb: Option<f64>,
    pub dif_ejec_mar: Option<f64>,
    pub dif_ejec_abr: Option<f64>,
    pub dif_ejec_may: Option<f64>,
    pub dif_ejec_jun: Option<f64>,
    pub dif_ejec_jul: Option<f64>,
    pub dif_ejec_ago: Option<f64>,
    pub dif_ejec_sep: Option<f64>,
    pub dif_ejec_oct: Option<f64>,
    pub dif_ejec_nov: Option<f64>,
    pub dif_ejec_dic: Option<f64>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl NewDifferenceDB {
    pub fn from_domain(domain: &NewDifference, now: NaiveDateTime) -> Self {
        let [
            dif_prog_ene,
            dif_prog_feb,
            dif_prog_mar,
            dif_prog_abr,
            dif_prog_may,
            dif_prog_jun,
            dif_prog_jul,
            dif_prog_ago,
            dif_prog_sep,
            dif_prog_oct,
            dif_prog_nov,
            dif_prog_dic,
        ] = domain.programmed.0;
        let [
            dif_ejec_ene,
            dif_ejec_feb,
            dif_ejec_mar,
            dif_ejec_abr,
            dif_ejec_may,
            dif_ejec_jun,
            dif_ejec_jul,
            dif_ejec_ago,
            dif_ejec_sep,
            dif_ejec_oct,
            dif_ejec_nov,
            dif_ejec_dic,
        ] = domain.executed.0;
        Self {
            sub_product_id: domain.sub_product_id,
            year: domain.year,
            dif_prog_ene,
            dif_prog_feb,
            dif_prog_mar,
            dif_prog_abr,
            dif_prog_may,
            dif_prog_jun,
            dif_prog_jul,
            dif_prog_ago,
            dif_prog_sep,
            dif_prog_oct,
            dif_prog_nov,
            dif_prog_dic,
            dif_ejec_ene,
            dif_ejec_feb,
            dif_ejec_mar,
            dif_ejec_abr,
            dif_ejec_may,
            dif_ejec_jun,
            dif_ejec_jul,
            dif_ejec_ago,
            dif_ejec_sep,
            dif_ejec_oct,
            dif_ejec_nov,
            dif_ejec_dic,
            status: domain.status.as_str().to_string(),
            created_at: now,
        }
    }
}

impl TryFrom<DifferenceDB> for Difference {
    type Error = Error;

    fn try_from(db: DifferenceDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            sub_product_id: db.sub_product_id,
            year: db.year,
            programmed: MonthlyValues([
                db.dif_prog_ene,
                db.dif_prog_feb,
                db.dif_prog_mar,
                db.dif_prog_abr,
                db.dif_prog_may,
                db.dif_prog_jun,
                db.dif_prog_jul,
                db.dif_prog_ago,
                db.dif_prog_sep,
                db.dif_prog_oct,
                db.dif_prog_nov,
                db.dif_prog_dic,
            ]),
            executed: MonthlyValues([
                db.dif_ejec_ene,
                db.dif_ejec_feb,
                db.dif_ejec_mar,
                db.dif_ejec_abr,
                db.dif_ejec_may,
                db.dif_ejec_jun,
                db.dif_ejec_jul,
                db.dif_ejec_ago,
                db.dif_ejec_sep,
                db.dif_ejec_oct,
                db.dif_ejec_nov,
                db.dif_ejec_dic,
            ]),
            status: db.status.parse()?,
            created_at: db.created_at,
        })
    }
}
