use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use monitor_ppr_core::schedules::{CeplanSchedule, PprSchedule, ScheduleRepositoryTrait};
use monitor_ppr_core::Result;

use super::model::{CeplanScheduleDB, CeplanScheduleValuesDB, PprScheduleDB, PprScheduleValuesDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{ceplan_schedules, ppr_schedules};
use crate::utils::chunk_for_sqlite;

pub(crate) fn insert_ppr_schedule(
    conn: &mut SqliteConnection,
    sub_product_id: i32,
    year: i32,
    values: PprScheduleValuesDB,
    now: NaiveDateTime,
) -> Result<()> {
    diesel::insert_into(ppr_schedules::table)
        .values((
            ppr_schedules::sub_product_id.eq(sub_product_id),
            ppr_schedules::year.eq(year),
            ppr_schedules::created_at.eq(now),
            values,
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

/// Overwrites the (sub-product, year) CEPLAN schedule, creating it if needed.
pub(crate) fn upsert_ceplan_schedule(
    conn: &mut SqliteConnection,
    sub_product_id: i32,
    year: i32,
    values: CeplanScheduleValuesDB,
    now: NaiveDateTime,
) -> Result<()> {
    let existing = ceplan_schedules::table
        .filter(ceplan_schedules::sub_product_id.eq(sub_product_id))
        .filter(ceplan_schedules::year.eq(year))
        .select(ceplan_schedules::id)
        .first::<i32>(conn)
        .optional()
        .map_err(StorageError::from)?;

    match existing {
        Some(schedule_id) => diesel::update(ceplan_schedules::table.find(schedule_id))
            .set((values, ceplan_schedules::updated_at.eq(Some(now))))
            .execute(conn),
        None => diesel::insert_into(ceplan_schedules::table)
            .values((
                ceplan_schedules::sub_product_id.eq(sub_product_id),
                ceplan_schedules::year.eq(year),
                ceplan_schedules::created_at.eq(now),
                values,
            ))
            .execute(conn),
    }
    .map_err(StorageError::from)?;
    Ok(())
}

pub struct ScheduleRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ScheduleRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        ScheduleRepository { pool, writer }
    }
}

#[async_trait]
impl ScheduleRepositoryTrait for ScheduleRepository {
    fn ppr_schedules_for(&self, sub_product_ids: &[i32]) -> Result<Vec<PprSchedule>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(sub_product_ids) {
            rows.extend(
                ppr_schedules::table
                    .filter(ppr_schedules::sub_product_id.eq_any(chunk))
                    .order((ppr_schedules::sub_product_id, ppr_schedules::year))
                    .select(PprScheduleDB::as_select())
                    .load::<PprScheduleDB>(&mut conn)
                    .map_err(StorageError::from)?,
            );
        }
        Ok(rows.into_iter().map(PprSchedule::from).collect())
    }

    fn ceplan_schedules_for(&self, sub_product_ids: &[i32]) -> Result<Vec<CeplanSchedule>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(sub_product_ids) {
            rows.extend(
                ceplan_schedules::table
                    .filter(ceplan_schedules::sub_product_id.eq_any(chunk))
                    .order((ceplan_schedules::sub_product_id, ceplan_schedules::year))
                    .select(CeplanScheduleDB::as_select())
                    .load::<CeplanScheduleDB>(&mut conn)
                    .map_err(StorageError::from)?,
            );
        }
        Ok(rows.into_iter().map(CeplanSchedule::from).collect())
    }

    async fn save_ppr_schedule(&self, schedule: PprSchedule) -> Result<PprSchedule> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PprSchedule> {
                let values = PprScheduleValuesDB::new(
                    schedule.annual_target,
                    &schedule.programmed,
                    &schedule.executed,
                );
                let row = diesel::update(ppr_schedules::table.find(schedule.id))
                    .set((values, ppr_schedules::updated_at.eq(Some(Utc::now().naive_utc()))))
                    .returning(PprScheduleDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pprs::{upsert_activity, upsert_product, upsert_sub_product, SubProductUpsert};
    use crate::test_support::setup;
    use monitor_ppr_core::schedules::{Month, MonthlyValues};

    #[tokio::test]
    async fn schedules_round_trip_and_updates_stamp_time() {
        let db = setup().await;
        let repo = ScheduleRepository::new(db.pool.clone(), db.writer.clone());
        let ppr_id = db.insert_ppr("0017", 2025);

        let sub_id = db
            .writer
            .exec(move |conn| {
                let product = upsert_product(conn, ppr_id, "3000001", "Producto")?;
                let activity = upsert_activity(conn, product.id, "5000001", "Actividad")?;
                let sub = match upsert_sub_product(conn, activity.id, "0215001", "Sub", "UNIDAD")? {
                    SubProductUpsert::Created(sub) | SubProductUpsert::Updated(sub) => sub,
                };
                let mut programmed = MonthlyValues::zeros();
                programmed.set(Month::Abr, Some(12.5));
                let now = Utc::now().naive_utc();
                insert_ppr_schedule(
                    conn,
                    sub.id,
                    2025,
                    PprScheduleValuesDB::new(Some(50.0), &programmed, &MonthlyValues::default()),
                    now,
                )?;
                upsert_ceplan_schedule(
                    conn,
                    sub.id,
                    2025,
                    CeplanScheduleValuesDB::new(&programmed, &MonthlyValues::zeros()),
                    now,
                )?;
                upsert_ceplan_schedule(
                    conn,
                    sub.id,
                    2025,
                    CeplanScheduleValuesDB::new(&MonthlyValues::zeros(), &MonthlyValues::zeros()),
                    now,
                )?;
                Ok(sub.id)
            })
            .await
            .unwrap();

        let mut schedule = repo.ppr_schedules_for(&[sub_id]).unwrap().remove(0);
        assert_eq!(schedule.programmed.get(Month::Abr), Some(12.5));
        assert_eq!(schedule.executed.get(Month::Abr), None);
        assert!(schedule.updated_at.is_none());

        schedule.executed.set(Month::Abr, Some(3.0));
        let saved = repo.save_ppr_schedule(schedule).await.unwrap();
        assert_eq!(saved.executed.get(Month::Abr), Some(3.0));
        assert!(saved.updated_at.is_some());

        let ceplan = repo.ceplan_schedules_for(&[sub_id]).unwrap();
        assert_eq!(ceplan.len(), 1);
        assert_eq!(ceplan[0].annual_target(), 0.0);
        assert!(ceplan[0].updated_at.is_some());
    }
}
