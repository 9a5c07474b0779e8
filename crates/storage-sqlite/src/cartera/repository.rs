use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use monitor_ppr_core::cartera::{
    CarteraEntry, CarteraProgram, CarteraRepositoryTrait, CreatedPpr, NewCarteraEntry,
};
use monitor_ppr_core::pprs::{NewPpr, PprStatus};
use monitor_ppr_core::schedules::MonthlyValues;
use monitor_ppr_core::Result;

use super::model::{CarteraEntryDB, NewCarteraEntryDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::pprs::{upsert_activity, upsert_product, upsert_sub_product, NewPprDB, PprDB, SubProductUpsert};
use crate::schedules::{
    insert_ppr_schedule, upsert_ceplan_schedule, CeplanScheduleValuesDB, PprScheduleValuesDB,
};
use crate::schema::{cartera_entries, pprs};

/// Builds one program with zero-filled schedules. Returns the number of
/// sub-products attached to it.
fn create_program(
    conn: &mut SqliteConnection,
    program: &CarteraProgram,
    ppr_id: i32,
    year: i32,
    now: NaiveDateTime,
) -> Result<usize> {
    let zeros = MonthlyValues::zeros();
    let mut sub_product_count = 0;

    for product in &program.products {
        let product_row = upsert_product(conn, ppr_id, &product.code, &product.name)?;
        for activity in &product.activities {
            let activity_row =
                upsert_activity(conn, product_row.id, &activity.code, &activity.name)?;
            for sub in &activity.sub_products {
                let sub_id = match upsert_sub_product(
                    conn,
                    activity_row.id,
                    &sub.code,
                    &sub.name,
                    &sub.unit_of_measure,
                )? {
                    SubProductUpsert::Created(row) => row.id,
                    SubProductUpsert::Updated(_) => continue,
                };
                insert_ppr_schedule(
                    conn,
                    sub_id,
                    year,
                    PprScheduleValuesDB::new(Some(0.0), &zeros, &zeros),
                    now,
                )?;
                upsert_ceplan_schedule(
                    conn,
                    sub_id,
                    year,
                    CeplanScheduleValuesDB::new(&zeros, &zeros),
                    now,
                )?;
                sub_product_count += 1;
            }
        }
    }

    Ok(sub_product_count)
}

pub struct CarteraRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CarteraRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CarteraRepository { pool, writer }
    }
}

#[async_trait]
impl CarteraRepositoryTrait for CarteraRepository {
    fn list_entries(&self) -> Result<Vec<CarteraEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = cartera_entries::table
            .order(cartera_entries::id.asc())
            .select(CarteraEntryDB::as_select())
            .load::<CarteraEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CarteraEntry::from).collect())
    }

    async fn append(&self, entries: Vec<NewCarteraEntry>) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let now = Utc::now().naive_utc();
                let rows: Vec<NewCarteraEntryDB> = entries
                    .into_iter()
                    .map(|e| NewCarteraEntryDB::from_domain(e, now))
                    .collect();
                let mut inserted = 0;
                // Eleven bound columns per row; 90 rows stay under the parameter cap.
                for batch in rows.chunks(90) {
                    inserted += diesel::insert_into(cartera_entries::table)
                        .values(batch)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }

    async fn create_programs(
        &self,
        programs: Vec<CarteraProgram>,
        year: i32,
    ) -> Result<Vec<CreatedPpr>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<CreatedPpr>> {
                let now = Utc::now().naive_utc();
                let mut created = Vec::new();

                for program in &programs {
                    let exists = diesel::select(diesel::dsl::exists(
                        pprs::table
                            .filter(pprs::code.eq(program.code.trim()))
                            .filter(pprs::year.eq(year)),
                    ))
                    .get_result::<bool>(conn)
                    .map_err(StorageError::from)?;
                    if exists {
                        debug!("Program {} already exists for {}, skipping", program.code, year);
                        continue;
                    }

                    let ppr = diesel::insert_into(pprs::table)
                        .values(NewPprDB::from_domain(
                            NewPpr {
                                code: program.code.clone(),
                                name: program.name.clone(),
                                year,
                                status: PprStatus::Activo,
                            },
                            now,
                        ))
                        .returning(PprDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;

                    let sub_product_count = create_program(conn, program, ppr.id, year, now)?;
                    created.push(CreatedPpr {
                        id: ppr.id,
                        code: ppr.code,
                        name: ppr.name,
                        sub_product_count,
                    });
                }

                Ok(created)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pprs::PprRepository;
    use crate::schedules::ScheduleRepository;
    use crate::test_support::setup;
    use monitor_ppr_core::cartera::group_entries;
    use monitor_ppr_core::pprs::PprRepositoryTrait;
    use monitor_ppr_core::schedules::ScheduleRepositoryTrait;

    fn entry(program: &str, sub: &str) -> NewCarteraEntry {
        NewCarteraEntry {
            program_code: program.to_string(),
            program_name: format!("Programa {program}"),
            product_code: "3000001".to_string(),
            product_name: "Acciones comunes".to_string(),
            activity_code: "5000001".to_string(),
            activity_name: "Planeamiento".to_string(),
            sub_product_code: sub.to_string(),
            sub_product_name: format!("Sub {sub}"),
            tracer: "TRAZADOR".to_string(),
            unit_of_measure: "INFORME".to_string(),
        }
    }

    #[tokio::test]
    async fn append_keeps_every_row_in_order() {
        let db = setup().await;
        let repo = CarteraRepository::new(db.pool.clone(), db.writer.clone());
        assert_eq!(repo.append(Vec::new()).await.unwrap(), 0);

        let rows: Vec<_> = (0..200).map(|i| entry("0002", &format!("{i:04}"))).collect();
        assert_eq!(repo.append(rows).await.unwrap(), 200);
        assert_eq!(repo.append(vec![entry("0002", "0000")]).await.unwrap(), 1);

        let stored = repo.list_entries().unwrap();
        assert_eq!(stored.len(), 201);
        assert_eq!(stored[1].entry.sub_product_code, "0001");
        assert_eq!(stored[0].entry.tracer, "TRAZADOR");
    }

    #[tokio::test]
    async fn programs_are_created_once_with_zero_schedules() {
        let db = setup().await;
        let repo = CarteraRepository::new(db.pool.clone(), db.writer.clone());
        let existing = db.insert_ppr("0131", 2025);

        let entries = vec![
            entry("0002", "0001"),
            entry("0002", "0002"),
            entry("0131", "0100"),
        ];
        let programs = group_entries(&entries);
        let created = repo.create_programs(programs.clone(), 2025).await.unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].code, "0002");
        assert_eq!(created[0].sub_product_count, 2);
        assert_ne!(created[0].id, existing);

        let pprs = PprRepository::new(db.pool.clone(), db.writer.clone());
        let hierarchy = pprs.load_hierarchy(created[0].id).unwrap();
        let sub_ids: Vec<i32> = hierarchy.sub_products.iter().map(|s| s.id).collect();

        let schedules = ScheduleRepository::new(db.pool.clone(), db.writer.clone());
        let ppr_rows = schedules.ppr_schedules_for(&sub_ids).unwrap();
        assert_eq!(ppr_rows.len(), 2);
        assert_eq!(ppr_rows[0].annual_target, Some(0.0));
        assert_eq!(ppr_rows[0].programmed.total(), 0.0);
        assert_eq!(schedules.ceplan_schedules_for(&sub_ids).unwrap().len(), 2);

        assert!(repo.create_programs(programs, 2025).await.unwrap().is_empty());
        assert_eq!(repo.create_programs(group_entries(&entries), 2026).await.unwrap().len(), 2);
    }
}
