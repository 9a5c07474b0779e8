use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use monitor_ppr_core::comparison::{ComparisonRepositoryTrait, Difference, NewDifference};
use monitor_ppr_core::Result;

use super::model::{DifferenceDB, NewDifferenceDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::schedule_differences;
use crate::utils::chunk_for_sqlite;

// 28 bound columns per row.
const INSERT_BATCH: usize = 30;

pub struct ComparisonRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ComparisonRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        ComparisonRepository { pool, writer }
    }
}

#[async_trait]
impl ComparisonRepositoryTrait for ComparisonRepository {
    fn differences_for(&self, sub_product_ids: &[i32]) -> Result<Vec<Difference>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(sub_product_ids) {
            rows.extend(
                schedule_differences::table
                    .filter(schedule_differences::sub_product_id.eq_any(chunk))
                    .select(DifferenceDB::as_select())
                    .load::<DifferenceDB>(&mut conn)
                    .map_err(StorageError::from)?,
            );
        }
        rows.sort_by_key(|r| (r.sub_product_id, r.year, r.id));
        rows.into_iter().map(Difference::try_from).collect()
    }

    async fn replace_differences(
        &self,
        sub_product_ids: Vec<i32>,
        differences: Vec<NewDifference>,
    ) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                for chunk in chunk_for_sqlite(&sub_product_ids) {
                    diesel::delete(
                        schedule_differences::table
                            .filter(schedule_differences::sub_product_id.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }

                let now = Utc::now().naive_utc();
                let rows: Vec<NewDifferenceDB> = differences
                    .iter()
                    .map(|d| NewDifferenceDB::from_domain(d, now))
                    .collect();
                let mut inserted = 0;
                for batch in rows.chunks(INSERT_BATCH) {
                    inserted += diesel::insert_into(schedule_differences::table)
                        .values(batch)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;
    use monitor_ppr_core::comparison::DifferenceStatus;
    use monitor_ppr_core::schedules::{Month, MonthlyValues};

    fn difference(sub_product_id: i32, programmed_jan: Option<f64>) -> NewDifference {
        let mut programmed = MonthlyValues::default();
        programmed.set(Month::Ene, programmed_jan);
        NewDifference {
            sub_product_id,
            year: 2025,
            programmed,
            executed: MonthlyValues::zeros(),
            status: DifferenceStatus::Alerta,
        }
    }

    #[tokio::test]
    async fn replacing_drops_previous_rows_of_the_same_sub_products() {
        let db = setup().await;
        let ids = db.insert_sub_products("0017", 2025, 2);
        let repo = ComparisonRepository::new(db.pool.clone(), db.writer.clone());

        let first: Vec<_> = (0..40).map(|_| difference(ids[0], Some(3.5))).collect();
        assert_eq!(
            repo.replace_differences(ids.clone(), first).await.unwrap(),
            40
        );
        repo.replace_differences(vec![ids[1]], vec![difference(ids[1], None)])
            .await
            .unwrap();
        assert_eq!(repo.differences_for(&ids).unwrap().len(), 41);

        repo.replace_differences(vec![ids[0]], vec![difference(ids[0], Some(-1.0))])
            .await
            .unwrap();
        let stored = repo.differences_for(&ids).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].programmed.get(Month::Ene), Some(-1.0));
        assert_eq!(stored[0].status, DifferenceStatus::Alerta);
        assert_eq!(stored[1].programmed.get(Month::Ene), None);
        assert!(!stored[0].is_flat());
        assert!(stored[1].is_flat());
    }
}
