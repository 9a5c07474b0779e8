use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{debug, info, warn};
use std::collections::HashMap;

use monitor_ppr_core::constants::DEFAULT_UNIT_OF_MEASURE;
use monitor_ppr_core::extraction::{ExtractedSubProduct, PprExtraction};
use monitor_ppr_core::imports::{
    normalized_sub_product_code, CeplanImportResult, ImportRepositoryTrait, PprImportResult,
};
use monitor_ppr_core::pprs::{NewPpr, PprStatus};
use monitor_ppr_core::Result;

use crate::db::WriteHandle;
use crate::errors::StorageError;
use crate::pprs::{
    upsert_activity, upsert_product, upsert_sub_product, NewPprDB, PprDB, SubProductUpsert,
};
use crate::schedules::{
    insert_ppr_schedule, upsert_ceplan_schedule, CeplanScheduleValuesDB, PprScheduleValuesDB,
};
use crate::schema::{pprs, sub_products};

/// Writes committed previews. Everything runs on the writer, one
/// transaction per import.
pub struct ImportRepository {
    writer: WriteHandle,
}

impl ImportRepository {
    pub fn new(writer: WriteHandle) -> Self {
        ImportRepository { writer }
    }
}

fn upsert_program(conn: &mut SqliteConnection, code: &str, name: &str, year: i32) -> Result<i32> {
    let now = Utc::now().naive_utc();
    let existing = pprs::table
        .filter(pprs::code.eq(code))
        .filter(pprs::year.eq(year))
        .select(pprs::id)
        .first::<i32>(conn)
        .optional()
        .map_err(StorageError::from)?;

    match existing {
        Some(ppr_id) => {
            debug!("Updating existing program {} ({})", code, year);
            diesel::update(pprs::table.find(ppr_id))
                .set((pprs::name.eq(name), pprs::updated_at.eq(Some(now))))
                .execute(conn)
                .map_err(StorageError::from)?;
            Ok(ppr_id)
        }
        None => {
            debug!("Creating program {} ({})", code, year);
            let row = diesel::insert_into(pprs::table)
                .values(NewPprDB::from_domain(
                    NewPpr {
                        code: code.to_string(),
                        name: name.to_string(),
                        year,
                        status: PprStatus::Activo,
                    },
                    now,
                ))
                .returning(PprDB::as_returning())
                .get_result(conn)
                .map_err(StorageError::from)?;
            Ok(row.id)
        }
    }
}

fn store_tree(conn: &mut SqliteConnection, extraction: &PprExtraction) -> Result<PprImportResult> {
    let info = &extraction.ppr;
    let code = info.code.trim();
    let ppr_id = upsert_program(conn, code, info.name.trim(), info.year)?;
    let now = Utc::now().naive_utc();

    let mut products_count = 0;
    let mut new_sub_products = 0;
    for product in &extraction.products {
        let (product_code, product_name) = (product.code.trim(), product.name.trim());
        if product_code.is_empty() || product_name.is_empty() {
            warn!("Skipping product without code or name: '{}'", product_code);
            continue;
        }
        let product_row = upsert_product(conn, ppr_id, product_code, product_name)?;
        products_count += 1;

        for activity in &product.activities {
            let (activity_code, activity_name) = (activity.code.trim(), activity.name.trim());
            if activity_code.is_empty() || activity_name.is_empty() {
                warn!("Skipping activity without code or name: '{}'", activity_code);
                continue;
            }
            let activity_row = upsert_activity(conn, product_row.id, activity_code, activity_name)?;

            for sub in &activity.sub_products {
                let sub_code = sub.code.trim();
                if sub_code.is_empty() {
                    warn!("Skipping sub-product without code: '{}'", sub.name.trim());
                    continue;
                }
                let unit = match sub.unit_of_measure.trim() {
                    "" => DEFAULT_UNIT_OF_MEASURE,
                    unit => unit,
                };
                let created =
                    upsert_sub_product(conn, activity_row.id, sub_code, sub.name.trim(), unit)?;
                // Existing sub-products keep their schedule; it is edited in place.
                if let SubProductUpsert::Created(row) = created {
                    insert_ppr_schedule(
                        conn,
                        row.id,
                        info.year,
                        PprScheduleValuesDB::new(
                            Some(sub.annual_target),
                            &sub.programmed.filled(),
                            &sub.executed.filled(),
                        ),
                        now,
                    )?;
                    new_sub_products += 1;
                }
            }
        }
    }

    info!(
        "Stored program {} ({}): {} products, {} new sub-products",
        code, info.year, products_count, new_sub_products
    );
    Ok(PprImportResult {
        ppr_id,
        products_count,
    })
}

fn store_ceplan_rows(
    conn: &mut SqliteConnection,
    rows: &[ExtractedSubProduct],
    year: i32,
) -> Result<CeplanImportResult> {
    // Sub-products sharing a normalized code resolve to the last one stored.
    let known: Vec<(i32, String)> = sub_products::table
        .select((sub_products::id, sub_products::code))
        .order(sub_products::id.asc())
        .load(conn)
        .map_err(StorageError::from)?;
    let lookup: HashMap<String, i32> = known
        .into_iter()
        .map(|(id, code)| (normalized_sub_product_code(&code).to_string(), id))
        .collect();
    debug!("Matching CEPLAN rows against {} normalized codes", lookup.len());

    let now = Utc::now().naive_utc();
    let mut processed_count = 0;
    for row in rows {
        let code = row.code.trim();
        if code.is_empty() {
            continue;
        }
        let Some(&sub_product_id) = lookup.get(normalized_sub_product_code(code)) else {
            warn!(
                "CEPLAN sub-product '{}' has no match in the database, skipping",
                code
            );
            continue;
        };
        upsert_ceplan_schedule(
            conn,
            sub_product_id,
            year,
            CeplanScheduleValuesDB::new(&row.programmed.filled(), &row.executed.filled()),
            now,
        )?;
        processed_count += 1;
    }

    Ok(CeplanImportResult { processed_count })
}

#[async_trait]
impl ImportRepositoryTrait for ImportRepository {
    async fn store_ppr(&self, extraction: PprExtraction) -> Result<PprImportResult> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| store_tree(conn, &extraction))
            .await
    }

    async fn store_ceplan(
        &self,
        sub_products: Vec<ExtractedSubProduct>,
        year: i32,
    ) -> Result<CeplanImportResult> {
        if sub_products.is_empty() {
            info!("CEPLAN import without sub-products, nothing to store");
            return Ok(CeplanImportResult { processed_count: 0 });
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| {
                store_ceplan_rows(conn, &sub_products, year)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pprs::PprRepository;
    use crate::schedules::ScheduleRepository;
    use crate::test_support::{setup, TestDb};
    use monitor_ppr_core::extraction::{ExtractedActivity, ExtractedProduct, ProgramInfo};
    use monitor_ppr_core::pprs::PprRepositoryTrait;
    use monitor_ppr_core::schedules::{Month, MonthlyValues, ScheduleRepositoryTrait};

    fn sub(code: &str, target: f64) -> ExtractedSubProduct {
        let mut programmed = MonthlyValues::default();
        programmed.set(Month::Ene, Some(target / 2.0));
        programmed.set(Month::Feb, Some(target / 2.0));
        ExtractedSubProduct {
            code: code.to_string(),
            name: format!("Sub {code}"),
            unit_of_measure: String::new(),
            annual_target: target,
            programmed,
            executed: MonthlyValues::default(),
            warnings: Vec::new(),
        }
    }

    fn extraction(name: &str, subs: Vec<ExtractedSubProduct>) -> PprExtraction {
        PprExtraction {
            ppr: ProgramInfo {
                code: "0017".to_string(),
                name: name.to_string(),
                year: 2025,
            },
            products: vec![
                ExtractedProduct {
                    code: "3043997".to_string(),
                    name: "Familias saludables".to_string(),
                    activities: vec![ExtractedActivity {
                        code: "5005560".to_string(),
                        name: "Vigilancia".to_string(),
                        sub_products: subs,
                    }],
                },
                ExtractedProduct {
                    code: String::new(),
                    name: "Sin código".to_string(),
                    activities: Vec::new(),
                },
            ],
            logs: Vec::new(),
        }
    }

    fn schedules_of(db: &TestDb, ppr_id: i32) -> Vec<monitor_ppr_core::schedules::PprSchedule> {
        let pprs = PprRepository::new(db.pool.clone(), db.writer.clone());
        let ids: Vec<i32> = pprs
            .load_hierarchy(ppr_id)
            .unwrap()
            .sub_products
            .iter()
            .map(|s| s.id)
            .collect();
        ScheduleRepository::new(db.pool.clone(), db.writer.clone())
            .ppr_schedules_for(&ids)
            .unwrap()
    }

    #[tokio::test]
    async fn reimport_updates_names_and_keeps_existing_schedules() {
        let db = setup().await;
        let repo = ImportRepository::new(db.writer.clone());

        let first = repo
            .store_ppr(extraction("Metaxénicas", vec![sub("0001", 10.0), sub("", 5.0)]))
            .await
            .unwrap();
        assert_eq!(first.products_count, 1);
        let stored = schedules_of(&db, first.ppr_id);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].annual_target, Some(10.0));
        assert_eq!(stored[0].programmed.get(Month::Ene), Some(5.0));
        assert_eq!(stored[0].programmed.get(Month::Dic), Some(0.0));

        let second = repo
            .store_ppr(extraction(
                "Enfermedades metaxénicas",
                vec![sub("0001", 99.0), sub("0002", 4.0)],
            ))
            .await
            .unwrap();
        assert_eq!(second.ppr_id, first.ppr_id);

        let pprs = PprRepository::new(db.pool.clone(), db.writer.clone());
        let ppr = pprs.get_by_id(first.ppr_id).unwrap();
        assert_eq!(ppr.name, "Enfermedades metaxénicas");
        let hierarchy = pprs.load_hierarchy(first.ppr_id).unwrap();
        assert_eq!(hierarchy.sub_products[0].unit_of_measure, DEFAULT_UNIT_OF_MEASURE);

        let stored = schedules_of(&db, first.ppr_id);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].annual_target, Some(10.0));
        assert_eq!(stored[1].annual_target, Some(4.0));
    }

    #[tokio::test]
    async fn ceplan_rows_match_ignoring_leading_zeros() {
        let db = setup().await;
        let repo = ImportRepository::new(db.writer.clone());
        let stored = repo
            .store_ppr(extraction("Metaxénicas", vec![sub("0001", 10.0), sub("0215", 3.0)]))
            .await
            .unwrap();

        let result = repo
            .store_ceplan(vec![sub("1", 8.0), sub("215", 2.0), sub("777", 1.0)], 2025)
            .await
            .unwrap();
        assert_eq!(result.processed_count, 2);

        // A second import overwrites the same rows.
        let again = repo.store_ceplan(vec![sub("00001", 6.0)], 2025).await.unwrap();
        assert_eq!(again.processed_count, 1);

        let pprs = PprRepository::new(db.pool.clone(), db.writer.clone());
        let ids: Vec<i32> = pprs
            .load_hierarchy(stored.ppr_id)
            .unwrap()
            .sub_products
            .iter()
            .map(|s| s.id)
            .collect();
        let ceplan = ScheduleRepository::new(db.pool.clone(), db.writer.clone())
            .ceplan_schedules_for(&ids)
            .unwrap();
        assert_eq!(ceplan.len(), 2);
        assert_eq!(ceplan[0].annual_target(), 6.0);
        assert!(ceplan[0].updated_at.is_some());
        assert_eq!(ceplan[1].annual_target(), 2.0);

        assert_eq!(repo.store_ceplan(Vec::new(), 2025).await.unwrap().processed_count, 0);
    }
}
