use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use monitor_ppr_core::pprs::{
    Activity, NewPpr, Ppr, PprHierarchy, PprRepositoryTrait, Product, SubProduct,
};
use monitor_ppr_core::Result;

use super::model::{
    ActivityDB, NewActivityDB, NewPprDB, NewProductDB, NewSubProductDB, PprChangesDB, PprDB,
    ProductDB, SubProductDB,
};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{activities, pprs, products, sub_products};
use crate::utils::chunk_for_sqlite;

/// Inserts the product or refreshes the name of the existing one.
pub(crate) fn upsert_product(
    conn: &mut SqliteConnection,
    ppr_id: i32,
    code: &str,
    name: &str,
) -> Result<ProductDB> {
    let existing = products::table
        .filter(products::ppr_id.eq(ppr_id))
        .filter(products::code.eq(code))
        .first::<ProductDB>(conn)
        .optional()
        .map_err(StorageError::from)?;

    let product = match existing {
        Some(product) => diesel::update(products::table.find(product.id))
            .set(products::name.eq(name))
            .returning(ProductDB::as_returning())
            .get_result(conn),
        None => diesel::insert_into(products::table)
            .values(NewProductDB { ppr_id, code, name })
            .returning(ProductDB::as_returning())
            .get_result(conn),
    };
    Ok(product.map_err(StorageError::from)?)
}

/// Inserts the activity or refreshes the name of the existing one.
pub(crate) fn upsert_activity(
    conn: &mut SqliteConnection,
    product_id: i32,
    code: &str,
    name: &str,
) -> Result<ActivityDB> {
    let existing = activities::table
        .filter(activities::product_id.eq(product_id))
        .filter(activities::code.eq(code))
        .first::<ActivityDB>(conn)
        .optional()
        .map_err(StorageError::from)?;

    let activity = match existing {
        Some(activity) => diesel::update(activities::table.find(activity.id))
            .set(activities::name.eq(name))
            .returning(ActivityDB::as_returning())
            .get_result(conn),
        None => diesel::insert_into(activities::table)
            .values(NewActivityDB {
                product_id,
                code,
                name,
            })
            .returning(ActivityDB::as_returning())
            .get_result(conn),
    };
    Ok(activity.map_err(StorageError::from)?)
}

pub(crate) enum SubProductUpsert {
    Created(SubProductDB),
    Updated(SubProductDB),
}

/// Inserts the sub-product or refreshes name and unit of the existing one.
pub(crate) fn upsert_sub_product(
    conn: &mut SqliteConnection,
    activity_id: i32,
    code: &str,
    name: &str,
    unit_of_measure: &str,
) -> Result<SubProductUpsert> {
    let existing = sub_products::table
        .filter(sub_products::activity_id.eq(activity_id))
        .filter(sub_products::code.eq(code))
        .first::<SubProductDB>(conn)
        .optional()
        .map_err(StorageError::from)?;

    Ok(match existing {
        Some(sub) => SubProductUpsert::Updated(
            diesel::update(sub_products::table.find(sub.id))
                .set((
                    sub_products::name.eq(name),
                    sub_products::unit_of_measure.eq(unit_of_measure),
                ))
                .returning(SubProductDB::as_returning())
                .get_result(conn)
                .map_err(StorageError::from)?,
        ),
        None => SubProductUpsert::Created(
            diesel::insert_into(sub_products::table)
                .values(NewSubProductDB {
                    activity_id,
                    code,
                    name,
                    unit_of_measure,
                })
                .returning(SubProductDB::as_returning())
                .get_result(conn)
                .map_err(StorageError::from)?,
        ),
    })
}

pub struct PprRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PprRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PprRepository { pool, writer }
    }
}

#[async_trait]
impl PprRepositoryTrait for PprRepository {
    fn list(&self) -> Result<Vec<Ppr>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = pprs::table
            .order((pprs::year.desc(), pprs::code.asc()))
            .select(PprDB::as_select())
            .load::<PprDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Ppr::from).collect())
    }

    fn list_by_ids(&self, ppr_ids: &[i32]) -> Result<Vec<Ppr>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(ppr_ids) {
            rows.extend(
                pprs::table
                    .filter(pprs::id.eq_any(chunk))
                    .select(PprDB::as_select())
                    .load::<PprDB>(&mut conn)
                    .map_err(StorageError::from)?,
            );
        }
        rows.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.code.cmp(&b.code)));
        Ok(rows.into_iter().map(Ppr::from).collect())
    }

    fn get_by_id(&self, ppr_id: i32) -> Result<Ppr> {
        let mut conn = get_connection(&self.pool)?;
        let row = pprs::table
            .find(ppr_id)
            .select(PprDB::as_select())
            .first::<PprDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(row.into())
    }

    fn find_by_code_and_year(&self, code: &str, year: i32) -> Result<Option<Ppr>> {
        let mut conn = get_connection(&self.pool)?;
        let row = pprs::table
            .filter(pprs::code.eq(code.trim()))
            .filter(pprs::year.eq(year))
            .select(PprDB::as_select())
            .first::<PprDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Ppr::from))
    }

    fn list_products(&self, ppr_id: i32) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = products::table
            .filter(products::ppr_id.eq(ppr_id))
            .order(products::id.asc())
            .load::<ProductDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn load_hierarchy(&self, ppr_id: i32) -> Result<PprHierarchy> {
        let mut conn = get_connection(&self.pool)?;
        let product_rows = products::table
            .filter(products::ppr_id.eq(ppr_id))
            .order(products::id.asc())
            .load::<ProductDB>(&mut conn)
            .map_err(StorageError::from)?;
        let activity_rows = ActivityDB::belonging_to(&product_rows)
            .order(activities::id.asc())
            .load::<ActivityDB>(&mut conn)
            .map_err(StorageError::from)?;
        let sub_product_rows = SubProductDB::belonging_to(&activity_rows)
            .order(sub_products::id.asc())
            .load::<SubProductDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(PprHierarchy {
            products: product_rows.into_iter().map(Product::from).collect(),
            activities: activity_rows.into_iter().map(Activity::from).collect(),
            sub_products: sub_product_rows.into_iter().map(SubProduct::from).collect(),
        })
    }

    fn get_sub_product(&self, sub_product_id: i32) -> Result<SubProduct> {
        let mut conn = get_connection(&self.pool)?;
        let row = sub_products::table
            .find(sub_product_id)
            .first::<SubProductDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(row.into())
    }

    async fn create(&self, new_ppr: NewPpr) -> Result<Ppr> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Ppr> {
                let row = diesel::insert_into(pprs::table)
                    .values(NewPprDB::from_domain(new_ppr, Utc::now().naive_utc()))
                    .returning(PprDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, ppr_id: i32, changes: NewPpr) -> Result<Ppr> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Ppr> {
                let row = diesel::update(pprs::table.find(ppr_id))
                    .set(PprChangesDB::from_domain(changes, Utc::now().naive_utc()))
                    .returning(PprDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, ppr_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(pprs::table.find(ppr_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn delete_by_year(&self, year: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(pprs::table.filter(pprs::year.eq(year)))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
