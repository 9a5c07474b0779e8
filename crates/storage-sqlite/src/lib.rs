//! SQLite storage implementation for Monitor PPR.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `monitor-ppr-core` and contains:
//! - Database connection pooling and the single writer actor
//! - Embedded Diesel migrations
//! - Repository implementations for programs, schedules, users, assignments,
//!   the service portfolio, committed imports and comparison results
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate and the server are database-agnostic and work with traits.
//!
//! ```text
//!     server (HTTP)
//!          │
//!          ▼
//!     core (domain) ◄── traits
//!          │
//!          ▼
//!  storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod assignments;
pub mod cartera;
pub mod comparison;
pub mod imports;
pub mod pprs;
pub mod schedules;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, ping, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use assignments::AssignmentRepository;
pub use cartera::CarteraRepository;
pub use comparison::ComparisonRepository;
pub use imports::ImportRepository;
pub use pprs::PprRepository;
pub use schedules::ScheduleRepository;
pub use users::UserRepository;

// Re-export from monitor-ppr-core for convenience
pub use monitor_ppr_core::errors::{DatabaseError, Error, Result};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use diesel::prelude::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::db::{self, DbPool, WriteHandle};
    use crate::schema::{activities, pprs, products, sub_products};

    /// A migrated database in a temporary directory plus its writer.
    pub struct TestDb {
        pub pool: Arc<DbPool>,
        pub writer: WriteHandle,
        _dir: TempDir,
    }

    pub async fn setup() -> TestDb {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("monitor.db");
        let url = db::init(path.to_str().expect("utf-8 path")).expect("init");
        let pool = db::create_pool(&url).expect("pool");
        db::run_migrations(&pool).expect("migrations");
        let writer = db::spawn_writer((*pool).clone());
        TestDb {
            pool,
            writer,
            _dir: dir,
        }
    }

    impl TestDb {
        /// Inserts a bare active program and returns its id.
        pub fn insert_ppr(&self, code: &str, year: i32) -> i32 {
            let mut conn = self.pool.get().expect("connection");
            diesel::insert_into(pprs::table)
                .values((
                    pprs::code.eq(code),
                    pprs::name.eq(format!("Programa {code}")),
                    pprs::year.eq(year),
                    pprs::status.eq("activo"),
                    pprs::created_at.eq(Utc::now().naive_utc()),
                ))
                .returning(pprs::id)
                .get_result(&mut conn)
                .expect("insert program")
        }

        /// Inserts a program with one product, one activity and `count`
        /// sub-products. Returns the sub-product ids in code order.
        pub fn insert_sub_products(&self, code: &str, year: i32, count: usize) -> Vec<i32> {
            let ppr_id = self.insert_ppr(code, year);
            let mut conn = self.pool.get().expect("connection");
            let product_id: i32 = diesel::insert_into(products::table)
                .values((
                    products::ppr_id.eq(ppr_id),
                    products::code.eq("3000001"),
                    products::name.eq("Acciones comunes"),
                ))
                .returning(products::id)
                .get_result(&mut conn)
                .expect("insert product");
            let activity_id: i32 = diesel::insert_into(activities::table)
                .values((
                    activities::product_id.eq(product_id),
                    activities::code.eq("5000001"),
                    activities::name.eq("Monitoreo"),
                ))
                .returning(activities::id)
                .get_result(&mut conn)
                .expect("insert activity");
            (0..count)
                .map(|i| {
                    diesel::insert_into(sub_products::table)
                        .values((
                            sub_products::activity_id.eq(activity_id),
                            sub_products::code.eq(format!("{:04}", i + 1)),
                            sub_products::name.eq(format!("Sub-producto {}", i + 1)),
                            sub_products::unit_of_measure.eq("INFORME"),
                        ))
                        .returning(sub_products::id)
                        .get_result(&mut conn)
                        .expect("insert sub-product")
                })
                .collect()
        }
    }
}
