use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use monitor_ppr_core::assignments::AssignmentRepositoryTrait;
use monitor_ppr_core::users::User;
use monitor_ppr_core::Result;

use super::model::AssignmentDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{ppr_assignments, users};
use crate::users::UserDB;

pub struct AssignmentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AssignmentRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        AssignmentRepository { pool, writer }
    }
}

#[async_trait]
impl AssignmentRepositoryTrait for AssignmentRepository {
    fn ppr_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(ppr_assignments::table
            .filter(ppr_assignments::user_id.eq(user_id))
            .select(ppr_assignments::ppr_id)
            .order(ppr_assignments::ppr_id.asc())
            .load::<i32>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn users_for_ppr(&self, ppr_id: i32) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .inner_join(ppr_assignments::table)
            .filter(ppr_assignments::ppr_id.eq(ppr_id))
            .order(users::name.asc())
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(User::try_from).collect()
    }

    fn exists(&self, user_id: i32, ppr_id: i32) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::select(diesel::dsl::exists(
            ppr_assignments::table.find((user_id, ppr_id)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(StorageError::from)?)
    }

    async fn assign(&self, user_id: i32, ppr_id: i32) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(ppr_assignments::table)
                    .values(AssignmentDB { user_id, ppr_id })
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn unassign(&self, user_id: i32, ppr_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(
                    diesel::delete(ppr_assignments::table.find((user_id, ppr_id)))
                        .execute(conn)
                        .map_err(StorageError::from)?,
                )
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;
    use crate::users::UserRepository;
    use monitor_ppr_core::users::{NewUserRecord, Role, UserRepositoryTrait};

    #[tokio::test]
    async fn assignments_follow_users_and_programs() {
        let db = setup().await;
        let users = UserRepository::new(db.pool.clone(), db.writer.clone());
        let repo = AssignmentRepository::new(db.pool.clone(), db.writer.clone());

        let user = users
            .create(NewUserRecord {
                name: "Luis Mamani".into(),
                email: "luis@x.pe".into(),
                role: Role::ResponsablePpr,
                password_hash: "hash".into(),
                is_active: true,
            })
            .await
            .unwrap();
        let first = db.insert_ppr("0017", 2025);
        let second = db.insert_ppr("0068", 2025);

        repo.assign(user.id, second).await.unwrap();
        repo.assign(user.id, first).await.unwrap();
        assert!(repo.assign(user.id, first).await.is_err());
        assert!(repo.assign(user.id, 999).await.is_err());

        assert_eq!(repo.ppr_ids_for_user(user.id).unwrap(), vec![first, second]);
        assert!(repo.exists(user.id, first).unwrap());
        let managers = repo.users_for_ppr(first).unwrap();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].email, "luis@x.pe");

        assert_eq!(repo.unassign(user.id, first).await.unwrap(), 1);
        assert_eq!(repo.unassign(user.id, first).await.unwrap(), 0);
        assert!(!repo.exists(user.id, first).unwrap());

        users.delete(user.id).await.unwrap();
        assert!(repo.users_for_ppr(second).unwrap().is_empty());
    }
}
