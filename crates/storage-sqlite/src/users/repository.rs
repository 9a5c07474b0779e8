use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use monitor_ppr_core::users::{NewUserRecord, Role, User, UserRepositoryTrait, UserUpdate};
use monitor_ppr_core::Result;

use super::model::{NewUserDB, UserChangesDB, UserDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::users;

fn to_users(rows: Vec<UserDB>) -> Result<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

pub struct UserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn list(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .order(users::id.asc())
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_users(rows)
    }

    fn get_by_id(&self, user_id: i32) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .map_err(StorageError::from)?
            .try_into()
    }

    /// Emails are stored lowercased, so the lookup ignores case.
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(User::try_from)
            .transpose()
    }

    fn list_active_by_role(&self, role: Role) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .filter(users::role.eq(role.as_str()))
            .filter(users::is_active.eq(true))
            .order(users::name.asc())
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_users(rows)
    }

    fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(users::table
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?)
    }

    async fn create(&self, record: NewUserRecord) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::insert_into(users::table)
                    .values(NewUserDB::from_domain(record, Utc::now().naive_utc()))
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?
                    .try_into()
            })
            .await
    }

    async fn update(&self, user_id: i32, update: UserUpdate) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                diesel::update(users::table.find(user_id))
                    .set(UserChangesDB::from_domain(update, Utc::now().naive_utc()))
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?
                    .try_into()
            })
            .await
    }

    async fn set_password_hash(&self, user_id: i32, password_hash: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(users::table.find(user_id))
                    .set((
                        users::password_hash.eq(password_hash),
                        users::updated_at.eq(Some(Utc::now().naive_utc())),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(StorageError::from(diesel::result::Error::NotFound).into());
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, user_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup;

    fn record(email: &str, role: Role, is_active: bool) -> NewUserRecord {
        NewUserRecord {
            name: "Rosa Quispe".to_string(),
            email: email.to_string(),
            role,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            is_active,
        }
    }

    #[tokio::test]
    async fn users_are_found_by_email_regardless_of_case() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool.clone(), db.writer.clone());
        assert_eq!(repo.count().unwrap(), 0);

        let user = repo
            .create(record("Rosa@Minsa.gob.pe", Role::ResponsablePpr, true))
            .await
            .unwrap();
        assert_eq!(user.email, "rosa@minsa.gob.pe");
        assert_eq!(
            repo.find_by_email("ROSA@minsa.gob.pe").unwrap().map(|u| u.id),
            Some(user.id)
        );
        assert!(repo
            .create(record("rosa@minsa.gob.pe", Role::Admin, true))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn partial_updates_and_role_listing() {
        let db = setup().await;
        let repo = UserRepository::new(db.pool.clone(), db.writer.clone());
        let active = repo
            .create(record("a@x.pe", Role::ResponsablePpr, true))
            .await
            .unwrap();
        repo.create(record("b@x.pe", Role::ResponsablePpr, false))
            .await
            .unwrap();
        repo.create(record("c@x.pe", Role::ResponsablePlanificacion, true))
            .await
            .unwrap();

        let managers = repo.list_active_by_role(Role::ResponsablePpr).unwrap();
        assert_eq!(managers.len(), 1);
        assert_eq!(managers[0].id, active.id);

        let updated = repo
            .update(
                active.id,
                UserUpdate {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.name, "Rosa Quispe");
        assert!(updated.updated_at.is_some());

        repo.set_password_hash(active.id, "other".into()).await.unwrap();
        assert_eq!(repo.get_by_id(active.id).unwrap().password_hash, "other");
        assert!(repo
            .set_password_hash(999, "x".into())
            .await
            .unwrap_err()
            .is_not_found());

        assert_eq!(repo.delete(active.id).await.unwrap(), 1);
        assert_eq!(repo.delete(active.id).await.unwrap(), 0);
    }
}
