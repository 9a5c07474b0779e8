//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use monitor_ppr_core::users::{NewUserRecord, User, UserUpdate};
use monitor_ppr_core::Error;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Partial update; `None` fields keep their stored value.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangesDB {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TryFrom<UserDB> for User {
    type Error = Error;

    fn try_from(db: UserDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            name: db.name,
            email: db.email,
            role: db.role.parse()?,
            password_hash: db.password_hash,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl NewUserDB {
    pub fn from_domain(record: NewUserRecord, now: NaiveDateTime) -> Self {
        Self {
            name: record.name.trim().to_string(),
            email: record.email.trim().to_lowercase(),
            role: record.role.as_str().to_string(),
            password_hash: record.password_hash,
            is_active: record.is_active,
            created_at: now,
        }
    }
}

impl UserChangesDB {
    pub fn from_domain(update: UserUpdate, now: NaiveDateTime) -> Self {
        Self {
            name: update.name.map(|n| n.trim().to_string()),
            email: update.email.map(|e| e.trim().to_lowercase()),
            role: update.role.map(|r| r.as_str().to_string()),
            is_active: update.is_active,
            updated_at: Some(now),
        }
    }
}
