use async_trait::async_trait;

use super::users_model::{NewUser, NewUserRecord, PasswordChange, Role, User, UserUpdate};
use crate::errors::Result;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<User>>;
    fn get_by_id(&self, user_id: i32) -> Result<User>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    fn list_active_by_role(&self, role: Role) -> Result<Vec<User>>;
    fn count(&self) -> Result<i64>;
    async fn create(&self, record: NewUserRecord) -> Result<User>;
    async fn update(&self, user_id: i32, update: UserUpdate) -> Result<User>;
    async fn set_password_hash(&self, user_id: i32, password_hash: String) -> Result<()>;
    async fn delete(&self, user_id: i32) -> Result<usize>;
}

/// Password hashing backend. The server supplies the argon2 implementation.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, password_hash: &str) -> Result<bool>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn list_users(&self) -> Result<Vec<User>>;
    fn get_user(&self, user_id: i32) -> Result<User>;
    fn list_active_ppr_managers(&self) -> Result<Vec<User>>;
    /// Checks credentials for login. Inactive accounts are rejected after the
    /// password matches.
    fn authenticate(&self, email: &str, password: &str) -> Result<User>;
    /// Loads the account behind a token subject, rejecting inactive users.
    fn resolve_active(&self, user_id: i32) -> Result<User>;
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
    async fn update_user(&self, user_id: i32, update: UserUpdate) -> Result<User>;
    async fn delete_user(&self, user_id: i32) -> Result<()>;
    async fn change_password(&self, actor: &User, user_id: i32, change: PasswordChange)
        -> Result<()>;
    /// Creates the primary administrator when no account exists yet.
    async fn ensure_bootstrap_admin(&self, name: &str, password: &str) -> Result<Option<User>>;
}
