use async_trait::async_trait;

use crate::errors::Result;
use crate::pprs::Ppr;
use crate::users::User;

/// Trait for user-to-program assignment storage
#[async_trait]
pub trait AssignmentRepositoryTrait: Send + Sync {
    fn ppr_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>>;
    fn users_for_ppr(&self, ppr_id: i32) -> Result<Vec<User>>;
    fn exists(&self, user_id: i32, ppr_id: i32) -> Result<bool>;
    async fn assign(&self, user_id: i32, ppr_id: i32) -> Result<()>;
    async fn unassign(&self, user_id: i32, ppr_id: i32) -> Result<usize>;
}

/// Trait for assignment service operations
#[async_trait]
pub trait AssignmentServiceTrait: Send + Sync {
    fn list_ppr_managers(&self) -> Result<Vec<User>>;
    fn managers_of(&self, ppr_id: i32) -> Result<Vec<User>>;
    async fn assign(&self, ppr_id: i32, user_id: i32) -> Result<()>;
    async fn unassign(&self, ppr_id: i32, user_id: i32) -> Result<()>;
    /// Programs the user may see: all of them for administrators, the
    /// assigned ones otherwise.
    fn visible_pprs(&self, user: &User) -> Result<Vec<Ppr>>;
    fn can_view(&self, user: &User, ppr_id: i32) -> Result<bool>;
}
