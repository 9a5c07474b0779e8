use log::info;
use std::sync::Arc;

use super::assignments_traits::{AssignmentRepositoryTrait, AssignmentServiceTrait};
use crate::errors::{Error, Result};
use crate::pprs::{ppr_not_found, Ppr, PprRepositoryTrait};
use crate::users::{Role, User, UserRepositoryTrait};

pub struct AssignmentService {
    repository: Arc<dyn AssignmentRepositoryTrait>,
    pprs: Arc<dyn PprRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
}

impl AssignmentService {
    pub fn new(
        repository: Arc<dyn AssignmentRepositoryTrait>,
        pprs: Arc<dyn PprRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            pprs,
            users,
        }
    }

    fn load_user(&self, user_id: i32) -> Result<User> {
        self.users.get_by_id(user_id).map_err(|e| {
            if e.is_not_found() {
                Error::not_found("Usuario no encontrado")
            } else {
                e
            }
        })
    }
}

#[async_trait::async_trait]
impl AssignmentServiceTrait for AssignmentService {
    fn list_ppr_managers(&self) -> Result<Vec<User>> {
        self.users.list_active_by_role(Role::ResponsablePpr)
    }

    fn managers_of(&self, ppr_id: i32) -> Result<Vec<User>> {
        self.pprs.get_by_id(ppr_id).map_err(ppr_not_found)?;
        self.repository.users_for_ppr(ppr_id)
    }

    async fn assign(&self, ppr_id: i32, user_id: i32) -> Result<()> {
        self.pprs.get_by_id(ppr_id).map_err(ppr_not_found)?;
        let user = self.load_user(user_id)?;
        if user.role != Role::ResponsablePpr {
            return Err(Error::invalid(
                "El usuario no tiene el rol de Responsable PPR",
            ));
        }
        if self.repository.exists(user_id, ppr_id)? {
            return Err(Error::ConstraintViolation(
                "El usuario ya está asignado a este PPR".to_string(),
            ));
        }
        self.repository.assign(user_id, ppr_id).await?;
        info!("Assigned user {} to PPR {}", user.email, ppr_id);
        Ok(())
    }

    async fn unassign(&self, ppr_id: i32, user_id: i32) -> Result<()> {
        if self.repository.unassign(user_id, ppr_id).await? == 0 {
            return Err(Error::not_found("Asignación no encontrada"));
        }
        info!("Removed user {} from PPR {}", user_id, ppr_id);
        Ok(())
    }

    fn visible_pprs(&self, user: &User) -> Result<Vec<Ppr>> {
        if user.is_admin() {
            return self.pprs.list();
        }
        let ids = self.repository.ppr_ids_for_user(user.id)?;
        self.pprs.list_by_ids(&ids)
    }

    fn can_view(&self, user: &User, ppr_id: i32) -> Result<bool> {
        if user.is_admin() {
            return Ok(true);
        }
        self.repository.exists(user.id, ppr_id)
    }
}
