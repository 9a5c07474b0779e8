use log::{debug, info};
use std::sync::Arc;

use super::users_model::{
    validate_email, validate_name, validate_password, NewUser, NewUserRecord, PasswordChange,
    Role, User, UserUpdate,
};
use super::users_traits::{CredentialHasher, UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result};

const INVALID_CREDENTIALS: &str = "Correo electrónico o contraseña incorrectos";
const EMAIL_TAKEN: &str = "El email ya está registrado";

/// Service for managing user accounts and credentials
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    hasher: Arc<dyn CredentialHasher>,
    primary_admin_email: String,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        hasher: Arc<dyn CredentialHasher>,
        primary_admin_email: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            hasher,
            primary_admin_email: primary_admin_email.into(),
        }
    }

    fn ensure_email_available(&self, email: &str, except: Option<i32>) -> Result<()> {
        match self.repository.find_by_email(email)? {
            Some(existing) if Some(existing.id) != except => Err(Error::invalid(EMAIL_TAKEN)),
            _ => Ok(()),
        }
    }

    fn load(&self, user_id: i32) -> Result<User> {
        self.repository.get_by_id(user_id).map_err(|e| {
            if e.is_not_found() {
                Error::not_found("Usuario no encontrado")
            } else {
                e
            }
        })
    }
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    fn list_users(&self) -> Result<Vec<User>> {
        self.repository.list()
    }

    fn get_user(&self, user_id: i32) -> Result<User> {
        self.load(user_id)
    }

    fn list_active_ppr_managers(&self) -> Result<Vec<User>> {
        self.repository.list_active_by_role(Role::ResponsablePpr)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .repository
            .find_by_email(email.trim())?
            .ok_or_else(|| Error::Unauthenticated(INVALID_CREDENTIALS.to_string()))?;
        if !self.hasher.verify(password, &user.password_hash)? {
            debug!("Rejected login for {}", user.email);
            return Err(Error::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }
        if !user.is_active {
            return Err(Error::invalid("Usuario inactivo"));
        }
        Ok(user)
    }

    fn resolve_active(&self, user_id: i32) -> Result<User> {
        let user = self.repository.get_by_id(user_id).map_err(|e| {
            if e.is_not_found() {
                Error::Unauthenticated("No se pudieron validar las credenciales".to_string())
            } else {
                e
            }
        })?;
        if !user.is_active {
            return Err(Error::invalid("Usuario inactivo"));
        }
        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        validate_name(&new_user.name)?;
        validate_email(&new_user.email)?;
        validate_password(&new_user.password)?;
        let email = new_user.email.trim().to_string();
        self.ensure_email_available(&email, None)?;

        let record = NewUserRecord {
            name: new_user.name.trim().to_string(),
            email,
            role: new_user.role,
            password_hash: self.hasher.hash(&new_user.password)?,
            is_active: new_user.is_active,
        };
        let user = self.repository.create(record).await?;
        info!("Created user {} with role {}", user.email, user.role);
        Ok(user)
    }

    async fn update_user(&self, user_id: i32, mut update: UserUpdate) -> Result<User> {
        self.load(user_id)?;
        if let Some(name) = update.name.as_mut() {
            validate_name(name)?;
            *name = name.trim().to_string();
        }
        if let Some(email) = update.email.as_mut() {
            validate_email(email)?;
            *email = email.trim().to_string();
            self.ensure_email_available(email, Some(user_id))?;
        }
        self.repository.update(user_id, update).await
    }

    async fn delete_user(&self, user_id: i32) -> Result<()> {
        let user = self.load(user_id)?;
        if user.is_admin() && user.email.eq_ignore_ascii_case(&self.primary_admin_email) {
            return Err(Error::invalid(
                "No se puede eliminar el administrador principal",
            ));
        }
        self.repository.delete(user_id).await?;
        info!("Deleted user {}", user.email);
        Ok(())
    }

    async fn change_password(
        &self,
        actor: &User,
        user_id: i32,
        change: PasswordChange,
    ) -> Result<()> {
        let target = self.load(user_id)?;
        validate_password(&change.new_password)?;

        if !actor.is_admin() {
            let current = match change.current_password.as_deref() {
                Some(current) if actor.id == target.id => current,
                _ => {
                    return Err(Error::forbidden(
                        "No tiene permisos para cambiar la contraseña de este usuario",
                    ))
                }
            };
            if !self.hasher.verify(current, &target.password_hash)? {
                return Err(Error::invalid("La contraseña actual es incorrecta"));
            }
        }

        let hash = self.hasher.hash(&change.new_password)?;
        self.repository.set_password_hash(target.id, hash).await
    }

    async fn ensure_bootstrap_admin(&self, name: &str, password: &str) -> Result<Option<User>> {
        if self.repository.count()? > 0 {
            return Ok(None);
        }
        let admin = self
            .create_user(NewUser {
                name: name.to_string(),
                email: self.primary_admin_email.clone(),
                password: password.to_string(),
                role: Role::Admin,
                is_active: true,
            })
            .await?;
        Ok(Some(admin))
    }
}
