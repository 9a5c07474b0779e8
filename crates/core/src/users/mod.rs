//! Users module - accounts, roles, credentials and access gates.

pub mod access;
mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{NewUser, NewUserRecord, PasswordChange, Role, User, UserUpdate};
pub use users_service::UserService;
pub use users_traits::{CredentialHasher, UserRepositoryTrait, UserServiceTrait};
