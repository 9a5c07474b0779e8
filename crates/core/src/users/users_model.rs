//! User and role models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{USER_EMAIL_MAX_LEN, USER_NAME_MAX_LEN};
use crate::errors::{Error, Result};

/// Application role. Stored by its internal name; shown by its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ResponsablePpr,
    ResponsablePlanificacion,
}

impl Role {
    pub const ALL: [Role; 3] = [
        Role::Admin,
        Role::ResponsablePpr,
        Role::ResponsablePlanificacion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ResponsablePpr => "responsable_ppr",
            Role::ResponsablePlanificacion => "responsable_planificacion",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::ResponsablePpr => "Responsable PPR",
            Role::ResponsablePlanificacion => "Responsable Planificación",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts either the internal name or the display name.
impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| {
                r.as_str().eq_ignore_ascii_case(trimmed)
                    || r.display_name().to_lowercase() == trimmed.to_lowercase()
            })
            .ok_or_else(|| Error::invalid(format!("Rol inválido: {trimmed}")))
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Account creation input, carrying the plain password until it is hashed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
}

/// Partial update of an account; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: Option<String>,
    pub new_password: String,
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("El nombre es obligatorio"));
    }
    if name.chars().count() > USER_NAME_MAX_LEN {
        return Err(Error::invalid(format!(
            "El nombre no puede exceder {USER_NAME_MAX_LEN} caracteres"
        )));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !well_formed {
        return Err(Error::invalid("El email no es válido"));
    }
    if email.chars().count() > USER_EMAIL_MAX_LEN {
        return Err(Error::invalid(format!(
            "El email no puede exceder {USER_EMAIL_MAX_LEN} caracteres"
        )));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::invalid("La contraseña es obligatoria"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_internal_and_display_names() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Administrador".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(
            "responsable planificación".parse::<Role>().unwrap(),
            Role::ResponsablePlanificacion
        );
        assert_eq!(
            "Responsable PPR".parse::<Role>().unwrap(),
            Role::ResponsablePpr
        );
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_with_internal_name() {
        let json = serde_json::to_string(&Role::ResponsablePpr).unwrap();
        assert_eq!(json, "\"responsable_ppr\"");
        let parsed: Role = serde_json::from_str("\"Responsable Planificación\"").unwrap();
        assert_eq!(parsed, Role::ResponsablePlanificacion);
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("ana@example.org").is_ok());
        assert!(validate_email("ana").is_err());
        assert!(validate_email("@example.org").is_err());
    }
}
