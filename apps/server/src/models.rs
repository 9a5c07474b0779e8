use chrono::{Datelike, NaiveDateTime};
use monitor_ppr_core::users::User;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Account as shown to clients: the role travels by its display name.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role.display_name().to_string(),
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRoleResponse {
    pub role: String,
    pub role_display: String,
    pub user_id: i32,
    pub name: String,
    pub email: String,
}

impl From<&User> for CurrentRoleResponse {
    fn from(u: &User) -> Self {
        Self {
            role: u.role.as_str().to_string(),
            role_display: u.role.display_name().to_string(),
            user_id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
    pub deleted_count: usize,
}

/// `{data, message}` envelope used by list and detail endpoints.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    pub message: String,
}

impl<T> DataResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            total_count: None,
            message: message.into(),
        }
    }

    pub fn counted(data: T, total_count: usize, message: impl Into<String>) -> Self {
        Self {
            data,
            total_count: Some(total_count),
            message: message.into(),
        }
    }
}

/// A staged upload read back before committing.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse<T> {
    pub preview_id: String,
    pub data: T,
    pub message: String,
}

/// Outcome of committing a staged upload.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse<T> {
    pub preview_id: String,
    pub result: T,
    pub message: String,
}

/// `?anio=` on commits and bulk operations; the current year when absent.
#[derive(Deserialize, IntoParams, Debug, Default, Clone, Copy)]
pub struct YearQuery {
    pub anio: Option<i32>,
}

impl YearQuery {
    pub fn year_or_current(&self) -> i32 {
        self.anio.unwrap_or_else(current_year)
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().date_naive().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use monitor_ppr_core::users::Role;

    fn user() -> User {
        User {
            id: 3,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::ResponsablePlanificacion,
            password_hash: "$argon2id$secret".into(),
            is_active: true,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn user_response_uses_display_role_and_hides_the_hash() {
        let json = serde_json::to_value(UserResponse::from(user())).unwrap();
        assert_eq!(json["role"], "Responsable Planificación");
        assert_eq!(json["isActive"], true);
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn current_role_carries_both_role_names() {
        let json = serde_json::to_value(CurrentRoleResponse::from(&user())).unwrap();
        assert_eq!(json["role"], "responsable_planificacion");
        assert_eq!(json["roleDisplay"], "Responsable Planificación");
        assert_eq!(json["userId"], 3);
    }
}
