//! Role gates shared by every entry point.
//!
//! Administrators pass every gate.

use super::users_model::{Role, User};
use crate::errors::{Error, Result};

fn ensure_role(user: &User, allowed: &[Role]) -> Result<()> {
    if user.is_admin() || allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(Error::forbidden(
            "No tiene permisos suficientes para realizar esta acción",
        ))
    }
}

pub fn ensure_admin(user: &User) -> Result<()> {
    ensure_role(user, &[])
}

/// Program managers own PPR data: uploads, catalogue edits and progress.
pub fn ensure_ppr_manager(user: &User) -> Result<()> {
    ensure_role(user, &[Role::ResponsablePpr])
}

/// Planning managers own the CEPLAN and service portfolio datasets.
pub fn ensure_planning_manager(user: &User) -> Result<()> {
    ensure_role(user, &[Role::ResponsablePlanificacion])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn user(role: Role) -> User {
        User {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.org".into(),
            role,
            password_hash: String::new(),
            is_active: true,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn admin_passes_every_gate() {
        let admin = user(Role::Admin);
        assert!(ensure_admin(&admin).is_ok());
        assert!(ensure_ppr_manager(&admin).is_ok());
        assert!(ensure_planning_manager(&admin).is_ok());
    }

    #[test]
    fn managers_are_confined_to_their_area() {
        let ppr = user(Role::ResponsablePpr);
        let planning = user(Role::ResponsablePlanificacion);
        assert!(ensure_ppr_manager(&ppr).is_ok());
        assert!(matches!(
            ensure_planning_manager(&ppr),
            Err(Error::PermissionDenied(_))
        ));
        assert!(ensure_planning_manager(&planning).is_ok());
        assert!(ensure_ppr_manager(&planning).is_err());
        assert!(ensure_admin(&planning).is_err());
    }
}
