use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use monitor_ppr_core::constants::DEFAULT_ADMIN_EMAIL;

/// One year.
const MAX_TOKEN_TTL_MINUTES: u64 = 365 * 24 * 60;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// Root for `staging/` and `uploads/`.
    pub data_dir: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    /// Raw HS256 key; a random one is generated at start-up when unset.
    pub secret_key: Option<String>,
    pub token_ttl: Duration,
    pub admin_email: String,
    pub admin_password: Option<String>,
    pub admin_name: String,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests never touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = var("PPR_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid PPR_LISTEN_ADDR")?;
        let db_path = var("PPR_DB_PATH").unwrap_or_else(|| "./db/monitor_ppr.db".into());
        let data_dir = match var("PPR_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => Path::new(&db_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
        };
        let cors_allow = var("PPR_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = match var("PPR_REQUEST_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("Invalid PPR_REQUEST_TIMEOUT_MS")?,
            None => 30_000,
        };
        let ttl_minutes: u64 = match var("PPR_TOKEN_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("Invalid PPR_TOKEN_TTL_MINUTES")?,
            None => 30,
        };
        let ttl_secs = ttl_minutes
            .checked_mul(60)
            .filter(|_| (1..=MAX_TOKEN_TTL_MINUTES).contains(&ttl_minutes))
            .with_context(|| {
                format!("PPR_TOKEN_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}")
            })?;

        Ok(Self {
            listen_addr,
            db_path,
            data_dir,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir: var("PPR_STATIC_DIR").unwrap_or_else(|| "static".into()),
            secret_key: var("PPR_SECRET_KEY"),
            token_ttl: Duration::from_secs(ttl_secs),
            admin_email: var("PPR_ADMIN_EMAIL")
                .map(|e| e.trim().to_lowercase())
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            admin_password: var("PPR_ADMIN_PASSWORD"),
            admin_name: var("PPR_ADMIN_NAME").unwrap_or_else(|| "Administrador".into()),
            catalog_path: var("PPR_CATALOG_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.db_path, "./db/monitor_ppr.db");
        assert_eq!(cfg.data_dir, PathBuf::from("./db"));
        assert_eq!(cfg.cors_allow, vec!["*".to_string()]);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.token_ttl, Duration::from_secs(30 * 60));
        assert_eq!(cfg.admin_email, DEFAULT_ADMIN_EMAIL);
        assert!(cfg.secret_key.is_none());
        assert!(cfg.admin_password.is_none());
    }

    #[test]
    fn data_dir_follows_the_database_unless_overridden() {
        let cfg = config(&[("PPR_DB_PATH", "/var/lib/ppr/app.db")]).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/ppr"));

        let cfg = config(&[("PPR_DB_PATH", "app.db")]).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("."));

        let cfg = config(&[
            ("PPR_DB_PATH", "/var/lib/ppr/app.db"),
            ("PPR_DATA_DIR", "/srv/ppr"),
        ])
        .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/ppr"));
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[("PPR_LISTEN_ADDR", "not-an-address")]).is_err());
        assert!(config(&[("PPR_REQUEST_TIMEOUT_MS", "soon")]).is_err());
        assert!(config(&[("PPR_TOKEN_TTL_MINUTES", "0")]).is_err());
        assert!(config(&[("PPR_TOKEN_TTL_MINUTES", "307445734561825860")]).is_err());
        assert!(config(&[("PPR_TOKEN_TTL_MINUTES", &u64::MAX.to_string())]).is_err());
        let cfg = config(&[("PPR_TOKEN_TTL_MINUTES", "525600")]).unwrap();
        assert_eq!(cfg.token_ttl, Duration::from_secs(525_600 * 60));
    }

    #[test]
    fn cors_list_is_split_and_trimmed() {
        let cfg = config(&[(
            "PPR_CORS_ALLOW_ORIGINS",
            "https://a.example, https://b.example ,",
        )])
        .unwrap();
        assert_eq!(
            cfg.cors_allow,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}
