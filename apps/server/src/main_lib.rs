use std::sync::Arc;
use std::time::Duration;

use crate::{
    auth::{decode_secret_key, Argon2Hasher, AuthManager},
    config::Config,
};
use rand::{rngs::OsRng, RngCore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use monitor_ppr_core::{
    assignments::{AssignmentService, AssignmentServiceTrait},
    cartera::{CarteraService, CarteraServiceTrait},
    comparison::{ComparisonService, ComparisonServiceTrait},
    dashboard::{DashboardService, DashboardServiceTrait},
    extraction::PprCatalog,
    imports::{ImportService, ImportServiceTrait},
    pprs::{PprService, PprServiceTrait},
    schedules::{ScheduleService, ScheduleServiceTrait},
    staging::{FileStagingStore, StagingStoreTrait},
    users::{UserService, UserServiceTrait},
};
use monitor_ppr_storage_sqlite::{
    db::{self, DbPool},
    AssignmentRepository, CarteraRepository, ComparisonRepository, ImportRepository,
    PprRepository, ScheduleRepository, UserRepository,
};

/// Previews nobody committed within a day are dropped at start-up.
const STAGING_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

pub struct AppState {
    pub ppr_service: Arc<dyn PprServiceTrait>,
    pub schedule_service: Arc<dyn ScheduleServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub assignment_service: Arc<dyn AssignmentServiceTrait>,
    pub cartera_service: Arc<dyn CarteraServiceTrait>,
    pub import_service: Arc<dyn ImportServiceTrait>,
    pub comparison_service: Arc<dyn ComparisonServiceTrait>,
    pub dashboard_service: Arc<dyn DashboardServiceTrait>,
    pub auth: Arc<AuthManager>,
    pub pool: Arc<DbPool>,
}

pub fn init_tracing() {
    let log_format = std::env::var("PPR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn signing_secret(config: &Config) -> anyhow::Result<Vec<u8>> {
    match &config.secret_key {
        Some(raw) => decode_secret_key(raw),
        None => {
            tracing::warn!(
                "PPR_SECRET_KEY is not set; using a random key, sessions end when the server restarts"
            );
            let mut bytes = vec![0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            Ok(bytes)
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!("Data directory: {}", config.data_dir.display());

    let ppr_repo = Arc::new(PprRepository::new(pool.clone(), writer.clone()));
    let schedule_repo = Arc::new(ScheduleRepository::new(pool.clone(), writer.clone()));
    let user_repo = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let assignment_repo = Arc::new(AssignmentRepository::new(pool.clone(), writer.clone()));
    let cartera_repo = Arc::new(CarteraRepository::new(pool.clone(), writer.clone()));
    let comparison_repo = Arc::new(ComparisonRepository::new(pool.clone(), writer.clone()));
    let import_repo = Arc::new(ImportRepository::new(writer.clone()));

    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        Arc::new(Argon2Hasher),
        config.admin_email.clone(),
    ));
    if let Some(password) = &config.admin_password {
        if let Some(admin) = user_service
            .ensure_bootstrap_admin(&config.admin_name, password)
            .await?
        {
            tracing::info!("Seeded primary administrator {}", admin.email);
        }
    }

    let ppr_service = Arc::new(PprService::new(ppr_repo.clone(), schedule_repo.clone()));
    let schedule_service = Arc::new(ScheduleService::new(schedule_repo.clone()));
    let assignment_service: Arc<dyn AssignmentServiceTrait> = Arc::new(AssignmentService::new(
        assignment_repo,
        ppr_repo.clone(),
        user_repo,
    ));
    let cartera_service = Arc::new(CarteraService::new(cartera_repo.clone()));
    let comparison_service = Arc::new(ComparisonService::new(
        comparison_repo,
        ppr_repo.clone(),
        schedule_repo.clone(),
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        ppr_repo,
        schedule_repo,
        assignment_service.clone(),
    ));

    let staging: Arc<dyn StagingStoreTrait> = Arc::new(FileStagingStore::new(&config.data_dir));
    match staging.purge_older_than(STAGING_MAX_AGE).await {
        Ok(0) => {}
        Ok(purged) => tracing::info!("Purged {} abandoned previews", purged),
        Err(e) => tracing::warn!("Could not purge abandoned previews: {}", e),
    }
    let catalog = Arc::new(PprCatalog::load_or_builtin(config.catalog_path.as_deref()));
    let import_service = Arc::new(ImportService::new(
        import_repo,
        cartera_repo,
        staging,
        catalog,
        &config.data_dir,
    ));

    let auth = Arc::new(AuthManager::new(&signing_secret(config)?, config.token_ttl));

    Ok(Arc::new(AppState {
        ppr_service,
        schedule_service,
        user_service,
        assignment_service,
        cartera_service,
        import_service,
        comparison_service,
        dashboard_service,
        auth,
        pool,
    }))
}
