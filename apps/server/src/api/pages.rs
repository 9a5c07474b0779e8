use std::{path::Path, sync::Arc};

use crate::main_lib::AppState;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// HTML views served under their own path; each maps to `<page>.html`.
const PAGES: &[&str] = &[
    "ppr",
    "users",
    "reports",
    "login",
    "ppr_detalle",
    "preview",
    "transversal_data",
];

pub fn router(static_dir: &str) -> Router<Arc<AppState>> {
    let root = Path::new(static_dir);
    let mut router = Router::new().route_service("/", ServeFile::new(root.join("index.html")));
    for page in PAGES {
        router = router.route_service(
            &format!("/{page}"),
            ServeFile::new(root.join(format!("{page}.html"))),
        );
    }
    router.fallback_service(ServeDir::new(root))
}
