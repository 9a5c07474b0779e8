#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use monitor_ppr_core::constants::DEFAULT_ADMIN_EMAIL;
use monitor_ppr_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "admin-secreto";
const BOUNDARY: &str = "monitor-ppr-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(static_dir.join("css")).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>inicio</h1>").unwrap();
        std::fs::write(static_dir.join("login.html"), "<h1>ingreso</h1>").unwrap();
        std::fs::write(static_dir.join("css/app.css"), "body{}").unwrap();

        let vars: HashMap<&str, String> = HashMap::from([
            (
                "PPR_DB_PATH",
                dir.path().join("monitor.db").display().to_string(),
            ),
            ("PPR_ADMIN_PASSWORD", ADMIN_PASSWORD.to_string()),
            ("PPR_STATIC_DIR", static_dir.display().to_string()),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let state = build_state(&config).await.unwrap();
        TestApp {
            router: app_router(state, &config),
            dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = self.send(request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(DEFAULT_ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Creates an account through the admin API and returns its id.
    pub async fn create_user(&self, admin: &str, name: &str, email: &str, role: &str) -> i64 {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/v1/users",
                Some(admin),
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "clave-segura",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "user creation failed: {body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        filename: &str,
        bytes: &[u8],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Uploads and commits [`ppr_workbook`] for `year`, returning the PPR id.
    pub async fn import_ppr(&self, token: &str, year: i32) -> i64 {
        let (status, receipt) = self
            .upload(
                &format!("/api/v1/upload/ppr?anio={year}"),
                token,
                "ppr_0017.xlsx",
                &ppr_workbook(),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "upload failed: {receipt}");
        let preview_id = receipt["previewId"].as_str().unwrap();
        let (status, committed) = self
            .json(
                Method::POST,
                &format!("/api/v1/upload/commit/{preview_id}"),
                Some(token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "commit failed: {committed}");
        committed["result"]["pprId"].as_i64().unwrap()
    }
}

/// One program with a single product, activity and sub-product whose
/// yearly target is 12 and which executed 13 units.
pub fn ppr_workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "PROGRAMA PRESUPUESTAL").unwrap();
    sheet.write_string(0, 1, ":").unwrap();
    sheet
        .write_string(0, 2, "0017 ENFERMEDADES METAXÉNICAS Y ZOONOSIS")
        .unwrap();
    let headers = [
        "COD. PROD",
        "DESCRIPCION PRODUCTO",
        "COD. ACT",
        "DESCRIPCION ACTIVIDAD",
        "COD. SUB",
        "DESCRIPCION",
        "UNIDAD MEDIDA",
        "META ANUAL",
        "PROGRAMADO ENE",
        "EJECUTADO ENE",
    ];
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string(2, col as u16, *title).unwrap();
    }
    sheet.write_number(3, 0, 3000001.0).unwrap();
    sheet.write_string(3, 1, "ACCIONES COMUNES").unwrap();
    sheet.write_string(4, 2, "5000001").unwrap();
    sheet.write_string(4, 3, "PLANEAMIENTO").unwrap();
    sheet.write_string(5, 4, "0215001").unwrap();
    sheet.write_string(5, 5, "VIGILANCIA").unwrap();
    sheet.write_string(5, 6, "INFORME").unwrap();
    sheet.write_number(5, 7, 12.0).unwrap();
    for month in 0..12u16 {
        let executed = if month == 11 { 2.0 } else { 1.0 };
        sheet.write_number(5, 8 + month * 2, 1.0).unwrap();
        sheet.write_number(5, 9 + month * 2, executed).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// CEPLAN rows for the sub-product of [`ppr_workbook`]: 3 programmed and
/// 1 executed every month.
pub fn ceplan_workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .write_string(0, 0, "AOI00162600455 - 0215001 - VIGILANCIA")
        .unwrap();
    sheet.write_string(0, 3, "VIGILANCIA").unwrap();
    for col in 8..20u16 {
        sheet.write_number(0, col, 3.0).unwrap();
        sheet.write_number(1, col, 1.0).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// Two portfolio rows under a title line.
pub fn cartera_workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "CARTERA DE SERVICIOS 2025").unwrap();
    let rows = [
        [
            "Programa",
            "Producto",
            "Actividad",
            "Sub Producto",
            "Trazador",
            "Unidad de Medida",
        ],
        [
            "0017 ENFERMEDADES METAXÉNICAS Y ZOONOSIS",
            "3000001 ACCIONES COMUNES",
            "5000001 PLANEAMIENTO",
            "0215001 VIGILANCIA",
            "SI",
            "INFORME",
        ],
        [
            "0017 ENFERMEDADES METAXÉNICAS Y ZOONOSIS",
            "3000001 ACCIONES COMUNES",
            "5000001 PLANEAMIENTO",
            "0215002 SUPERVISION",
            "NO",
            "INFORME",
        ],
    ];
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            sheet.write_string(row as u32 + 1, col as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}
