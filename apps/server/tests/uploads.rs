mod common;

use axum::http::{Method, StatusCode};
use common::{ppr_workbook, TestApp};
use serde_json::{json, Value};

async fn import_ppr(app: &TestApp, token: &str) -> i64 {
    let (status, receipt) = app
        .upload("/api/v1/upload/ppr?anio=2025", token, "ppr_0017.xlsx", &ppr_workbook())
        .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {receipt}");
    assert_eq!(receipt["status"], "parsed_for_preview");
    let preview_id = receipt["previewId"].as_str().unwrap().to_string();

    let (status, preview) = app
        .json(
            Method::GET,
            &format!("/api/v1/upload/preview/{preview_id}"),
            Some(token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["previewId"], preview_id.as_str());
    assert_eq!(preview["data"]["payload"]["kind"], "ppr");

    let (status, committed) = app
        .json(
            Method::POST,
            &format!("/api/v1/upload/commit/{preview_id}"),
            Some(token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "commit failed: {committed}");
    assert_eq!(committed["result"]["productsCount"], 1);

    let (status, _) = app
        .json(
            Method::POST,
            &format!("/api/v1/upload/commit/{preview_id}"),
            Some(token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    committed["result"]["pprId"].as_i64().unwrap()
}

async fn structure(app: &TestApp, token: &str, ppr_id: i64) -> Value {
    let (status, body) = app
        .json(
            Method::GET,
            &format!("/api/v1/pprs/{ppr_id}/estructura"),
            Some(token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["products"][0]["activities"][0]["subProducts"][0].clone()
}

#[tokio::test]
async fn ppr_upload_preview_commit() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let ppr_id = import_ppr(&app, &admin).await;

    let (_, ppr) = app
        .json(Method::GET, &format!("/api/v1/pprs/{ppr_id}"), Some(&admin), None)
        .await;
    assert_eq!(ppr["data"]["code"], "0017");
    assert_eq!(ppr["data"]["year"], 2025);

    let sub = structure(&app, &admin, ppr_id).await;
    assert_eq!(sub["code"], "0215001");
    assert_eq!(sub["unitOfMeasure"], "INFORME");
    assert_eq!(sub["pprSchedule"]["annualTarget"], 12.0);
    assert_eq!(sub["pprSchedule"]["executed"]["dic"], 2.0);

    let raw_dir = app.dir.path().join("uploads/ppr");
    assert_eq!(std::fs::read_dir(raw_dir).unwrap().count(), 1);
}

#[tokio::test]
async fn upload_rules() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.create_user(&admin, "Luis", "luis@salud.gob.pe", "responsable_planificacion")
        .await;
    let planner = app.login("luis@salud.gob.pe", "clave-segura").await;

    let (status, body) = app
        .upload("/api/v1/upload/ppr", &admin, "datos.csv", b"a,b,c")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Solo se permiten archivos Excel (.xlsx, .xls)");

    let (status, _) = app
        .upload("/api/v1/upload/ppr", &planner, "ppr.xlsx", &ppr_workbook())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .upload("/api/v1/upload/ppr", &admin, "roto.xlsx", b"no es un libro")
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, receipt) = app
        .upload("/api/v1/upload/ppr", &admin, "ppr.xlsx", &ppr_workbook())
        .await;
    assert_eq!(status, StatusCode::OK);
    let preview_id = receipt["previewId"].as_str().unwrap();
    let (status, _) = app
        .json(
            Method::GET,
            &format!("/api/v1/upload/preview-ceplan/{preview_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json(Method::GET, "/api/v1/upload/preview/no-existe", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .json(
            Method::GET,
            "/api/v1/upload/preview/00000000-0000-0000-0000-000000000000",
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_updates_flow_into_dashboard() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let ppr_id = import_ppr(&app, &admin).await;
    let sub_id = structure(&app, &admin, ppr_id).await["id"].as_i64().unwrap();

    let (status, metrics) = app
        .json(Method::GET, "/api/v1/dashboard/ppr/metrics", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let classified = metrics["ok"].as_u64().unwrap()
        + metrics["attention"].as_u64().unwrap()
        + metrics["critical"].as_u64().unwrap();
    assert_eq!(classified, 1);

    let (status, rows) = app
        .json(
            Method::GET,
            &format!("/api/v1/dashboard/ppr/{ppr_id}/subproductos"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/api/v1/dashboard/ppr/{sub_id}/update-avance"),
            Some(&admin),
            Some(json!({ "month": 3, "year": 2025, "executed": 5.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Programación actualizada exitosamente");

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/api/v1/dashboard/ppr/{sub_id}/update-avance"),
            Some(&admin),
            Some(json!({ "month": 3, "year": 2019, "executed": 5.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/api/v1/programacion/subproducto/{sub_id}"),
            Some(&admin),
            Some(json!({ "ppr": { "programmed": { "abr": 4.0 }, "executed": { "dic": 0.0 } } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/api/v1/programacion/subproducto/{sub_id}"),
            Some(&admin),
            Some(json!({ "ppr": { "executed": { "xyz": 1.0 } } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let sub = structure(&app, &admin, ppr_id).await;
    assert_eq!(sub["pprSchedule"]["executed"]["mar"], 5.0);
    assert_eq!(sub["pprSchedule"]["executed"]["dic"], 0.0);
    assert_eq!(sub["pprSchedule"]["programmed"]["abr"], 4.0);

    let (status, months) = app
        .json(
            Method::GET,
            &format!("/api/v1/dashboard/ppr/{sub_id}/programacion-multi-month"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(months.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn planners_cannot_edit_progress() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let ppr_id = import_ppr(&app, &admin).await;
    let sub_id = structure(&app, &admin, ppr_id).await["id"].as_i64().unwrap();
    app.create_user(&admin, "Luis", "luis@salud.gob.pe", "responsable_planificacion")
        .await;
    let planner = app.login("luis@salud.gob.pe", "clave-segura").await;

    let (status, _) = app
        .json(
            Method::PUT,
            &format!("/api/v1/dashboard/ppr/{sub_id}/update-avance"),
            Some(&planner),
            Some(json!({ "month": 1, "year": 2025, "executed": 1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .json(
            Method::POST,
            &format!("/api/v1/comparison/ppr/{ppr_id}/compare"),
            Some(&planner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, results) = app
        .json(
            Method::GET,
            &format!("/api/v1/comparison/ppr/{ppr_id}/comparison-results"),
            Some(&planner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(results["totalCount"].is_number());
}
