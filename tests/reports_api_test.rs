mod common;

use axum::http::{Method, StatusCode};
use common::{header_value, response_bytes, response_json, TestApp};
use serde_json::json;

async fn seed_steel(app: &TestApp) -> String {
    let dispatch = app
        .seed_dispatch("Steel", "Acme", 100.0, "2024-01-01T10:00:00Z")
        .await;
    let id = dispatch["id"].as_str().unwrap().to_string();
    app.seed_batch(&id, 40.0, "2024-02-10").await;
    app.seed_batch(&id, 35.0, "2024-03-01").await;
    id
}

#[tokio::test]
async fn wastage_summary_lists_every_dispatch() {
    let app = TestApp::new().await;
    seed_steel(&app).await;
    let copper = app
        .seed_dispatch("Copper", "Globex", 30.0, "2024-01-05")
        .await;
    let copper_id = copper["id"].as_str().unwrap().to_string();
    app.seed_batch(&copper_id, 10.0, "2024-01-06").await;

    let response = app.get("/api/wastage-summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = response_json(response).await;
    assert_eq!(
        summary,
        json!([
            {"productName": "Steel", "wastageAmount": 25.0},
            {"productName": "Copper", "wastageAmount": 66.67},
        ])
    );
}

#[tokio::test]
async fn wastage_summary_reports_full_wastage_without_batches() {
    let app = TestApp::new().await;
    app.seed_dispatch("Gravel", "Umbrella", 40.0, "2024-01-01")
        .await;

    let summary = response_json(app.get("/api/wastage-summary").await).await;
    assert_eq!(summary[0]["wastageAmount"], 100.0);
}

#[tokio::test]
async fn batch_returns_filter_by_date_range() {
    let app = TestApp::new().await;
    let id = seed_steel(&app).await;

    let all = response_json(app.get(&format!("/batch-returns/{}", id)).await).await;
    let quantities: Vec<f64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["receivedQuantity"].as_f64().unwrap())
        .collect();
    assert_eq!(quantities, vec![40.0, 35.0]);

    let february = response_json(
        app.get(&format!(
            "/batch-returns/{}?startDate=2024-02-01&endDate=2024-02-29",
            id
        ))
        .await,
    )
    .await;
    assert_eq!(february.as_array().map(Vec::len), Some(1));
    assert_eq!(february[0]["receivedQuantity"], 40.0);
}

#[tokio::test]
async fn date_only_end_bound_includes_the_whole_day() {
    let app = TestApp::new().await;
    let dispatch = app
        .seed_dispatch("Steel", "Acme", 100.0, "2024-01-01")
        .await;
    let id = dispatch["id"].as_str().unwrap().to_string();
    app.seed_batch(&id, 5.0, "2024-03-01T18:30:00Z").await;

    let batches = response_json(
        app.get(&format!("/batch-returns/{}?endDate=2024-03-01", id))
            .await,
    )
    .await;
    assert_eq!(batches.as_array().map(Vec::len), Some(1));

    let before = response_json(
        app.get(&format!("/batch-returns/{}?endDate=2024-02-29", id))
            .await,
    )
    .await;
    assert_eq!(before, json!([]));
}

#[tokio::test]
async fn invalid_date_ranges_are_rejected() {
    let app = TestApp::new().await;
    let id = seed_steel(&app).await;

    let inverted = app
        .get(&format!(
            "/batch-returns/{}?startDate=2024-03-01&endDate=2024-02-01",
            id
        ))
        .await;
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);

    let garbage = app
        .get(&format!("/batch-returns/{}?startDate=someday", id))
        .await;
    assert_eq!(garbage.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_returns_for_malformed_id_are_empty() {
    let app = TestApp::new().await;
    seed_steel(&app).await;

    let response = app.get("/batch-returns/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!([]));
}

#[tokio::test]
async fn excel_export_is_an_xlsx_attachment() {
    let app = TestApp::new().await;
    seed_steel(&app).await;

    let response = app.get("/export/excel").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, "content-type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        header_value(&response, "content-disposition"),
        "attachment; filename=\"wastage-report.xlsx\""
    );

    let bytes = response_bytes(response).await;
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn excel_export_works_without_dispatches() {
    let app = TestApp::new().await;

    let response = app.get("/export/excel").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_bytes(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn pdf_report_is_a_named_attachment() {
    let app = TestApp::new().await;
    let id = seed_steel(&app).await;

    let response = app.get(&format!("/generate-pdf/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_value(&response, "content-type"), "application/pdf");

    let disposition = header_value(&response, "content-disposition");
    assert!(disposition.starts_with("attachment; filename=\"report_Steel_"));
    assert!(disposition.ends_with(".pdf\""));

    let bytes = response_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn pdf_report_for_unknown_dispatch_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .get("/generate-pdf/00000000-0000-4000-8000-000000000000")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Material not found");
}

#[tokio::test]
async fn health_and_banner_respond() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "up");

    let banner = app.get("/").await;
    assert_eq!(banner.status(), StatusCode::OK);
    assert_eq!(
        response_bytes(banner).await,
        b"Material wastage API is running".to_vec()
    );
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/wastage-summary",
            None,
            &[("x-request-id", "report-test-1")],
        )
        .await;
    assert_eq!(header_value(&response, "x-request-id"), "report-test-1");

    let generated = app.get("/materials").await;
    assert!(!header_value(&generated, "x-request-id").is_empty());
}

#[tokio::test]
async fn zero_quantity_dispatch_reports_null_and_not_available() {
    use material_wastage_api::models::material_dispatch;
    use sea_orm::{ActiveModelTrait, Set};
    use std::io::{Cursor, Read};

    let app = TestApp::new().await;
    // The API refuses a zero quantity, so the row is written directly
    let dispatch = material_dispatch::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        material_name: Set("Cement".to_string()),
        to_company: Set("Hooli".to_string()),
        given_quantity: Set(0.0),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .unwrap();
    let id = dispatch.id.to_string();

    app.seed_batch(&id, 5.0, "2024-01-02").await;

    let list = response_json(app.get("/materials").await).await;
    assert_eq!(list[0]["wastage"], "0.00");

    let summary = response_json(app.get("/api/wastage-summary").await).await;
    assert_eq!(
        summary,
        json!([{"productName": "Cement", "wastageAmount": null}])
    );

    let detail = response_json(app.get(&format!("/wastage/{}", id)).await).await;
    assert_eq!(detail["totalReceived"], 5.0);
    assert!(detail["wastagePercentage"].is_null());

    let workbook = response_bytes(app.get("/export/excel").await).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(workbook)).unwrap();
    let mut strings = String::new();
    archive
        .by_name("xl/sharedStrings.xml")
        .unwrap()
        .read_to_string(&mut strings)
        .unwrap();
    assert!(strings.contains("<t>N/A</t>"));
    assert!(strings.contains("<t>Cement</t>"));

    let pdf = app.get(&format!("/generate-pdf/{}", id)).await;
    assert_eq!(pdf.status(), StatusCode::OK);
    assert!(response_bytes(pdf).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn half_cent_ties_round_the_same_everywhere() {
    let app = TestApp::new().await;
    let dispatch = app
        .seed_dispatch("Wire", "Acme", 200.0, "2024-01-01")
        .await;
    let id = dispatch["id"].as_str().unwrap().to_string();
    app.seed_batch(&id, 199.75, "2024-01-02").await;

    let list = response_json(app.get("/materials").await).await;
    assert_eq!(list[0]["wastage"], "0.13");

    let detail = response_json(app.get(&format!("/wastage/{}", id)).await).await;
    assert_eq!(detail["wastagePercentage"], "0.13");

    let summary = response_json(app.get("/api/wastage-summary").await).await;
    assert_eq!(summary[0]["wastageAmount"], 0.13);
}
