#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use material_wastage_api::{build_router, config::AppConfig, db, AppState};

/// Application under test backed by a private in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single connection keeps every query on the same in-memory database
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect to in-memory sqlite");
        db::run_migrations(&pool).await.expect("run migrations");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Method::DELETE, uri, None).await
    }

    /// Dispatches material and returns the stored record.
    pub async fn seed_dispatch(
        &self,
        material_name: &str,
        to_company: &str,
        given_quantity: f64,
        dispatch_date: &str,
    ) -> Value {
        let response = self
            .post_json(
                "/materials",
                json!({
                    "materialName": material_name,
                    "toCompany": to_company,
                    "givenQuantity": given_quantity,
                    "dispatchDate": dispatch_date,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["dispatch"].clone()
    }

    /// Logs a batch return and returns the stored batch.
    pub async fn seed_batch(&self, material_id: &str, quantity: f64, received_date: &str) -> Value {
        let response = self
            .post_json(
                "/batch-return",
                json!({
                    "materialId": material_id,
                    "receivedQuantity": quantity,
                    "receivedDate": received_date,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["batch"].clone()
    }
}

pub async fn response_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body")
        .to_vec()
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is json")
}

pub fn header_value(response: &Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
