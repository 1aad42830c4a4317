#![allow(dead_code)]

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use invoice_desk::api::{AppState, build_router};
use invoice_desk::db::{Database, Params, Statement};
use serde_json::Value;
use tower::util::ServiceExt;

const CREATE_INVOICES: &str = r#"
    CREATE TABLE invoices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_number TEXT NOT NULL,
        product_name TEXT NOT NULL,
        total_amount REAL NOT NULL,
        buyer_name TEXT NOT NULL,
        buyer_phone TEXT NOT NULL,
        discount REAL NOT NULL,
        seller_name TEXT NOT NULL,
        seller_phone TEXT NOT NULL,
        description TEXT NOT NULL
    )
"#;

const CREATE_PROVINCES: &str = r#"
    CREATE TABLE provinces (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
"#;

/// A single-connection in-memory database with both relations created
pub async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory sqlite should open");

    for ddl in [CREATE_INVOICES, CREATE_PROVINCES] {
        db.execute(&Statement::new(ddl), Params::new())
            .await
            .expect("schema should apply");
    }

    db
}

pub async fn seed_provinces(db: &Database, names: &[(i64, &str)]) {
    let insert = Statement::new("INSERT INTO provinces (id, name) VALUES (:id, :name)");
    for (id, name) in names {
        db.execute(&insert, Params::new().with("id", *id).with("name", *name))
            .await
            .expect("province should insert");
    }
}

pub fn app(db: &Database) -> Router {
    build_router(AppState::new(db.clone()))
}

pub async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}
