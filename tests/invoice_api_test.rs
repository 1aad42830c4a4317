mod common;

use axum::http::StatusCode;
use common::{app, get, post_form, test_db};
use invoice_desk::db::{Params, Statement};
use invoice_desk::models::InvoiceRecord;
use serde_json::json;

const FULL_INVOICE: &str = "invoice_number=INV-2024-001&product_name=Diesel+fuel&total_amount=1250.75\
    &buyer_name=Sok+Dara&buyer_phone=012345678&discount=12.5&seller_name=Chan+Thy\
    &seller_phone=098765432&description=Monthly+delivery";

async fn all_invoices(db: &invoice_desk::db::Database) -> Vec<InvoiceRecord> {
    sqlx::query_as::<_, InvoiceRecord>("SELECT * FROM invoices ORDER BY id")
        .fetch_all(db.get_pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn store_inserts_every_submitted_field() {
    let db = test_db().await;
    let app = app(&db);

    let (status, body) = post_form(&app, "/api/customer/store", FULL_INVOICE).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": true, "message": "Invoice created successfully"})
    );

    let invoices = all_invoices(&db).await;
    assert_eq!(
        invoices,
        vec![InvoiceRecord {
            id: 1,
            invoice_number: "INV-2024-001".to_string(),
            product_name: "Diesel fuel".to_string(),
            total_amount: 1250.75,
            buyer_name: "Sok Dara".to_string(),
            buyer_phone: "012345678".to_string(),
            discount: 12.5,
            seller_name: "Chan Thy".to_string(),
            seller_phone: "098765432".to_string(),
            description: "Monthly delivery".to_string(),
        }]
    );
}

#[tokio::test]
async fn store_coerces_absent_and_malformed_fields() {
    let db = test_db().await;
    let app = app(&db);

    let (status, body) =
        post_form(&app, "/api/customer/store", "invoice_number=INV-7&discount=ten").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(true));

    let invoice = &all_invoices(&db).await[0];
    assert_eq!(invoice.invoice_number, "INV-7");
    assert_eq!(invoice.product_name, "");
    assert_eq!(invoice.total_amount, 0.0);
    assert_eq!(invoice.discount, 0.0);
}

#[tokio::test]
async fn store_allows_duplicate_invoice_numbers() {
    let db = test_db().await;
    let app = app(&db);

    post_form(&app, "/api/customer/store", FULL_INVOICE).await;
    let (status, _) = post_form(&app, "/api/customer/store", FULL_INVOICE).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(all_invoices(&db).await.len(), 2);
}

#[tokio::test]
async fn update_overwrites_the_whole_row() {
    let db = test_db().await;
    let app = app(&db);
    post_form(&app, "/api/customer/store", FULL_INVOICE).await;

    let (status, body) = post_form(
        &app,
        "/api/customer/update?id=1",
        "invoice_number=INV-2024-001A&product_name=Petrol&total_amount=99\
         &buyer_name=Keo&buyer_phone=011&discount=0&seller_name=Lim&seller_phone=022",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": true, "message": "Invoice updated successfully"})
    );

    let invoice = &all_invoices(&db).await[0];
    assert_eq!(invoice.id, 1);
    assert_eq!(invoice.invoice_number, "INV-2024-001A");
    assert_eq!(invoice.product_name, "Petrol");
    assert_eq!(invoice.total_amount, 99.0);
    assert_eq!(invoice.buyer_name, "Keo");
    assert_eq!(invoice.discount, 0.0);
    assert_eq!(invoice.seller_phone, "022");
    // Omitted fields are overwritten with their defaults
    assert_eq!(invoice.description, "");
}

#[tokio::test]
async fn update_of_unknown_id_changes_nothing() {
    let db = test_db().await;
    let app = app(&db);
    post_form(&app, "/api/customer/store", FULL_INVOICE).await;
    let before = all_invoices(&db).await;

    let (status, body) =
        post_form(&app, "/api/customer/update?id=42", "invoice_number=ghost").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!(true));
    assert_eq!(all_invoices(&db).await, before);
}

#[tokio::test]
async fn update_requires_an_integer_id() {
    let db = test_db().await;
    let app = app(&db);

    let (missing, _) = post_form(&app, "/api/customer/update", "invoice_number=x").await;
    let (garbled, _) = post_form(&app, "/api/customer/update?id=abc", "invoice_number=x").await;

    assert_eq!(missing, StatusCode::BAD_REQUEST);
    assert_eq!(garbled, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statement_failure_is_a_server_error_without_envelope() {
    let db = test_db().await;
    let app = app(&db);
    db.execute(&Statement::new("DROP TABLE invoices"), Params::new())
        .await
        .unwrap();

    let (status, body) = post_form(&app, "/api/customer/store", FULL_INVOICE).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Database error"}));
}

#[tokio::test]
async fn health_reports_ok_when_store_answers() {
    let db = test_db().await;
    let app = app(&db);

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
}
