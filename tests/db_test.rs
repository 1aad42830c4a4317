mod common;

use common::test_db;
use invoice_desk::db::{Params, SqlValue, Statement};
use invoice_desk::error::DataAccessError;

#[tokio::test]
async fn execute_reports_rows_affected() {
    let db = test_db().await;
    let insert = Statement::new("INSERT INTO provinces (id, name) VALUES (:id, :name)");

    for (id, name) in [(1_i64, "Kampot"), (2, "Kep")] {
        let affected = db
            .execute(&insert, Params::new().with("id", id).with("name", name))
            .await
            .unwrap();
        assert_eq!(affected, 1);
    }

    let renamed = db
        .execute(
            &Statement::new("UPDATE provinces SET name = :name"),
            Params::new().with("name", "Coast"),
        )
        .await
        .unwrap();
    assert_eq!(renamed, 2);
}

#[tokio::test]
async fn fetch_rows_maps_columns_to_typed_values() {
    let db = test_db().await;
    db.execute(
        &Statement::new("CREATE TABLE readings (id INTEGER, label TEXT, amount REAL, note TEXT)"),
        Params::new(),
    )
    .await
    .unwrap();
    db.execute(
        &Statement::new(
            "INSERT INTO readings (id, label, amount, note) VALUES (:id, :label, :amount, NULL)",
        ),
        Params::new()
            .with("id", 9_i64)
            .with("label", "meter")
            .with("amount", 12.25),
    )
    .await
    .unwrap();

    let rows = db
        .fetch_rows(
            &Statement::new("SELECT id, label, amount, note FROM readings WHERE id = :id"),
            Params::new().with("id", 9_i64),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["id"], SqlValue::Integer(9));
    assert_eq!(row["label"], SqlValue::Text("meter".to_string()));
    assert_eq!(row["amount"], SqlValue::Real(12.25));
    assert_eq!(row["note"], SqlValue::Null);
}

#[tokio::test]
async fn mismatched_parameter_map_is_rejected_before_reaching_the_store() {
    let db = test_db().await;
    let update = Statement::new(
        "UPDATE invoices SET invoice_number = :invoice_number, product_name = :product_name WHERE id = :id",
    );

    let err = db
        .execute(&update, Params::new().with("name", "x").with("id", 1_i64))
        .await
        .unwrap_err();

    assert!(matches!(err, DataAccessError::UnboundParameter(name) if name == "invoice_number"));
}

#[tokio::test]
async fn malformed_statement_surfaces_as_database_error() {
    let db = test_db().await;

    let err = db
        .fetch_rows(&Statement::new("SELEC id FROM provinces"), Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DataAccessError::Database(_)));
}

#[tokio::test]
async fn ping_succeeds_on_a_live_pool() {
    let db = test_db().await;

    db.ping().await.unwrap();
}
