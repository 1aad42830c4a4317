use std::sync::LazyLock;

use axum::{
    Form, Json,
    extract::{Query, State},
};

use super::{AppState, Envelope, IdQuery};
use crate::db::Statement;
use crate::error::AppError;
use crate::models::InvoiceInput;

static INSERT_INVOICE: LazyLock<Statement> = LazyLock::new(|| {
    Statement::new(
        r#"
        INSERT INTO invoices (invoice_number, product_name, total_amount, buyer_name, buyer_phone,
                              discount, seller_name, seller_phone, description)
        VALUES (:invoice_number, :product_name, :total_amount, :buyer_name, :buyer_phone,
                :discount, :seller_name, :seller_phone, :description)
        "#,
    )
});

static UPDATE_INVOICE: LazyLock<Statement> = LazyLock::new(|| {
    Statement::new(
        r#"
        UPDATE invoices
        SET invoice_number = :invoice_number, product_name = :product_name,
            total_amount = :total_amount, buyer_name = :buyer_name, buyer_phone = :buyer_phone,
            discount = :discount, seller_name = :seller_name, seller_phone = :seller_phone,
            description = :description
        WHERE id = :id
        "#,
    )
});

/// `POST /api/customer/store`
#[tracing::instrument(skip_all, fields(invoice_number = %input.invoice_number))]
pub async fn store(
    State(state): State<AppState>,
    Form(input): Form<InvoiceInput>,
) -> Result<Json<Envelope<()>>, AppError> {
    state.db.execute(&INSERT_INVOICE, input.params()).await?;

    tracing::info!("invoice created");
    Ok(Json(Envelope::ok("Invoice created successfully")))
}

/// `POST /api/customer/update?id=<id>`
///
/// Overwrites all nine columns of the row; an unknown id changes nothing.
#[tracing::instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Query(IdQuery { id }): Query<IdQuery>,
    Form(input): Form<InvoiceInput>,
) -> Result<Json<Envelope<()>>, AppError> {
    let affected = state
        .db
        .execute(&UPDATE_INVOICE, input.params().with("id", id))
        .await?;

    tracing::info!(affected, "invoice updated");
    Ok(Json(Envelope::ok("Invoice updated successfully")))
}
