use std::sync::LazyLock;

use axum::{
    Form, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::{AppState, Envelope, IdQuery};
use crate::db::{Params, Row, Statement};
use crate::error::AppError;
use crate::models::ProvinceNameInput;

static LIST_PROVINCES: LazyLock<Statement> =
    LazyLock::new(|| Statement::new("SELECT id, name FROM provinces ORDER BY id"));

static SEARCH_PROVINCES: LazyLock<Statement> = LazyLock::new(|| {
    Statement::new(
        "SELECT id, name FROM provinces WHERE LOWER(name) LIKE LOWER(:pattern) ORDER BY id",
    )
});

static RENAME_PROVINCE: LazyLock<Statement> =
    LazyLock::new(|| Statement::new("UPDATE provinces SET name = :name WHERE id = :id"));

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// `GET /api/provinces?search=<optional>`
#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Envelope<Vec<Row>>>, AppError> {
    let rows = match query.search {
        Some(search) => {
            let pattern = format!("%{search}%");
            state
                .db
                .fetch_rows(&SEARCH_PROVINCES, Params::new().with("pattern", pattern))
                .await?
        }
        None => state.db.fetch_rows(&LIST_PROVINCES, Params::new()).await?,
    };

    tracing::debug!(count = rows.len(), "provinces listed");
    Ok(Json(Envelope::with_data(
        "Provinces retrieved successfully",
        rows,
    )))
}

/// `POST /api/provinces/update?id=<id>`
#[tracing::instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Query(IdQuery { id }): Query<IdQuery>,
    Form(input): Form<ProvinceNameInput>,
) -> Result<Json<Envelope<()>>, AppError> {
    let affected = state
        .db
        .execute(
            &RENAME_PROVINCE,
            Params::new().with("name", input.name).with("id", id),
        )
        .await?;

    tracing::info!(affected, "province updated");
    Ok(Json(Envelope::ok("Province updated successfully")))
}
