mod statement;

pub use statement::{Params, Row, SqlValue, Statement};

use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow, install_default_drivers};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Column, Row as _, ValueRef};

use crate::config::Config;
use crate::error::DataAccessError;

/// Database connection pool
///
/// The backend is picked from the URL scheme at runtime, so the same
/// statements run against Postgres in production and SQLite locally.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DataAccessError> {
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    ///
    /// The handlers go through [`Database::execute`] and
    /// [`Database::fetch_rows`]. This is for callers that want typed rows
    /// such as [`crate::models::InvoiceRecord`] via `sqlx::query_as`.
    pub fn get_pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Execute a statement for its effect and return the number of rows affected
    pub async fn execute(&self, statement: &Statement, params: Params) -> Result<u64, DataAccessError> {
        let values = statement.bind(params)?;
        let query = bind_all(sqlx::query(statement.sql()), values);

        let result = query.execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Execute a read statement and return its rows in store order
    pub async fn fetch_rows(&self, statement: &Statement, params: Params) -> Result<Vec<Row>, DataAccessError> {
        let values = statement.bind(params)?;
        let query = bind_all(sqlx::query(statement.sql()), values);

        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(decode_row).collect()
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<(), DataAccessError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    values: Vec<SqlValue>,
) -> Query<'q, Any, AnyArguments<'q>> {
    for value in values {
        query = match value {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(v) => query.bind(v),
            SqlValue::Real(v) => query.bind(v),
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
        };
    }
    query
}

fn decode_row(row: &AnyRow) -> Result<Row, DataAccessError> {
    let mut decoded = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        decoded.insert(column.name().to_string(), value);
    }
    Ok(decoded)
}

// The Any driver only reports a coarse type per value, so try the scalar
// kinds from narrowest to widest. NULL carries its own type and is
// incompatible with every typed decode.
fn decode_column(row: &AnyRow, index: usize) -> Result<SqlValue, DataAccessError> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return Ok(value.map_or(SqlValue::Null, SqlValue::Integer));
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return Ok(value.map_or(SqlValue::Null, SqlValue::Real));
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return Ok(value.map_or(SqlValue::Null, SqlValue::Bool));
    }
    let value = row.try_get::<Option<String>, _>(index)?;
    Ok(value.map_or(SqlValue::Null, SqlValue::Text))
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> anyhow::Result<Database> {
    let db = Database::connect(config.database_url()?, config.max_connections).await?;

    tracing::info!(max_connections = config.max_connections, "database pool ready");

    Ok(db)
}
