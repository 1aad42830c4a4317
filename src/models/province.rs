use serde::{Deserialize, Serialize};

/// A row of the `provinces` relation.
///
/// The list endpoint returns untyped rows so a NULL name still lists.
/// This is the typed view for readers that hold rows to the schema.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct Province {
    pub id: i64,
    pub name: String,
}

/// Form body of the province rename endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvinceNameInput {
    pub name: String,
}
