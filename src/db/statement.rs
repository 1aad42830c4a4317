use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DataAccessError;

/// A scalar value bound to a placeholder or read back from a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

/// One result row: column name to value.
pub type Row = BTreeMap<String, SqlValue>;

/// Named parameters for a [`Statement`].
#[derive(Debug, Clone, Default)]
pub struct Params(BTreeMap<String, SqlValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<SqlValue>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }
}

/// A statement template written with `:name` placeholders, rewritten to
/// positional `$N` placeholders understood by both Postgres and SQLite.
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    names: Vec<String>,
}

impl Statement {
    pub fn new(template: &str) -> Self {
        let mut sql = String::with_capacity(template.len());
        let mut names: Vec<String> = Vec::new();
        let mut chars = template.chars().peekable();
        let mut quote: Option<char> = None;

        while let Some(c) = chars.next() {
            if let Some(open) = quote {
                sql.push(c);
                if c == open {
                    quote = None;
                }
                continue;
            }

            match c {
                '\'' | '"' => {
                    quote = Some(c);
                    sql.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    sql.push(c);
                    for next in chars.by_ref() {
                        sql.push(next);
                        if next == '\n' {
                            break;
                        }
                    }
                }
                '/' if chars.peek() == Some(&'*') => {
                    sql.push(c);
                    // The opening `*` must not close the comment
                    let mut previous = ' ';
                    if let Some(star) = chars.next() {
                        sql.push(star);
                    }
                    for next in chars.by_ref() {
                        sql.push(next);
                        if previous == '*' && next == '/' {
                            break;
                        }
                        previous = next;
                    }
                }
                ':' => match chars.peek() {
                    // Postgres cast, e.g. `total::float8`
                    Some(':') => {
                        chars.next();
                        sql.push_str("::");
                    }
                    Some(&next) if next.is_ascii_alphabetic() || next == '_' => {
                        let mut name = String::new();
                        while let Some(&next) = chars.peek() {
                            if next.is_ascii_alphanumeric() || next == '_' {
                                name.push(next);
                                chars.next();
                            } else {
                                break;
                            }
                        }

                        let slot = match names.iter().position(|existing| *existing == name) {
                            Some(index) => index + 1,
                            None => {
                                names.push(name);
                                names.len()
                            }
                        };
                        sql.push('$');
                        sql.push_str(&slot.to_string());
                    }
                    _ => sql.push(':'),
                },
                _ => sql.push(c),
            }
        }

        Self { sql, names }
    }

    /// The rewritten SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Placeholder names in slot order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Order the supplied parameters by slot.
    ///
    /// Every placeholder needs a value and every value needs a placeholder.
    pub fn bind(&self, params: Params) -> Result<Vec<SqlValue>, DataAccessError> {
        let mut remaining = params.0;
        let mut values = Vec::with_capacity(self.names.len());

        for name in &self.names {
            match remaining.remove(name) {
                Some(value) => values.push(value),
                None => return Err(DataAccessError::UnboundParameter(name.clone())),
            }
        }

        if let Some(name) = remaining.into_keys().next() {
            return Err(DataAccessError::UnusedParameter(name));
        }

        Ok(values)
    }
}
