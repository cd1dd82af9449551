use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A single SQL literal in an INSERT row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Bool(bool),
    /// Rendered with exactly two decimals
    Amount(f64),
    Text(String),
}

impl SqlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn date(value: NaiveDate) -> Self {
        Self::Text(value.format("%Y-%m-%d").to_string())
    }

    /// Minute precision, `YYYY-MM-DD HH:MM`.
    pub fn timestamp(value: NaiveDateTime) -> Self {
        Self::Text(value.format("%Y-%m-%d %H:%M").to_string())
    }

    pub fn optional<T>(value: Option<T>, f: impl FnOnce(T) -> SqlValue) -> Self {
        value.map(f).unwrap_or(Self::Null)
    }
}

/// Quote a string literal, doubling embedded single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::Bool(v) => f.write_str(if *v { "true" } else { "false" }),
            SqlValue::Amount(v) => write!(f, "{v:.2}"),
            SqlValue::Text(v) => f.write_str(&quote(v)),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for SqlValue {
    fn from(value: u64) -> Self {
        Self::Int(value as i64)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u8> for SqlValue {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Render one parenthesised row.
pub fn render_row(values: &[SqlValue]) -> String {
    let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("({})", rendered.join(", "))
}
