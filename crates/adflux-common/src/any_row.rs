//! Manual `sqlx::FromRow<'_, sqlx::any::AnyRow>` implementations for
//! adflux-common model types.
//!
//! `sqlx::AnyPool` only decodes primitive types natively (i64, f64, bool,
//! String, bytes), so every typed field is read as one of those. Columns that
//! no typed field claims are tried against each primitive in turn and kept as
//! JSON values. MySQL rows go through [`crate::mysql_row`] instead.

use serde_json::{Map, Value};
use sqlx::{any::AnyRow, Column, Row};

use crate::models::ad::{Ad, AdType};

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Decode a column of unknown type into the closest JSON value.
fn passthrough(row: &AnyRow, index: usize) -> Result<Value, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.map(Value::from).unwrap_or(Value::Null));
    }
    let name = row.columns()[index].name().to_owned();
    Err(sqlx::Error::ColumnDecode {
        index: name.clone(),
        source: format!("column '{name}' has a type that cannot be passed through").into(),
    })
}

fn extra_columns(row: &AnyRow, known: &[&str]) -> Result<Map<String, Value>, sqlx::Error> {
    let mut extra = Map::new();
    for column in row.columns() {
        if known.contains(&column.name()) {
            continue;
        }
        extra.insert(column.name().to_owned(), passthrough(row, column.ordinal())?);
    }
    Ok(extra)
}

// ── Ad ────────────────────────────────────────────────────────────────────────

impl<'r> sqlx::FromRow<'r, AnyRow> for Ad {
    fn from_row(row: &'r AnyRow) -> Result<Self, sqlx::Error> {
        let ad_type: Option<String> = row.try_get("type")?;
        Ok(Ad {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            ad_type: ad_type.map(AdType::from),
            media_url: row.try_get("media_url")?,
            target_url: row.try_get("target_url")?,
            extra: extra_columns(row, &Ad::COLUMNS)?,
        })
    }
}
