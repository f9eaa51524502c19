//! Manual `sqlx::FromRow<'_, sqlx::mysql::MySqlRow>` implementations for
//! adflux-common model types.
//!
//! The native MySQL driver decodes every column type a catalog table is likely
//! to carry, including the ones `AnyRow` rejects (`TEXT` reported as a blob,
//! `TIMESTAMP`, `DECIMAL`, `JSON`). Unknown columns are dispatched on the
//! server-reported type name and rendered as JSON values:
//!
//! | MySQL type                               | JSON                              |
//! |------------------------------------------|-----------------------------------|
//! | integer types, `BOOLEAN`, `YEAR`, `BIT`  | number                            |
//! | `FLOAT`, `DOUBLE`                        | number                            |
//! | `DATETIME`, `TIMESTAMP`                  | `"2024-05-01T10:00:00.000Z"`      |
//! | `DATE`, `TIME`                           | `"2024-05-01"`, `"10:00:00"`      |
//! | `JSON`                                   | the stored document               |
//! | `DECIMAL`, text, `ENUM`, `SET`           | string (decimals keep precision)  |
//! | binary and blob types                    | string, lossy UTF-8               |

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sqlx::{mysql::MySqlRow, Column, Row, TypeInfo, ValueRef};

use crate::models::ad::{Ad, AdType};

/// How a column's value is decoded, keyed on its MySQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Signed,
    Unsigned,
    Float,
    Double,
    DateTime,
    Date,
    Time,
    Json,
    Bit,
    Bytes,
    Text,
}

fn column_kind(type_name: &str) -> ColumnKind {
    let (base, unsigned) = match type_name.strip_suffix(" UNSIGNED") {
        Some(base) => (base, true),
        None => (type_name, false),
    };
    match base {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            if unsigned {
                ColumnKind::Unsigned
            } else {
                ColumnKind::Signed
            }
        }
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" => ColumnKind::Double,
        "DATETIME" | "TIMESTAMP" => ColumnKind::DateTime,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,
        "JSON" => ColumnKind::Json,
        "BIT" => ColumnKind::Bit,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY" => {
            ColumnKind::Bytes
        }
        _ => ColumnKind::Text,
    }
}

/// `BIT(n)` arrives as big-endian bytes.
fn bit_value(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

fn datetime_text(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_error(column: &str, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_owned(),
        source: message.into(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn passthrough(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    let kind = column_kind(row.columns()[index].type_info().name());
    let value = match kind {
        ColumnKind::Signed => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        ColumnKind::Unsigned => Value::from(row.try_get_unchecked::<u64, _>(index)?),
        ColumnKind::Float => Value::from(f64::from(row.try_get::<f32, _>(index)?)),
        ColumnKind::Double => Value::from(row.try_get::<f64, _>(index)?),
        ColumnKind::DateTime => Value::from(datetime_text(row.try_get::<DateTime<Utc>, _>(index)?)),
        ColumnKind::Date => Value::from(row.try_get::<NaiveDate, _>(index)?.to_string()),
        ColumnKind::Time => Value::from(row.try_get::<NaiveTime, _>(index)?.to_string()),
        ColumnKind::Json => row.try_get::<Value, _>(index)?,
        ColumnKind::Bit => Value::from(bit_value(&row.try_get_unchecked::<Vec<u8>, _>(index)?)),
        ColumnKind::Bytes => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::from(String::from_utf8_lossy(&bytes).into_owned())
        }
        ColumnKind::Text => Value::from(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

fn extra_columns(row: &MySqlRow, known: &[&str]) -> Result<Map<String, Value>, sqlx::Error> {
    let mut extra = Map::new();
    for column in row.columns() {
        if known.contains(&column.name()) {
            continue;
        }
        extra.insert(column.name().to_owned(), passthrough(row, column.ordinal())?);
    }
    Ok(extra)
}

/// Integer key column, signed or unsigned.
fn integer(row: &MySqlRow, name: &str) -> Result<i64, sqlx::Error> {
    let index = row.try_column(name)?.ordinal();
    match column_kind(row.columns()[index].type_info().name()) {
        ColumnKind::Signed => row.try_get_unchecked(index),
        ColumnKind::Unsigned => {
            let value: u64 = row.try_get_unchecked(index)?;
            i64::try_from(value).map_err(|_| decode_error(name, format!("{value} does not fit in i64")))
        }
        _ => row.try_get(index),
    }
}

// ── Ad ────────────────────────────────────────────────────────────────────────

impl<'r> sqlx::FromRow<'r, MySqlRow> for Ad {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let ad_type: Option<String> = row.try_get("type")?;
        Ok(Ad {
            id: integer(row, "id")?,
            title: row.try_get("title")?,
            ad_type: ad_type.map(AdType::from),
            media_url: row.try_get("media_url")?,
            target_url: row.try_get("target_url")?,
            extra: extra_columns(row, &Ad::COLUMNS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_column_kind_covers_catalog_types() {
        assert_eq!(column_kind("TEXT"), ColumnKind::Text);
        assert_eq!(column_kind("MEDIUMTEXT"), ColumnKind::Text);
        assert_eq!(column_kind("VARCHAR"), ColumnKind::Text);
        assert_eq!(column_kind("ENUM"), ColumnKind::Text);
        assert_eq!(column_kind("DECIMAL"), ColumnKind::Text);
        assert_eq!(column_kind("TIMESTAMP"), ColumnKind::DateTime);
        assert_eq!(column_kind("DATETIME"), ColumnKind::DateTime);
        assert_eq!(column_kind("DATE"), ColumnKind::Date);
        assert_eq!(column_kind("TIME"), ColumnKind::Time);
        assert_eq!(column_kind("JSON"), ColumnKind::Json);
        assert_eq!(column_kind("BLOB"), ColumnKind::Bytes);
        assert_eq!(column_kind("BIT"), ColumnKind::Bit);
    }

    #[test]
    fn test_column_kind_integers() {
        assert_eq!(column_kind("BOOLEAN"), ColumnKind::Signed);
        assert_eq!(column_kind("TINYINT"), ColumnKind::Signed);
        assert_eq!(column_kind("BIGINT"), ColumnKind::Signed);
        assert_eq!(column_kind("INT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(column_kind("BIGINT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(column_kind("FLOAT"), ColumnKind::Float);
        assert_eq!(column_kind("DOUBLE"), ColumnKind::Double);
    }

    #[test]
    fn test_bit_value_is_big_endian() {
        assert_eq!(bit_value(&[]), 0);
        assert_eq!(bit_value(&[1]), 1);
        assert_eq!(bit_value(&[0x01, 0x00]), 256);
    }

    #[test]
    fn test_datetime_text_is_utc_with_millis() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(datetime_text(at), "2024-05-01T10:00:00.000Z");
    }
}
