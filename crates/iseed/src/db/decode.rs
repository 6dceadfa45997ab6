//! Conversion of driver rows into [`TableRow`]s.
//!
//! Types without a native [`SeedValue`] counterpart but with a lossless text
//! form (decimals, uuids, temporal types, json) are decoded to text. Anything
//! else is rejected rather than written as a guess.

use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use serde_json::value::RawValue;
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::errors::SeedError;
use crate::models::{SeedValue, TableRow};

fn unsupported(column: &str, type_name: &str) -> SeedError {
    SeedError::UnsupportedType {
        column: column.to_string(),
        type_name: type_name.to_string(),
    }
}

/// f32 -> f64 through the shortest decimal form, so `0.1f32` stays `0.1`.
fn widen_f32(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

fn format_date(value: Date) -> Option<String> {
    value.format(format_description!("[year]-[month]-[day]")).ok()
}

fn format_time(value: Time) -> Option<String> {
    if value.nanosecond() == 0 {
        value
            .format(format_description!("[hour]:[minute]:[second]"))
            .ok()
    } else {
        value
            .format(format_description!("[hour]:[minute]:[second].[subsecond]"))
            .ok()
    }
}

fn format_datetime(value: PrimitiveDateTime) -> Option<String> {
    Some(format!(
        "{} {}",
        format_date(value.date())?,
        format_time(value.time())?
    ))
}

fn format_offset_datetime(value: OffsetDateTime) -> Option<String> {
    value.format(&Rfc3339).ok()
}

fn text_or_unsupported(
    formatted: Option<String>,
    column: &str,
    type_name: &str,
) -> Result<SeedValue, SeedError> {
    formatted
        .map(SeedValue::Text)
        .ok_or_else(|| unsupported(column, type_name))
}

/// JSON exactly as the server sent it: key order, number precision and
/// duplicate keys are kept.
fn json_text(value: Json<Box<RawValue>>) -> SeedValue {
    SeedValue::Text(value.0.get().to_string())
}

fn unsigned(value: u64) -> SeedValue {
    i64::try_from(value)
        .map(SeedValue::Int)
        .unwrap_or_else(|_| SeedValue::Text(value.to_string()))
}

pub(crate) fn pg_row(row: &PgRow) -> Result<TableRow, SeedError> {
    let mut out = TableRow::with_capacity(row.columns().len());

    for column in row.columns() {
        let i = column.ordinal();
        let name = column.name();
        let raw = row.try_get_raw(i)?;
        if raw.is_null() {
            out.push(name, SeedValue::Null);
            continue;
        }
        let type_info = raw.type_info();
        let type_name = type_info.name();

        let value = match type_name {
            "BOOL" => SeedValue::Bool(row.try_get(i)?),
            "INT2" => SeedValue::Int(row.try_get::<i16, _>(i)?.into()),
            "INT4" => SeedValue::Int(row.try_get::<i32, _>(i)?.into()),
            "INT8" => SeedValue::Int(row.try_get(i)?),
            "FLOAT4" => SeedValue::Float(widen_f32(row.try_get(i)?)),
            "FLOAT8" => SeedValue::Float(row.try_get(i)?),
            "NUMERIC" => SeedValue::Text(row.try_get::<rust_decimal::Decimal, _>(i)?.to_string()),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => SeedValue::Text(row.try_get(i)?),
            "BYTEA" => SeedValue::Bytes(row.try_get(i)?),
            "UUID" => SeedValue::Text(row.try_get::<uuid::Uuid, _>(i)?.to_string()),
            "JSON" | "JSONB" => json_text(row.try_get(i)?),
            "DATE" => text_or_unsupported(format_date(row.try_get(i)?), name, type_name)?,
            "TIME" => text_or_unsupported(format_time(row.try_get(i)?), name, type_name)?,
            "TIMESTAMP" => {
                text_or_unsupported(format_datetime(row.try_get(i)?), name, type_name)?
            }
            "TIMESTAMPTZ" => {
                text_or_unsupported(format_offset_datetime(row.try_get(i)?), name, type_name)?
            }
            _ => return Err(unsupported(name, type_name)),
        };
        out.push(name, value);
    }

    Ok(out)
}

pub(crate) fn mysql_row(row: &MySqlRow) -> Result<TableRow, SeedError> {
    let mut out = TableRow::with_capacity(row.columns().len());

    for column in row.columns() {
        let i = column.ordinal();
        let name = column.name();
        let raw = row.try_get_raw(i)?;
        if raw.is_null() {
            out.push(name, SeedValue::Null);
            continue;
        }
        let type_info = raw.type_info();
        let type_name = type_info.name();

        let value = match type_name {
            "BOOLEAN" => SeedValue::Bool(row.try_get(i)?),
            "TINYINT" => SeedValue::Int(row.try_get::<i8, _>(i)?.into()),
            "SMALLINT" => SeedValue::Int(row.try_get::<i16, _>(i)?.into()),
            "MEDIUMINT" | "INT" => SeedValue::Int(row.try_get::<i32, _>(i)?.into()),
            "BIGINT" => SeedValue::Int(row.try_get(i)?),
            "TINYINT UNSIGNED" => SeedValue::Int(row.try_get::<u8, _>(i)?.into()),
            "SMALLINT UNSIGNED" => SeedValue::Int(row.try_get::<u16, _>(i)?.into()),
            "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => {
                SeedValue::Int(row.try_get::<u32, _>(i)?.into())
            }
            "BIGINT UNSIGNED" => unsigned(row.try_get(i)?),
            "FLOAT" => SeedValue::Float(widen_f32(row.try_get(i)?)),
            "DOUBLE" => SeedValue::Float(row.try_get(i)?),
            "DECIMAL" => SeedValue::Text(row.try_get::<rust_decimal::Decimal, _>(i)?.to_string()),
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => SeedValue::Text(row.try_get(i)?),
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                SeedValue::Bytes(row.try_get(i)?)
            }
            "JSON" => json_text(row.try_get(i)?),
            "DATE" => text_or_unsupported(format_date(row.try_get(i)?), name, type_name)?,
            "TIME" => text_or_unsupported(format_time(row.try_get(i)?), name, type_name)?,
            "DATETIME" | "TIMESTAMP" => {
                text_or_unsupported(format_datetime(row.try_get(i)?), name, type_name)?
            }
            _ => return Err(unsupported(name, type_name)),
        };
        out.push(name, value);
    }

    Ok(out)
}

/// SQLite values carry their own storage class, which is what the raw value reports.
pub(crate) fn sqlite_row(row: &SqliteRow) -> Result<TableRow, SeedError> {
    let mut out = TableRow::with_capacity(row.columns().len());

    for column in row.columns() {
        let i = column.ordinal();
        let name = column.name();
        let raw = row.try_get_raw(i)?;
        if raw.is_null() {
            out.push(name, SeedValue::Null);
            continue;
        }
        let type_info = raw.type_info();
        let type_name = type_info.name();

        let value = match type_name {
            "INTEGER" => SeedValue::Int(row.try_get_unchecked(i)?),
            "BOOLEAN" => SeedValue::Bool(row.try_get_unchecked(i)?),
            "REAL" => SeedValue::Float(row.try_get_unchecked(i)?),
            "TEXT" | "DATE" | "TIME" | "DATETIME" => SeedValue::Text(row.try_get_unchecked(i)?),
            "BLOB" => SeedValue::Bytes(row.try_get_unchecked(i)?),
            _ => return Err(unsupported(name, type_name)),
        };
        out.push(name, value);
    }

    Ok(out)
}
