use std::convert::TryFrom;

use anyhow::{anyhow, Result};
use rusqlite::types::Type;

use crate::models::CycleType;

pub fn to_i64(value: usize) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn parse_cycle_type(value: &str) -> Result<CycleType> {
    match value {
        "charge" => Ok(CycleType::Charge),
        "discharge" => Ok(CycleType::Discharge),
        other => Err(anyhow!("unknown cycle type {other}")),
    }
}

/// Wrap a decoding failure so it can be returned from a row mapper.
pub fn conversion_error(column: usize, err: anyhow::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, err.into())
}
