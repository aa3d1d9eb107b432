//! Decoding of the source's column-major kbars reply.
//!
//! The reply is a JSON object whose keys are column names and whose
//! values are equal-length arrays. Key order is source-defined and NOT
//! stable across requests, so the decoded [`BarSet`] records the arrival
//! order; the archive writer needs it when creating a file.

use serde_json::Value;
use taroko_types::{BarColumn, BarSet, MinuteBar, timestamp};
use thiserror::Error;

/// Errors decoding a source reply.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The reply is not a JSON object.
    #[error("Reply is not a JSON object")]
    NotAnObject,

    /// The reply carries a column outside the bar schema.
    #[error("Unknown column {0:?} in reply")]
    UnknownColumn(String),

    /// A required schema column is missing from the reply.
    #[error("Missing column {0:?} in reply")]
    MissingColumn(&'static str),

    /// A column's value is not an array.
    #[error("Column {0:?} is not an array")]
    NotAnArray(&'static str),

    /// Column arrays have different lengths.
    #[error("Column {column:?} has {actual} values, expected {expected}")]
    LengthMismatch {
        /// The offending column.
        column: &'static str,
        /// Values present in that column.
        actual: usize,
        /// Length of the first column.
        expected: usize,
    },

    /// A cell could not be read as the column's type.
    #[error("Bad value in column {column:?} at row {row}")]
    BadValue {
        /// The offending column.
        column: &'static str,
        /// Zero-based row index.
        row: usize,
    },

    /// A required field is missing from a bookkeeping reply.
    #[error("Missing field {0:?} in reply")]
    MissingField(&'static str),
}

/// Decodes a column-major kbars reply into a bar set.
///
/// Every schema column must be present exactly once; `ts` cells are
/// epoch integers (nanoseconds from the live source, but any magnitude
/// is classified). An object of empty arrays decodes to an empty set.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first structural problem.
pub fn decode_bars(reply: &Value) -> Result<BarSet, DecodeError> {
    let object = reply.as_object().ok_or(DecodeError::NotAnObject)?;

    let mut columns = Vec::with_capacity(object.len());
    let mut arrays = Vec::with_capacity(object.len());
    for (key, value) in object {
        let column = BarColumn::from_name(key)
            .ok_or_else(|| DecodeError::UnknownColumn(key.clone()))?;
        let array = value
            .as_array()
            .ok_or(DecodeError::NotAnArray(column.as_str()))?;
        columns.push(column);
        arrays.push(array);
    }
    for required in BarColumn::ALL {
        if !columns.contains(&required) {
            return Err(DecodeError::MissingColumn(required.as_str()));
        }
    }

    let rows = arrays.first().map_or(0, |array| array.len());
    for (column, array) in columns.iter().zip(&arrays) {
        if array.len() != rows {
            return Err(DecodeError::LengthMismatch {
                column: column.as_str(),
                actual: array.len(),
                expected: rows,
            });
        }
    }

    let mut bars = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut ts = None;
        let (mut open, mut high, mut low, mut close, mut volume) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (column, array) in columns.iter().zip(&arrays) {
            let cell = &array[row];
            match column {
                BarColumn::Ts => {
                    let epoch = as_epoch(cell).ok_or(DecodeError::BadValue {
                        column: column.as_str(),
                        row,
                    })?;
                    ts = Some(timestamp::epoch_to_datetime(epoch).ok_or(
                        DecodeError::BadValue {
                            column: column.as_str(),
                            row,
                        },
                    )?);
                }
                BarColumn::Open => open = as_price(cell, column.as_str(), row)?,
                BarColumn::High => high = as_price(cell, column.as_str(), row)?,
                BarColumn::Low => low = as_price(cell, column.as_str(), row)?,
                BarColumn::Close => close = as_price(cell, column.as_str(), row)?,
                BarColumn::Volume => volume = as_price(cell, column.as_str(), row)?,
            }
        }
        // Presence of every schema column was checked above.
        let ts = ts.ok_or(DecodeError::MissingColumn("ts"))?;
        bars.push(MinuteBar::new(ts, open, high, low, close, volume));
    }

    Ok(BarSet::new(columns, bars))
}

/// Decodes the `{"bytes": <u64>}` usage reply.
///
/// # Errors
///
/// Returns an error if the field is missing or not an unsigned integer.
pub fn decode_usage(reply: &Value) -> Result<u64, DecodeError> {
    reply
        .as_object()
        .ok_or(DecodeError::NotAnObject)?
        .get("bytes")
        .and_then(Value::as_u64)
        .ok_or(DecodeError::MissingField("bytes"))
}

/// Reads an epoch cell; floats survive serialization through some
/// gateways and are truncated to integers.
fn as_epoch(cell: &Value) -> Option<i64> {
    cell.as_i64().or_else(|| {
        cell.as_f64()
            .filter(|value| value.is_finite())
            .map(|value| value as i64)
    })
}

fn as_price(cell: &Value, column: &'static str, row: usize) -> Result<f64, DecodeError> {
    cell.as_f64().ok_or(DecodeError::BadValue { column, row })
}
