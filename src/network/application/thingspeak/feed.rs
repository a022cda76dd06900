//! The latest channel entry as returned by a multi-field read.

use super::convert::{parse_float, parse_int, parse_long};
use super::fields::{FIELD_COUNT, FIELD_MIN, Value, valid_field};
use super::json::value_by_key;
use crate::error::Error;
use heapless::String;
use serde::Serialize;

const FIELD_KEYS: [&str; FIELD_COUNT] = [
    "field1", "field2", "field3", "field4", "field5", "field6", "field7", "field8",
];

/// Snapshot of the last entry read with a multi-field read.
///
/// Every value is kept as the text the server sent; the typed getters
/// convert on demand with the lenient rules of the
/// [`convert`](super::convert) module.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedRecord {
    fields: [Value; FIELD_COUNT],
    status: Value,
    latitude: Value,
    longitude: Value,
    elevation: Value,
    created_at: Value,
}

impl FeedRecord {
    /// Builds a snapshot from a `feeds/last.txt` response body.
    ///
    /// Keys that are missing, or whose value is not a string, read back as
    /// `""`. Values longer than a field can hold are cut at a character
    /// boundary.
    pub fn from_json(text: &str) -> Self {
        let mut record = Self::default();
        for (slot, key) in record.fields.iter_mut().zip(FIELD_KEYS) {
            *slot = truncated(value_by_key(text, key));
        }
        record.created_at = truncated(value_by_key(text, "created_at"));
        record.latitude = truncated(value_by_key(text, "latitude"));
        record.longitude = truncated(value_by_key(text, "longitude"));
        record.elevation = truncated(value_by_key(text, "elevation"));
        record.status = truncated(value_by_key(text, "status"));
        record
    }

    /// Text of field `field` (1 to 8); `""` for an invalid field number.
    pub fn field_as_string(&self, field: u8) -> &str {
        if valid_field(field) {
            self.fields[usize::from(field - FIELD_MIN)].as_str()
        } else {
            ""
        }
    }

    /// `0.0` for text or an invalid field number. NaN and infinities are
    /// valid results.
    pub fn field_as_f32(&self, field: u8) -> f32 {
        parse_float(self.field_as_string(field))
    }

    pub fn field_as_i64(&self, field: u8) -> i64 {
        parse_long(self.field_as_string(field))
    }

    pub fn field_as_i32(&self, field: u8) -> i32 {
        parse_int(self.field_as_string(field))
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn elevation(&self) -> &str {
        &self.elevation
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Serializes the snapshot into `buf` and returns the number of bytes
    /// written.
    ///
    /// Fails with [`Error::OutOfRange`] when `buf` is too small.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, Error> {
        serde_json_core::to_slice(self, buf).map_err(|_| Error::OutOfRange)
    }
}

fn truncated(text: &str) -> Value {
    let mut value = String::new();
    for c in text.chars() {
        if value.push(c).is_err() {
            break;
        }
    }
    value
}
