//! Request payload validation shared by the REST handlers.
//!
//! Every rejection is an `invalid_request` domain error whose `details`
//! object names the offending field and a machine-readable `code`, so kiosk
//! front-ends can highlight the right input without parsing prose.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::Error;

/// Machine-readable rejection codes surfaced under `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    Blank,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::Blank => "blank",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// Wire-level field name, kept as a distinct type so handlers cannot swap a
/// field for a message by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Assemble the rejection error. `index` and `value` are added to the
/// details only when present; `value` always carries the rejected input as
/// text, whatever its JSON type was.
fn rejection(
    field: &str,
    message: String,
    code: ErrorCode,
    index: Option<usize>,
    value: Option<String>,
) -> Error {
    let mut details = Map::new();
    details.insert("field".to_owned(), Value::from(field));
    if let Some(index) = index {
        details.insert("index".to_owned(), Value::from(index));
    }
    if let Some(value) = value {
        details.insert("value".to_owned(), Value::from(value));
    }
    details.insert("code".to_owned(), Value::from(code.as_str()));
    Error::invalid_request(message).with_details(Value::Object(details))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    rejection(
        field,
        format!("{field} must be a valid UUID"),
        ErrorCode::InvalidUuid,
        None,
        Some(value.to_owned()),
    )
}

pub(crate) fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    rejection(
        field,
        format!("{field} must contain valid UUIDs"),
        ErrorCode::InvalidUuid,
        Some(index),
        Some(value.to_owned()),
    )
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn parse_uuid_list(values: Vec<String>, field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(&value).map_err(|_| invalid_uuid_index_error(field, index, &value))
        })
        .collect()
}

pub(crate) fn require_non_blank(value: String, field: FieldName) -> Result<String, Error> {
    if value.trim().is_empty() {
        let field = field.as_str();
        return Err(rejection(
            field,
            format!("{field} must not be blank"),
            ErrorCode::Blank,
            None,
            None,
        ));
    }
    Ok(value)
}

pub(crate) fn require_non_negative(value: i32, field: FieldName) -> Result<i32, Error> {
    if value < 0 {
        let field = field.as_str();
        return Err(rejection(
            field,
            format!("{field} must not be negative"),
            ErrorCode::OutOfRange,
            None,
            Some(value.to_string()),
        ));
    }
    Ok(value)
}

pub(crate) fn require_positive(value: i32, field: FieldName) -> Result<i32, Error> {
    if value < 1 {
        let field = field.as_str();
        return Err(rejection(
            field,
            format!("{field} must be at least 1"),
            ErrorCode::OutOfRange,
            None,
            Some(value.to_string()),
        ));
    }
    Ok(value)
}
