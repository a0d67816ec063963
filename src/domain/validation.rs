use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::errors::{field_errors_from, FieldErrors};

/// Raw, unvalidated input handed to the gate: a request body or an action argument.
///
/// Nothing about its shape is assumed until a [`Schema`] accepts it.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(Value),
    Malformed(String),
    /// The transport gave up on the body, e.g. it exceeded the size limit.
    Unreadable(String),
}

impl Payload {
    pub fn empty() -> Self {
        Payload::Json(Value::Object(Map::new()))
    }

    /// Parses a request body. An empty body counts as `{}`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Payload::empty();
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Payload::Json(value),
            Err(e) => Payload::Malformed(e.to_string()),
        }
    }

    /// Like [`Payload::from_bytes`], but keeps a failed body read for the gate to report.
    pub fn from_body<B, E>(body: Result<B, E>) -> Self
    where
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        match body {
            Ok(bytes) => Self::from_bytes(bytes.as_ref()),
            Err(e) => Payload::Unreadable(e.to_string()),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

/// Promotes a [`Payload`] into a typed, validated input.
pub trait Schema: Sized {
    fn parse(payload: Payload) -> Result<Self, FieldErrors>;
}

const BODY_FIELD: &str = "body";

impl<T> Schema for T
where
    T: DeserializeOwned + Validate,
{
    fn parse(payload: Payload) -> Result<Self, FieldErrors> {
        let value = match payload {
            Payload::Json(value @ Value::Object(_)) => value,
            Payload::Json(_) => return Err(body_error("Request body must be a JSON object")),
            Payload::Malformed(reason) => return Err(body_error(&format!("Malformed JSON: {}", reason))),
            Payload::Unreadable(reason) => return Err(body_error(&format!("Request body could not be read: {}", reason))),
        };

        let input: T = serde_json::from_value(value)
            .map_err(|e| body_error(&e.to_string()))?;

        input.validate().map_err(|errors| field_errors_from(&errors))?;
        Ok(input)
    }
}

fn body_error(message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(BODY_FIELD.to_string(), vec![message.to_string()]);
    errors
}

/// Schema for operations that take no body (delete, publish).
#[derive(Debug, Default, serde::Deserialize)]
pub struct NoInput {}

impl Validate for NoInput {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        Ok(())
    }
}
