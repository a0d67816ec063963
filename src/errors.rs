use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::StatusCode,
    HttpResponse
};
use derive_more::Display;
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::envelope::Envelope;

/// Per-field validation complaints: `{ "title": ["Title is required"], ... }`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub enum AppError {
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    ValidationError(FieldErrors),
    NotFound(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|(field, msgs)| format!("{}:{}", field, msgs.join("|")))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Authentication required".into())
    }

    /// Stable machine-readable code carried in the failure envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InternalError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Internal details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::ValidationError(_) => "Validation failed".to_string(),
            AppError::InternalError(_) => "An unexpected error occurred".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(Envelope::<()>::failure(self.clone()))
    }

    fn status_code(&self) -> StatusCode {
        self.status()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(field_errors_from(&errors))
    }
}

/// Flattens validator output into `field -> [messages]`, nested structs as `parent.child`.
pub fn field_errors_from(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect_field_errors(errors, None, &mut out);
    out
}

fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field,
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(path).or_default();
                messages.extend(list.iter().map(describe));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, Some(&format!("{}[{}]", path, index)), out);
                }
            }
        }
    }
}

/// Struct fields are snake_case, payload keys are camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "email" => "Must be a valid email address".to_string(),
        "url" => "Must be a valid URL".to_string(),
        "length" => "Invalid length".to_string(),
        "range" => "Value out of range".to_string(),
        "required" => "This field is required".to_string(),
        _ => "Invalid value".to_string(),
    }
}

/// Wraps a single rule violation found outside the schema step.
pub fn field_errors_from_single(field: &str, error: ValidationError) -> AppError {
    let mut details = FieldErrors::new();
    details.insert(field.to_string(), vec![describe(&error)]);
    AppError::ValidationError(details)
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("Document shape error: {}", err))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation => AppError::InternalError(err.to_string()),
            AuthError::Forbidden(msg) => AppError::Forbidden(msg),
            _ => AppError::Unauthorized(err.to_string()),
        }
    }
}

#[derive(Debug, Display)]
pub enum AuthError {
    #[display("Invalid token")]
    InvalidToken,

    #[display("Token expired")]
    TokenExpired,

    #[display("Wrong credentials")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,

    #[display("Forbidden: {_0}")]
    Forbidden(String),
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display("Store connection error: {_0}")]
    Connection(String),

    #[display("Store query error: {_0}")]
    Query(String),

    #[display("Document conversion error: {_0}")]
    Conversion(String),
}

impl std::error::Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum SessionError {
    #[display("Session store unavailable: {_0}")]
    Unavailable(String),

    #[display("Session store operation failed: {_0}")]
    Operation(String),

    #[display("Corrupt session record: {_0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Inner {
        #[validate(url)]
        site: String,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email)]
        email: String,
        #[validate(nested)]
        inner: Inner,
    }

    #[test]
    fn codes_and_statuses_follow_the_taxonomy() {
        let cases = [
            (AppError::unauthorized(), "UNAUTHORIZED", 401),
            (AppError::Forbidden("no".into()), "FORBIDDEN", 403),
            (AppError::BadRequest("bad".into()), "BAD_REQUEST", 400),
            (AppError::ValidationError(FieldErrors::new()), "VALIDATION_ERROR", 400),
            (AppError::NotFound("gone".into()), "NOT_FOUND", 404),
            (AppError::InternalError("boom".into()), "INTERNAL_SERVER_ERROR", 500),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status().as_u16(), status);
        }
    }

    #[test]
    fn internal_message_is_generic() {
        let err = AppError::InternalError("connection refused at 10.0.0.3".into());
        assert!(!err.public_message().contains("10.0.0.3"));
    }

    #[test]
    fn validator_errors_flatten_per_field() {
        let value = Outer {
            name: String::new(),
            email: "nope".into(),
            inner: Inner { site: "::".into() },
        };
        let details = field_errors_from(&value.validate().unwrap_err());

        assert_eq!(details.len(), 3);
        assert_eq!(details["name"], vec!["Name is required".to_string()]);
        assert_eq!(details["email"], vec!["Must be a valid email address".to_string()]);
        assert_eq!(details["inner.site"], vec!["Must be a valid URL".to_string()]);
    }

    #[test]
    fn field_keys_use_payload_casing() {
        assert_eq!(camel_case("social_links"), "socialLinks");
        assert_eq!(camel_case("field_of_study"), "fieldOfStudy");
        assert_eq!(camel_case("title"), "title");
    }

    #[test]
    fn expired_jwt_maps_to_token_expired() {
        let err = AuthError::from(JwtError::from(ErrorKind::ExpiredSignature));
        assert!(matches!(err, AuthError::TokenExpired));
        assert_eq!(AppError::from(err).code(), "UNAUTHORIZED");
    }
}
