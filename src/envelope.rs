use actix_web::{
    body::BoxBody,
    http::StatusCode,
    HttpRequest, HttpResponse, Responder,
};
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::errors::AppError;

/// Uniform response shape shared by every route and action.
///
/// Exactly one of `data` or `error` is ever present:
/// `{ "success": true, "data": ... }` or
/// `{ "success": false, "error": { "code", "message", "details"? } }`.
#[derive(Debug)]
pub enum Envelope<T> {
    Success(T),
    Failure(AppError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a crate::errors::FieldErrors>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope::Success(data)
    }

    pub fn failure(error: AppError) -> Self {
        if let AppError::InternalError(cause) = &error {
            tracing::error!(code = error.code(), "{}", cause);
        }
        Envelope::Failure(error)
    }

    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Envelope::success(data),
            Err(e) => Envelope::failure(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success(data) => Some(data),
            Envelope::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            Envelope::Success(data) => Ok(data),
            Envelope::Failure(e) => Err(e),
        }
    }

    /// Attach the HTTP status used when this envelope succeeds.
    pub fn with_status(self, success_status: StatusCode) -> ApiResponse<T> {
        ApiResponse { envelope: self, success_status }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Envelope::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Envelope::Failure(error) => {
                let details = match error {
                    AppError::ValidationError(fields) => Some(fields),
                    _ => None,
                };
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &ErrorBody {
                    code: error.code(),
                    message: error.public_message(),
                    details,
                })?;
            }
        }
        state.end()
    }
}

/// Envelope plus the status code it should be sent with.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub envelope: Envelope<T>,
    pub success_status: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn status(&self) -> StatusCode {
        match &self.envelope {
            Envelope::Success(_) => self.success_status,
            Envelope::Failure(e) => e.status(),
        }
    }
}

impl<T> From<Envelope<T>> for ApiResponse<T> {
    fn from(envelope: Envelope<T>) -> Self {
        envelope.with_status(StatusCode::OK)
    }
}

impl<T: Serialize> Responder for ApiResponse<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::build(self.status()).json(&self.envelope)
    }
}
