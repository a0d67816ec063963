use actix_web::{
    dev::ServiceResponse,
    error::QueryPayloadError,
    http::header,
    middleware::ErrorHandlerResponse,
    HttpRequest, ResponseError,
};

use crate::errors::{AppError, FieldErrors};

const QUERY_FIELD: &str = "query";

/// Undecodable query strings answer as `VALIDATION_ERROR` envelopes.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected query string: {}", err);
    let mut details = FieldErrors::new();
    details.insert(QUERY_FIELD.to_string(), vec![err.to_string()]);
    AppError::ValidationError(details).into()
}

fn no_route(req: &HttpRequest) -> AppError {
    AppError::NotFound(format!("No route for {} {}", req.method(), req.path()))
}

/// Default service for paths no resource matches.
pub async fn route_not_found(req: HttpRequest) -> Result<actix_web::HttpResponse, AppError> {
    Err(no_route(&req))
}

/// Rewrites actix's bare 404/405 responses as envelopes. Responses that already carry
/// a content type come from our handlers and pass through untouched.
pub fn bare_error_to_envelope<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if res.response().headers().contains_key(header::CONTENT_TYPE) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let error = no_route(res.request());
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, error.error_response()).map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}
