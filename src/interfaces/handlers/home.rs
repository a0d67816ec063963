use actix_web::{get, Responder};
use serde_json::json;

use crate::envelope::Envelope;

#[get("/")]
pub async fn home() -> impl Responder {
    Envelope::success(json!({
        "message": "Welcome to the Portfolio CMS API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/health"
    }))
    .with_status(actix_web::http::StatusCode::OK)
}
