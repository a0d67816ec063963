use actix_web::{http::StatusCode, web, Responder};
use tracing::instrument;

use crate::{domain::validation::Payload, entities::identity::CallContext, envelope::Envelope, AppState};

#[instrument(skip(state))]
pub async fn get_skills(state: web::Data<AppState>) -> impl Responder {
    Envelope::from_result(state.services.skills().get_skills_list().await).with_status(StatusCode::OK)
}

#[instrument(skip(state, ctx, body))]
pub async fn update_skills(state: web::Data<AppState>, ctx: CallContext, body: Result<web::Bytes, actix_web::Error>) -> impl Responder {
    state
        .api
        .update_skills(&ctx, Payload::from_body(body))
        .await
        .with_status(StatusCode::OK)
}
