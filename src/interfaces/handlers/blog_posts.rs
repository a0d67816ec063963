use actix_web::{http::StatusCode, web, Responder};
use tracing::instrument;
use validator::Validate;

use crate::{
    domain::validation::Payload,
    entities::{blog_post::BlogQuery, identity::CallContext},
    envelope::Envelope,
    errors::AppError,
    AppState,
};

#[instrument(skip(state, ctx, body))]
pub async fn create_blog_post(state: web::Data<AppState>, ctx: CallContext, body: Result<web::Bytes, actix_web::Error>) -> impl Responder {
    state
        .api
        .create_blog(&ctx, Payload::from_body(body))
        .await
        .with_status(StatusCode::CREATED)
}

#[instrument(skip(state))]
pub async fn get_all_blog_posts(state: web::Data<AppState>, query: web::Query<BlogQuery>) -> impl Responder {
    let result = match query.validate() {
        Ok(()) => state.services.blogs().get_all_blog_posts(&query).await,
        Err(errors) => Err(AppError::from(errors)),
    };
    Envelope::from_result(result).with_status(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn get_blog_tags(state: web::Data<AppState>) -> impl Responder {
    Envelope::from_result(state.services.blogs().get_tags().await).with_status(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn get_blog_post_by_slug(state: web::Data<AppState>, slug: web::Path<String>) -> impl Responder {
    Envelope::from_result(state.services.blogs().get_blog_post_by_slug(&slug).await).with_status(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn get_blog_post_by_id(state: web::Data<AppState>, post_id: web::Path<String>) -> impl Responder {
    Envelope::from_result(state.services.blogs().get_blog_post_by_id(&post_id).await).with_status(StatusCode::OK)
}

#[instrument(skip(state, ctx, body))]
pub async fn update_blog_post(
    state: web::Data<AppState>,
    ctx: CallContext,
    post_id: web::Path<String>,
    body: Result<web::Bytes, actix_web::Error>,
) -> impl Responder {
    state
        .api
        .update_blog(&ctx, &post_id, Payload::from_body(body))
        .await
        .with_status(StatusCode::OK)
}

#[instrument(skip(state, ctx))]
pub async fn publish_blog_post(state: web::Data<AppState>, ctx: CallContext, post_id: web::Path<String>) -> impl Responder {
    state.api.publish_blog(&ctx, &post_id).await.with_status(StatusCode::OK)
}

#[instrument(skip(state, ctx))]
pub async fn delete_blog_post(state: web::Data<AppState>, ctx: CallContext, post_id: web::Path<String>) -> impl Responder {
    state.api.delete_blog(&ctx, &post_id).await.with_status(StatusCode::OK)
}

/// One like per caller address; no sign-in needed.
#[instrument(skip(state, ctx))]
pub async fn like_blog_post(state: web::Data<AppState>, ctx: CallContext, post_id: web::Path<String>) -> impl Responder {
    let result = match ctx.client_ip.as_deref() {
        Some(caller) => state.services.blogs().increment_likes(&post_id, caller).await,
        None => Err(AppError::BadRequest("Unable to identify the caller".to_string())),
    };
    Envelope::from_result(result).with_status(StatusCode::OK)
}
