//! Handlers shared by every plain CRUD resource, instantiated per type in the routes.

use actix_web::{http::StatusCode, web, Responder};
use tracing::instrument;

use crate::{
    domain::validation::Payload,
    entities::{
        identity::CallContext,
        project::{Project, ProjectQuery},
        resource::Resource,
    },
    envelope::Envelope,
    repositories::document_store::Filter,
    AppState,
};

#[instrument(skip(state), fields(collection = R::COLLECTION))]
pub async fn get_all<R: Resource>(state: web::Data<AppState>) -> impl Responder {
    let result = state.services.resource::<R>().get_all(Filter::all(), None).await;
    Envelope::from_result(result).with_status(StatusCode::OK)
}

#[instrument(skip(state), fields(collection = R::COLLECTION))]
pub async fn get_by_id<R: Resource>(state: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    let result = state.services.resource::<R>().get_by_id(&id).await;
    Envelope::from_result(result).with_status(StatusCode::OK)
}

#[instrument(skip(state, ctx, body), fields(collection = R::COLLECTION))]
pub async fn create<R: Resource>(state: web::Data<AppState>, ctx: CallContext, body: Result<web::Bytes, actix_web::Error>) -> impl Responder {
    state
        .api
        .create::<R>(&ctx, Payload::from_body(body))
        .await
        .with_status(StatusCode::CREATED)
}

#[instrument(skip(state, ctx, body), fields(collection = R::COLLECTION))]
pub async fn update<R: Resource>(
    state: web::Data<AppState>,
    ctx: CallContext,
    id: web::Path<String>,
    body: Result<web::Bytes, actix_web::Error>,
) -> impl Responder {
    state
        .api
        .update::<R>(&ctx, &id, Payload::from_body(body))
        .await
        .with_status(StatusCode::OK)
}

#[instrument(skip(state, ctx), fields(collection = R::COLLECTION))]
pub async fn delete<R: Resource>(state: web::Data<AppState>, ctx: CallContext, id: web::Path<String>) -> impl Responder {
    state.api.delete::<R>(&ctx, &id).await.with_status(StatusCode::OK)
}

/// Project list, optionally only featured ones.
#[instrument(skip(state))]
pub async fn get_projects(state: web::Data<AppState>, query: web::Query<ProjectQuery>) -> impl Responder {
    let filter = match query.featured {
        Some(featured) => Filter::eq("featured", featured),
        None => Filter::all(),
    };
    let result = state.services.resource::<Project>().get_all(filter, None).await;
    Envelope::from_result(result).with_status(StatusCode::OK)
}
