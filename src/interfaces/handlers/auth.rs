use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    post, web, HttpResponse,
};
use tracing::instrument;

use crate::{
    domain::validation::{Payload, Schema},
    entities::{identity::CallContext, user::LoginRequest},
    envelope::Envelope,
    errors::AppError,
    use_cases::extractors::SESSION_COOKIE,
    AppState,
};

fn session_cookie(state: &AppState, session_id: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session_id)
        .path("/")
        .http_only(true)
        .secure(state.config.is_production())
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::minutes(state.config.session_ttl_minutes as i64))
        .finish()
}

#[post("/login")]
#[instrument(skip(state, body))]
pub async fn login(state: web::Data<AppState>, body: Result<web::Bytes, actix_web::Error>) -> Result<HttpResponse, AppError> {
    let request = LoginRequest::parse(Payload::from_body(body)).map_err(AppError::ValidationError)?;
    let outcome = state.auth_handler.login(request).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state, outcome.session_id))
        .json(Envelope::success(outcome.response)))
}

#[post("/logout")]
#[instrument(skip(state, ctx))]
pub async fn logout(state: web::Data<AppState>, ctx: CallContext) -> Result<HttpResponse, AppError> {
    state.auth_handler.logout(ctx.session_id.as_deref()).await?;

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(Envelope::success(serde_json::json!({ "message": "Logged out successfully" }))))
}
