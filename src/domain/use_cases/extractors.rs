use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{entities::identity::CallContext, utils::get_client_ip::get_client_ip, AppState};

pub const SESSION_COOKIE: &str = "session_id";

/// Builds the [`CallContext`] of an HTTP request.
///
/// Never fails: a request without credentials is simply anonymous, and the gate
/// decides what that means for the operation.
impl FromRequest for CallContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(call_context(req)))
    }
}

pub fn call_context(req: &HttpRequest) -> CallContext {
    let trust_forwarded = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.config.trust_x_forwarded_for)
        .unwrap_or(false);

    CallContext {
        bearer_token: bearer_token(req),
        session_id: req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()),
        client_ip: get_client_ip(req, trust_forwarded),
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{cookie::Cookie, test::TestRequest};

    #[test]
    fn reads_bearer_cookie_and_peer() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .cookie(Cookie::new(SESSION_COOKIE, "s-1"))
            .peer_addr("10.1.2.3:4000".parse().unwrap())
            .to_http_request();

        let ctx = call_context(&req);
        assert_eq!(ctx.bearer_token.as_deref(), Some("abc.def"));
        assert_eq!(ctx.session_id.as_deref(), Some("s-1"));
        assert_eq!(ctx.client_ip.as_deref(), Some("10.1.2.3"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcg=="))
            .to_http_request();

        assert!(call_context(&req).bearer_token.is_none());
    }
}
