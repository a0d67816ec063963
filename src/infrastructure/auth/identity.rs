use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    auth::jwt::JwtService,
    entities::identity::{CallContext, Identity},
    errors::AppError,
    repositories::session_store::SessionStore,
    use_cases::gate::IdentityResolver,
};

/// Identity from an `Authorization: Bearer <jwt>` header.
pub struct TokenIdentityResolver {
    jwt: JwtService,
}

impl TokenIdentityResolver {
    pub fn new(jwt: JwtService) -> Self {
        TokenIdentityResolver { jwt }
    }
}

#[async_trait]
impl IdentityResolver for TokenIdentityResolver {
    async fn resolve(&self, ctx: &CallContext) -> Result<Option<Identity>, AppError> {
        let Some(token) = ctx.bearer_token.as_deref() else {
            return Ok(None);
        };
        match self.jwt.decode_jwt(token) {
            Ok(data) => Ok(Some(Identity { user_id: data.claims.sub, email: data.claims.email })),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                Ok(None)
            }
        }
    }
}

/// Identity from a server-side session.
pub struct SessionIdentityResolver {
    sessions: Arc<dyn SessionStore>,
}

impl SessionIdentityResolver {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        SessionIdentityResolver { sessions }
    }
}

#[async_trait]
impl IdentityResolver for SessionIdentityResolver {
    async fn resolve(&self, ctx: &CallContext) -> Result<Option<Identity>, AppError> {
        match ctx.session_id.as_deref() {
            Some(session_id) => Ok(self.sessions.get(session_id).await?),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repositories::session_store::MemorySessionStore, settings::AppConfig};
    use std::time::Duration;

    fn admin() -> Identity {
        Identity { user_id: "admin".into(), email: "admin@example.com".into() }
    }

    #[tokio::test]
    async fn token_resolver_accepts_only_valid_tokens() {
        let jwt = JwtService::new(&AppConfig::for_tests());
        let token = jwt.create_jwt(&admin()).unwrap();
        let resolver = TokenIdentityResolver::new(jwt);

        assert_eq!(resolver.resolve(&CallContext::with_bearer(token)).await.unwrap(), Some(admin()));
        assert_eq!(resolver.resolve(&CallContext::with_bearer("garbage")).await.unwrap(), None);
        assert_eq!(resolver.resolve(&CallContext::anonymous()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_resolver_ignores_bearer_tokens() {
        let sessions = Arc::new(MemorySessionStore::new());
        let session_id = sessions.create(&admin(), Duration::from_secs(60)).await.unwrap();
        let resolver = SessionIdentityResolver::new(sessions);

        assert_eq!(resolver.resolve(&CallContext::with_session(session_id)).await.unwrap(), Some(admin()));
        assert_eq!(resolver.resolve(&CallContext::with_bearer("t")).await.unwrap(), None);
    }
}
