use std::{sync::Arc, time::Duration};

use crate::{
    auth::{jwt::JwtService, password::verify_password},
    entities::{
        identity::Identity,
        token::AuthResponse,
        user::{AdminAccount, LoginRequest},
    },
    errors::{AppError, AuthError},
    repositories::session_store::SessionStore,
};

/// A successful login: the token answer plus the server-side session behind the cookie.
#[derive(Debug)]
pub struct LoginOutcome {
    pub response: AuthResponse,
    pub session_id: String,
}

pub struct AuthHandler {
    admin: AdminAccount,
    jwt: JwtService,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

impl AuthHandler {
    pub fn new(
        admin: AdminAccount,
        jwt: JwtService,
        sessions: Arc<dyn SessionStore>,
        session_ttl: Duration,
    ) -> Self {
        AuthHandler { admin, jwt, sessions, session_ttl }
    }

    /// Checks the admin credentials, then issues a JWT and opens a session.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AppError> {
        if !self.admin.matches_email(&request.email) {
            return Err(AuthError::WrongCredentials.into());
        }

        let is_password_valid = verify_password(&request.password, &self.admin.password_hash)
            .map_err(|e| {
                tracing::warn!("Admin password check failed: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials.into());
        }

        let identity = Identity {
            user_id: AdminAccount::USER_ID.to_string(),
            email: self.admin.email.clone(),
        };
        let access_token = self.jwt.create_jwt(&identity)?;
        let session_id = self.sessions.create(&identity, self.session_ttl).await?;

        tracing::info!("Admin logged in successfully");
        Ok(LoginOutcome {
            response: AuthResponse::new(access_token, self.jwt.expires_in_seconds()),
            session_id,
        })
    }

    /// Drops the session. Unknown ids are not an error.
    pub async fn logout(&self, session_id: Option<&str>) -> Result<(), AppError> {
        if let Some(session_id) = session_id {
            self.sessions.destroy(session_id).await?;
            tracing::info!("Session closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::password::hash_password, repositories::session_store::MemorySessionStore,
        settings::AppConfig,
    };

    fn handler(sessions: Arc<MemorySessionStore>) -> AuthHandler {
        let mut config = AppConfig::for_tests();
        config.admin_password_hash = hash_password("correct horse").unwrap();
        AuthHandler::new(config.admin_account(), JwtService::new(&config), sessions, config.session_ttl())
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn login_issues_token_and_session() {
        let sessions = Arc::new(MemorySessionStore::new());
        let auth = handler(sessions.clone());

        let outcome = auth.login(login("Admin@Example.com", "correct horse")).await.unwrap();
        assert_eq!(outcome.response.token_type, "Bearer");
        assert!(!outcome.response.access_token.is_empty());

        let identity = sessions.get(&outcome.session_id).await.unwrap().unwrap();
        assert_eq!(identity.user_id, "admin");

        auth.logout(Some(&outcome.session_id)).await.unwrap();
        assert!(sessions.get(&outcome.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_credentials_are_unauthorized() {
        let auth = handler(Arc::new(MemorySessionStore::new()));

        let err = auth.login(login("admin@example.com", "wrong")).await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");

        let err = auth.login(login("someone@example.com", "correct horse")).await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
