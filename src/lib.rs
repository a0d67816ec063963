use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod constants;
pub mod envelope;
pub mod errors;
pub mod graceful_shutdown;
pub mod services;
pub mod settings;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{actions, handlers, repositories, routes};
pub use infrastructure::{auth, db, utils};

use actions::Actions;
use auth::{
    identity::{SessionIdentityResolver, TokenIdentityResolver},
    jwt::JwtService,
};
use repositories::{document_store::SharedStore, session_store::SessionStore};
use services::Services;
use use_cases::{auth::AuthHandler, gate::Gate};

pub struct AppState {
    pub config: settings::AppConfig,
    pub store: SharedStore,
    pub sessions: Arc<dyn SessionStore>,
    pub services: Services,
    /// Gated operations for HTTP callers (bearer token).
    pub api: Actions,
    /// Gated operations for in-process callers (session id).
    pub actions: Actions,
    pub auth_handler: AuthHandler,
}

impl AppState {
    pub fn new(config: settings::AppConfig, store: SharedStore, sessions: Arc<dyn SessionStore>) -> Self {
        let jwt_service = JwtService::new(&config);
        let services = Services::new(store.clone());

        let token_gate = Gate::new(Arc::new(TokenIdentityResolver::new(jwt_service.clone())));
        let session_gate = Gate::new(Arc::new(SessionIdentityResolver::new(sessions.clone())));

        let auth_handler = AuthHandler::new(
            config.admin_account(),
            jwt_service,
            sessions.clone(),
            config.session_ttl(),
        );

        AppState {
            api: Actions::new(token_gate, services.clone()),
            actions: Actions::new(session_gate, services.clone()),
            services,
            auth_handler,
            store,
            sessions,
            config,
        }
    }
}
