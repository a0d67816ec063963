use serde::{Deserialize, Serialize};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

/// Everything an operation may learn about who is calling, independent of transport.
///
/// HTTP requests fill it from headers and cookies; in-process actions build it directly.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub bearer_token: Option<String>,
    pub session_id: Option<String>,
    pub client_ip: Option<String>,
}

impl CallContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..Self::default()
        }
    }
}
