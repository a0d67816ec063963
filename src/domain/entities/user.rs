use serde::Deserialize;
use validator::Validate;
use zeroize::Zeroizing;

/// The single administrator, configured rather than stored.
#[derive(Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password_hash: Zeroizing<String>,
}

impl AdminAccount {
    /// Stable subject used in tokens and sessions.
    pub const USER_ID: &'static str = "admin";

    pub fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
