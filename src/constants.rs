use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Largest request body accepted, in bytes. Bigger bodies fail validation under `body`.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
