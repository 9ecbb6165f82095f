use std::env;

use tracing::warn;

pub const NEWSAPI_KEY_VAR: &str = "NEWSAPI_API_KEY";
pub const GUARDIAN_KEY_VAR: &str = "GUARDIAN_API_KEY";

/// API credentials for the two upstream providers.
///
/// Read once at startup and passed into adapter constructors; there is
/// no process-global credential state. A missing variable degrades to an
/// empty key: the provider will reject those requests and the
/// aggregator's degrade policy absorbs the failure.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub newsapi_key: String,
    pub guardian_key: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        let newsapi_key = env::var(NEWSAPI_KEY_VAR).unwrap_or_default();
        let guardian_key = env::var(GUARDIAN_KEY_VAR).unwrap_or_default();

        if newsapi_key.is_empty() {
            warn!("{} is not set; NewsAPI requests will be rejected", NEWSAPI_KEY_VAR);
        }
        if guardian_key.is_empty() {
            warn!("{} is not set; Guardian requests will be rejected", GUARDIAN_KEY_VAR);
        }

        Self {
            newsapi_key,
            guardian_key,
        }
    }
}
