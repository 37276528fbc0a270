//! Client configuration from the environment

use crate::backend::UserId;
use crate::widget::DEFAULT_AUTO_PROMPT_DELAY;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Settings for one widget client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Origin serving the `/assistant/*` endpoints
    pub base_url: String,
    /// Signed-in user, attached to logs and queries when known
    pub user_id: Option<UserId>,
    pub auto_prompt_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: None,
            auto_prompt_delay: DEFAULT_AUTO_PROMPT_DELAY,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall
    /// back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("ASSISTANT_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let user_id = lookup("ASSISTANT_USER_ID").and_then(|raw| {
            raw.trim()
                .parse::<UserId>()
                .map_err(|e| tracing::warn!(value = %raw, error = %e, "Ignoring invalid ASSISTANT_USER_ID"))
                .ok()
        });

        let auto_prompt_delay = lookup("ASSISTANT_AUTO_PROMPT_SECS")
            .and_then(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| {
                        tracing::warn!(value = %raw, error = %e, "Ignoring invalid ASSISTANT_AUTO_PROMPT_SECS");
                    })
                    .ok()
            })
            .map_or(defaults.auto_prompt_delay, Duration::from_secs);

        Self {
            base_url,
            user_id,
            auto_prompt_delay,
        }
    }
}
