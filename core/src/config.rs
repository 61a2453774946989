//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RestError, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("restlib/", env!("CARGO_PKG_VERSION"));

const ENV_USER_AGENT: &str = "RESTLIB_USER_AGENT";
const ENV_TIMEOUT_SECS: &str = "RESTLIB_TIMEOUT_SECS";
const ENV_OMIT_EMPTY: &str = "RESTLIB_OMIT_EMPTY_PARAMETERS";
const ENV_MAX_BODY_BYTES: &str = "RESTLIB_MAX_BODY_BYTES";

/// Settings shared by every request a client creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Drop query and matrix parameters whose value is missing or blank.
    pub omit_empty_parameters: bool,
    /// Sent as `User-Agent` when the request carries none.
    pub user_agent: String,
    /// Global timeout for the default transport. `None` keeps ureq's defaults.
    pub timeout_secs: Option<u64>,
    /// Largest response body the default transport reads. `None` means no cap.
    pub max_body_bytes: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            omit_empty_parameters: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            max_body_bytes: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `RESTLIB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| RestError::Config(format!("{ENV_TIMEOUT_SECS}={raw} is not a number of seconds")))?;
            config.timeout_secs = Some(secs);
        }
        if let Some(raw) = lookup(ENV_MAX_BODY_BYTES) {
            let bytes = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| RestError::Config(format!("{ENV_MAX_BODY_BYTES}={raw} is not a byte count")))?;
            config.max_body_bytes = Some(bytes);
        }
        if let Some(raw) = lookup(ENV_OMIT_EMPTY) {
            config.omit_empty_parameters = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(RestError::Config(format!(
                        "{ENV_OMIT_EMPTY}={raw} is not a boolean"
                    )))
                }
            };
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
