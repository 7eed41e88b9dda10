//! Engine configuration and mode resolution.

use std::env;
use std::time::Duration;

use crate::core::VerifactuError;

/// Default per-call timeout for remote operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the API base URL.
const ENV_API_URL: &str = "VERIFACTU_API_URL";
/// Environment variable holding the API key.
const ENV_API_KEY: &str = "VERIFACTU_API_KEY";
/// Environment variable overriding the per-call timeout, in seconds.
const ENV_TIMEOUT_SECS: &str = "VERIFACTU_TIMEOUT_SECS";

/// Placeholder values that do not count as a configured credential.
const PLACEHOLDER_KEYS: &[&str] = &["", "changeme", "YOUR_API_KEY", "your-api-key-here"];

/// Operating mode, resolved once and immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// No credential configured: fabricate responses, never touch the network.
    Simulated,
    /// Real HTTP calls against the configured endpoint.
    Live,
}

/// Resolved engine configuration, passed by value into the client and
/// engine instead of living in global state.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the remote API (no trailing slash).
    pub api_base_url: String,
    /// Bearer credential; `None` in simulated mode.
    pub api_key: Option<String>,
    /// Resolved operating mode.
    pub mode: EngineMode,
    /// Per-call timeout for remote operations.
    pub timeout: Duration,
}

impl EngineConfig {
    /// A simulated-mode configuration (no endpoint, no credential).
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            api_base_url: String::new(),
            api_key: None,
            mode: EngineMode::Simulated,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// A live-mode configuration. Fails loudly on an unusable endpoint or
    /// placeholder credential — live mode never silently downgrades.
    pub fn live(
        api_base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, VerifactuError> {
        let api_base_url = api_base_url.into();
        let api_key = api_key.into();

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(VerifactuError::Config(format!(
                "API base URL '{api_base_url}' must use an http(s) scheme"
            )));
        }
        if is_placeholder(&api_key) {
            return Err(VerifactuError::Config(
                "API key is empty or a placeholder value".into(),
            ));
        }

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key: Some(api_key),
            mode: EngineMode::Live,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Resolve the configuration from process environment.
    ///
    /// The mode is `Simulated` if and only if `VERIFACTU_API_KEY` is absent
    /// or a placeholder. A configured key with a missing or malformed
    /// `VERIFACTU_API_URL` is a configuration error, not a downgrade.
    pub fn from_env() -> Result<Self, VerifactuError> {
        let key = env::var(ENV_API_KEY).ok().filter(|k| !is_placeholder(k));
        let url = env::var(ENV_API_URL).ok();

        let mut config = match key {
            None => Self::simulated(),
            Some(key) => {
                let url = url.ok_or_else(|| {
                    VerifactuError::Config(format!(
                        "{ENV_API_KEY} is set but {ENV_API_URL} is missing"
                    ))
                })?;
                Self::live(url, key)?
            }
        };

        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| {
                VerifactuError::Config(format!("{ENV_TIMEOUT_SECS}='{raw}' is not a number"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set a non-default per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the stub path serves all operations.
    #[must_use]
    pub fn is_simulated(&self) -> bool {
        self.mode == EngineMode::Simulated
    }
}

fn is_placeholder(key: &str) -> bool {
    PLACEHOLDER_KEYS.contains(&key.trim())
}
