use std::{fmt, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::errors::ConfigError;

pub const CHAT_ASSISTANT_ENV_PREFIX: &str = "CHAT_ASSISTANT_";

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Credential sent to the text-generation provider.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Settings the chat assistant reads on every call.
///
/// A snapshot is immutable; changing the settings means swapping in a new
/// snapshot through `ChatAssistant::reconfigure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub api_key: Option<ApiKey>,
    pub api_url: Url,
    pub model: String,
    pub request_timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ChatSettings {
    pub fn with_api_key(api_key: ApiKey) -> Self {
        Self {
            api_key: Some(api_key),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Reads `CHAT_ASSISTANT_*` variables. Only the API key has no default,
    /// and it may stay unset: calls that need it fail at invocation time.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = envy::prefixed(CHAT_ASSISTANT_ENV_PREFIX)
            .from_env::<ChatAssistantEnv>()
            .map_err(|err| ConfigError::Deserialization {
                err,
                from: "ChatAssistantEnv".to_string(),
            })?;
        env.try_into()
    }
}

#[derive(Deserialize, Debug)]
struct ChatAssistantEnv {
    api_key: Option<ApiKey>,
    #[serde(default = "default_api_url_string")]
    api_url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

impl TryFrom<ChatAssistantEnv> for ChatSettings {
    type Error = ConfigError;

    fn try_from(env: ChatAssistantEnv) -> Result<Self, Self::Error> {
        Ok(Self {
            api_key: env.api_key.filter(|key| !key.expose().is_empty()),
            api_url: parse_api_url(&env.api_url)?,
            model: env.model,
            request_timeout: Duration::from_millis(env.timeout_ms),
        })
    }
}

/// Parses a provider base url. A trailing `/` is added when missing so that
/// joining relative endpoint paths keeps the last path segment.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl(format!("{raw}: {e}")))
}

#[expect(clippy::expect_used, reason = "DEFAULT_API_URL is a valid url literal")]
fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default api url is valid")
}

fn default_api_url_string() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
