use std::{
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, warn};
use url::Url;

use crate::{
    config::{ApiKey, ChatSettings},
    errors::{ConfigError, GenerationError, PrecompileError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    pub text: String,
}

/// Everything a generator needs besides the prompt itself, borrowed from the
/// settings snapshot of the current invocation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub credential: &'a ApiKey,
    pub api_url: &'a Url,
    pub model: &'a str,
    /// The generator must give up and return [`GenerationError::Timeout`]
    /// once this instant has passed.
    pub deadline: Instant,
}

impl GenerationContext<'_> {
    /// Time left before the deadline, `None` if it already passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .checked_duration_since(Instant::now())
            .filter(|left| !left.is_zero())
    }
}

/// External text-generation capability.
///
/// Called synchronously from the VM thread, once per `chat` invocation.
/// Implementations must stop waiting once `context.deadline` has passed: the
/// adapter only reclassifies a late answer as a timeout, it cannot interrupt
/// the call, so the VM thread blocks for as long as `generate` does.
/// Implementations own transport concerns; retries, if any, happen here and
/// must fit within the context deadline.
pub trait TextGenerator: Send + Sync + Debug {
    fn generate(
        &self,
        context: &GenerationContext<'_>,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}

/// Boundary between the precompile and the injected [`TextGenerator`].
#[derive(Debug, Clone)]
pub struct GenerationAdapter {
    generator: Arc<dyn TextGenerator>,
}

impl GenerationAdapter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Performs exactly one generation request.
    ///
    /// Fails with [`ConfigError::MissingCredential`] before touching the
    /// generator when no API key is configured. A generator that answers
    /// after the deadline is reported as a timeout.
    pub fn invoke(
        &self,
        settings: &ChatSettings,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, PrecompileError> {
        let credential = settings
            .api_key
            .as_ref()
            .ok_or(ConfigError::MissingCredential)?;
        let deadline = Instant::now()
            .checked_add(settings.request_timeout)
            .ok_or(ConfigError::InvalidTimeout(settings.request_timeout))?;

        let context = GenerationContext {
            credential,
            api_url: &settings.api_url,
            model: &settings.model,
            deadline,
        };

        debug!(
            model = %settings.model,
            system_prompt_len = request.system_prompt.len(),
            message_len = request.user_message.len(),
            "Requesting text generation"
        );

        let response = self.generator.generate(&context, request).inspect_err(|err| {
            warn!(%err, "Text generation failed");
        })?;

        if Instant::now() > deadline {
            warn!(
                timeout_ms = settings.request_timeout.as_millis(),
                "Text generator answered after the deadline"
            );
            return Err(GenerationError::Timeout.into());
        }

        debug!(response_len = response.text.len(), "Text generation finished");
        Ok(response)
    }
}
