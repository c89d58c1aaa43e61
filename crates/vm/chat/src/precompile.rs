use std::sync::{Arc, RwLock};

use bytes::Bytes;
use tracing::debug;

use crate::{
    abi,
    config::ChatSettings,
    dispatch::{MethodTable, OperationKind},
    errors::{DecodeError, PrecompileError},
    generation::{GenerationAdapter, GenerationRequest, TextGenerator},
    policy::{self, Authorization, CallMode},
};

/// What the VM's precompile registry needs from a natively implemented
/// contract.
pub trait PrecompiledContract: Send + Sync {
    /// Gas charged before the call runs. Must not depend on argument parsing.
    fn required_gas(&self, calldata: &[u8]) -> u64;

    /// Entry point for state-mutating calls.
    fn run(&self, calldata: &Bytes) -> Result<Bytes, PrecompileError>;

    /// Entry point for `STATICCALL`. Must not have side effects.
    fn run_static_call(&self, calldata: &Bytes) -> Result<Bytes, PrecompileError>;
}

/// The chat assistant precompile.
///
/// Stateless between calls: the method table is fixed at construction and
/// the settings are an immutable snapshot swapped only by
/// [`ChatAssistant::reconfigure`].
#[derive(Debug)]
pub struct ChatAssistant {
    methods: MethodTable,
    settings: RwLock<Arc<ChatSettings>>,
    adapter: GenerationAdapter,
}

impl ChatAssistant {
    pub fn new(settings: ChatSettings, generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_method_table(MethodTable::chat_assistant(), settings, generator)
    }

    pub fn with_method_table(
        methods: MethodTable,
        settings: ChatSettings,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            methods,
            settings: RwLock::new(Arc::new(settings)),
            adapter: GenerationAdapter::new(generator),
        }
    }

    /// Builds the precompile backed by the HTTP generator, reading its
    /// settings from the environment.
    #[cfg(feature = "openai")]
    pub fn from_env() -> Result<Self, PrecompileError> {
        let settings = ChatSettings::from_env()?;
        let generator = crate::openai::OpenAiGenerator::new()?;
        Ok(Self::new(settings, Arc::new(generator)))
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<ChatSettings> {
        // A poisoned lock still holds a complete snapshot, the writer only
        // ever replaces the `Arc`.
        self.settings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replaces the settings used by subsequent calls. In-flight calls keep
    /// the snapshot they started with.
    pub fn reconfigure(&self, settings: ChatSettings) {
        let mut current = self
            .settings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Arc::new(settings);
        debug!("Chat assistant settings replaced");
    }

    /// Shared pipeline behind `run` and `run_static_call`. The mode only
    /// matters once the calldata has been fully validated.
    fn execute(&self, calldata: &[u8], mode: CallMode) -> Result<Bytes, PrecompileError> {
        let kind = self.methods.lookup(calldata)?;
        let args = abi::decode_dynamic_strings(calldata, kind.arity())?;

        if policy::authorize(kind, mode) == Authorization::Suppressed {
            debug!(method = kind.name(), ?mode, "Chat assistant call suppressed");
            return Ok(policy::suppressed_output(kind));
        }

        match kind {
            OperationKind::GenerateText => {
                let request = generation_request(args)?;
                let settings = self.settings();
                let response = self.adapter.invoke(&settings, &request)?;
                Ok(abi::encode_string(response.text.as_bytes()))
            }
            OperationKind::ProbeBoolCapability => Ok(abi::encode_bool(false)),
            OperationKind::ProbeUintCapability => Ok(abi::encode_zero_uint()),
        }
    }
}

/// Invalid UTF-8 in either argument is replaced with U+FFFD rather than
/// rejected, `string` calldata is not required to be UTF-8.
fn generation_request(args: Vec<Bytes>) -> Result<GenerationRequest, DecodeError> {
    let actual = args.len();
    let [system_prompt, user_message]: [Bytes; 2] =
        args.try_into().map_err(|_| DecodeError::ArityMismatch {
            expected: 2,
            actual,
        })?;
    Ok(GenerationRequest {
        system_prompt: String::from_utf8_lossy(&system_prompt).into_owned(),
        user_message: String::from_utf8_lossy(&user_message).into_owned(),
    })
}

impl PrecompiledContract for ChatAssistant {
    fn required_gas(&self, calldata: &[u8]) -> u64 {
        self.methods.required_gas(calldata)
    }

    fn run(&self, calldata: &Bytes) -> Result<Bytes, PrecompileError> {
        self.execute(calldata, CallMode::Mutating)
    }

    fn run_static_call(&self, calldata: &Bytes) -> Result<Bytes, PrecompileError> {
        self.execute(calldata, CallMode::ReadOnly)
    }
}
