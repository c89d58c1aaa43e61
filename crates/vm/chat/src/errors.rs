use std::time::Duration;

use ethereum_types::{H32, U256};

/// Malformed calldata. Raised identically for mutating and static calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Calldata is shorter than a method selector")]
    MissingSelector,
    #[error("Unknown method selector {0:#x}")]
    UnknownSelector(H32),
    #[error("Calldata too short: expected at least {expected} bytes, got {actual}")]
    CalldataTooShort { expected: usize, actual: usize },
    #[error("Offset {offset} of argument {index} points outside the calldata")]
    OffsetOutOfBounds { index: usize, offset: U256 },
    #[error("Length {length} of argument {index} runs past the end of the calldata")]
    LengthOutOfBounds { index: usize, length: U256 },
    #[error("Expected {expected} arguments, decoded {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API credential configured for the chat assistant")]
    MissingCredential,
    #[error("Error deserializing config from env: {err}. From config: {from:?}")]
    Deserialization { err: envy::Error, from: String },
    #[error("Invalid API url: {0}")]
    InvalidUrl(String),
    #[error("Request timeout {0:?} is out of range")]
    InvalidTimeout(Duration),
}

/// Failure reported by the external text generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Provider rejected the credential: {0}")]
    Authentication(String),
    #[error("Provider error (status {status}): {message}")]
    Provider { status: u16, message: String },
    #[error("Generation request timed out")]
    Timeout,
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PrecompileError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("Not enough gas")]
    NotEnoughGas,
    #[error("Address is not the chat assistant precompile")]
    InvalidPrecompileAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchTableError {
    #[error("Selector {0:#x} is mapped more than once")]
    DuplicateSelector(H32),
}
