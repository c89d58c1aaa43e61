use bytes::Bytes;

use crate::{abi, dispatch::OperationKind};

/// How the VM reached the precompile. Fixed for the whole invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// `CALL` and friends: side effects allowed.
    Mutating,
    /// `STATICCALL` or any frame nested under one.
    ReadOnly,
}

impl CallMode {
    pub fn from_is_static(is_static: bool) -> Self {
        if is_static {
            CallMode::ReadOnly
        } else {
            CallMode::Mutating
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    /// The operation must not run; the caller returns
    /// [`suppressed_output`] as a successful result.
    Suppressed,
}

/// Decides whether `kind` may run under `mode`.
///
/// Only text generation has an externally observable effect, so it is the
/// only operation a static call suppresses. The probes answer the same in
/// both modes.
pub fn authorize(kind: OperationKind, mode: CallMode) -> Authorization {
    match (kind, mode) {
        (OperationKind::GenerateText, CallMode::Mutating) => Authorization::Allowed,
        (OperationKind::GenerateText, CallMode::ReadOnly) => Authorization::Suppressed,
        (OperationKind::ProbeBoolCapability | OperationKind::ProbeUintCapability, _) => {
            Authorization::Allowed
        }
    }
}

/// Benign result returned in place of an operation that did not run.
pub fn suppressed_output(kind: OperationKind) -> Bytes {
    match kind {
        OperationKind::GenerateText => abi::encode_string(&[]),
        OperationKind::ProbeBoolCapability => abi::encode_bool(false),
        OperationKind::ProbeUintCapability => abi::encode_zero_uint(),
    }
}
