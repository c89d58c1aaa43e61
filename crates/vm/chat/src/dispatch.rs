use ethereum_types::H32;
use rustc_hash::FxHashMap;

use crate::{
    abi,
    errors::{DecodeError, DispatchTableError},
};

/// Gas charged for a `chat` call, regardless of how long the provider takes.
pub const CHAT_COST: u64 = 100_000;
/// Gas charged for `chatBool` and `chatUint`.
pub const CHAT_PROBE_COST: u64 = 3_000;

pub const CHAT_SIGNATURE: &str = "chat(string,string)";
pub const CHAT_BOOL_SIGNATURE: &str = "chatBool(string,string)";
pub const CHAT_UINT_SIGNATURE: &str = "chatUint(string,string)";

/// Sub-operations exposed by the chat assistant precompile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `(string systemPrompt, string message) -> string`
    GenerateText,
    /// `(string, string) -> bool`, arguments are decoded but ignored.
    ProbeBoolCapability,
    /// `(string, string) -> uint256`, arguments are decoded but ignored.
    ProbeUintCapability,
}

impl OperationKind {
    /// Number of dynamic `string` arguments the method declares.
    pub const fn arity(self) -> usize {
        match self {
            OperationKind::GenerateText
            | OperationKind::ProbeBoolCapability
            | OperationKind::ProbeUintCapability => 2,
        }
    }

    pub const fn gas_cost(self) -> u64 {
        match self {
            OperationKind::GenerateText => CHAT_COST,
            OperationKind::ProbeBoolCapability | OperationKind::ProbeUintCapability => {
                CHAT_PROBE_COST
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            OperationKind::GenerateText => "chat",
            OperationKind::ProbeBoolCapability => "chatBool",
            OperationKind::ProbeUintCapability => "chatUint",
        }
    }
}

/// Selector to operation map, built once and shared by every invocation.
#[derive(Debug, Clone)]
pub struct MethodTable {
    methods: FxHashMap<H32, OperationKind>,
}

impl MethodTable {
    pub fn new(
        entries: impl IntoIterator<Item = (H32, OperationKind)>,
    ) -> Result<Self, DispatchTableError> {
        let mut methods = FxHashMap::default();
        for (selector, kind) in entries {
            if methods.insert(selector, kind).is_some() {
                return Err(DispatchTableError::DuplicateSelector(selector));
            }
        }
        Ok(Self { methods })
    }

    /// The `chat`, `chatBool` and `chatUint` methods keyed by their ABI selectors.
    pub fn chat_assistant() -> Self {
        let methods = [
            (CHAT_SIGNATURE, OperationKind::GenerateText),
            (CHAT_BOOL_SIGNATURE, OperationKind::ProbeBoolCapability),
            (CHAT_UINT_SIGNATURE, OperationKind::ProbeUintCapability),
        ]
        .into_iter()
        .map(|(signature, kind)| (abi::compute_selector(signature), kind))
        .collect();
        Self { methods }
    }

    /// Resolves the method targeted by `calldata` from its selector only.
    pub fn lookup(&self, calldata: &[u8]) -> Result<OperationKind, DecodeError> {
        let selector = abi::selector(calldata)?;
        self.methods
            .get(&selector)
            .copied()
            .ok_or(DecodeError::UnknownSelector(selector))
    }

    pub fn selector_of(&self, kind: OperationKind) -> Option<H32> {
        self.methods
            .iter()
            .find_map(|(selector, candidate)| (*candidate == kind).then_some(*selector))
    }

    /// Gas for the call, known before any argument is parsed. Calldata whose
    /// method can't be resolved pays the most expensive method.
    pub fn required_gas(&self, calldata: &[u8]) -> u64 {
        self.lookup(calldata)
            .map(OperationKind::gas_cost)
            .unwrap_or(CHAT_COST)
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::chat_assistant()
    }
}
