//! # ethrex-chat-precompile
//!
//! A precompiled contract that lets EVM code ask an external text-generation
//! service for a reply.
//!
//! ## Overview
//!
//! The precompile lives at a fixed address and exposes three methods, all of
//! them taking two ABI-encoded `string` arguments (`systemPrompt`, `message`):
//!
//! | Method | Returns | Static call |
//! |--------|---------|-------------|
//! | `chat(string,string)` | `string` | empty string, no external call |
//! | `chatBool(string,string)` | 1 byte bool | `false` |
//! | `chatUint(string,string)` | `uint256` | `0` |
//!
//! ```text
//! VM ──► registry ──► ChatAssistant::run / run_static_call
//!                          │
//!                          ├─ MethodTable (selector → OperationKind)
//!                          ├─ abi::decode_dynamic_strings
//!                          ├─ policy::authorize (CallMode gate)
//!                          └─ GenerationAdapter ──► dyn TextGenerator
//! ```
//!
//! Static calls never reach the generator, so they never fail for policy
//! reasons. They only fail on malformed calldata, exactly like mutating calls.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`abi`] | Head/tail codec for dynamic strings and the small return types |
//! | [`dispatch`] | Selector table and per-method gas costs |
//! | [`policy`] | Call-mode gate |
//! | [`generation`] | Boundary to the injected text generator |
//! | [`precompile`] | `PrecompiledContract` trait and `ChatAssistant` |
//! | [`registry`] | Address descriptor and gas-charging entry point |
//! | [`config`] | Settings loaded from the environment |
//! | [`errors`] | Error taxonomy |
//! | `openai` | HTTP generator for OpenAI-compatible endpoints (feature `openai`) |

pub mod abi;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod generation;
#[cfg(feature = "openai")]
pub mod openai;
pub mod policy;
pub mod precompile;
pub mod registry;

pub use config::{ApiKey, ChatSettings};
pub use dispatch::{MethodTable, OperationKind};
pub use errors::{ConfigError, DecodeError, GenerationError, PrecompileError};
pub use generation::{GenerationRequest, GenerationResponse, TextGenerator};
pub use policy::CallMode;
pub use precompile::{ChatAssistant, PrecompiledContract};
