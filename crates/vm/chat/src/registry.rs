use bytes::Bytes;
use ethereum_types::{Address, H160};
use tracing::debug;

use crate::{errors::PrecompileError, policy::CallMode, precompile::PrecompiledContract};

pub struct Precompile {
    pub address: H160,
    pub name: &'static str,
}

pub const CHAT_ASSISTANT: Precompile = Precompile {
    address: H160([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xa1, 0xa1, 0xa1,
    ]),
    name: "CHAT_ASSISTANT",
};

pub fn is_chat_precompile(address: &Address) -> bool {
    *address == CHAT_ASSISTANT.address
}

/// Runs the chat assistant the way the VM runs any precompile: charge the
/// required gas up front, then enter through the entry point matching the
/// frame's call mode.
pub fn execute_chat_precompile(
    contract: &dyn PrecompiledContract,
    address: Address,
    calldata: &Bytes,
    gas_remaining: &mut u64,
    mode: CallMode,
) -> Result<Bytes, PrecompileError> {
    if !is_chat_precompile(&address) {
        return Err(PrecompileError::InvalidPrecompileAddress);
    }

    let gas_cost = contract.required_gas(calldata);
    increase_precompile_consumed_gas(gas_cost, gas_remaining)?;
    debug!(
        precompile = CHAT_ASSISTANT.name,
        gas_cost,
        ?mode,
        "Executing precompile"
    );

    match mode {
        CallMode::Mutating => contract.run(calldata),
        CallMode::ReadOnly => contract.run_static_call(calldata),
    }
}

/// Consumes gas and if it's higher than the gas limit returns an error.
pub(crate) fn increase_precompile_consumed_gas(
    gas_cost: u64,
    gas_remaining: &mut u64,
) -> Result<(), PrecompileError> {
    *gas_remaining = gas_remaining
        .checked_sub(gas_cost)
        .ok_or(PrecompileError::NotEnoughGas)?;
    Ok(())
}
