#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
use bytes::Bytes;
use ethereum_types::Address;
use ethrex_chat_precompile::{
    OperationKind, PrecompileError,
    abi::{decode_string_return, encode_string},
    dispatch::{CHAT_COST, CHAT_PROBE_COST},
    policy::CallMode,
    registry::{CHAT_ASSISTANT, execute_chat_precompile, is_chat_precompile},
};
use ethrex_test::{MockPrecompile, StubGenerator, assistant_with, calldata_for};

#[test]
fn precompile_lives_at_a1a1a1() {
    assert_eq!(
        CHAT_ASSISTANT.address,
        Address::from_low_u64_be(0x00a1_a1a1)
    );
    assert!(is_chat_precompile(&Address::from_low_u64_be(0x00a1_a1a1)));
    assert!(!is_chat_precompile(&Address::from_low_u64_be(0x100)));
}

#[test]
fn mutating_call_charges_gas_and_runs() {
    let (assistant, generator) = assistant_with(StubGenerator::replying("Hello world"));
    let calldata = calldata_for(OperationKind::GenerateText, "system", "Please say Hello world");
    let mut gas_remaining = 200_000;

    let output = execute_chat_precompile(
        &assistant,
        CHAT_ASSISTANT.address,
        &calldata,
        &mut gas_remaining,
        CallMode::Mutating,
    )
    .unwrap();

    assert_eq!(decode_string_return(&output).unwrap().as_ref(), b"Hello world");
    assert_eq!(gas_remaining, 200_000 - CHAT_COST);
    assert_eq!(generator.calls(), 1);
}

#[test]
fn static_call_charges_gas_and_is_suppressed() {
    let (assistant, generator) = assistant_with(StubGenerator::replying("Hello world"));
    let calldata = calldata_for(OperationKind::GenerateText, "test", "test");
    let mut gas_remaining = 200_000;

    let output = execute_chat_precompile(
        &assistant,
        CHAT_ASSISTANT.address,
        &calldata,
        &mut gas_remaining,
        CallMode::ReadOnly,
    )
    .unwrap();

    assert_eq!(output, encode_string(b""));
    assert_eq!(gas_remaining, 200_000 - CHAT_COST);
    assert_eq!(generator.calls(), 0);
}

#[test]
fn probe_is_cheaper_than_chat() {
    let (assistant, _generator) = assistant_with(StubGenerator::replying("unused"));
    let calldata = calldata_for(OperationKind::ProbeUintCapability, "test", "test");
    let mut gas_remaining = 10_000;

    execute_chat_precompile(
        &assistant,
        CHAT_ASSISTANT.address,
        &calldata,
        &mut gas_remaining,
        CallMode::ReadOnly,
    )
    .unwrap();

    assert_eq!(gas_remaining, 10_000 - CHAT_PROBE_COST);
}

#[test]
fn not_enough_gas_stops_before_the_generator() {
    let (assistant, generator) = assistant_with(StubGenerator::replying("Hello world"));
    let calldata = calldata_for(OperationKind::GenerateText, "test", "test");
    let mut gas_remaining = CHAT_COST - 1;

    let err = execute_chat_precompile(
        &assistant,
        CHAT_ASSISTANT.address,
        &calldata,
        &mut gas_remaining,
        CallMode::Mutating,
    )
    .unwrap_err();

    assert!(matches!(err, PrecompileError::NotEnoughGas));
    assert_eq!(gas_remaining, CHAT_COST - 1);
    assert_eq!(generator.calls(), 0);
}

#[test]
fn foreign_address_is_rejected() {
    let mock = MockPrecompile::returning(Bytes::from_static(b"ok"));
    let mut gas_remaining = 200_000;

    let err = execute_chat_precompile(
        &mock,
        Address::from_low_u64_be(0x100),
        &Bytes::new(),
        &mut gas_remaining,
        CallMode::Mutating,
    )
    .unwrap_err();

    assert!(matches!(err, PrecompileError::InvalidPrecompileAddress));
    assert_eq!(mock.run_calls() + mock.run_static_calls(), 0);
}

#[test]
fn call_mode_selects_the_entry_point() {
    let mock = MockPrecompile::returning(Bytes::from_static(b"ok"));
    let calldata = calldata_for(OperationKind::GenerateText, "test", "test");

    let mut gas_remaining = 200_000;
    let output = execute_chat_precompile(
        &mock,
        CHAT_ASSISTANT.address,
        &calldata,
        &mut gas_remaining,
        CallMode::Mutating,
    )
    .unwrap();
    assert_eq!(output.as_ref(), b"ok");
    assert_eq!((mock.run_calls(), mock.run_static_calls()), (1, 0));

    let mut gas_remaining = 200_000;
    execute_chat_precompile(
        &mock,
        CHAT_ASSISTANT.address,
        &calldata,
        &mut gas_remaining,
        CallMode::from_is_static(true),
    )
    .unwrap();
    assert_eq!((mock.run_calls(), mock.run_static_calls()), (1, 1));
    assert_eq!(gas_remaining, 100_000);
}
