#![allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::unwrap_used,
    clippy::as_conversions
)]
use bytes::Bytes;
use ethereum_types::{H32, U256};
use ethrex_chat_precompile::{
    DecodeError,
    abi::{
        decode_dynamic_strings, decode_string_return, encode_bool,
        encode_calldata, encode_string, encode_zero_uint,
    },
};
use hex_literal::hex;

const SELECTOR: [u8; 4] = hex!("deadbeef");

fn word(value: u64) -> [u8; 32] {
    U256::from(value).to_big_endian()
}

fn padded(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    out.resize(data.len().div_ceil(32) * 32, 0);
    out
}

/// Calldata assembled word by word, without any normalisation.
struct RawCalldata(Vec<u8>);

impl RawCalldata {
    fn new() -> Self {
        Self(SELECTOR.to_vec())
    }

    fn word(self, value: u64) -> Self {
        self.bytes(&word(value))
    }

    fn padded(self, data: &[u8]) -> Self {
        self.bytes(&padded(data))
    }

    fn bytes(mut self, data: &[u8]) -> Self {
        self.0.extend_from_slice(data);
        self
    }

    fn build(self) -> Vec<u8> {
        self.0
    }
}

#[test]
fn decodes_calldata_built_by_hand() {
    let system_prompt = b"You are a helpful assistant. Please respond with exactly: Hello world";
    let message = b"Please say Hello world";
    let second_offset = 64 + 32 + padded(system_prompt).len() as u64;

    let calldata = RawCalldata::new()
        .word(64)
        .word(second_offset)
        .word(system_prompt.len() as u64)
        .padded(system_prompt)
        .word(message.len() as u64)
        .padded(message)
        .build();

    let decoded = decode_dynamic_strings(&calldata, 2).unwrap();
    assert_eq!(decoded[0].as_ref(), system_prompt);
    assert_eq!(decoded[1].as_ref(), message);

    // The canonical encoder produces the very same bytes.
    let encoded = encode_calldata(
        H32(SELECTOR),
        &[system_prompt.as_slice(), message.as_slice()],
    );
    assert_eq!(encoded.as_ref(), calldata.as_slice());
}

#[test]
fn calldata_shorter_than_head_region_is_rejected() {
    for len in [0, 3, 4, 35, 67] {
        let calldata = vec![0u8; len];
        assert_eq!(
            decode_dynamic_strings(&calldata, 2),
            Err(DecodeError::CalldataTooShort {
                expected: 68,
                actual: len
            })
        );
    }
}

#[test]
fn offset_past_end_is_rejected() {
    let calldata = RawCalldata::new()
        .word(64)
        .word(0x1000)
        .word(1)
        .padded(b"a")
        .build();

    assert_eq!(
        decode_dynamic_strings(&calldata, 2),
        Err(DecodeError::OffsetOutOfBounds {
            index: 1,
            offset: U256::from(0x1000)
        })
    );
}

#[test]
fn offset_without_room_for_length_word_is_rejected() {
    // Args region is 96 bytes long: an offset of 65 leaves only 31 bytes.
    let calldata = RawCalldata::new().word(64).word(65).word(0).build();

    assert_eq!(
        decode_dynamic_strings(&calldata, 2),
        Err(DecodeError::OffsetOutOfBounds {
            index: 1,
            offset: U256::from(65)
        })
    );
}

#[test]
fn length_past_end_is_rejected() {
    let calldata = RawCalldata::new()
        .word(64)
        .word(64)
        .word(100)
        .padded(b"short")
        .build();

    assert_eq!(
        decode_dynamic_strings(&calldata, 2),
        Err(DecodeError::LengthOutOfBounds {
            index: 0,
            length: U256::from(100)
        })
    );
}

#[test]
fn huge_offsets_and_lengths_do_not_overflow() {
    let max = U256::MAX.to_big_endian();

    let calldata = RawCalldata::new().bytes(&max).word(64).word(0).build();
    assert_eq!(
        decode_dynamic_strings(&calldata, 2),
        Err(DecodeError::OffsetOutOfBounds {
            index: 0,
            offset: U256::MAX
        })
    );

    let calldata = RawCalldata::new().word(64).word(64).bytes(&max).build();
    assert_eq!(
        decode_dynamic_strings(&calldata, 2),
        Err(DecodeError::LengthOutOfBounds {
            index: 0,
            length: U256::MAX
        })
    );

    let calldata = RawCalldata::new()
        .word(64)
        .word(64)
        .word(u64::MAX - 8)
        .build();
    assert!(matches!(
        decode_dynamic_strings(&calldata, 2),
        Err(DecodeError::LengthOutOfBounds { index: 0, .. })
    ));
}

#[test]
fn offsets_need_not_be_ordered() {
    // arg1's tail comes first in the tail region.
    let calldata = RawCalldata::new()
        .word(128)
        .word(64)
        .word(3)
        .padded(b"two")
        .word(3)
        .padded(b"one")
        .build();

    let decoded = decode_dynamic_strings(&calldata, 2).unwrap();
    assert_eq!(
        decoded,
        vec![Bytes::from_static(b"one"), Bytes::from_static(b"two")]
    );
}

#[test]
fn arguments_may_share_a_tail() {
    let calldata = RawCalldata::new()
        .word(64)
        .word(64)
        .word(4)
        .padded(b"same")
        .build();

    let decoded = decode_dynamic_strings(&calldata, 2).unwrap();
    assert_eq!(decoded[0], decoded[1]);
}

#[test]
fn missing_trailing_padding_is_accepted() {
    let calldata = RawCalldata::new()
        .word(64)
        .word(128)
        .word(2)
        .padded(b"hi")
        .word(3)
        .bytes(b"abc")
        .build();

    let decoded = decode_dynamic_strings(&calldata, 2).unwrap();
    assert_eq!(decoded[1].as_ref(), b"abc");
}

#[test]
fn non_zero_padding_is_not_inspected() {
    let mut tail = padded(b"x");
    tail[31] = 0xff;
    let calldata = RawCalldata::new()
        .word(64)
        .word(64)
        .word(1)
        .bytes(&tail)
        .build();

    let decoded = decode_dynamic_strings(&calldata, 2).unwrap();
    assert_eq!(decoded[0].as_ref(), b"x");
}

#[test]
fn non_utf8_string_bytes_decode_as_is() {
    let calldata = encode_calldata(
        H32(SELECTOR),
        &[[0xffu8, 0xfe].as_slice(), b"fine".as_slice()],
    );

    let decoded = decode_dynamic_strings(&calldata, 2).unwrap();
    assert_eq!(decoded[0].as_ref(), &[0xffu8, 0xfe]);
    assert_eq!(decoded[1].as_ref(), b"fine");
}

#[test]
fn string_return_round_trips() {
    let output = encode_string("¡Hola, mundo! 👋".as_bytes());
    assert_eq!(output.len() % 32, 0);
    assert_eq!(
        decode_string_return(&output).unwrap().as_ref(),
        "¡Hola, mundo! 👋".as_bytes()
    );
}

#[test]
fn truncated_string_return_is_rejected() {
    let output = encode_string(&[7u8; 40]);

    assert!(matches!(
        decode_string_return(&output[..80]),
        Err(DecodeError::LengthOutOfBounds { index: 0, .. })
    ));
    assert!(matches!(
        decode_string_return(&output[..16]),
        Err(DecodeError::CalldataTooShort { .. })
    ));
}

#[test]
fn probe_encodings() {
    assert_eq!(encode_bool(false).as_ref(), &[0x00u8]);
    assert_eq!(encode_bool(true).as_ref(), &[0x01u8]);
    assert_eq!(encode_zero_uint().as_ref(), &[0u8; 32]);
}
