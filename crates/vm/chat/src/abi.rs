//! Ethereum ABI head/tail codec for the shapes the chat assistant uses.
//!
//! Arguments are decoded straight from the calldata: every bound is checked
//! before slicing, so hostile offsets or lengths end up as a [`DecodeError`]
//! and never as a panic or a silently truncated value.

use bytes::{BufMut, Bytes, BytesMut};
use ethereum_types::{H32, U256};
use keccak_hash::keccak;

use crate::errors::DecodeError;

pub const SELECTOR_SIZE: usize = 4;
pub const WORD_SIZE: usize = 32;

/// Offset written in the single head slot of a one-string return value.
pub const SINGLE_STRING_OFFSET: usize = WORD_SIZE;

static ZERO_WORD: [u8; WORD_SIZE] = [0; WORD_SIZE];

/// First four bytes of `keccak256(signature)`, e.g. `chat(string,string)`.
pub fn compute_selector(signature: &str) -> H32 {
    let [a, b, c, d, ..] = keccak(signature.as_bytes()).0;
    H32([a, b, c, d])
}

/// Reads the 4-byte method selector at the start of the calldata.
pub fn selector(calldata: &[u8]) -> Result<H32, DecodeError> {
    calldata
        .get(..SELECTOR_SIZE)
        .map(H32::from_slice)
        .ok_or(DecodeError::MissingSelector)
}

/// Decodes `expected_count` dynamic `string`/`bytes` arguments from calldata
/// (selector included).
///
/// Decoding is purely structural: the bytes of a `string` are returned as is,
/// valid UTF-8 or not.
///
/// The head region must be complete. Offsets are relative to the first byte
/// after the selector; they don't need to be ordered or packed, and trailing
/// padding after each value is neither required nor inspected.
pub fn decode_dynamic_strings(
    calldata: &[u8],
    expected_count: usize,
) -> Result<Vec<Bytes>, DecodeError> {
    let actual = calldata.len();
    let expected = expected_count
        .checked_mul(WORD_SIZE)
        .and_then(|head| head.checked_add(SELECTOR_SIZE))
        .ok_or(DecodeError::CalldataTooShort {
            expected: usize::MAX,
            actual,
        })?;
    if actual < expected {
        return Err(DecodeError::CalldataTooShort { expected, actual });
    }

    let args = calldata.get(SELECTOR_SIZE..).unwrap_or_default();
    (0..expected_count)
        .map(|index| decode_tail(args, index).map(Bytes::copy_from_slice))
        .collect()
}

/// Decodes the return data of a method returning a single `string`.
pub fn decode_string_return(output: &[u8]) -> Result<Bytes, DecodeError> {
    if output.len() < WORD_SIZE {
        return Err(DecodeError::CalldataTooShort {
            expected: WORD_SIZE,
            actual: output.len(),
        });
    }
    decode_tail(output, 0).map(Bytes::copy_from_slice)
}

/// Resolves the head slot `index` of `args` into the bytes it points at.
fn decode_tail(args: &[u8], index: usize) -> Result<&[u8], DecodeError> {
    let head_start = index.checked_mul(WORD_SIZE).unwrap_or(usize::MAX);
    let offset = read_word(args, head_start).ok_or(DecodeError::CalldataTooShort {
        expected: head_start.saturating_add(WORD_SIZE),
        actual: args.len(),
    })?;

    let out_of_bounds = || DecodeError::OffsetOutOfBounds { index, offset };
    let offset_start = word_to_usize(offset).ok_or_else(out_of_bounds)?;
    let length = read_word(args, offset_start).ok_or_else(out_of_bounds)?;

    let too_long = || DecodeError::LengthOutOfBounds { index, length };
    let data_start = offset_start.checked_add(WORD_SIZE).ok_or_else(out_of_bounds)?;
    let data_end = word_to_usize(length)
        .and_then(|len| data_start.checked_add(len))
        .ok_or_else(too_long)?;

    args.get(data_start..data_end).ok_or_else(too_long)
}

fn read_word(data: &[u8], start: usize) -> Option<U256> {
    let end = start.checked_add(WORD_SIZE)?;
    data.get(start..end).map(U256::from_big_endian)
}

fn word_to_usize(word: U256) -> Option<usize> {
    if word.bits() > 64 {
        return None;
    }
    usize::try_from(word.low_u64()).ok()
}

/// Zero bytes needed to right-pad `len` bytes to a word boundary.
fn padding_len(len: usize) -> usize {
    WORD_SIZE.wrapping_sub(len % WORD_SIZE) % WORD_SIZE
}

fn put_word(buf: &mut BytesMut, value: U256) {
    buf.put_slice(&value.to_big_endian());
}

fn put_tail(buf: &mut BytesMut, data: &[u8]) {
    put_word(buf, U256::from(data.len()));
    buf.put_slice(data);
    buf.put_bytes(0, padding_len(data.len()));
}

/// Encodes a single dynamic `string` return value:
/// `[offset = 32][length][data right-padded to 32 bytes]`.
pub fn encode_string(data: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(
        (2 * WORD_SIZE)
            .saturating_add(data.len())
            .saturating_add(padding_len(data.len())),
    );
    put_word(&mut out, U256::from(SINGLE_STRING_OFFSET));
    put_tail(&mut out, data);
    out.freeze()
}

/// Encodes a boolean as a single `0x00`/`0x01` byte.
///
/// This is NOT the 32-byte ABI `bool`; callers of the precompile already
/// rely on the one-byte form.
pub fn encode_bool(value: bool) -> Bytes {
    Bytes::copy_from_slice(&[u8::from(value)])
}

/// Encodes `uint256(0)`.
pub fn encode_zero_uint() -> Bytes {
    Bytes::from_static(&ZERO_WORD)
}

/// Builds canonical calldata for a method taking only dynamic `string`/`bytes`
/// arguments: selector, one offset per argument, then the tails in order.
#[expect(clippy::arithmetic_side_effects)]
pub fn encode_calldata(selector: H32, args: &[&[u8]]) -> Bytes {
    let head_size = args.len() * WORD_SIZE;
    let mut tails = BytesMut::new();
    let mut out = BytesMut::with_capacity(SELECTOR_SIZE + head_size);
    out.put_slice(selector.as_bytes());

    for arg in args {
        put_word(&mut out, U256::from(head_size + tails.len()));
        put_tail(&mut tails, arg);
    }

    out.put_slice(&tails);
    out.freeze()
}
