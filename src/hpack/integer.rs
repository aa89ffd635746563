//! HPACK primitive types: prefix integers (RFC 7541 Section 5.1) and string
//! literals (Section 5.2).

use super::error::HpackError;
use super::huffman;

/// Continuation octets accepted after the prefix. Five octets carry 35 bits,
/// more than any table index, size or string length this codec handles.
const MAX_CONTINUATION_BYTES: usize = 5;

/// Encode an integer with an N-bit prefix. `prefix` holds the representation
/// bits that share the first octet.
pub fn encode_integer(mut value: usize, prefix_bits: u8, prefix: u8, buf: &mut Vec<u8>) {
    let max_prefix: usize = (1 << prefix_bits) - 1;

    if value < max_prefix {
        buf.push(prefix | value as u8);
        return;
    }

    buf.push(prefix | max_prefix as u8);
    value -= max_prefix;
    while value >= 128 {
        buf.push((value % 128) as u8 | 0x80);
        value /= 128;
    }
    buf.push(value as u8);
}

/// Decode an N-bit prefix integer. Returns `(value, bytes_consumed)`.
pub fn decode_integer(data: &[u8], prefix_bits: u8) -> Result<(usize, usize), HpackError> {
    let Some(&first) = data.first() else {
        return Err(HpackError::Incomplete);
    };

    let max_prefix = (1u64 << prefix_bits) - 1;
    let mut value = u64::from(first) & max_prefix;
    if value < max_prefix {
        return Ok((value as usize, 1));
    }

    let mut shift = 0;
    for (i, &byte) in data[1..].iter().enumerate() {
        if i == MAX_CONTINUATION_BYTES {
            return Err(HpackError::InvalidInteger);
        }

        value += u64::from(byte & 0x7f) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            let value = usize::try_from(value).map_err(|_| HpackError::InvalidInteger)?;
            return Ok((value, i + 2));
        }
    }

    Err(HpackError::Incomplete)
}

/// Encode a string literal, Huffman-coded when `huffman` is set and the
/// coded form is no longer than the raw octets.
pub fn encode_string(data: &[u8], huffman: bool, buf: &mut Vec<u8>) {
    if huffman && !data.is_empty() {
        let huffman_len = huffman::encoded_len(data);
        if huffman_len <= data.len() {
            encode_integer(huffman_len, 7, 0x80, buf);
            huffman::encode(data, buf);
            return;
        }
    }

    encode_integer(data.len(), 7, 0x00, buf);
    buf.extend_from_slice(data);
}

/// Decode a string literal. Returns `(octets, bytes_consumed)`.
pub fn decode_string(data: &[u8]) -> Result<(Vec<u8>, usize), HpackError> {
    let Some(&first) = data.first() else {
        return Err(HpackError::Incomplete);
    };

    let huffman = first & 0x80 != 0;
    let (length, consumed) = decode_integer(data, 7)?;

    let end = consumed
        .checked_add(length)
        .ok_or(HpackError::InvalidString)?;
    if end > data.len() {
        return Err(HpackError::Incomplete);
    }

    let raw = &data[consumed..end];
    let octets = if huffman {
        let mut decoded = Vec::with_capacity(raw.len() * 8 / 5);
        huffman::decode(raw, &mut decoded)?;
        decoded
    } else {
        raw.to_vec()
    };

    Ok((octets, end))
}
