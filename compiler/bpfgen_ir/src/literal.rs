//! Byte Literals
//!
//! Encodes the object file as the body of a Go interpreted string literal.
//! Every byte becomes a fixed-width `\xNN` escape, so the literal never needs
//! delimiter scanning and is exactly four times the size of the input.

use thiserror::Error;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Width of one encoded byte (`\xNN`).
pub const ESCAPE_WIDTH: usize = 4;

/// Encode `bytes` as a sequence of `\xNN` escapes.
///
/// # Example
///
/// ```
/// use bpfgen_ir::encode;
///
/// assert_eq!(encode(&[0x7f, 0x45, 0x4c, 0x46]), r"\x7f\x45\x4c\x46");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * ESCAPE_WIDTH);
    for &b in bytes {
        out.push('\\');
        out.push('x');
        out.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(b & 0x0f)]));
    }
    out
}

/// Error decoding a byte literal produced by [`encode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// Literal length is not a multiple of the escape width.
    #[error("byte literal has length {len}, not a multiple of {ESCAPE_WIDTH}")]
    Length { len: usize },
    /// An escape does not have the `\xNN` shape.
    #[error("malformed escape at offset {offset}")]
    Escape { offset: usize },
}

/// Decode a literal produced by [`encode`] back into raw bytes.
pub fn decode(literal: &str) -> Result<Vec<u8>, LiteralError> {
    let raw = literal.as_bytes();
    if raw.len() % ESCAPE_WIDTH != 0 {
        return Err(LiteralError::Length { len: raw.len() });
    }

    raw.chunks_exact(ESCAPE_WIDTH)
        .enumerate()
        .map(|(i, chunk)| {
            let offset = i * ESCAPE_WIDTH;
            match chunk {
                [b'\\', b'x', hi, lo] => match (hex_value(*hi), hex_value(*lo)) {
                    (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                    _ => Err(LiteralError::Escape { offset }),
                },
                _ => Err(LiteralError::Escape { offset }),
            }
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
