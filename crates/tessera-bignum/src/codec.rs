//! Numeral codec: hexadecimal, binary and decimal text.
//!
//! Hex and binary work on a read-only byte view and know nothing about
//! signs. Byte order picks the iteration direction: little-endian output
//! walks the view forward (least-significant byte first), big-endian output
//! walks it backward. Each byte is always rendered most-significant digit
//! first, so reversing the byte order of a big-endian string swaps whole
//! character groups, not individual characters.
//!
//! Decimal works on a magnitude's limbs and writes the sign itself.

use std::fmt;

use crate::{
    error::{BigIntError, Result},
    kernel,
    mpi::Limb,
};

/// Largest power of ten that fits in a limb.
pub const DECIMAL_CHUNK: Limb = 1_000_000_000_000_000_000;

/// Number of decimal digits in one [`DECIMAL_CHUNK`] remainder.
pub const DECIMAL_CHUNK_DIGITS: usize = 18;

const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";
const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Byte order of a byte buffer or of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    /// Least-significant byte first
    Little,
    /// Most-significant byte first
    #[default]
    Big,
}

/// Letter case for hexadecimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Case {
    /// `a`–`f`
    Lower,
    /// `A`–`F`
    #[default]
    Upper,
}

impl Case {
    fn table(self) -> &'static [u8; 16] {
        match self {
            Self::Lower => HEX_LOWER,
            Self::Upper => HEX_UPPER,
        }
    }
}

/// Numeral base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Radix {
    /// Base 2
    Binary,
    /// Base 10
    Decimal,
    /// Base 16
    #[default]
    Hexadecimal,
}

impl Radix {
    /// The base as a number.
    pub fn base(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }
}

impl TryFrom<u32> for Radix {
    type Error = BigIntError;

    fn try_from(base: u32) -> Result<Self> {
        match base {
            2 => Ok(Self::Binary),
            10 => Ok(Self::Decimal),
            16 => Ok(Self::Hexadecimal),
            other => Err(BigIntError::invalid(format!("radix {other} is not supported"))),
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "base {}", self.base())
    }
}

/// Iterate `bytes` in output order.
fn ordered(bytes: &[u8], order: Endianness) -> impl Iterator<Item = &u8> {
    let (forward, backward) = match order {
        Endianness::Little => (Some(bytes.iter()), None),
        Endianness::Big => (None, Some(bytes.iter().rev())),
    };
    forward.into_iter().flatten().chain(backward.into_iter().flatten())
}

/// Left-pad `body` with `pad` until it is at least `min_width` characters.
pub(crate) fn left_pad(body: String, min_width: usize, pad: char) -> String {
    let len = body.chars().count();
    if len >= min_width {
        return body;
    }

    let mut out = String::with_capacity(min_width.saturating_sub(len) * pad.len_utf8() + body.len());
    out.extend(std::iter::repeat_n(pad, min_width - len));
    out.push_str(&body);
    out
}

/// Render `digits` with an optional leading `-`, padded in front of the sign.
pub(crate) fn signed(digits: &str, negative: bool, min_width: usize, pad: char) -> String {
    let mut body = String::with_capacity(digits.len() + 1);
    if negative {
        body.push('-');
    }
    body.push_str(digits);
    left_pad(body, min_width, pad)
}

/// Two characters per byte.
pub fn encode_hex(bytes: &[u8], order: Endianness, case: Case, min_width: usize, pad: char) -> String {
    let table = case.table();
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in ordered(bytes, order) {
        out.push(char::from(table[usize::from(byte >> 4)]));
        out.push(char::from(table[usize::from(byte & 0x0F)]));
    }
    left_pad(out, min_width, pad)
}

/// Eight characters per byte.
pub fn encode_binary(bytes: &[u8], order: Endianness, min_width: usize, pad: char) -> String {
    let mut out = String::with_capacity(bytes.len() * 8);
    for &byte in ordered(bytes, order) {
        for bit in (0..8).rev() {
            out.push(if (byte >> bit) & 1 == 1 { '1' } else { '0' });
        }
    }
    left_pad(out, min_width, pad)
}

/// Decimal digits of a magnitude, without sign. Zero is `"0"`.
pub(crate) fn decimal_digits(limbs: &[Limb]) -> Result<String> {
    let mut magnitude = kernel::copy(kernel::significant(limbs))?;
    if magnitude.is_empty() {
        return Ok(String::from("0"));
    }

    // Chunks come out least significant first
    let mut chunks = Vec::new();
    while !magnitude.is_empty() {
        chunks.push(kernel::div_rem_small_in_place(&mut magnitude, DECIMAL_CHUNK)?);
    }

    let mut out = String::with_capacity(chunks.len() * DECIMAL_CHUNK_DIGITS);
    let mut chunks = chunks.iter().rev();
    if let Some(top) = chunks.next() {
        out.push_str(&top.to_string());
    }
    for chunk in chunks {
        out.push_str(&format!("{chunk:0width$}", width = DECIMAL_CHUNK_DIGITS));
    }
    Ok(out)
}

/// Signed decimal rendering of a magnitude.
///
/// Padding goes in front of the sign: `-5` at width 4 with `' '` is `"  -5"`.
pub fn encode_decimal(negative: bool, limbs: &[Limb], min_width: usize, pad: char) -> Result<String> {
    let digits = decimal_digits(limbs)?;
    let negative = negative && digits != "0";
    Ok(signed(&digits, negative, min_width, pad))
}

/// Value of one hexadecimal digit.
fn hex_value(digit: u8) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(BigIntError::invalid(format!("invalid hexadecimal digit {:?}", char::from(digit)))),
    }
}

/// Restore bytes from text written by the matching encoder.
fn decode_groups(
    text: &str,
    order: Endianness,
    group: usize,
    radix: Radix,
    value: impl Fn(&[u8]) -> Result<u8>,
) -> Result<Vec<u8>> {
    let digits = text.as_bytes();
    let remainder = digits.len() % group;

    // Big-endian text may drop leading zero digits; little-endian text has
    // no unambiguous place to put them back.
    let padded;
    let digits = match (remainder, order) {
        (0, _) => digits,
        (_, Endianness::Big) => {
            let mut full = vec![b'0'; group - remainder];
            full.extend_from_slice(digits);
            padded = full;
            &padded[..]
        },
        (_, Endianness::Little) => {
            return Err(BigIntError::invalid(format!(
                "little-endian {radix} text length {} is not a multiple of {group}",
                digits.len()
            )));
        },
    };

    let mut bytes = digits.chunks_exact(group).map(value).collect::<Result<Vec<u8>>>()?;
    if order == Endianness::Big {
        bytes.reverse();
    }
    Ok(bytes)
}

/// Inverse of [`encode_hex`] for the same byte order. Accepts either case.
pub fn decode_hex(text: &str, order: Endianness) -> Result<Vec<u8>> {
    decode_groups(text, order, 2, Radix::Hexadecimal, |pair| {
        Ok((hex_value(pair[0])? << 4) | hex_value(pair[1])?)
    })
}

/// Inverse of [`encode_binary`] for the same byte order.
pub fn decode_binary(text: &str, order: Endianness) -> Result<Vec<u8>> {
    decode_groups(text, order, 8, Radix::Binary, |octet| {
        octet.iter().try_fold(0u8, |acc, &digit| match digit {
            b'0' => Ok(acc << 1),
            b'1' => Ok((acc << 1) | 1),
            _ => Err(BigIntError::invalid(format!("invalid binary digit {:?}", char::from(digit)))),
        })
    })
}

/// Parse signed decimal text into `(negative, magnitude limbs)`.
pub fn decode_decimal(text: &str) -> Result<(bool, Vec<Limb>)> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    if digits.is_empty() {
        return Err(BigIntError::invalid("decimal text has no digits"));
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(BigIntError::invalid(format!("invalid decimal digit {bad:?}")));
    }

    let mut magnitude = Vec::new();
    let head = match digits.len() % DECIMAL_CHUNK_DIGITS {
        0 => DECIMAL_CHUNK_DIGITS,
        partial => partial,
    };

    let mut start = 0;
    let mut end = head.min(digits.len());
    while start < digits.len() {
        let chunk = &digits[start..end];
        let value: Limb =
            chunk.parse().map_err(|_| BigIntError::invalid(format!("invalid decimal chunk {chunk:?}")))?;
        let factor = (10 as Limb).pow((end - start) as u32);
        kernel::mul_small_add_in_place(&mut magnitude, factor, value)?;

        start = end;
        end = (end + DECIMAL_CHUNK_DIGITS).min(digits.len());
    }

    let negative = negative && !magnitude.is_empty();
    Ok((negative, magnitude))
}
