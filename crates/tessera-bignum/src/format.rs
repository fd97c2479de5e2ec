//! Text rendering and parsing of big integers.
//!
//! [`NumeralFormat`] bundles the knobs of the numeral codec the same way a
//! connection config bundles timeouts: plain data, defaults in named
//! constants, builder-style setters.
//!
//! Rendered text has the shape `pad* [-] digits`. Hexadecimal and binary
//! digits always cover whole bytes, so zero renders as `"00"` in hex.

use std::{fmt, str::FromStr};

use tessera_handle::Capability;

use crate::{
    bigint::{BigInt, BigNum},
    codec::{self, Case, Endianness, Radix},
    error::{BigIntError, Result},
    mpi::Sign,
    operand::{Operand, OperandValue},
    view::BigIntView,
};

/// Default radix: hexadecimal.
pub const DEFAULT_RADIX: Radix = Radix::Hexadecimal;

/// Default byte order: most-significant byte first.
pub const DEFAULT_ORDER: Endianness = Endianness::Big;

/// Default minimum width: no padding.
pub const DEFAULT_MIN_WIDTH: usize = 0;

/// Default padding character.
pub const DEFAULT_PAD: char = '0';

/// Default hexadecimal letter case.
pub const DEFAULT_CASE: Case = Case::Upper;

/// How to render a big integer as text, and how to read it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumeralFormat {
    /// Numeral base
    pub radix: Radix,
    /// Byte order of hex and binary digits (ignored for decimal)
    pub order: Endianness,
    /// Minimum number of characters, reached by left padding
    pub min_width: usize,
    /// Padding character
    pub pad: char,
    /// Letter case of hex digits
    pub case: Case,
}

impl Default for NumeralFormat {
    fn default() -> Self {
        Self {
            radix: DEFAULT_RADIX,
            order: DEFAULT_ORDER,
            min_width: DEFAULT_MIN_WIDTH,
            pad: DEFAULT_PAD,
            case: DEFAULT_CASE,
        }
    }
}

impl NumeralFormat {
    /// Signed decimal without padding.
    pub fn decimal() -> Self {
        Self::default().with_radix(Radix::Decimal)
    }

    /// Set the radix.
    #[must_use]
    pub fn with_radix(mut self, radix: Radix) -> Self {
        self.radix = radix;
        self
    }

    /// Set the byte order.
    #[must_use]
    pub fn with_order(mut self, order: Endianness) -> Self {
        self.order = order;
        self
    }

    /// Set minimum width and padding character.
    #[must_use]
    pub fn with_width(mut self, min_width: usize, pad: char) -> Self {
        self.min_width = min_width;
        self.pad = pad;
        self
    }

    /// Set the hex letter case.
    #[must_use]
    pub fn with_case(mut self, case: Case) -> Self {
        self.case = case;
        self
    }
}

impl NumeralFormat {
    /// `-` always marks a negative value, so it cannot double as padding.
    fn check(&self) -> Result<()> {
        if self.pad == '-' {
            return Err(BigIntError::invalid("padding character '-' is reserved for the sign"));
        }
        Ok(())
    }

    fn encode(&self, value: &OperandValue<'_>) -> Result<String> {
        self.check()?;
        let negative = value.sign().is_negative();

        if self.radix == Radix::Decimal {
            return codec::encode_decimal(negative, &value.to_limbs()?, self.min_width, self.pad);
        }

        let mut bytes = value.magnitude_bytes()?;
        if bytes.is_empty() {
            bytes.push(0);
        }
        let digits = match self.radix {
            Radix::Binary => codec::encode_binary(&bytes, self.order, 0, self.pad),
            _ => codec::encode_hex(&bytes, self.order, self.case, 0, self.pad),
        };
        Ok(codec::signed(&digits, negative, self.min_width, self.pad))
    }
}

impl<C: Capability> BigNum<'_, C> {
    /// Render this value as text.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` on an empty handle; `InvalidArgument` if the padding
    /// character is `-`; `AllocationFailure` if scratch space for decimal
    /// conversion cannot be obtained.
    pub fn to_text(&self, format: &NumeralFormat) -> Result<String> {
        format.encode(&self.value()?)
    }
}

impl BigIntView<'_> {
    /// Render the viewed value as text, reading the limbs in place.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the padding character is `-`.
    pub fn to_text(&self, format: &NumeralFormat) -> Result<String> {
        format.encode(&self.operand()?)
    }
}

impl BigInt {
    /// Parse text produced by [`BigNum::to_text`] with the same format.
    ///
    /// Leading padding is skipped when the padding character cannot be
    /// mistaken for a digit. Hexadecimal digits are accepted in either case.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for empty or malformed text, or if the padding
    /// character is `-`.
    pub fn from_text(text: &str, format: &NumeralFormat) -> Result<Self> {
        format.check()?;
        let text = if format.pad.is_ascii_alphanumeric() { text } else { text.trim_start_matches(format.pad) };

        if format.radix == Radix::Decimal {
            let (negative, limbs) = codec::decode_decimal(text)?;
            return Ok(Self::from_parts(Sign::from_negative(negative), limbs));
        }

        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => (Sign::Negative, rest),
            None => (Sign::Positive, text),
        };
        if digits.is_empty() {
            return Err(BigIntError::invalid(format!("{} text has no digits", format.radix)));
        }

        let bytes = match format.radix {
            Radix::Binary => codec::decode_binary(digits, format.order)?,
            _ => codec::decode_hex(digits, format.order)?,
        };
        Self::from_bytes(&bytes, sign, format.order)
    }
}

fn decimal_digits(value: &OperandValue<'_>) -> Result<String> {
    codec::decimal_digits(&value.to_limbs()?)
}

/// Big-endian digits of the magnitude without leading zeros, for the
/// `fmt` radix traits.
fn radix_digits(value: &OperandValue<'_>, radix: Radix, case: Case) -> Result<String> {
    let mut bytes = value.magnitude_bytes()?;
    bytes.reverse();
    let digits = match radix {
        Radix::Binary => codec::encode_binary(&bytes, Endianness::Big, 0, '0'),
        _ => codec::encode_hex(&bytes, Endianness::Big, case, 0, '0'),
    };
    match digits.trim_start_matches('0') {
        "" => Ok(String::from("0")),
        trimmed => Ok(trimmed.to_owned()),
    }
}

fn render(
    value: Result<OperandValue<'_>>,
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    digits: impl FnOnce(&OperandValue<'_>) -> Result<String>,
) -> fmt::Result {
    let Ok(value) = value else {
        return f.write_str("<null>");
    };
    let digits = digits(&value).map_err(|_| fmt::Error)?;
    f.pad_integral(!value.sign().is_negative(), prefix, &digits)
}

/// Signed decimal. Honors width, fill, `+` and `0` flags.
impl<C: Capability> fmt::Display for BigNum<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.value(), f, "", decimal_digits)
    }
}

impl<C: Capability> fmt::LowerHex for BigNum<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.value(), f, "0x", |v| radix_digits(v, Radix::Hexadecimal, Case::Lower))
    }
}

impl<C: Capability> fmt::UpperHex for BigNum<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.value(), f, "0x", |v| radix_digits(v, Radix::Hexadecimal, Case::Upper))
    }
}

impl<C: Capability> fmt::Binary for BigNum<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.value(), f, "0b", |v| radix_digits(v, Radix::Binary, Case::Lower))
    }
}

impl fmt::Display for BigIntView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.operand(), f, "", decimal_digits)
    }
}

impl fmt::LowerHex for BigIntView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.operand(), f, "0x", |v| radix_digits(v, Radix::Hexadecimal, Case::Lower))
    }
}

impl fmt::UpperHex for BigIntView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.operand(), f, "0x", |v| radix_digits(v, Radix::Hexadecimal, Case::Upper))
    }
}

impl fmt::Binary for BigIntView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.operand(), f, "0b", |v| radix_digits(v, Radix::Binary, Case::Lower))
    }
}

/// Parses signed decimal text.
impl FromStr for BigInt {
    type Err = BigIntError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s, &NumeralFormat::decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_big_endian_upper_hex() {
        let format = NumeralFormat::default();
        assert_eq!(format.radix, Radix::Hexadecimal);
        assert_eq!(BigInt::from(0xABCDu32).to_text(&format).unwrap(), "ABCD");
        assert_eq!(BigInt::from(-0x0F).to_text(&format).unwrap(), "-0F");
        assert_eq!(BigInt::zero().to_text(&format).unwrap(), "00");
    }

    #[test]
    fn little_endian_hex_reverses_bytes() {
        let format = NumeralFormat::default().with_order(Endianness::Little).with_case(Case::Lower);
        assert_eq!(BigInt::from(0x0102u16).to_text(&format).unwrap(), "0201");
    }

    #[test]
    fn decimal_padding_precedes_sign() {
        let format = NumeralFormat::decimal().with_width(4, ' ');
        assert_eq!(BigInt::from(-5).to_text(&format).unwrap(), "  -5");
        assert_eq!(BigInt::from_text("  -5", &format).unwrap(), -5);
    }

    #[test]
    fn dash_padding_is_rejected() {
        let decimal = NumeralFormat::decimal().with_width(6, '-');
        assert!(matches!(BigInt::from(-5).to_text(&decimal), Err(BigIntError::InvalidArgument { .. })));
        assert!(matches!(BigInt::from_text("-----5", &decimal), Err(BigIntError::InvalidArgument { .. })));

        let hex = NumeralFormat::default().with_width(8, '-');
        assert!(matches!(BigInt::from(-0x1F).to_text(&hex), Err(BigIntError::InvalidArgument { .. })));
        assert!(matches!(BigInt::from_text("------1F", &hex), Err(BigIntError::InvalidArgument { .. })));

        // Without the padding, the same values keep their sign
        assert_eq!(BigInt::from_text("-5", &NumeralFormat::decimal()).unwrap(), -5);
        assert_eq!(BigInt::from_text("-1F", &NumeralFormat::default()).unwrap(), -0x1F);
    }

    #[test]
    fn punctuation_padding_round_trips_negatives() {
        for pad in [' ', '.', '*'] {
            let format = NumeralFormat::default().with_width(8, pad);
            let text = BigInt::from(-0x1F).to_text(&format).unwrap();
            assert_eq!(text.chars().count(), 8);
            assert_eq!(BigInt::from_text(&text, &format).unwrap(), -0x1F, "pad {pad:?}");
        }
    }

    #[test]
    fn binary_covers_whole_bytes() {
        let format = NumeralFormat::default().with_radix(Radix::Binary);
        assert_eq!(BigInt::from(5).to_text(&format).unwrap(), "00000101");
        assert_eq!(BigInt::from_text("101", &format).unwrap(), 5);
    }

    #[test]
    fn hex_round_trip_both_orders() {
        let value = BigInt::from(-0x1234_5678_9ABC_DEF0_1122i128);
        for order in [Endianness::Big, Endianness::Little] {
            let format = NumeralFormat::default().with_order(order);
            let text = value.to_text(&format).unwrap();
            assert_eq!(BigInt::from_text(&text, &format).unwrap(), value, "{order:?}");
        }
    }

    #[test]
    fn malformed_text_is_rejected() {
        let hex = NumeralFormat::default();
        assert!(matches!(BigInt::from_text("", &hex), Err(BigIntError::InvalidArgument { .. })));
        assert!(matches!(BigInt::from_text("-", &hex), Err(BigIntError::InvalidArgument { .. })));
        assert!(matches!(BigInt::from_text("0G", &hex), Err(BigIntError::InvalidArgument { .. })));
        assert!(matches!(
            BigInt::from_text("ABC", &hex.with_order(Endianness::Little)),
            Err(BigIntError::InvalidArgument { .. })
        ));
        assert!("12a".parse::<BigInt>().is_err());
        assert!("--1".parse::<BigInt>().is_err());
    }

    #[test]
    fn display_matches_native_formatting() {
        let value = BigInt::from(-255);
        assert_eq!(value.to_string(), "-255");
        assert_eq!(format!("{value:>6}"), "  -255");
        assert_eq!(format!("{value:06}"), "-00255");
        assert_eq!(format!("{:+}", BigInt::from(7)), "+7");
        assert_eq!(format!("{value:x}"), "-ff");
        assert_eq!(format!("{value:#X}"), "-0xFF");
        assert_eq!(format!("{:b}", BigInt::from(5)), "101");
        assert_eq!(format!("{:x}", BigInt::zero()), "0");
        assert_eq!(BigInt::null().to_string(), "<null>");
    }

    #[test]
    fn parse_large_decimal() {
        let text = "-340282366920938463463374607431768211456";
        let value: BigInt = text.parse().unwrap();
        assert_eq!(value.to_string(), text);
        assert_eq!(value.bit_len().unwrap(), 129);
    }
}
