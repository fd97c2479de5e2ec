//! Zero-copy, read-only big integers over caller-supplied bytes.
//!
//! A [`BigIntView`] reinterprets a little-endian byte buffer as limbs in
//! place, the way wire headers are parsed without copying. The buffer is
//! never written and never freed; its lifetime bounds the view.

use std::{cmp::Ordering, fmt};

use zerocopy::{
    FromBytes,
    byteorder::{LittleEndian, U64},
};

use crate::{
    bigint::BigInt,
    codec::{self, Endianness},
    error::{BigIntError, Result},
    mpi::{LIMB_BYTES, Sign},
    operand::{Operand, OperandValue},
};

/// Read-only big integer aliasing little-endian bytes.
#[derive(Clone, Copy)]
pub struct BigIntView<'a> {
    sign: Sign,
    limbs: &'a [U64<LittleEndian>],
}

impl<'a> BigIntView<'a> {
    /// View `bytes` (least-significant byte first) as a magnitude with
    /// `sign`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `bytes.len()` is not a multiple of the limb
    /// width (8 bytes).
    pub fn new(bytes: &'a [u8], sign: Sign) -> Result<Self> {
        if bytes.len() % LIMB_BYTES != 0 {
            return Err(BigIntError::invalid(format!(
                "view length {} is not a multiple of {LIMB_BYTES} bytes",
                bytes.len()
            )));
        }

        let limbs = <[U64<LittleEndian>]>::ref_from_bytes(bytes)
            .map_err(|_| BigIntError::invalid("view bytes cannot be read as limbs"))?;

        let len = limbs.iter().rposition(|limb| limb.get() != 0).map_or(0, |top| top + 1);
        let limbs = &limbs[..len];
        let sign = if limbs.is_empty() { Sign::Positive } else { sign };

        Ok(Self { sign, limbs })
    }

    fn value(&self) -> OperandValue<'a> {
        OperandValue::little_endian(self.sign, self.limbs)
    }

    /// Sign of the viewed value. A zero magnitude is positive.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// True if the viewed magnitude is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Number of significant limbs.
    pub fn limb_len(&self) -> usize {
        self.limbs.len()
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        self.value().bit_len()
    }

    /// Bit `index` of the magnitude.
    pub fn get_bit(&self, index: usize) -> bool {
        self.value().bit(index)
    }

    /// Magnitude as minimal bytes in `order`.
    pub fn to_bytes(&self, order: Endianness) -> Result<Vec<u8>> {
        let mut bytes = self.value().magnitude_bytes()?;
        if order == Endianness::Big {
            bytes.reverse();
        }
        Ok(bytes)
    }

    /// Owned copy of the viewed value.
    pub fn to_bigint(&self) -> Result<BigInt> {
        let value = self.value();
        Ok(BigInt::from_parts(value.sign(), value.to_limbs()?.into_owned()))
    }

    /// Signed comparison with any operand.
    pub fn cmp_value(&self, other: impl Operand) -> Result<Ordering> {
        Ok(self.value().cmp_signed(&other.operand()?))
    }

    /// Compare magnitudes, ignoring signs.
    pub fn cmp_abs(&self, other: impl Operand) -> Result<Ordering> {
        Ok(self.value().cmp_magnitude(&other.operand()?))
    }
}

impl Operand for BigIntView<'_> {
    fn operand(&self) -> Result<OperandValue<'_>> {
        Ok(self.value())
    }
}

impl fmt::Debug for BigIntView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limbs = self.value().to_limbs().map_err(|_| fmt::Error)?;
        let digits = codec::encode_decimal(self.sign.is_negative(), &limbs, 0, '0').map_err(|_| fmt::Error)?;
        write!(f, "BigIntView({digits})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NumeralFormat;

    #[test]
    fn rejects_partial_limbs() {
        let err = BigIntView::new(&[1, 2, 3], Sign::Positive).unwrap_err();
        assert!(matches!(err, BigIntError::InvalidArgument { .. }));
    }

    #[test]
    fn reads_little_endian_limbs_in_place() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x2A;
        bytes[8] = 0x01;

        let view = BigIntView::new(&bytes, Sign::Negative).unwrap();
        assert_eq!(view.limb_len(), 2);
        assert_eq!(view.bit_len(), 65);
        assert!(view.get_bit(64));
        assert_eq!(view.to_bigint().unwrap(), BigInt::from(-((1i128 << 64) + 42)));
    }

    #[test]
    fn trailing_zero_limbs_are_ignored() {
        let bytes = [7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let view = BigIntView::new(&bytes, Sign::Positive).unwrap();
        assert_eq!(view.limb_len(), 1);
        assert_eq!(view.to_bytes(Endianness::Little).unwrap(), vec![7]);
    }

    #[test]
    fn zero_view_is_positive() {
        let view = BigIntView::new(&[0; 8], Sign::Negative).unwrap();
        assert!(view.is_zero());
        assert_eq!(view.sign(), Sign::Positive);
        assert!(BigIntView::new(&[], Sign::Negative).unwrap().is_zero());
    }

    #[test]
    fn works_as_right_operand() {
        let bytes = 5u64.to_le_bytes();
        let five = BigIntView::new(&bytes, Sign::Positive).unwrap();
        assert_eq!(BigInt::from(10).checked_add(five).unwrap(), 15);
        assert_eq!(five.cmp_value(-5).unwrap(), Ordering::Greater);
        assert_eq!(format!("{five:?}"), "BigIntView(5)");
    }

    #[test]
    fn renders_without_copying() {
        let bytes = [0xFF, 0x01, 0, 0, 0, 0, 0, 0];
        let view = BigIntView::new(&bytes, Sign::Negative).unwrap();

        assert_eq!(view.to_text(&NumeralFormat::default()).unwrap(), "-01FF");
        assert_eq!(view.to_text(&NumeralFormat::decimal().with_width(6, ' ')).unwrap(), "  -511");
        assert_eq!(view.to_string(), "-511");
        assert_eq!(format!("{view:#x}"), "-0x1ff");
        assert_eq!(format!("{view:X}"), "-1FF");
        assert_eq!(format!("{view:b}"), "-111111111");
        assert_eq!(format!("{:x}", BigIntView::new(&[], Sign::Positive).unwrap()), "0");
        assert!(view.to_text(&NumeralFormat::decimal().with_width(6, '-')).is_err());
    }

    #[test]
    fn computes_as_receiver() {
        let mut bytes = [0u8; 16];
        bytes[8] = 0x01;
        let view = BigIntView::new(&bytes, Sign::Positive).unwrap();
        let two_pow_64 = BigInt::from(1u128 << 64);

        assert_eq!(view.checked_add(1).unwrap(), BigInt::from((1u128 << 64) + 1));
        assert_eq!(view.checked_sub(&two_pow_64).unwrap(), 0);
        assert_eq!(view.checked_mul(-2).unwrap(), BigInt::from(-(1i128 << 65)));
        assert_eq!(view.checked_div(1u64 << 32).unwrap(), BigInt::from(1u64 << 32));
        assert_eq!(view.checked_rem(7).unwrap(), BigInt::from((1u128 << 64) % 7));
        assert_eq!(view.checked_neg().unwrap(), BigInt::from(-(1i128 << 64)));
        assert_eq!(view.checked_neg().unwrap().abs().unwrap(), two_pow_64);
        assert_eq!(view.checked_shr(60).unwrap(), 16);
        assert_eq!(view.checked_shl(1).unwrap(), BigInt::from(1u128 << 65));
        assert_eq!(view.checked_rem_euclid(-10).unwrap(), BigInt::from((1u128 << 64) % 10));
        assert_eq!(view.cmp_abs(-(1i64 << 62)).unwrap(), Ordering::Greater);

        let (q, r) = view.checked_div_rem(view).unwrap();
        assert_eq!((q, r), (BigInt::from(1), BigInt::zero()));
        assert_eq!(view.checked_div(0).unwrap_err(), BigIntError::DivisionByZero);

        // The borrowed bytes are untouched by every computation
        assert_eq!(bytes[8], 0x01);
    }
}
