//! Right-hand operands for arithmetic and comparison.
//!
//! Anything that implements [`Operand`] can appear on the right of a big
//! integer operation: another big integer (owned, borrowed or a zero-copy
//! byte view) or a native integer no wider than one limb. 128-bit natives
//! deliberately do not implement it; convert them with `BigInt::from`
//! first.

use std::{borrow::Cow, cmp::Ordering};

use zerocopy::byteorder::{LittleEndian, U64};

use crate::{
    error::{BigIntError, Result},
    kernel,
    mpi::{LIMB_BITS, LIMB_BYTES, Limb, Sign},
};

/// Where an operand's magnitude lives.
#[derive(Debug, Clone, Copy)]
enum Magnitude<'a> {
    /// A single native limb (possibly zero)
    Small(Limb),
    /// Normalized limbs of an `Mpi`
    Limbs(&'a [Limb]),
    /// Normalized little-endian limbs aliasing caller bytes
    LittleEndian(&'a [U64<LittleEndian>]),
}

/// Read-only sign and magnitude of an operand.
#[derive(Debug, Clone, Copy)]
pub struct OperandValue<'a> {
    sign: Sign,
    magnitude: Magnitude<'a>,
}

impl<'a> OperandValue<'a> {
    pub(crate) fn small(sign: Sign, value: Limb) -> Self {
        let sign = if value == 0 { Sign::Positive } else { sign };
        Self { sign, magnitude: Magnitude::Small(value) }
    }

    pub(crate) fn limbs(sign: Sign, limbs: &'a [Limb]) -> Self {
        Self { sign, magnitude: Magnitude::Limbs(limbs) }
    }

    pub(crate) fn little_endian(sign: Sign, limbs: &'a [U64<LittleEndian>]) -> Self {
        Self { sign, magnitude: Magnitude::LittleEndian(limbs) }
    }

    /// Sign of the operand. Zero is positive.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// True if the operand is zero.
    pub fn is_zero(&self) -> bool {
        self.limb_len() == 0
    }

    /// Number of significant limbs.
    pub fn limb_len(&self) -> usize {
        match self.magnitude {
            Magnitude::Small(0) => 0,
            Magnitude::Small(_) => 1,
            Magnitude::Limbs(limbs) => limbs.len(),
            Magnitude::LittleEndian(limbs) => limbs.len(),
        }
    }

    /// Limb `index` of the magnitude, zero beyond the top.
    pub fn limb(&self, index: usize) -> Limb {
        match self.magnitude {
            Magnitude::Small(value) => if index == 0 { value } else { 0 },
            Magnitude::Limbs(limbs) => limbs.get(index).copied().unwrap_or(0),
            Magnitude::LittleEndian(limbs) => limbs.get(index).map_or(0, |limb| limb.get()),
        }
    }

    /// Magnitude as native limbs, borrowing when the storage allows it.
    pub(crate) fn to_limbs(&self) -> Result<Cow<'a, [Limb]>> {
        match self.magnitude {
            Magnitude::Limbs(limbs) => Ok(Cow::Borrowed(limbs)),
            Magnitude::Small(0) => Ok(Cow::Owned(Vec::new())),
            Magnitude::Small(value) => Ok(Cow::Owned(kernel::copy(&[value])?)),
            Magnitude::LittleEndian(limbs) => {
                let mut out = kernel::buffer(limbs.len())?;
                for (slot, limb) in out.iter_mut().zip(limbs) {
                    *slot = limb.get();
                }
                Ok(Cow::Owned(out))
            },
        }
    }

    /// Number of significant bits of the magnitude.
    pub fn bit_len(&self) -> usize {
        match self.limb_len() {
            0 => 0,
            len => len * LIMB_BITS - self.limb(len - 1).leading_zeros() as usize,
        }
    }

    /// Bit `index` of the magnitude.
    pub fn bit(&self, index: usize) -> bool {
        (self.limb(index / LIMB_BITS) >> (index % LIMB_BITS)) & 1 == 1
    }

    /// Minimal little-endian bytes of the magnitude (`ceil(bit_len / 8)`).
    pub(crate) fn magnitude_bytes(&self) -> Result<Vec<u8>> {
        let len = self.bit_len().div_ceil(8);
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|_| BigIntError::AllocationFailure {
            limbs: len.div_ceil(LIMB_BYTES),
        })?;

        for index in 0..self.limb_len() {
            bytes.extend_from_slice(&self.limb(index).to_le_bytes());
        }
        bytes.truncate(len);
        Ok(bytes)
    }

    /// Compare magnitudes, ignoring sign.
    pub fn cmp_magnitude(&self, other: &OperandValue<'_>) -> Ordering {
        let len = self.limb_len();
        len.cmp(&other.limb_len()).then_with(|| {
            (0..len).rev().map(|i| self.limb(i).cmp(&other.limb(i))).find(|o| o.is_ne()).unwrap_or(Ordering::Equal)
        })
    }

    /// Compare signed values. Zero equals zero whatever its stored sign.
    pub fn cmp_signed(&self, other: &OperandValue<'_>) -> Ordering {
        match (self.sign, other.sign) {
            _ if self.is_zero() && other.is_zero() => Ordering::Equal,
            (Sign::Positive, Sign::Negative) => Ordering::Greater,
            (Sign::Negative, Sign::Positive) => Ordering::Less,
            (Sign::Positive, Sign::Positive) => self.cmp_magnitude(other),
            (Sign::Negative, Sign::Negative) => other.cmp_magnitude(self),
        }
    }

    /// Value as `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.limb_len() > 1 {
            return None;
        }
        let magnitude = self.limb(0);
        match self.sign {
            Sign::Positive => i64::try_from(magnitude).ok(),
            Sign::Negative => 0i64.checked_sub_unsigned(magnitude),
        }
    }

    /// Value as `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        match (self.sign, self.limb_len()) {
            (_, 0) => Some(0),
            (Sign::Positive, 1) => Some(self.limb(0)),
            _ => None,
        }
    }
}

/// Values that can appear on the right of a big integer operation.
pub trait Operand {
    /// Sign and magnitude of the operand.
    ///
    /// Fails with `InvalidHandle` if the operand is an empty handle.
    fn operand(&self) -> Result<OperandValue<'_>>;
}

impl<T: Operand + ?Sized> Operand for &T {
    fn operand(&self) -> Result<OperandValue<'_>> {
        (**self).operand()
    }
}

impl<T: Operand + ?Sized> Operand for &mut T {
    fn operand(&self) -> Result<OperandValue<'_>> {
        (**self).operand()
    }
}

macro_rules! unsigned_operand {
    ($($t:ty),*) => {$(
        impl Operand for $t {
            fn operand(&self) -> Result<OperandValue<'_>> {
                Ok(OperandValue::small(Sign::Positive, *self as Limb))
            }
        }
    )*};
}

macro_rules! signed_operand {
    ($($t:ty),*) => {$(
        impl Operand for $t {
            fn operand(&self) -> Result<OperandValue<'_>> {
                Ok(OperandValue::small(Sign::from_negative(*self < 0), self.unsigned_abs() as Limb))
            }
        }
    )*};
}

unsigned_operand!(u8, u16, u32, u64, usize);
signed_operand!(i8, i16, i32, i64, isize);
