//! Signed arbitrary-precision integers on top of [`tessera_handle::Handle`].
//!
//! [`BigNum`] is generic over the handle capability, which gives four
//! flavors from one implementation:
//!
//! | alias        | capability    | what it is                                  |
//! |--------------|---------------|---------------------------------------------|
//! | `BigInt`     | `Owned`       | an ordinary owned value                     |
//! | `BigIntConst`| `OwnedConst`  | an owned value frozen against mutation      |
//! | `BigIntRef`  | `Borrowed`    | a read-only view of an `Mpi` owned elsewhere|
//! | `BigIntMut`  | `BorrowedMut` | a mutable alias of an `Mpi` owned elsewhere |
//!
//! Read-only operations exist for every flavor. In-place mutation exists
//! only for `BigInt` and `BigIntMut`.

use std::{cmp::Ordering, fmt};

use tessera_handle::{Borrowed, BorrowedMut, Capability, Handle, Mutable, Owned, OwnedConst};

use crate::{
    codec::Endianness,
    error::{BigIntError, Result},
    kernel,
    mpi::{LIMB_BITS, LIMB_BYTES, Limb, Mpi, MpiAllocator, Sign},
    operand::{Operand, OperandValue},
};

/// Signed big integer behind a handle with capability `C`.
pub struct BigNum<'a, C: Capability = Owned> {
    handle: Handle<'a, MpiAllocator, C>,
}

/// Owned, mutable big integer.
pub type BigInt = BigNum<'static, Owned>;

/// Owned big integer that can no longer change.
pub type BigIntConst = BigNum<'static, OwnedConst>;

/// Read-only view of an [`Mpi`] owned elsewhere.
pub type BigIntRef<'a> = BigNum<'a, Borrowed>;

/// Mutable alias of an [`Mpi`] owned elsewhere. Never frees.
pub type BigIntMut<'a> = BigNum<'a, BorrowedMut>;

impl BigInt {
    /// Zero, allocated through [`MpiAllocator`].
    pub fn new() -> Result<Self> {
        Ok(Self { handle: Handle::new()? })
    }

    /// Zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_mpi(Mpi::default())
    }

    /// Take ownership of an `Mpi`.
    #[must_use]
    pub fn from_mpi(mpi: Mpi) -> Self {
        Self { handle: Handle::adopt(Box::new(mpi)) }
    }

    /// An empty (null) big integer. Every operation on it fails with
    /// `InvalidHandle`.
    #[must_use]
    pub fn null() -> Self {
        Self { handle: Handle::empty() }
    }

    pub(crate) fn from_parts(sign: Sign, limbs: Vec<Limb>) -> Self {
        Self::from_mpi(Mpi::from_parts(sign, limbs))
    }

    /// Build from a magnitude in `bytes`, a sign, and the byte order of
    /// `bytes`.
    ///
    /// Little-endian input is zero-extended to the next limb boundary.
    /// Big-endian input is read most-significant byte first whatever its
    /// length. A negative sign on a zero magnitude yields positive zero.
    pub fn from_bytes(bytes: &[u8], sign: Sign, order: Endianness) -> Result<Self> {
        let mut limbs = kernel::buffer(bytes.len().div_ceil(LIMB_BYTES))?;

        let mut place = |index: usize, byte: u8| {
            limbs[index / LIMB_BYTES] |= Limb::from(byte) << (8 * (index % LIMB_BYTES));
        };
        match order {
            Endianness::Little => bytes.iter().enumerate().for_each(|(i, &b)| place(i, b)),
            Endianness::Big => bytes.iter().rev().enumerate().for_each(|(i, &b)| place(i, b)),
        }

        Ok(Self::from_parts(sign, limbs))
    }

    /// Give up the handle and return the `Mpi` inside.
    pub fn into_mpi(mut self) -> Result<Mpi> {
        Ok(*self.handle.release()?)
    }

    /// Freeze into a [`BigIntConst`].
    #[must_use]
    pub fn freeze(self) -> BigIntConst {
        BigNum { handle: self.handle.freeze() }
    }
}

impl<'a> BigIntRef<'a> {
    /// Read-only view of `mpi`.
    #[must_use]
    pub fn borrow_mpi(mpi: &'a Mpi) -> Self {
        Self { handle: Handle::borrow(mpi) }
    }
}

impl<'a> BigIntMut<'a> {
    /// Mutable alias of `mpi`, typically a field of a larger structure.
    #[must_use]
    pub fn alias_mpi(mpi: &'a mut Mpi) -> Self {
        Self { handle: Handle::alias_mut(mpi) }
    }
}

impl<'a, C: Capability> BigNum<'a, C> {
    pub(crate) fn mpi(&self) -> Result<&Mpi> {
        Ok(self.handle.get()?)
    }

    pub(crate) fn value(&self) -> Result<OperandValue<'_>> {
        let mpi = self.mpi()?;
        Ok(OperandValue::limbs(mpi.sign(), mpi.limbs()))
    }

    /// True if the handle is empty (moved-from or released).
    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    /// Move the value out, leaving this big integer null.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self { handle: self.handle.take() }
    }

    /// Exchange values with `other` without copying limbs.
    pub fn swap(&mut self, other: &mut Self) {
        self.handle.swap(&mut other.handle);
    }

    /// Read-only view of this value.
    pub fn view(&self) -> Result<BigIntRef<'_>> {
        Ok(BigNum { handle: self.handle.view()? })
    }

    /// Deep copy into a new owned big integer.
    pub fn try_clone(&self) -> Result<BigInt> {
        let mpi = self.mpi()?;
        Ok(BigInt::from_parts(mpi.sign(), kernel::copy(mpi.limbs())?))
    }

    /// Sign of the value. Zero is positive.
    pub fn sign(&self) -> Result<Sign> {
        Ok(self.mpi()?.sign())
    }

    /// True if the value is zero.
    pub fn is_zero(&self) -> Result<bool> {
        Ok(self.mpi()?.is_zero())
    }

    /// True if the value is below zero.
    pub fn is_negative(&self) -> Result<bool> {
        Ok(self.mpi()?.sign().is_negative())
    }

    /// Number of significant bits of the magnitude. Zero has none.
    pub fn bit_len(&self) -> Result<usize> {
        Ok(kernel::bit_len(self.mpi()?.limbs()))
    }

    /// Number of bytes needed for the magnitude: `ceil(bit_len / 8)`.
    pub fn byte_len(&self) -> Result<usize> {
        Ok(self.bit_len()?.div_ceil(8))
    }

    /// Number of limbs in the buffer.
    pub fn limb_len(&self) -> Result<usize> {
        Ok(self.mpi()?.limbs().len())
    }

    /// Bit `index` of the magnitude, counted from the least significant.
    ///
    /// Sign-magnitude semantics: `-5` and `5` have the same bits. Indices
    /// beyond the top of the buffer read as `false`.
    pub fn get_bit(&self, index: usize) -> Result<bool> {
        Ok(self.value()?.bit(index))
    }

    /// Magnitude as bytes in `order`, `ceil(bit_len / 8)` long.
    pub fn to_bytes(&self, order: Endianness) -> Result<Vec<u8>> {
        let mut bytes = self.value()?.magnitude_bytes()?;
        if order == Endianness::Big {
            bytes.reverse();
        }
        Ok(bytes)
    }

    /// Magnitude as exactly `len` bytes in `order`, zero-extended.
    ///
    /// Fails with `InvalidArgument` if the magnitude needs more than `len`
    /// bytes.
    pub fn to_bytes_padded(&self, order: Endianness, len: usize) -> Result<Vec<u8>> {
        let mut bytes = self.value()?.magnitude_bytes()?;
        if bytes.len() > len {
            return Err(BigIntError::invalid(format!(
                "value needs {} bytes, only {len} available",
                bytes.len()
            )));
        }

        let missing = len - bytes.len();
        bytes.try_reserve_exact(missing).map_err(|_| BigIntError::AllocationFailure {
            limbs: missing.div_ceil(LIMB_BYTES),
        })?;
        bytes.resize(len, 0);
        if order == Endianness::Big {
            bytes.reverse();
        }
        Ok(bytes)
    }

    /// Value as `i64`, or `None` if it does not fit.
    pub fn to_i64(&self) -> Result<Option<i64>> {
        Ok(self.value()?.to_i64())
    }

    /// Value as `u64`, or `None` if it is negative or does not fit.
    pub fn to_u64(&self) -> Result<Option<u64>> {
        Ok(self.value()?.to_u64())
    }

    /// Total order by signed value. `+0 == -0`.
    pub fn cmp_value(&self, other: impl Operand) -> Result<Ordering> {
        Ok(self.value()?.cmp_signed(&other.operand()?))
    }

    /// Compare magnitudes, ignoring signs.
    pub fn cmp_abs(&self, other: impl Operand) -> Result<Ordering> {
        Ok(self.value()?.cmp_magnitude(&other.operand()?))
    }
}

impl<C: Mutable> BigNum<'_, C> {
    pub(crate) fn mpi_mut(&mut self) -> Result<&mut Mpi> {
        Ok(self.handle.get_mut()?)
    }

    /// Install a freshly computed value, wiping the previous buffer.
    pub(crate) fn store(&mut self, next: Mpi) -> Result<()> {
        self.mpi_mut()?.assign(next);
        Ok(())
    }

    /// Mutable alias of this value.
    pub fn alias(&mut self) -> Result<BigIntMut<'_>> {
        Ok(BigNum { handle: self.handle.alias()? })
    }

    /// Copy `source` into this value.
    pub fn assign(&mut self, source: impl Operand) -> Result<()> {
        self.mpi()?;
        let value = source.operand()?;
        let next = Mpi::from_parts(value.sign(), value.to_limbs()?.into_owned());
        self.store(next)
    }

    /// Set or clear bit `index` of the magnitude, growing the buffer if
    /// needed. The sign is kept unless the value becomes zero.
    pub fn set_bit(&mut self, index: usize, bit: bool) -> Result<()> {
        let mpi = self.mpi()?;
        let limb = index / LIMB_BITS;
        let mask: Limb = 1 << (index % LIMB_BITS);

        if !bit && limb >= mpi.limbs().len() {
            return Ok(());
        }

        let len = mpi.limbs().len().max(limb + 1);
        let mut limbs = kernel::buffer(len)?;
        limbs[..mpi.limbs().len()].copy_from_slice(mpi.limbs());
        if bit {
            limbs[limb] |= mask;
        } else {
            limbs[limb] &= !mask;
        }

        let next = Mpi::from_parts(mpi.sign(), limbs);
        self.store(next)
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

/// Cloning an empty handle yields another empty handle. Use
/// [`BigNum::try_clone`] to surface that case as an error.
impl Clone for BigInt {
    fn clone(&self) -> Self {
        match self.mpi() {
            Ok(mpi) => Self::from_mpi(mpi.clone()),
            Err(_) => Self::null(),
        }
    }
}

impl<C: Capability> Operand for BigNum<'_, C> {
    fn operand(&self) -> Result<OperandValue<'_>> {
        self.value()
    }
}

impl<C: Capability> fmt::Debug for BigNum<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mpi() {
            Ok(mpi) => {
                let digits = crate::codec::decimal_digits(mpi.limbs()).map_err(|_| fmt::Error)?;
                let sign = if mpi.sign().is_negative() { "-" } else { "" };
                write!(f, "BigNum({sign}{digits})")
            },
            Err(_) => f.write_str("BigNum(<null>)"),
        }
    }
}

/// Empty handles are unequal to everything, themselves included.
impl<C: Capability, D: Capability> PartialEq<BigNum<'_, D>> for BigNum<'_, C> {
    fn eq(&self, other: &BigNum<'_, D>) -> bool {
        matches!(self.cmp_value(other), Ok(Ordering::Equal))
    }
}

/// Empty handles are unordered.
impl<C: Capability, D: Capability> PartialOrd<BigNum<'_, D>> for BigNum<'_, C> {
    fn partial_cmp(&self, other: &BigNum<'_, D>) -> Option<Ordering> {
        self.cmp_value(other).ok()
    }
}

macro_rules! native_conversions {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInt {
            fn from(value: $t) -> Self {
                Self::from(value as i128)
            }
        }

        impl<C: Capability> PartialEq<$t> for BigNum<'_, C> {
            fn eq(&self, other: &$t) -> bool {
                matches!(self.cmp_value(*other), Ok(Ordering::Equal))
            }
        }

        impl<C: Capability> PartialOrd<$t> for BigNum<'_, C> {
            fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                self.cmp_value(*other).ok()
            }
        }
    )*};
}

native_conversions!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<i128> for BigInt {
    fn from(value: i128) -> Self {
        let magnitude = value.unsigned_abs();
        Self::from_parts(
            Sign::from_negative(value < 0),
            vec![magnitude as Limb, (magnitude >> LIMB_BITS) as Limb],
        )
    }
}

impl From<u128> for BigInt {
    fn from(value: u128) -> Self {
        Self::from_parts(Sign::Positive, vec![value as Limb, (value >> LIMB_BITS) as Limb])
    }
}

impl From<Mpi> for BigInt {
    fn from(mpi: Mpi) -> Self {
        Self::from_mpi(mpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_construction() {
        assert_eq!(BigInt::from(0).to_i64().unwrap(), Some(0));
        assert_eq!(BigInt::from(-42i64).to_i64().unwrap(), Some(-42));
        assert_eq!(BigInt::from(i64::MIN).to_i64().unwrap(), Some(i64::MIN));
        assert_eq!(BigInt::from(u64::MAX).to_u64().unwrap(), Some(u64::MAX));
        assert_eq!(BigInt::from(u128::MAX).limb_len().unwrap(), 2);
        assert_eq!(BigInt::from(i128::MIN).bit_len().unwrap(), 128);
    }

    #[test]
    fn new_is_zero() {
        let zero = BigInt::new().unwrap();
        assert!(zero.is_zero().unwrap());
        assert_eq!(zero.limb_len().unwrap(), 0);
        assert_eq!(zero.sign().unwrap(), Sign::Positive);
    }

    #[test]
    fn from_bytes_little_endian_zero_extends() {
        let value = BigInt::from_bytes(&[0x01, 0x02, 0x03], Sign::Positive, Endianness::Little).unwrap();
        assert_eq!(value.to_u64().unwrap(), Some(0x03_0201));
        assert_eq!(value.limb_len().unwrap(), 1);
    }

    #[test]
    fn from_bytes_big_endian_ignores_alignment() {
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02];
        let value = BigInt::from_bytes(&bytes, Sign::Negative, Endianness::Big).unwrap();
        assert_eq!(value.limb_len().unwrap(), 2);
        assert!(value.is_negative().unwrap());
        assert!(value.get_bit(64).unwrap());
        assert!(value.get_bit(1).unwrap());
    }

    #[test]
    fn negative_zero_from_bytes_is_positive() {
        let value = BigInt::from_bytes(&[0, 0], Sign::Negative, Endianness::Big).unwrap();
        assert_eq!(value.sign().unwrap(), Sign::Positive);
        assert_eq!(value, BigInt::zero());
    }

    #[test]
    fn to_bytes_is_minimal() {
        let value = BigInt::from(0x0102_0304u32);
        assert_eq!(value.to_bytes(Endianness::Big).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(value.to_bytes(Endianness::Little).unwrap(), vec![4, 3, 2, 1]);
        assert!(BigInt::zero().to_bytes(Endianness::Big).unwrap().is_empty());
    }

    #[test]
    fn to_bytes_padded_zero_extends() {
        let value = BigInt::from(0xABu8);
        assert_eq!(value.to_bytes_padded(Endianness::Big, 4).unwrap(), vec![0, 0, 0, 0xAB]);
        assert_eq!(value.to_bytes_padded(Endianness::Little, 2).unwrap(), vec![0xAB, 0]);
        assert!(matches!(
            BigInt::from(0x1_0000u32).to_bytes_padded(Endianness::Big, 2),
            Err(BigIntError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn take_leaves_null() {
        let mut a = BigInt::from(7);
        let b = a.take();

        assert!(a.is_null());
        assert_eq!(b, 7);
        assert_eq!(a.sign(), Err(BigIntError::InvalidHandle));
        assert_eq!(a.to_bytes(Endianness::Big), Err(BigIntError::InvalidHandle));
        assert_eq!(a.try_clone().unwrap_err(), BigIntError::InvalidHandle);
        assert!(a.clone().is_null());
        assert_ne!(a, a.clone());
    }

    #[test]
    fn swap_exchanges_values() {
        let mut a = BigInt::from(1);
        let mut b = BigInt::from(-2);
        a.swap(&mut b);
        assert_eq!(a, -2);
        assert_eq!(b, 1);
    }

    #[test]
    fn into_mpi_releases_value() {
        let mpi = BigInt::from(-9).into_mpi().unwrap();
        assert_eq!(mpi.sign(), Sign::Negative);
        assert_eq!(mpi.limbs(), &[9]);
        assert_eq!(BigInt::from_mpi(mpi), -9);
    }

    #[test]
    fn borrowed_view_reads_foreign_mpi() {
        let mpi = BigInt::from(12345).into_mpi().unwrap();
        let view = BigIntRef::borrow_mpi(&mpi);
        assert_eq!(view, 12345);
        assert_eq!(view.try_clone().unwrap(), 12345);
    }

    #[test]
    fn mutable_alias_updates_field_of_composite() {
        struct Point {
            x: Mpi,
            y: Mpi,
        }

        let mut point = Point { x: Mpi::default(), y: Mpi::default() };
        {
            let mut x = BigIntMut::alias_mpi(&mut point.x);
            x.assign(10).unwrap();
            x.set_bit(8, true).unwrap();
        }

        assert_eq!(BigIntRef::borrow_mpi(&point.x), 266);
        assert!(point.y.is_zero());
    }

    #[test]
    fn alias_of_owned_writes_through() {
        let mut owner = BigInt::from(1);
        owner.alias().unwrap().assign(-3).unwrap();
        assert_eq!(owner, -3);
    }

    #[test]
    fn frozen_value_stays_readable() {
        let frozen = BigInt::from(77).freeze();
        assert_eq!(frozen, 77);
        assert_eq!(frozen.view().unwrap(), 77);
    }

    #[test]
    fn set_bit_grows_and_clears() {
        let mut value = BigInt::zero();
        value.set_bit(130, true).unwrap();
        assert_eq!(value.limb_len().unwrap(), 3);
        assert!(value.get_bit(130).unwrap());
        assert!(!value.get_bit(10_000).unwrap());

        value.set_bit(130, false).unwrap();
        assert!(value.is_zero().unwrap());
        assert_eq!(value.limb_len().unwrap(), 0);

        // Clearing a bit past the top is a no-op
        value.set_bit(500, false).unwrap();
        assert!(value.is_zero().unwrap());
    }

    #[test]
    fn set_bit_keeps_sign() {
        let mut value = BigInt::from(-4);
        value.set_bit(0, true).unwrap();
        assert_eq!(value, -5);

        value.set_bit(0, false).unwrap();
        value.set_bit(2, false).unwrap();
        assert_eq!(value, 0);
        assert_eq!(value.sign().unwrap(), Sign::Positive);
    }

    #[test]
    fn negative_bits_are_sign_magnitude() {
        let value = BigInt::from(-5);
        assert!(value.get_bit(0).unwrap());
        assert!(!value.get_bit(1).unwrap());
        assert!(value.get_bit(2).unwrap());
        assert!(!value.get_bit(63).unwrap());
    }

    #[test]
    fn comparison_is_signed() {
        assert!(BigInt::from(-10) < BigInt::from(3));
        assert!(BigInt::from(-10) < BigInt::from(-3));
        assert!(BigInt::from(u128::MAX) > BigInt::from(u64::MAX));
        assert_eq!(BigInt::from(-3).cmp_abs(3).unwrap(), Ordering::Equal);
        assert!(BigInt::null().partial_cmp(&BigInt::zero()).is_none());
    }

    #[test]
    fn debug_shows_decimal_value() {
        assert_eq!(format!("{:?}", BigInt::from(-15)), "BigNum(-15)");
        assert_eq!(format!("{:?}", BigInt::null()), "BigNum(<null>)");
    }
}
