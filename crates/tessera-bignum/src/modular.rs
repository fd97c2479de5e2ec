//! Modular arithmetic for scalar and modulus handling.
//!
//! Not constant time. Callers that need side-channel resistance must not
//! feed secrets through these routines.

use std::cmp::Ordering;

use tessera_handle::Capability;

use crate::{
    arith::{quotient_remainder, sum},
    bigint::{BigInt, BigNum},
    error::{BigIntError, Result},
    kernel,
    mpi::{Limb, Mpi, Sign},
    operand::{Operand, OperandValue},
    view::BigIntView,
};

/// Non-negative residue of `a` modulo `|m|`.
fn residue(a: &OperandValue<'_>, m: &OperandValue<'_>) -> Result<Mpi> {
    let (_, r) = quotient_remainder(a, m)?;
    if !r.sign().is_negative() {
        return Ok(r);
    }
    sum(&OperandValue::limbs(r.sign(), r.limbs()), m, Sign::Positive)
}

/// `a * b mod m` on magnitudes.
fn mul_mod(a: &[Limb], b: &[Limb], m: &[Limb]) -> Result<Vec<Limb>> {
    let product = kernel::mul(a, b)?;
    Ok(kernel::div_rem(&product, m)?.1)
}

impl<C: Capability> BigNum<'_, C> {
    /// `self mod |m|`, always in `[0, |m|)`.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` if `m` is zero.
    pub fn checked_rem_euclid(&self, m: impl Operand) -> Result<BigInt> {
        Ok(BigInt::from_mpi(residue(&self.value()?, &m.operand()?)?))
    }

    /// Greatest common divisor of the magnitudes. `gcd(0, 0)` is zero.
    pub fn gcd(&self, other: impl Operand) -> Result<BigInt> {
        let (a, b) = (self.value()?, other.operand()?);
        let mut x = a.to_limbs()?.into_owned();
        let mut y = b.to_limbs()?.into_owned();

        while !y.is_empty() {
            let (_, r) = kernel::div_rem(&x, &y)?;
            x = std::mem::replace(&mut y, r);
        }
        Ok(BigInt::from_parts(Sign::Positive, x))
    }

    /// `self^exponent mod |modulus|` by left-to-right square-and-multiply.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `exponent` is negative
    /// - `DivisionByZero` if `modulus` is zero
    pub fn pow_mod(&self, exponent: impl Operand, modulus: impl Operand) -> Result<BigInt> {
        let base = self.value()?;
        let exponent = exponent.operand()?;
        let modulus = modulus.operand()?;

        if exponent.sign().is_negative() {
            return Err(BigIntError::invalid("exponent must not be negative"));
        }
        if modulus.is_zero() {
            return Err(BigIntError::DivisionByZero);
        }

        let m = modulus.to_limbs()?;
        let base = residue(&base, &modulus)?;

        // 1 mod m, which is 0 when |m| == 1
        let mut result = kernel::div_rem(&[1], &m)?.1;
        for index in (0..exponent.bit_len()).rev() {
            result = mul_mod(&result, &result, &m)?;
            if exponent.bit(index) {
                result = mul_mod(&result, base.limbs(), &m)?;
            }
        }

        Ok(BigInt::from_parts(Sign::Positive, result))
    }

    /// `x` in `[0, modulus)` with `self * x ≡ 1 (mod modulus)`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `modulus` is at most one or `self` shares a
    /// factor with it.
    pub fn inv_mod(&self, modulus: impl Operand) -> Result<BigInt> {
        let modulus = modulus.operand()?;
        if modulus.cmp_signed(&1u8.operand()?) != Ordering::Greater {
            return Err(BigIntError::invalid("modulus must be greater than one"));
        }

        let m = BigInt::from_parts(Sign::Positive, modulus.to_limbs()?.into_owned());
        let mut old_r = self.checked_rem_euclid(&m)?;
        let mut r = m.try_clone()?;
        let mut old_s = BigInt::from(1u8);
        let mut s = BigInt::zero();

        while !r.is_zero()? {
            let (q, next_r) = old_r.checked_div_rem(&r)?;
            let next_s = old_s.checked_sub(q.checked_mul(&s)?)?;
            old_r = std::mem::replace(&mut r, next_r);
            old_s = std::mem::replace(&mut s, next_s);
        }

        if old_r != 1 {
            return Err(BigIntError::invalid("value is not invertible modulo the modulus"));
        }
        old_s.checked_rem_euclid(&m)
    }
}

impl BigIntView<'_> {
    /// `self mod |m|`, always in `[0, |m|)`, read from the viewed limbs.
    ///
    /// # Errors
    ///
    /// `DivisionByZero` if `m` is zero.
    pub fn checked_rem_euclid(&self, m: impl Operand) -> Result<BigInt> {
        Ok(BigInt::from_mpi(residue(&self.operand()?, &m.operand()?)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rem_euclid_is_non_negative() {
        assert_eq!(BigInt::from(-7).checked_rem_euclid(3).unwrap(), 2);
        assert_eq!(BigInt::from(-7).checked_rem_euclid(-3).unwrap(), 2);
        assert_eq!(BigInt::from(7).checked_rem_euclid(-3).unwrap(), 1);
        assert_eq!(BigInt::from(-6).checked_rem_euclid(3).unwrap(), 0);
        assert_eq!(BigInt::from(1).checked_rem_euclid(0).unwrap_err(), BigIntError::DivisionByZero);
    }

    #[test]
    fn gcd_of_magnitudes() {
        assert_eq!(BigInt::from(-48).gcd(18).unwrap(), 6);
        assert_eq!(BigInt::from(17).gcd(0).unwrap(), 17);
        assert_eq!(BigInt::zero().gcd(0).unwrap(), 0);
    }

    #[test]
    fn pow_mod_small_values() {
        assert_eq!(BigInt::from(4).pow_mod(13, 497).unwrap(), 445);
        assert_eq!(BigInt::from(-2).pow_mod(3, 5).unwrap(), 2);
        assert_eq!(BigInt::from(9).pow_mod(0, 7).unwrap(), 1);
        assert_eq!(BigInt::from(9).pow_mod(0, 1).unwrap(), 0);
    }

    #[test]
    fn pow_mod_fermat() {
        // 2^127 - 1 is prime
        let p = BigInt::from((1u128 << 127) - 1);
        let exponent = p.checked_sub(1).unwrap();
        assert_eq!(BigInt::from(3).pow_mod(&exponent, &p).unwrap(), 1);
    }

    #[test]
    fn pow_mod_rejects_bad_arguments() {
        assert!(matches!(BigInt::from(2).pow_mod(-1, 7), Err(BigIntError::InvalidArgument { .. })));
        assert_eq!(BigInt::from(2).pow_mod(3, 0).unwrap_err(), BigIntError::DivisionByZero);
    }

    #[test]
    fn inverse_round_trips() {
        let inverse = BigInt::from(3).inv_mod(11).unwrap();
        assert_eq!(inverse, 4);

        let negative = BigInt::from(-3).inv_mod(11).unwrap();
        assert_eq!(negative.checked_mul(-3).unwrap().checked_rem_euclid(11).unwrap(), 1);
    }

    #[test]
    fn inverse_requires_coprime_modulus() {
        assert!(matches!(BigInt::from(6).inv_mod(9), Err(BigIntError::InvalidArgument { .. })));
        assert!(matches!(BigInt::from(1).inv_mod(1), Err(BigIntError::InvalidArgument { .. })));
        assert!(matches!(BigInt::from(1).inv_mod(-7), Err(BigIntError::InvalidArgument { .. })));
    }
}
