//! Signed arithmetic on big integers.
//!
//! `checked_*` methods read their operands and return a fresh [`BigInt`].
//! `assign_*` methods replace the receiver; they compute into a temporary
//! and install it only once every step has succeeded, so an error leaves
//! the receiver at its previous value.

use std::cmp::Ordering;

use tessera_handle::{Capability, Mutable};

use crate::{
    bigint::{BigInt, BigNum},
    error::Result,
    kernel,
    mpi::{Mpi, Sign},
    operand::{Operand, OperandValue},
    view::BigIntView,
};

/// `a + b`, with `b` taken as having sign `b_sign`.
pub(crate) fn sum(a: &OperandValue<'_>, b: &OperandValue<'_>, b_sign: Sign) -> Result<Mpi> {
    let (x, y) = (a.to_limbs()?, b.to_limbs()?);

    if a.sign() == b_sign {
        return Ok(Mpi::from_parts(a.sign(), kernel::add(&x, &y)?));
    }

    match kernel::cmp(&x, &y) {
        Ordering::Less => Ok(Mpi::from_parts(b_sign, kernel::sub(&y, &x)?)),
        _ => Ok(Mpi::from_parts(a.sign(), kernel::sub(&x, &y)?)),
    }
}

pub(crate) fn product(a: &OperandValue<'_>, b: &OperandValue<'_>) -> Result<Mpi> {
    let sign = Sign::from_negative(a.sign() != b.sign());
    Ok(Mpi::from_parts(sign, kernel::mul(&a.to_limbs()?, &b.to_limbs()?)?))
}

/// Truncating division. The quotient is negative when the signs differ;
/// the remainder takes the sign of the dividend.
pub(crate) fn quotient_remainder(a: &OperandValue<'_>, b: &OperandValue<'_>) -> Result<(Mpi, Mpi)> {
    let (q, r) = kernel::div_rem(&a.to_limbs()?, &b.to_limbs()?)?;
    let q_sign = Sign::from_negative(a.sign() != b.sign());
    Ok((Mpi::from_parts(q_sign, q), Mpi::from_parts(a.sign(), r)))
}

fn negation(a: &OperandValue<'_>) -> Result<Mpi> {
    Ok(Mpi::from_parts(a.sign().flip(), a.to_limbs()?.into_owned()))
}

fn absolute(a: &OperandValue<'_>) -> Result<Mpi> {
    Ok(Mpi::from_parts(Sign::Positive, a.to_limbs()?.into_owned()))
}

fn shifted_left(a: &OperandValue<'_>, bits: usize) -> Result<Mpi> {
    Ok(Mpi::from_parts(a.sign(), kernel::shl(&a.to_limbs()?, bits)?))
}

fn shifted_right(a: &OperandValue<'_>, bits: usize) -> Result<Mpi> {
    Ok(Mpi::from_parts(a.sign(), kernel::shr(&a.to_limbs()?, bits)?))
}

/// Read-only operations returning a fresh [`BigInt`], for any receiver
/// that implements [`Operand`].
macro_rules! checked_arithmetic {
    () => {
        fn compute(&self, op: impl FnOnce(&OperandValue<'_>) -> Result<Mpi>) -> Result<BigInt> {
            Ok(BigInt::from_mpi(op(&<Self as Operand>::operand(self)?)?))
        }

        /// `self + rhs`.
        pub fn checked_add(&self, rhs: impl Operand) -> Result<BigInt> {
            self.compute(|a| {
                let b = rhs.operand()?;
                sum(a, &b, b.sign())
            })
        }

        /// `self - rhs`.
        pub fn checked_sub(&self, rhs: impl Operand) -> Result<BigInt> {
            self.compute(|a| {
                let b = rhs.operand()?;
                sum(a, &b, b.sign().flip())
            })
        }

        /// `self * rhs`.
        pub fn checked_mul(&self, rhs: impl Operand) -> Result<BigInt> {
            self.compute(|a| product(a, &rhs.operand()?))
        }

        /// `self / rhs`, truncated toward zero.
        ///
        /// # Errors
        ///
        /// `DivisionByZero` if `rhs` is zero.
        pub fn checked_div(&self, rhs: impl Operand) -> Result<BigInt> {
            self.compute(|a| Ok(quotient_remainder(a, &rhs.operand()?)?.0))
        }

        /// `self % rhs`, with the sign of `self`.
        ///
        /// # Errors
        ///
        /// `DivisionByZero` if `rhs` is zero.
        pub fn checked_rem(&self, rhs: impl Operand) -> Result<BigInt> {
            self.compute(|a| Ok(quotient_remainder(a, &rhs.operand()?)?.1))
        }

        /// Quotient and remainder in one division.
        pub fn checked_div_rem(&self, rhs: impl Operand) -> Result<(BigInt, BigInt)> {
            let (q, r) = quotient_remainder(&<Self as Operand>::operand(self)?, &rhs.operand()?)?;
            Ok((BigInt::from_mpi(q), BigInt::from_mpi(r)))
        }

        /// `-self`. Negating zero yields zero.
        pub fn checked_neg(&self) -> Result<BigInt> {
            self.compute(negation)
        }

        /// `|self|`.
        pub fn abs(&self) -> Result<BigInt> {
            self.compute(absolute)
        }

        /// Magnitude shifted left by `bits`; the sign is kept.
        ///
        /// # Errors
        ///
        /// `AllocationFailure` if the shifted value cannot be stored.
        pub fn checked_shl(&self, bits: usize) -> Result<BigInt> {
            self.compute(|a| shifted_left(a, bits))
        }

        /// Magnitude shifted right by `bits`, discarding low bits; the sign is
        /// kept unless the result is zero. `-5 >> 1` is `-2`.
        pub fn checked_shr(&self, bits: usize) -> Result<BigInt> {
            self.compute(|a| shifted_right(a, bits))
        }
    };
}

impl<C: Capability> BigNum<'_, C> {
    checked_arithmetic!();
}

impl BigIntView<'_> {
    checked_arithmetic!();
}

impl<C: Mutable> BigNum<'_, C> {
    fn update(&mut self, op: impl FnOnce(&OperandValue<'_>) -> Result<Mpi>) -> Result<()> {
        let next = op(&self.value()?)?;
        self.store(next)
    }

    /// `self += rhs`.
    pub fn assign_add(&mut self, rhs: impl Operand) -> Result<()> {
        self.update(|a| {
            let b = rhs.operand()?;
            sum(a, &b, b.sign())
        })
    }

    /// `self -= rhs`.
    pub fn assign_sub(&mut self, rhs: impl Operand) -> Result<()> {
        self.update(|a| {
            let b = rhs.operand()?;
            sum(a, &b, b.sign().flip())
        })
    }

    /// `self *= rhs`.
    pub fn assign_mul(&mut self, rhs: impl Operand) -> Result<()> {
        self.update(|a| product(a, &rhs.operand()?))
    }

    /// `self /= rhs`, truncated toward zero.
    pub fn assign_div(&mut self, rhs: impl Operand) -> Result<()> {
        self.update(|a| Ok(quotient_remainder(a, &rhs.operand()?)?.0))
    }

    /// `self %= rhs`, with the sign of `self`.
    pub fn assign_rem(&mut self, rhs: impl Operand) -> Result<()> {
        self.update(|a| Ok(quotient_remainder(a, &rhs.operand()?)?.1))
    }

    /// `self <<= bits` on the magnitude.
    pub fn assign_shl(&mut self, bits: usize) -> Result<()> {
        self.update(|a| shifted_left(a, bits))
    }

    /// `self >>= bits` on the magnitude.
    pub fn assign_shr(&mut self, bits: usize) -> Result<()> {
        self.update(|a| shifted_right(a, bits))
    }

    /// `self = -self`.
    pub fn negate(&mut self) -> Result<()> {
        self.update(negation)
    }

    /// `self += 1`.
    pub fn increment(&mut self) -> Result<()> {
        self.assign_add(1u8)
    }

    /// `self -= 1`.
    pub fn decrement(&mut self) -> Result<()> {
        self.assign_sub(1u8)
    }
}
