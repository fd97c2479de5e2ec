//! Uniform sampling of big integers from a caller-supplied random source.
//!
//! There is no global generator. Whoever needs random scalars passes the
//! source in, so tests can drive it from a seeded `ChaCha20Rng`.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::{
    bigint::BigInt,
    codec::Endianness,
    error::{BigIntError, Result},
    mpi::Sign,
    operand::Operand,
};

/// Rejection sampling gives up after this many draws. Each draw succeeds
/// with probability at least one half.
pub const MAX_SAMPLING_ATTEMPTS: usize = 128;

/// A cryptographically secure source of random bytes.
pub trait RandomSource {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

impl<R: RngCore + CryptoRng> RandomSource for R {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        RngCore::fill_bytes(self, dest);
    }
}

impl BigInt {
    /// Uniform value in `[0, 2^bits)`.
    pub fn random_bits<R: RandomSource + ?Sized>(bits: usize, rng: &mut R) -> Result<Self> {
        let len = bits.div_ceil(8);
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).map_err(|_| BigIntError::AllocationFailure { limbs: len.div_ceil(8) })?;
        bytes.resize(len, 0);

        rng.fill_bytes(&mut bytes);
        let excess = len * 8 - bits;
        if let Some(top) = bytes.last_mut() {
            *top &= 0xFF >> excess;
        }

        let value = Self::from_bytes(&bytes, Sign::Positive, Endianness::Little);
        bytes.zeroize();
        value
    }

    /// Uniform value in `[0, bound)`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless `bound` is positive.
    pub fn random_below<R: RandomSource + ?Sized>(bound: impl Operand, rng: &mut R) -> Result<Self> {
        let bound = bound.operand()?;
        if bound.is_zero() || bound.sign().is_negative() {
            return Err(BigIntError::invalid("sampling bound must be positive"));
        }

        let bits = bound.bit_len();
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let candidate = Self::random_bits(bits, &mut *rng)?;
            if candidate.value()?.cmp_magnitude(&bound).is_lt() {
                return Ok(candidate);
            }
        }

        tracing::debug!(bits, attempts = MAX_SAMPLING_ATTEMPTS, "rejection sampling exhausted");
        Err(BigIntError::backend("random_below"))
    }
}
