//! The multi-precision integer object wrapped by big integer handles.
//!
//! `Mpi` plays the role of the foreign object: a sign plus a growable limb
//! buffer, created and destroyed through [`MpiAllocator`]. Handles own it
//! (`BigInt`), borrow it (`BigIntRef`), or alias it mutably (`BigIntMut`).

use std::mem;

use tessera_handle::{Allocator, allocator::allocate_default};
use zeroize::Zeroize;

/// One limb of a magnitude.
pub type Limb = u64;

/// Width of a limb in bits.
pub const LIMB_BITS: usize = Limb::BITS as usize;

/// Width of a limb in bytes.
pub const LIMB_BYTES: usize = size_of::<Limb>();

/// Sign of a big integer. Zero is always `Positive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    /// Zero or greater
    #[default]
    Positive,
    /// Less than zero
    Negative,
}

impl Sign {
    /// `Negative` if `negative` is true, otherwise `Positive`.
    pub fn from_negative(negative: bool) -> Self {
        if negative { Self::Negative } else { Self::Positive }
    }

    /// True for `Negative`.
    pub fn is_negative(self) -> bool {
        self == Self::Negative
    }

    /// The opposite sign.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

/// Sign-magnitude integer with limbs stored least-significant first.
///
/// # Invariants
///
/// - No trailing zero limbs (zero has no limbs at all)
/// - Zero is `Sign::Positive`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mpi {
    sign: Sign,
    limbs: Vec<Limb>,
}

impl Mpi {
    /// Build from a sign and limbs, restoring the invariants.
    pub(crate) fn from_parts(sign: Sign, limbs: Vec<Limb>) -> Self {
        let mut mpi = Self { sign, limbs };
        mpi.normalize();
        mpi
    }

    /// Sign of the value.
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// Magnitude limbs, least-significant first.
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// True if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Reset to zero without releasing the buffer.
    pub(crate) fn clear(&mut self) {
        self.limbs.clear();
        self.sign = Sign::Positive;
    }

    /// Install `next` as the new value and wipe the previous buffer.
    pub(crate) fn assign(&mut self, next: Self) {
        let mut previous = mem::replace(self, next);
        previous.zeroize();
    }

    /// Drop trailing zero limbs and canonicalize the sign of zero.
    pub(crate) fn normalize(&mut self) {
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
        if self.limbs.is_empty() {
            self.sign = Sign::Positive;
        }
    }
}

impl Zeroize for Mpi {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
        self.sign = Sign::Positive;
    }
}

/// Allocator pairing for [`Mpi`].
///
/// `init` yields zero; `free` wipes the limb buffer before it is returned
/// to the global allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MpiAllocator;

impl Allocator for MpiAllocator {
    type Object = Mpi;

    fn allocate() -> tessera_handle::Result<Box<Mpi>> {
        allocate_default()
    }

    fn init(object: &mut Mpi) {
        object.clear();
    }

    fn free(object: &mut Mpi) {
        object.zeroize();
    }
}
