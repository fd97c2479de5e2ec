//! Tessera Big Integers
//!
//! Arbitrary-precision signed integers for the numeric currency of public
//! key cryptography: EC scalars, RSA moduli, signature components. Values
//! are sign-magnitude with 64-bit limbs stored least-significant first,
//! held through a [`tessera_handle::Handle`] so that owned, frozen,
//! borrowed and aliased integers share one implementation.
//!
//! # Flavors
//!
//! ```text
//!  BigInt        owns an Mpi, mutable           frees (and wipes) on drop
//!  BigIntConst   owns an Mpi, frozen            frees (and wipes) on drop
//!  BigIntRef     borrows an Mpi, read-only      never frees
//!  BigIntMut     aliases an Mpi, mutable        never frees
//!  BigIntView    aliases little-endian bytes    zero-copy, read-only
//! ```
//!
//! # Operations
//!
//! - Arithmetic: `checked_*` returns a new [`BigInt`]; `assign_*` updates in
//!   place and leaves the receiver untouched on error
//! - Right operands: anything implementing [`Operand`], including native
//!   integers up to 64 bits
//! - Text: [`NumeralFormat`] drives hex, binary and decimal rendering; the
//!   free functions in [`codec`] work on raw bytes and limbs
//! - Modular helpers and sampling for scalar handling: `checked_rem_euclid`,
//!   `gcd`, `pow_mod`, `inv_mod`, [`BigInt::random_below`]
//!
//! # Security
//!
//! Arithmetic is not constant time. Freed and overwritten limb buffers are
//! zeroized.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod arith;
pub mod bigint;
pub mod codec;
pub mod error;
pub mod format;
mod kernel;
mod modular;
pub mod mpi;
pub mod operand;
pub mod random;
#[cfg(feature = "serde")]
mod serialize;
pub mod view;

pub use bigint::{BigInt, BigIntConst, BigIntMut, BigIntRef, BigNum};
pub use codec::{Case, Endianness, Radix};
pub use error::{BigIntError, Result};
pub use format::NumeralFormat;
pub use mpi::{Limb, Mpi, MpiAllocator, Sign};
pub use operand::{Operand, OperandValue};
pub use random::RandomSource;
pub use view::BigIntView;
