//! Tessera Resource Handles
//!
//! Ownership-checked wrappers around foreign objects. A foreign object is
//! anything whose lifecycle is driven by an init/free pair rather than by
//! ordinary construction and `Drop`: a backend bignum, a hash context, a
//! parsed certificate. The [`Handle`] type pairs such an object with an
//! [`Allocator`] and a [`Capability`] marker that decides, at compile time,
//! whether the handle owns the object and whether it may mutate it.
//!
//! # Capabilities
//!
//! ```text
//!                 mutable          read-only
//!            ┌───────────────┬─────────────────┐
//!  owner     │ Owned         │ OwnedConst      │   free() on drop
//!            ├───────────────┼─────────────────┤
//!  borrower  │ BorrowedMut   │ Borrowed        │   never frees
//!            └───────────────┴─────────────────┘
//! ```
//!
//! Operations that need ownership (construction through the allocator,
//! release, move-assignment) only exist for owning markers. Operations that
//! mutate only exist for mutable markers. A `BorrowedMut` handle is only
//! created through [`Handle::alias_mut`], so a mutable alias into memory
//! owned elsewhere is always visible at the call site.
//!
//! # Lifecycle
//!
//! ```text
//! ┌───────────────┐ new()/adopt() ┌─────────────┐  take()/release()  ┌───────┐
//! │ Uninitialized │──────────────>│ Initialized │───────────────────>│ Empty │
//! └───────────────┘ borrow()      └─────────────┘                    └───────┘
//!                                        │ drop                          │ drop
//!                                        ↓                               ↓
//!                          owner: free(), borrower: no-op             no-op
//! ```
//!
//! Every accessor checks for the Empty state and reports
//! [`HandleError::InvalidHandle`] instead of touching a missing object.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod allocator;
pub mod capability;
pub mod error;
pub mod handle;

pub use allocator::Allocator;
pub use capability::{Borrowed, BorrowedMut, Capability, Mutable, Owned, OwnedConst, Owning};
pub use error::{HandleError, Result};
pub use handle::Handle;
