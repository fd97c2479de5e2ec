//! Allocator contract for foreign objects.

use crate::error::{HandleError, Result};

/// Lifecycle functions for one foreign object type.
///
/// Any subsystem that wants to wrap its objects in a [`crate::Handle`]
/// supplies exactly this set of functions.
///
/// # Invariants
///
/// - `init` leaves the object in a valid, empty state
/// - `free` releases the object's internal resources and MUST NOT panic
/// - `free` is called at most once per object, and only by its owner
pub trait Allocator {
    /// The wrapped object type.
    type Object;

    /// Obtains storage for one object.
    ///
    /// The returned object is not yet initialized in the allocator's sense;
    /// [`crate::Handle::new`] calls [`Allocator::init`] on it immediately.
    fn allocate() -> Result<Box<Self::Object>>;

    /// Establishes a valid empty-but-initialized state.
    fn init(object: &mut Self::Object);

    /// Releases internal resources held by the object.
    fn free(object: &mut Self::Object);
}

/// Allocates a default-constructed object.
///
/// Helper for allocators whose object type has a cheap `Default`; the only
/// allocation is the box itself.
pub fn allocate_default<T: Default>() -> Result<Box<T>> {
    Ok(Box::default())
}

/// Reserves room for `additional` elements in `buffer`.
///
/// Fallible counterpart of `Vec::reserve` for object types that carry
/// variable-size storage. Failure maps to [`HandleError::AllocationFailure`].
pub fn try_reserve<T>(buffer: &mut Vec<T>, additional: usize) -> Result<()> {
    buffer.try_reserve_exact(additional).map_err(|_| {
        let bytes = additional.saturating_mul(size_of::<T>());
        tracing::debug!(bytes, "allocation failed while reserving object storage");
        HandleError::AllocationFailure { bytes }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_default_produces_default_value() {
        let boxed: Box<Vec<u8>> = allocate_default().unwrap();
        assert!(boxed.is_empty());
    }

    #[test]
    fn try_reserve_grows_capacity() {
        let mut buffer: Vec<u64> = Vec::new();
        try_reserve(&mut buffer, 16).unwrap();
        assert!(buffer.capacity() >= 16);
    }

    #[test]
    fn try_reserve_reports_overflow() {
        let mut buffer: Vec<u64> = Vec::new();
        let result = try_reserve(&mut buffer, usize::MAX / 2);

        assert!(matches!(result, Err(HandleError::AllocationFailure { .. })));
        assert_eq!(buffer.capacity(), 0);
    }
}
