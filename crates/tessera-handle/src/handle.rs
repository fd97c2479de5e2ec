//! Move-only handle over one foreign object.

use std::{fmt, marker::PhantomData, mem};

use crate::{
    allocator::Allocator,
    capability::{Borrowed, BorrowedMut, Capability, Mutable, Owned, OwnedConst, Owning},
    error::{HandleError, Result},
};

/// Storage behind a handle.
enum Slot<'a, T> {
    /// Moved-from, released, or never initialized
    Empty,
    /// Owned object, freed on drop
    Owned(Box<T>),
    /// Read-only borrow of an object owned elsewhere
    Shared(&'a T),
    /// Mutable alias of an object owned elsewhere
    Exclusive(&'a mut T),
}

impl<T> Slot<'_, T> {
    fn state(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Owned(_) => "owned",
            Self::Shared(_) => "shared",
            Self::Exclusive(_) => "exclusive",
        }
    }
}

/// Handle over a foreign object of type `A::Object`.
///
/// The capability `C` decides at compile time which operations exist:
/// owning handles (`Owned`, `OwnedConst`) free their object exactly once on
/// drop, borrowing handles (`Borrowed`, `BorrowedMut`) never do. Handles
/// are not `Clone`; ownership only moves, so there is at most one live
/// owning handle per object.
///
/// # Invariants
///
/// - Owning handles only ever hold `Slot::Owned` or `Slot::Empty`
/// - Borrowing handles only ever hold `Slot::Shared`/`Slot::Exclusive` or
///   `Slot::Empty`
/// - `A::free` runs once per owned object, never for borrowed ones
pub struct Handle<'a, A: Allocator, C: Capability = Owned> {
    slot: Slot<'a, A::Object>,
    _marker: PhantomData<(fn() -> A, C)>,
}

impl<'a, A: Allocator, C: Capability> Handle<'a, A, C> {
    fn from_slot(slot: Slot<'a, A::Object>) -> Self {
        Self { slot, _marker: PhantomData }
    }

    /// Create a handle in the Empty state.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_slot(Slot::Empty)
    }

    /// True if the handle holds no object.
    pub fn is_null(&self) -> bool {
        matches!(self.slot, Slot::Empty)
    }

    /// True if this handle references an object owned elsewhere.
    pub fn is_borrower(&self) -> bool {
        C::IS_BORROWER
    }

    /// True if the object must not be mutated through this handle.
    pub fn is_const(&self) -> bool {
        C::IS_CONST
    }

    /// Fails with [`HandleError::InvalidHandle`] if the handle is empty.
    pub fn check(&self) -> Result<()> {
        if self.is_null() { Err(HandleError::InvalidHandle) } else { Ok(()) }
    }

    /// Shared access to the object.
    pub fn get(&self) -> Result<&A::Object> {
        match &self.slot {
            Slot::Empty => Err(HandleError::InvalidHandle),
            Slot::Owned(object) => Ok(object),
            Slot::Shared(object) => Ok(object),
            Slot::Exclusive(object) => Ok(object),
        }
    }

    /// Move the object out into a new handle, leaving this one Empty.
    ///
    /// The returned handle has the same capability. Never fails; taking
    /// from an Empty handle yields another Empty handle.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self::from_slot(mem::replace(&mut self.slot, Slot::Empty))
    }

    /// Exchange the objects of two handles without copying either.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.slot, &mut other.slot);
    }

    /// Read-only borrowing handle over this handle's object.
    pub fn view(&self) -> Result<Handle<'_, A, Borrowed>> {
        self.get().map(Handle::borrow)
    }
}

impl<A: Allocator, C: Mutable> Handle<'_, A, C> {
    /// Mutable access to the object.
    pub fn get_mut(&mut self) -> Result<&mut A::Object> {
        match &mut self.slot {
            Slot::Owned(object) => Ok(object),
            Slot::Exclusive(object) => Ok(object),
            Slot::Empty | Slot::Shared(_) => Err(HandleError::InvalidHandle),
        }
    }

    /// Mutable borrowing handle over this handle's object.
    ///
    /// The alias never frees; the borrow checker keeps `self` alive and
    /// untouched for as long as the alias exists.
    pub fn alias(&mut self) -> Result<Handle<'_, A, BorrowedMut>> {
        self.get_mut().map(Handle::alias_mut)
    }
}

impl<A: Allocator, C: Owning> Handle<'static, A, C> {
    /// Allocate and initialize a new object.
    ///
    /// Calls `A::allocate` then `A::init`. Allocation failure is reported
    /// as [`HandleError::AllocationFailure`] and no handle is produced.
    pub fn new() -> Result<Self> {
        let mut object = A::allocate()?;
        A::init(&mut object);
        Ok(Self::from_slot(Slot::Owned(object)))
    }

    /// Take ownership of an object that was already initialized.
    ///
    /// Counterpart of [`Handle::release`]: the object will be freed through
    /// `A::free` when the returned handle is dropped.
    #[must_use]
    pub fn adopt(object: Box<A::Object>) -> Self {
        Self::from_slot(Slot::Owned(object))
    }

    /// Replace this handle's object with `other`'s.
    ///
    /// The currently owned object, if any, is freed first. `other` is left
    /// Empty.
    pub fn replace(&mut self, mut other: Self) {
        let incoming = mem::replace(&mut other.slot, Slot::Empty);
        let outgoing = mem::replace(&mut self.slot, incoming);
        free_slot::<A, C>(outgoing);
    }
}

impl<A: Allocator, C: Owning + Mutable> Handle<'static, A, C> {
    /// Give up ownership without freeing.
    ///
    /// Returns the object and leaves the handle Empty. The caller becomes
    /// responsible for passing the object to `A::free` (or back to
    /// [`Handle::adopt`]).
    pub fn release(&mut self) -> Result<Box<A::Object>> {
        match mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Owned(object) => {
                tracing::trace!(capability = C::NAME, "released object ownership");
                Ok(object)
            },
            other => {
                self.slot = other;
                Err(HandleError::InvalidHandle)
            },
        }
    }
}

impl<A: Allocator> Handle<'static, A, Owned> {
    /// Convert into a read-only owning handle.
    #[must_use]
    pub fn freeze(mut self) -> Handle<'static, A, OwnedConst> {
        Handle::from_slot(mem::replace(&mut self.slot, Slot::Empty))
    }
}

impl<'a, A: Allocator> Handle<'a, A, Borrowed> {
    /// Wrap a read-only reference to an object owned elsewhere.
    #[must_use]
    pub fn borrow(object: &'a A::Object) -> Self {
        Self::from_slot(Slot::Shared(object))
    }
}

impl<'a, A: Allocator> Handle<'a, A, BorrowedMut> {
    /// Wrap a mutable reference to an object owned elsewhere.
    ///
    /// The handle may write through the reference but never frees it. Use
    /// this to hand a sub-object of a larger owned structure to code that
    /// expects a handle, without copying.
    #[must_use]
    pub fn alias_mut(object: &'a mut A::Object) -> Self {
        Self::from_slot(Slot::Exclusive(object))
    }
}

impl<A: Allocator> Default for Handle<'_, A, Borrowed> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<A: Allocator, C: Capability> fmt::Debug for Handle<'_, A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("capability", &C::NAME)
            .field("state", &self.slot.state())
            .finish()
    }
}

impl<A: Allocator, C: Capability> Drop for Handle<'_, A, C> {
    fn drop(&mut self) {
        free_slot::<A, C>(mem::replace(&mut self.slot, Slot::Empty));
    }
}

/// Free an outgoing slot if it owns its object.
fn free_slot<A: Allocator, C: Capability>(slot: Slot<'_, A::Object>) {
    if let Slot::Owned(mut object) = slot {
        debug_assert!(!C::IS_BORROWER, "borrowing handle held an owned object");
        A::free(&mut object);
        tracing::trace!(capability = C::NAME, "freed owned object");
    }
}
