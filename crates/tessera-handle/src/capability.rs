//! Compile-time ownership and mutability markers.
//!
//! Markers carry no runtime data. They are used as the `C` parameter of
//! [`crate::Handle`] and gate which methods exist for a given handle.

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Owned {}
    impl Sealed for super::OwnedConst {}
    impl Sealed for super::Borrowed {}
    impl Sealed for super::BorrowedMut {}
}

/// Describes whether a handle owns its object and whether it may mutate it.
///
/// Sealed: the four markers in this module are the only legal combinations.
pub trait Capability: sealed::Sealed + Send + Sync + 'static {
    /// `true` if the handle references an object owned elsewhere.
    const IS_BORROWER: bool;

    /// `true` if the object must not be mutated through the handle.
    const IS_CONST: bool;

    /// Short name used in logs and `Debug` output.
    const NAME: &'static str;
}

/// Capabilities that own their object and free it on drop.
pub trait Owning: Capability {}

/// Capabilities that permit mutation of the object.
pub trait Mutable: Capability {}

/// Owning, mutable. The default capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Owned;

/// Owning, read-only.
///
/// Produced by freezing an owned handle when the value must not change for
/// the rest of its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnedConst;

/// Non-owning, read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Borrowed;

/// Non-owning, mutable.
///
/// Aliases an object owned by someone else and allows writes through the
/// alias. Never frees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorrowedMut;

impl Capability for Owned {
    const IS_BORROWER: bool = false;
    const IS_CONST: bool = false;
    const NAME: &'static str = "owned";
}

impl Capability for OwnedConst {
    const IS_BORROWER: bool = false;
    const IS_CONST: bool = true;
    const NAME: &'static str = "owned-const";
}

impl Capability for Borrowed {
    const IS_BORROWER: bool = true;
    const IS_CONST: bool = true;
    const NAME: &'static str = "borrowed";
}

impl Capability for BorrowedMut {
    const IS_BORROWER: bool = true;
    const IS_CONST: bool = false;
    const NAME: &'static str = "borrowed-mut";
}

impl Owning for Owned {}
impl Owning for OwnedConst {}

impl Mutable for Owned {}
impl Mutable for BorrowedMut {}
