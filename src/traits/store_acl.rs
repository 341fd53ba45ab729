//! Stored ACL operations of a backing store.

use super::StoreIdentity;
use crate::{Ace, StoreError};

/// Persistence of discretionary ACE lists.
///
/// The list is stored and returned verbatim, in evaluation order.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StoreAcl<Id = T>`.
pub trait StoreAcl: StoreIdentity {
    /// Stored ACEs of an object; empty if none were set.
    fn get_acl(&self, id: &Self::Id) -> Result<Vec<Ace>, StoreError>;

    /// Replace the stored ACEs of an object.
    fn set_acl(&self, id: &Self::Id, acl: &[Ace]) -> Result<(), StoreError>;
}
