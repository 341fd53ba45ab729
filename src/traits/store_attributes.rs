//! Attribute operations of a backing store.

use super::StoreIdentity;
use crate::{NativeStat, StoreError};

/// POSIX attribute access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StoreAttributes<Id = T>`.
pub trait StoreAttributes: StoreIdentity {
    /// Current attributes of an object.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the object was removed
    fn stat(&self, id: &Self::Id) -> Result<NativeStat, StoreError>;

    /// Update attributes. The store decides which fields it applies.
    fn set_attributes(&self, id: &Self::Id, stat: &NativeStat) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_attributes_is_object_safe() {
        fn _check(_: &dyn StoreAttributes<Id = u64>) {}
    }
}
