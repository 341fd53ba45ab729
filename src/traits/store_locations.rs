//! Storage tier queries of a backing store.

use super::StoreIdentity;
use crate::{StorageTier, StoreError};

/// Knowledge of where an object's data has been placed.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StoreLocations<Id = T>`.
pub trait StoreLocations: StoreIdentity {
    /// Returns `true` if the object has at least one location recorded on `tier`.
    fn has_location(&self, id: &Self::Id, tier: StorageTier) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_locations_is_object_safe() {
        fn _check(_: &dyn StoreLocations<Id = u64>) {}
    }
}
