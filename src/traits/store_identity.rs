//! Native identifiers and their byte encoding.

use std::fmt::Debug;

use crate::StoreError;

/// Identity operations of a backing store.
///
/// Every other store trait builds on this one because it defines the
/// store's native identifier type.
///
/// # Handle Laws
///
/// - `id_from_bytes(id_to_bytes(x)) == x` for every live `x`.
/// - `id_to_bytes` is injective: distinct objects never share bytes.
/// - `file_id` is a pure function of the identifier.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StoreIdentity<Id = T>`.
pub trait StoreIdentity: Send + Sync {
    /// Native identifier of a stored object.
    type Id: Clone + Debug + Send + Sync;

    /// Identifier of the root directory.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] or [`StoreError::Backend`] if the store is unavailable
    fn root(&self) -> Result<Self::Id, StoreError>;

    /// Serialize an identifier into handle bytes.
    ///
    /// # Errors
    ///
    /// Any error here is an internal inconsistency of the store.
    fn id_to_bytes(&self, id: &Self::Id) -> Result<Vec<u8>, StoreError>;

    /// Parse handle bytes back into a live identifier.
    ///
    /// # Errors
    ///
    /// - [`StoreError::StaleHandle`] if the bytes do not name a live object
    fn id_from_bytes(&self, bytes: &[u8]) -> Result<Self::Id, StoreError>;

    /// Numeric file id reported in attributes.
    fn file_id(&self, id: &Self::Id) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_identity_is_object_safe() {
        fn _check(_: &dyn StoreIdentity<Id = u64>) {}
    }

    #[test]
    fn store_identity_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: StoreIdentity>() {
            _assert_send_sync::<T>();
            _assert_send_sync::<T::Id>();
        }
    }
}
