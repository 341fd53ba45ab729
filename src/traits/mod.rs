//! # Store and VFS Traits
//!
//! Two sides meet in this crate:
//!
//! ```text
//! protocol engine ──> VirtualFileSystem ──> StoreVfs ──> BackingStore
//!                                              │
//!                                              └──> IdMapping
//! ```
//!
//! ## Quick Reference
//!
//! | Trait | Side | Purpose |
//! |-------|------|---------|
//! | [`VirtualFileSystem`] | engine | Handle-based filesystem operations |
//! | [`StoreIdentity`] | store | Native id type, id ⇄ handle bytes |
//! | [`StoreNamespace`] | store | lookup, create, link, rename, remove, list |
//! | [`StoreData`] | store | Positional read and write |
//! | [`StoreAttributes`] | store | stat and set attributes |
//! | [`StoreAcl`] | store | Stored ACL entries |
//! | [`StoreLocations`] | store | Storage tier queries |
//! | [`StoreUsage`] | store | Filesystem usage counters |
//! | [`IdMapping`] | resolver | Numeric ids ⇄ principal strings |
//!
//! ## Blanket Implementations
//!
//! [`BackingStore`] has a blanket implementation. Implement the component
//! traits and the adapter accepts your store.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and take `&self`. Stores use interior
//! mutability and are responsible for their own atomicity.

mod id_mapping;
mod store_acl;
mod store_attributes;
mod store_data;
mod store_identity;
mod store_locations;
mod store_namespace;
mod store_usage;
mod vfs;

pub use id_mapping::IdMapping;
pub use store_acl::StoreAcl;
pub use store_attributes::StoreAttributes;
pub use store_data::StoreData;
pub use store_identity::StoreIdentity;
pub use store_locations::StoreLocations;
pub use store_namespace::StoreNamespace;
pub use store_usage::StoreUsage;
pub use vfs::VirtualFileSystem;

/// Everything the adapter needs from a backing store.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type implementing `StoreNamespace +
/// StoreData + StoreAttributes + StoreAcl + StoreLocations + StoreUsage`.
/// You never implement `BackingStore` directly.
///
/// # Example
///
/// ```rust
/// use nfs4_vfs::{BackingStore, StoreVfs, NumericIdMapping, VirtualFileSystem};
///
/// fn serve<S: BackingStore>(store: S) -> impl VirtualFileSystem {
///     StoreVfs::new(store, NumericIdMapping)
/// }
/// ```
pub trait BackingStore:
    StoreNamespace + StoreData + StoreAttributes + StoreAcl + StoreLocations + StoreUsage
{
}

impl<T> BackingStore for T where
    T: StoreNamespace + StoreData + StoreAttributes + StoreAcl + StoreLocations + StoreUsage
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_store_is_object_safe() {
        fn _check(_: &dyn BackingStore<Id = u64>) {}
    }
}
