//! Directory tree operations of a backing store.

use super::StoreIdentity;
use crate::{StoreDirEntry, StoreError};

/// Name-based operations on the directory tree, keyed by native identifier.
///
/// The store is responsible for atomicity: two concurrent `create` calls for
/// the same name must not both succeed.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StoreNamespace<Id = T>`.
pub trait StoreNamespace: StoreIdentity {
    /// Find a child of `parent` by name.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if there is no such child
    fn lookup(&self, parent: &Self::Id, name: &str) -> Result<Self::Id, StoreError>;

    /// Create a non-directory object.
    ///
    /// `mode` already carries the type tag; `type_tag` repeats it on its own.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`] if `name` is taken
    /// - [`StoreError::NotFound`] if `parent` does not exist
    fn create(
        &self,
        parent: &Self::Id,
        name: &str,
        uid: u32,
        gid: u32,
        mode: u32,
        type_tag: u32,
    ) -> Result<Self::Id, StoreError>;

    /// Create a directory.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`] if `name` is taken
    fn mkdir(
        &self,
        parent: &Self::Id,
        name: &str,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Result<Self::Id, StoreError>;

    /// Add a hard link to `target` under `parent`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`] if `name` is taken
    fn hard_link(
        &self,
        parent: &Self::Id,
        target: &Self::Id,
        name: &str,
    ) -> Result<Self::Id, StoreError>;

    /// Create a symbolic link whose content is `target`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyExists`] if `name` is taken
    fn symlink(
        &self,
        parent: &Self::Id,
        name: &str,
        uid: u32,
        gid: u32,
        mode: u32,
        target: &[u8],
    ) -> Result<Self::Id, StoreError>;

    /// Move an entry, possibly across directories.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if `old_name` does not exist in `src`
    fn rename(
        &self,
        src: &Self::Id,
        old_name: &str,
        dst: &Self::Id,
        new_name: &str,
    ) -> Result<(), StoreError>;

    /// Remove an entry.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if there is no such entry
    /// - [`StoreError::DirectoryNotEmpty`] if the entry is a non-empty directory
    fn remove(&self, parent: &Self::Id, name: &str) -> Result<(), StoreError>;

    /// List a directory with a stat snapshot per entry.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if `dir` does not exist
    fn list(&self, dir: &Self::Id) -> Result<Vec<StoreDirEntry<Self::Id>>, StoreError>;

    /// Parent directory of an object. The root is its own parent.
    fn parent(&self, id: &Self::Id) -> Result<Self::Id, StoreError>;
}
