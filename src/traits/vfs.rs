//! The filesystem contract exposed to the protocol engine.

use crate::{DirectoryEntry, FileType, FsStat, Inode, NfsAce, Stat, VfsError};

/// Filesystem operations invoked by an NFS protocol engine.
///
/// Every object is addressed by an opaque [`Inode`] handle. Every failure is
/// one [`VfsError`] kind; the engine maps kinds to protocol status codes.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self`; an
/// implementation is a stateless translator and may be called from any
/// number of threads at once.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn VirtualFileSystem`.
///
/// # Example
///
/// ```rust
/// use nfs4_vfs::{VirtualFileSystem, VfsError};
///
/// // Generic function that works with any VirtualFileSystem implementation
/// fn file_size(vfs: &dyn VirtualFileSystem, name: &str) -> Result<u64, VfsError> {
///     let root = vfs.root_inode()?;
///     let inode = vfs.lookup(&root, name)?;
///     Ok(vfs.getattr(&inode)?.size)
/// }
/// ```
pub trait VirtualFileSystem: Send + Sync {
    /// Handle of the filesystem root.
    fn root_inode(&self) -> Result<Inode, VfsError>;

    /// Find `name` in `parent`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NoSuchEntry`] if `name` does not exist
    /// - [`VfsError::StaleHandle`] if `parent` no longer decodes
    fn lookup(&self, parent: &Inode, name: &str) -> Result<Inode, VfsError>;

    /// Create an object of `file_type`. `mode` holds permission bits only.
    fn create(
        &self,
        parent: &Inode,
        file_type: FileType,
        name: &str,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Result<Inode, VfsError>;

    /// Create a directory.
    fn mkdir(
        &self,
        parent: &Inode,
        name: &str,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Result<Inode, VfsError>;

    /// Add a hard link to `target` named `name` in `parent`.
    fn link(
        &self,
        parent: &Inode,
        target: &Inode,
        name: &str,
        uid: u32,
        gid: u32,
    ) -> Result<Inode, VfsError>;

    /// Create a symbolic link pointing at `link_text`.
    fn symlink(
        &self,
        parent: &Inode,
        name: &str,
        link_text: &str,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Result<Inode, VfsError>;

    /// Read up to `buf.len()` bytes at `offset`. Returns the count read.
    fn read(&self, inode: &Inode, buf: &mut [u8], offset: u64) -> Result<usize, VfsError>;

    /// Write `data` at `offset`. Returns the count written.
    fn write(&self, inode: &Inode, data: &[u8], offset: u64) -> Result<usize, VfsError>;

    /// Move `old_name` in `src` to `new_name` in `dst`.
    fn move_entry(
        &self,
        src: &Inode,
        old_name: &str,
        dst: &Inode,
        new_name: &str,
    ) -> Result<(), VfsError>;

    /// Target text of a symbolic link.
    ///
    /// # Errors
    ///
    /// - [`VfsError::Io`] if the target could not be read completely
    fn readlink(&self, inode: &Inode) -> Result<String, VfsError>;

    /// Remove `name` from `parent`.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NoSuchEntry`] if `name` does not exist
    /// - [`VfsError::DirectoryNotEmpty`] if `name` is a non-empty directory
    fn remove(&self, parent: &Inode, name: &str) -> Result<(), VfsError>;

    /// Entries of a directory with their attributes.
    fn list(&self, inode: &Inode) -> Result<Vec<DirectoryEntry>, VfsError>;

    /// Parent directory of an object.
    fn parent_of(&self, inode: &Inode) -> Result<Inode, VfsError>;

    /// Attributes of an object.
    ///
    /// # Errors
    ///
    /// - [`VfsError::NoSuchEntry`] if the object was removed
    fn getattr(&self, inode: &Inode) -> Result<Stat, VfsError>;

    /// Update attributes of an object.
    fn setattr(&self, inode: &Inode, stat: &Stat) -> Result<(), VfsError>;

    /// Effective ACL: stored entries followed by entries derived from the
    /// mode bits, compacted.
    ///
    /// # Errors
    ///
    /// - [`VfsError::UnknownPrincipal`] if a stored id has no principal name
    fn get_acl(&self, inode: &Inode) -> Result<Vec<NfsAce>, VfsError>;

    /// Replace the stored ACL.
    ///
    /// # Errors
    ///
    /// - [`VfsError::UnknownPrincipal`] if a principal cannot be resolved
    /// - [`VfsError::MalformedWireData`] if an entry has an unknown type
    fn set_acl(&self, inode: &Inode, acl: &[NfsAce]) -> Result<(), VfsError>;

    /// Filesystem usage counters.
    fn fs_stat(&self) -> Result<FsStat, VfsError>;

    /// Subset of the requested `ACCESS4_*` bits the object currently permits.
    fn access(&self, inode: &Inode, mode: u32) -> Result<u32, VfsError>;

    /// Returns `true` if the object is a regular file that can carry data.
    fn has_io_layout(&self, inode: &Inode) -> Result<bool, VfsError>;
}
