//! The adapter from a [`BackingStore`] to [`VirtualFileSystem`].

use tracing::{debug, error, warn};

use crate::acl::{self, AceMask, evaluate};
use crate::attr::{mode_with_type, to_native_stat, to_protocol_stat};
use crate::handle::{decode_handle, encode_handle};
use crate::{
    ACCESS4_EXTEND, ACCESS4_MODIFY, BackingStore, DirectoryEntry, FileType, FsStat, IdMapping,
    Inode, NfsAce, Stat, StorageTier, StoreError, Subject, VfsError, VirtualFileSystem,
};

/// Rights withheld from objects whose data already sits on a storage tier.
const MIGRATED_WITHHELD: u32 = ACCESS4_MODIFY | ACCESS4_EXTEND;

/// Longest symlink target `readlink` will read, in bytes (`PATH_MAX`).
const MAX_LINK_TARGET: u64 = 4096;

fn log_store_failure(operation: &str, err: &StoreError) {
    if err.is_fault() {
        error!("store {} failed: {}", operation, err);
    } else {
        debug!("store {} failed: {}", operation, err);
    }
}

/// [`VirtualFileSystem`] over a [`BackingStore`] and an [`IdMapping`].
///
/// The adapter holds no state besides its two collaborators. Every call
/// decodes its handles, delegates to the store and translates the result.
/// Nothing is cached.
///
/// # Thread Safety
///
/// `StoreVfs<S, M>` is `Send + Sync` whenever `S` and `M` are, which both
/// traits require.
///
/// # Example
///
/// ```rust
/// use nfs4_vfs::{BackingStore, NumericIdMapping, StoreVfs, VfsError, VirtualFileSystem};
///
/// fn root_size<S: BackingStore>(store: S) -> Result<u64, VfsError> {
///     let vfs = StoreVfs::new(store, NumericIdMapping);
///     let root = vfs.root_inode()?;
///     Ok(vfs.getattr(&root)?.size)
/// }
/// ```
#[derive(Debug)]
pub struct StoreVfs<S, M> {
    store: S,
    ids: M,
}

impl<S: BackingStore, M: IdMapping> StoreVfs<S, M> {
    /// Create an adapter over `store`, naming principals through `ids`.
    pub fn new(store: S, ids: M) -> Self {
        Self { store, ids }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The identity resolver.
    pub fn id_mapping(&self) -> &M {
        &self.ids
    }

    /// Evaluate the stored ACL of `inode` for `subject`.
    ///
    /// Returns `Ok(true)` if an ALLOW entry decides, `Ok(false)` if no entry
    /// applies.
    ///
    /// # Errors
    ///
    /// - [`VfsError::AccessDenied`] if a DENY entry decides
    /// - [`VfsError::StaleHandle`] if `inode` no longer decodes
    pub fn check_acl_access(
        &self,
        subject: &Subject,
        inode: &Inode,
        requested: AceMask,
    ) -> Result<bool, VfsError> {
        let id = self.decode(inode)?;
        let stat = self
            .store
            .stat(&id)
            .map_err(|e| VfsError::from_store("check_acl_access", "", e))?;
        let stored = self
            .store
            .get_acl(&id)
            .map_err(|e| VfsError::from_store("check_acl_access", "", e))?;
        evaluate(subject, &stored, stat.uid, stat.gid, requested).into_result(requested)
    }

    fn decode(&self, inode: &Inode) -> Result<S::Id, VfsError> {
        decode_handle(&self.store, inode)
    }

    fn encode(&self, id: &S::Id) -> Result<Inode, VfsError> {
        encode_handle(&self.store, id)
    }

    fn stat_of(&self, id: &S::Id) -> Result<Stat, VfsError> {
        let native = self
            .store
            .stat(id)
            .map_err(|e| VfsError::from_store("getattr", "", e))?;
        Ok(to_protocol_stat(&native, self.store.file_id(id)))
    }

    fn is_migrated(&self, id: &S::Id) -> Result<bool, StoreError> {
        Ok(self.store.has_location(id, StorageTier::Disk)?
            || self.store.has_location(id, StorageTier::Archival)?)
    }
}

impl<S: BackingStore, M: IdMapping> VirtualFileSystem for StoreVfs<S, M> {
    fn root_inode(&self) -> Result<Inode, VfsError> {
        let root = self
            .store
            .root()
            .map_err(|e| VfsError::from_store("root_inode", "/", e))?;
        self.encode(&root)
    }

    fn lookup(&self, parent: &Inode, name: &str) -> Result<Inode, VfsError> {
        let parent = self.decode(parent)?;
        debug!("VFS LOOKUP: parent={:?}, name={:?}", parent, name);
        let id = self
            .store
            .lookup(&parent, name)
            .map_err(|e| VfsError::from_store("lookup", name, e))?;
        self.encode(&id)
    }

    fn create(
        &self,
        parent: &Inode,
        file_type: FileType,
        name: &str,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Result<Inode, VfsError> {
        let parent = self.decode(parent)?;
        debug!(
            "VFS CREATE: parent={:?}, name={:?}, type={:?}, mode={:o}",
            parent, name, file_type, mode
        );
        let id = self
            .store
            .create(
                &parent,
                name,
                uid,
                gid,
                mode_with_type(file_type, mode),
                file_type.type_tag(),
            )
            .map_err(|e| VfsError::from_store("create", name, e))?;
        self.encode(&id)
    }

    fn mkdir(
        &self,
        parent: &Inode,
        name: &str,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Result<Inode, VfsError> {
        let parent = self.decode(parent)?;
        debug!("VFS MKDIR: parent={:?}, name={:?}, mode={:o}", parent, name, mode);
        let id = self
            .store
            .mkdir(
                &parent,
                name,
                uid,
                gid,
                mode_with_type(FileType::Directory, mode),
            )
            .map_err(|e| VfsError::from_store("mkdir", name, e))?;
        self.encode(&id)
    }

    fn link(
        &self,
        parent: &Inode,
        target: &Inode,
        name: &str,
        uid: u32,
        gid: u32,
    ) -> Result<Inode, VfsError> {
        let parent = self.decode(parent)?;
        let target = self.decode(target)?;
        debug!(
            "VFS LINK: parent={:?}, target={:?}, name={:?}, uid={}, gid={}",
            parent, target, name, uid, gid
        );
        let id = self
            .store
            .hard_link(&parent, &target, name)
            .map_err(|e| VfsError::from_store("link", name, e))?;
        self.encode(&id)
    }

    fn symlink(
        &self,
        parent: &Inode,
        name: &str,
        link_text: &str,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Result<Inode, VfsError> {
        let parent = self.decode(parent)?;
        debug!(
            "VFS SYMLINK: parent={:?}, name={:?}, target={:?}",
            parent, name, link_text
        );
        let id = self
            .store
            .symlink(
                &parent,
                name,
                uid,
                gid,
                mode_with_type(FileType::Symlink, mode),
                link_text.as_bytes(),
            )
            .map_err(|e| VfsError::from_store("symlink", name, e))?;
        self.encode(&id)
    }

    fn read(&self, inode: &Inode, buf: &mut [u8], offset: u64) -> Result<usize, VfsError> {
        let id = self.decode(inode)?;
        debug!("VFS READ: id={:?}, offset={}, count={}", id, offset, buf.len());
        self.store.read(&id, offset, buf).map_err(|e| {
            log_store_failure("read", &e);
            VfsError::from_store("read", "", e)
        })
    }

    fn write(&self, inode: &Inode, data: &[u8], offset: u64) -> Result<usize, VfsError> {
        let id = self.decode(inode)?;
        debug!("VFS WRITE: id={:?}, offset={}, len={}", id, offset, data.len());
        self.store.write(&id, offset, data).map_err(|e| {
            log_store_failure("write", &e);
            VfsError::from_store("write", "", e)
        })
    }

    fn move_entry(
        &self,
        src: &Inode,
        old_name: &str,
        dst: &Inode,
        new_name: &str,
    ) -> Result<(), VfsError> {
        let src = self.decode(src)?;
        let dst = self.decode(dst)?;
        debug!(
            "VFS MOVE: {:?}/{:?} -> {:?}/{:?}",
            src, old_name, dst, new_name
        );
        self.store
            .rename(&src, old_name, &dst, new_name)
            .map_err(|e| VfsError::from_store("move", old_name, e))
    }

    fn readlink(&self, inode: &Inode) -> Result<String, VfsError> {
        let id = self.decode(inode)?;
        debug!("VFS READLINK: id={:?}", id);
        let stat = self
            .store
            .stat(&id)
            .map_err(|e| VfsError::from_store("readlink", "", e))?;
        if stat.size > MAX_LINK_TARGET {
            warn!("readlink on {:?}: target of {} bytes", id, stat.size);
            return Err(VfsError::Io {
                operation: "readlink",
                source: StoreError::Backend(format!(
                    "link target of {} bytes exceeds {MAX_LINK_TARGET}",
                    stat.size
                )),
            });
        }
        // bounded by MAX_LINK_TARGET above
        let size = stat.size as usize;

        let mut target = vec![0u8; size];
        let n = self
            .store
            .read(&id, 0, &mut target)
            .map_err(|e| VfsError::from_store("readlink", "", e))?;
        if n != size {
            warn!("short readlink on {:?}: {} of {} bytes", id, n, size);
            return Err(VfsError::Io {
                operation: "readlink",
                source: StoreError::Backend(format!("read {n} of {size} bytes")),
            });
        }
        Ok(String::from_utf8_lossy(&target).into_owned())
    }

    fn remove(&self, parent: &Inode, name: &str) -> Result<(), VfsError> {
        let parent = self.decode(parent)?;
        debug!("VFS REMOVE: parent={:?}, name={:?}", parent, name);
        self.store
            .remove(&parent, name)
            .map_err(|e| VfsError::from_store("remove", name, e))
    }

    fn list(&self, inode: &Inode) -> Result<Vec<DirectoryEntry>, VfsError> {
        let id = self.decode(inode)?;
        debug!("VFS LIST: id={:?}", id);
        let entries = self
            .store
            .list(&id)
            .map_err(|e| VfsError::from_store("list", "", e))?;

        entries
            .into_iter()
            .map(|entry| {
                let stat = to_protocol_stat(&entry.stat, self.store.file_id(&entry.id));
                Ok(DirectoryEntry {
                    inode: self.encode(&entry.id)?,
                    name: entry.name,
                    stat,
                })
            })
            .collect()
    }

    fn parent_of(&self, inode: &Inode) -> Result<Inode, VfsError> {
        let id = self.decode(inode)?;
        let parent = self
            .store
            .parent(&id)
            .map_err(|e| VfsError::from_store("parent_of", "", e))?;
        self.encode(&parent)
    }

    fn getattr(&self, inode: &Inode) -> Result<Stat, VfsError> {
        let id = self.decode(inode)?;
        debug!("VFS GETATTR: id={:?}", id);
        self.stat_of(&id)
    }

    fn setattr(&self, inode: &Inode, stat: &Stat) -> Result<(), VfsError> {
        let id = self.decode(inode)?;
        debug!("VFS SETATTR: id={:?}, mode={:o}", id, stat.mode);
        self.store
            .set_attributes(&id, &to_native_stat(stat))
            .map_err(|e| VfsError::from_store("setattr", "", e))
    }

    fn get_acl(&self, inode: &Inode) -> Result<Vec<NfsAce>, VfsError> {
        let id = self.decode(inode)?;
        let native = self
            .store
            .stat(&id)
            .map_err(|e| VfsError::from_store("get_acl", "", e))?;
        let stored = self
            .store
            .get_acl(&id)
            .map_err(|e| VfsError::from_store("get_acl", "", e))?;

        let mut effective = stored
            .iter()
            .map(|ace| acl::to_wire(ace, &self.ids))
            .collect::<Result<Vec<_>, _>>()?;
        effective.extend(acl::of_mode(native.mode, native.is_dir()));
        Ok(acl::compact(effective))
    }

    fn set_acl(&self, inode: &Inode, entries: &[NfsAce]) -> Result<(), VfsError> {
        let id = self.decode(inode)?;
        debug!("VFS SETACL: id={:?}, entries={}", id, entries.len());
        let stored = entries
            .iter()
            .map(|ace| acl::from_wire(ace, &self.ids))
            .collect::<Result<Vec<_>, _>>()?;
        self.store
            .set_acl(&id, &stored)
            .map_err(|e| VfsError::from_store("set_acl", "", e))
    }

    fn fs_stat(&self) -> Result<FsStat, VfsError> {
        let usage = self
            .store
            .usage()
            .map_err(|e| VfsError::from_store("fs_stat", "", e))?;
        Ok(FsStat {
            total_space: usage.total_space,
            total_files: usage.total_files,
            used_space: usage.used_space,
            used_files: usage.used_files,
        })
    }

    fn access(&self, inode: &Inode, mode: u32) -> Result<u32, VfsError> {
        let id = self.decode(inode)?;
        if mode & MIGRATED_WITHHELD == 0 {
            return Ok(mode);
        }

        let stat = self
            .store
            .stat(&id)
            .map_err(|e| VfsError::from_store("access", "", e))?;
        if stat.is_dir() {
            return Ok(mode);
        }
        let migrated = self
            .is_migrated(&id)
            .map_err(|e| VfsError::from_store("access", "", e))?;
        if migrated {
            debug!("VFS ACCESS: id={:?} has stored data, withholding modify", id);
            return Ok(mode & !MIGRATED_WITHHELD);
        }
        Ok(mode)
    }

    fn has_io_layout(&self, inode: &Inode) -> Result<bool, VfsError> {
        let id = self.decode(inode)?;
        let stat = self
            .store
            .stat(&id)
            .map_err(|e| VfsError::from_store("has_io_layout", "", e))?;
        Ok(stat.is_regular())
    }
}
