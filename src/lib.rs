//! # nfs4-vfs
//!
//! Virtual filesystem layer between an **NFSv4 protocol engine** and a
//! **metadata-and-data backing store**.
//!
//! The protocol engine speaks opaque handles, protocol attributes and
//! string-named ACL entries. The backing store speaks native identifiers,
//! millisecond timestamps and numeric ids. [`StoreVfs`] translates between
//! the two, holding nothing but references to the store and an identity
//! resolver.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use nfs4_vfs::{BackingStore, FileType, NumericIdMapping, StoreVfs, VfsError, VirtualFileSystem};
//!
//! fn touch<S: BackingStore>(store: S, name: &str) -> Result<u64, VfsError> {
//!     let vfs = StoreVfs::new(store, NumericIdMapping);
//!     let root = vfs.root_inode()?;
//!     let inode = vfs.create(&root, FileType::Regular, name, 1000, 1000, 0o644)?;
//!     vfs.write(&inode, b"hello", 0)?;
//!     Ok(vfs.getattr(&inode)?.size)
//! }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`VirtualFileSystem`] | Operations the protocol engine calls |
//! | [`StoreVfs`] | The adapter over a [`BackingStore`] |
//! | [`BackingStore`] | Everything the adapter needs from a store |
//! | [`IdMapping`] | Numeric ids ⇄ principal strings |
//! | [`Inode`] | Opaque handle bytes |
//! | [`Stat`] | Protocol attributes |
//! | [`NfsAce`] | Wire ACE with a string principal |
//! | [`VfsError`] | Error taxonomy returned by every operation |
//!
//! ---
//!
//! ## Effective ACL
//!
//! `get_acl` reports the stored entries followed by entries synthesized from
//! the POSIX mode bits, then compacted. See [`acl`].
//!
//! ---
//!
//! ## Error Handling
//!
//! All operations return `Result<T, VfsError>`. Store failures are re-mapped
//! to exactly one kind:
//!
//! ```rust
//! use nfs4_vfs::{StoreError, VfsError};
//!
//! let err = VfsError::from_store("lookup", "a.txt", StoreError::NotFound);
//! assert_eq!(err.to_string(), "no such entry: a.txt");
//! ```
//!
//! ---
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and methods take `&self`. The adapter
//! holds no mutable state; concurrent callers need no locking here.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`Stat`], [`FsStat`], [`DirectoryEntry`], [`Inode`], [`Subject`], [`XdrConfig`] |

// Private modules
mod attr;
mod config;
mod error;
mod handle;
mod id_map;
mod traits;
mod types;
mod vfs;

// Public modules
pub mod acl;
pub mod xdr;

// Public re-exports - error types
pub use error::{StoreError, UnknownPrincipal, VfsError};

// Public re-exports - core types
pub use types::{
    ACCESS4_DELETE, ACCESS4_EXECUTE, ACCESS4_EXTEND, ACCESS4_LOOKUP, ACCESS4_MODIFY, ACCESS4_READ,
    DirectoryEntry, FileType, FsStat, Inode, NativeFsStat, NativeStat, S_IFBLK, S_IFCHR, S_IFDIR,
    S_IFIFO, S_IFLNK, S_IFMT, S_IFREG, S_IFSOCK, Stat, StorageTier, StoreDirEntry, Subject,
};

// Public re-exports - configuration
pub use config::XdrConfig;

// Public re-exports - ACL entries
pub use acl::{Ace, NfsAce};

// Public re-exports - traits
pub use traits::{
    BackingStore, IdMapping, StoreAcl, StoreAttributes, StoreData, StoreIdentity, StoreLocations,
    StoreNamespace, StoreUsage, VirtualFileSystem,
};

// Public re-exports - translation
pub use attr::{mode_with_type, to_native_stat, to_protocol_stat};
pub use handle::{decode_handle, encode_handle};

// Public re-exports - adapter
pub use id_map::NumericIdMapping;
pub use vfs::StoreVfs;
