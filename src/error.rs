//! Error types for the VFS adapter.
//!
//! Three error types live here:
//!
//! - [`VfsError`] is the taxonomy handed to the protocol engine. Every
//!   operation of [`VirtualFileSystem`](crate::VirtualFileSystem) returns it.
//! - [`StoreError`] is what a backing store reports. It never crosses the
//!   adapter boundary; [`VfsError::from_store`] re-maps it.
//! - [`UnknownPrincipal`] is what an [`IdMapping`](crate::IdMapping) reports
//!   when a name or id cannot be resolved.

/// Error returned by every VFS operation.
///
/// The protocol engine translates each kind to its own status code. This
/// layer only picks the kind.
///
/// # Examples
///
/// ```rust
/// use nfs4_vfs::VfsError;
///
/// let err = VfsError::NoSuchEntry { name: "missing.txt".into() };
/// assert_eq!(err.to_string(), "no such entry: missing.txt");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    /// The named object does not exist.
    #[error("no such entry: {name}")]
    NoSuchEntry {
        /// Name (or description) of the missing object.
        name: String,
    },

    /// A handle no longer maps to a live object.
    #[error("stale file handle")]
    StaleHandle,

    /// A directory could not be removed because it still has entries.
    #[error("directory not empty: {name}")]
    DirectoryNotEmpty {
        /// Name of the directory.
        name: String,
    },

    /// An ACE explicitly denied the requested access.
    #[error("access denied (mask {mask:#x})")]
    AccessDenied {
        /// The access mask that was requested.
        mask: u32,
    },

    /// A principal string or numeric id could not be resolved.
    #[error("unknown principal: {principal}")]
    UnknownPrincipal {
        /// The principal (or id rendered as text) that failed to resolve.
        principal: String,
    },

    /// Wire data violated its encoding rules.
    #[error("malformed wire data: {reason}")]
    MalformedWireData {
        /// What was wrong with the data.
        reason: String,
    },

    /// Opaque failure of the backing store.
    #[error("{operation} failed: {source}")]
    Io {
        /// The VFS operation that failed.
        operation: &'static str,
        /// The underlying backing-store error.
        #[source]
        source: StoreError,
    },

    /// The backing store could not encode one of its own identifiers.
    ///
    /// This is an internal inconsistency, not a client error.
    #[error("handle encoding failed: {reason}")]
    Encoding {
        /// Details from the backing store.
        reason: String,
    },
}

impl VfsError {
    /// Map a backing-store error to exactly one taxonomy kind.
    ///
    /// `name` is the object name used for context in `NoSuchEntry` and
    /// `DirectoryNotEmpty`.
    pub fn from_store(operation: &'static str, name: &str, error: StoreError) -> Self {
        match error {
            StoreError::NotFound => VfsError::NoSuchEntry { name: name.into() },
            StoreError::DirectoryNotEmpty => VfsError::DirectoryNotEmpty { name: name.into() },
            StoreError::StaleHandle => VfsError::StaleHandle,
            source => VfsError::Io { operation, source },
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        VfsError::MalformedWireData {
            reason: reason.into(),
        }
    }
}

/// Error reported by a backing store.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object does not exist.
    #[error("object not found")]
    NotFound,

    /// The directory has entries.
    #[error("directory not empty")]
    DirectoryNotEmpty,

    /// The identifier bytes are well-formed but no longer denote a live object.
    #[error("stale identifier")]
    StaleHandle,

    /// An entry with that name already exists.
    #[error("entry already exists")]
    AlreadyExists,

    /// I/O failure of the underlying storage.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns `true` for failures of the storage itself, as opposed to
    /// outcomes a client can cause such as a missing name.
    pub fn is_fault(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Backend(_))
    }
}

/// An identity resolver could not map a principal or id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown principal: {principal}")]
pub struct UnknownPrincipal {
    /// The principal string, or the numeric id rendered as text.
    pub principal: String,
}

impl UnknownPrincipal {
    /// Create an error for the given principal.
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
        }
    }
}

impl From<UnknownPrincipal> for VfsError {
    fn from(error: UnknownPrincipal) -> Self {
        VfsError::UnknownPrincipal {
            principal: error.principal,
        }
    }
}
