//! Conversion between native store identifiers and client handles.

use tracing::{debug, error};

use crate::{Inode, StoreIdentity, VfsError};

/// Turn a native identifier into a handle.
///
/// A failure means the store cannot serialize one of its own identifiers.
/// It is reported as [`VfsError::Encoding`] and never replaced by a
/// substitute handle.
pub fn encode_handle<S>(store: &S, id: &S::Id) -> Result<Inode, VfsError>
where
    S: StoreIdentity + ?Sized,
{
    store.id_to_bytes(id).map(Inode::for_file).map_err(|e| {
        error!("bug found: cannot encode identifier {:?}: {}", id, e);
        VfsError::Encoding {
            reason: e.to_string(),
        }
    })
}

/// Turn a handle back into a native identifier.
///
/// Any failure is [`VfsError::StaleHandle`]: the bytes no longer denote a
/// live object the store recognizes.
pub fn decode_handle<S>(store: &S, inode: &Inode) -> Result<S::Id, VfsError>
where
    S: StoreIdentity + ?Sized,
{
    store.id_from_bytes(inode.as_bytes()).map_err(|e| {
        debug!("stale handle {:02x?}: {}", inode.as_bytes(), e);
        VfsError::StaleHandle
    })
}
