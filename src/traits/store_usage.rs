//! Filesystem usage counters of a backing store.

use crate::{NativeFsStat, StoreError};

/// Filesystem-wide usage counters.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StoreUsage`.
pub trait StoreUsage: Send + Sync {
    /// Current totals and usage.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] for backend-specific failures
    fn usage(&self) -> Result<NativeFsStat, StoreError>;
}
