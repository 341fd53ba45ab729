//! File content operations of a backing store.

use super::StoreIdentity;
use crate::StoreError;

/// Byte-range I/O on stored objects.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn StoreData<Id = T>`.
pub trait StoreData: StoreIdentity {
    /// Read into `buf` starting at `offset`. Returns the number of bytes read;
    /// fewer than `buf.len()` means end of data.
    fn read(&self, id: &Self::Id, offset: u64, buf: &mut [u8]) -> Result<usize, StoreError>;

    /// Write `data` at `offset`. Returns the number of bytes written.
    fn write(&self, id: &Self::Id, offset: u64, data: &[u8]) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_data_is_object_safe() {
        fn _check(_: &dyn StoreData<Id = u64>) {}
    }
}
