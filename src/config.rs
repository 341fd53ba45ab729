//! Wire decoding limits.

/// Limits applied when decoding data received from a peer.
///
/// A hostile client controls every length prefix it sends; these limits
/// bound the memory a single decode may allocate.
///
/// # Example
///
/// ```rust
/// use nfs4_vfs::XdrConfig;
///
/// let config = XdrConfig::default().with_max_string_len(255);
/// assert_eq!(config.max_string_len, 255);
/// assert_eq!(config.max_acl_entries, XdrConfig::DEFAULT_MAX_ACL_ENTRIES);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct XdrConfig {
    /// Largest accepted string payload in bytes.
    pub max_string_len: u32,
    /// Largest accepted number of entries in an ACL.
    pub max_acl_entries: u32,
}

impl XdrConfig {
    /// Default string limit.
    pub const DEFAULT_MAX_STRING_LEN: u32 = 4096;
    /// Default ACL entry limit.
    pub const DEFAULT_MAX_ACL_ENTRIES: u32 = 1024;

    /// Set the string limit.
    pub const fn with_max_string_len(mut self, len: u32) -> Self {
        self.max_string_len = len;
        self
    }

    /// Set the ACL entry limit.
    pub const fn with_max_acl_entries(mut self, entries: u32) -> Self {
        self.max_acl_entries = entries;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`VfsError::MalformedWireData`](crate::VfsError::MalformedWireData)
    ///   if the JSON does not describe a configuration
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, crate::VfsError> {
        serde_json::from_str(json)
            .map_err(|e| crate::VfsError::malformed(format!("invalid xdr config: {e}")))
    }
}

impl Default for XdrConfig {
    fn default() -> Self {
        Self {
            max_string_len: Self::DEFAULT_MAX_STRING_LEN,
            max_acl_entries: Self::DEFAULT_MAX_ACL_ENTRIES,
        }
    }
}
