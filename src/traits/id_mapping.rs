//! Principal name resolution.

use crate::UnknownPrincipal;

/// Maps numeric user and group ids to NFSv4 principal strings and back.
///
/// Implementations are usually a shared, read-mostly cache in front of a
/// directory service. The adapter only borrows one.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn IdMapping`.
///
/// # Example
///
/// ```rust
/// use nfs4_vfs::{IdMapping, UnknownPrincipal};
///
/// struct RootOnly;
///
/// impl IdMapping for RootOnly {
///     fn uid_to_principal(&self, uid: u32) -> Result<String, UnknownPrincipal> {
///         if uid == 0 { Ok("root@localdomain".into()) } else { Err(UnknownPrincipal::new(uid.to_string())) }
///     }
///     fn gid_to_principal(&self, gid: u32) -> Result<String, UnknownPrincipal> {
///         if gid == 0 { Ok("root@localdomain".into()) } else { Err(UnknownPrincipal::new(gid.to_string())) }
///     }
///     fn principal_to_uid(&self, principal: &str) -> Result<u32, UnknownPrincipal> {
///         if principal == "root@localdomain" { Ok(0) } else { Err(UnknownPrincipal::new(principal)) }
///     }
///     fn principal_to_gid(&self, principal: &str) -> Result<u32, UnknownPrincipal> {
///         self.principal_to_uid(principal)
///     }
/// }
///
/// assert_eq!(RootOnly.principal_to_uid("root@localdomain").unwrap(), 0);
/// assert!(RootOnly.uid_to_principal(1000).is_err());
/// ```
pub trait IdMapping: Send + Sync {
    /// Principal string for a user id.
    fn uid_to_principal(&self, uid: u32) -> Result<String, UnknownPrincipal>;

    /// Principal string for a group id.
    fn gid_to_principal(&self, gid: u32) -> Result<String, UnknownPrincipal>;

    /// User id for a principal string.
    fn principal_to_uid(&self, principal: &str) -> Result<u32, UnknownPrincipal>;

    /// Group id for a principal string.
    fn principal_to_gid(&self, principal: &str) -> Result<u32, UnknownPrincipal>;
}
