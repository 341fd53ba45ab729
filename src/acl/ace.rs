//! Access control entries, in stored and wire form.

use bitflags::bitflags;

use crate::xdr::{Utf8StrMixed, XdrDecode, XdrDecoder, XdrEncode, XdrEncoder, wire_len};
use crate::VfsError;

/// ACE type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AceType {
    /// Grants the rights in the mask.
    Allow = 0,
    /// Denies the rights in the mask.
    Deny = 1,
    /// Logs access attempts.
    Audit = 2,
    /// Raises an alarm on access attempts.
    Alarm = 3,
}

impl AceType {
    /// Wire value.
    #[inline]
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Returns `true` for types that decide access (ALLOW and DENY).
    #[inline]
    pub const fn is_access_type(self) -> bool {
        matches!(self, AceType::Allow | AceType::Deny)
    }
}

impl TryFrom<u32> for AceType {
    type Error = VfsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Allow),
            1 => Ok(Self::Deny),
            2 => Ok(Self::Audit),
            3 => Ok(Self::Alarm),
            _ => Err(VfsError::malformed(format!("invalid ACE type: {value}"))),
        }
    }
}

bitflags! {
    /// ACE flag bits.
    ///
    /// Unknown bits survive [`AceFlags::from_bits_retain`] so a stored entry
    /// round-trips unchanged.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AceFlags: u32 {
        /// Inherited by files created in this directory.
        const FILE_INHERIT = 0x0000_0001;
        /// Inherited by directories created in this directory.
        const DIRECTORY_INHERIT = 0x0000_0002;
        /// Inheritance stops after one level.
        const NO_PROPAGATE_INHERIT = 0x0000_0004;
        /// Applies to descendants only, not to this object.
        const INHERIT_ONLY = 0x0000_0008;
        /// Audit or alarm on success.
        const SUCCESSFUL_ACCESS = 0x0000_0010;
        /// Audit or alarm on failure.
        const FAILED_ACCESS = 0x0000_0020;
        /// The principal names a group.
        const IDENTIFIER_GROUP = 0x0000_0040;
        /// The entry was inherited.
        const INHERITED = 0x0000_0080;
    }
}

bitflags! {
    /// ACE access mask bits.
    ///
    /// Directory operations reuse the file bits: `LIST_DIRECTORY` is
    /// `READ_DATA`, `ADD_FILE` is `WRITE_DATA`, `ADD_SUBDIRECTORY` is
    /// `APPEND_DATA`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AceMask: u32 {
        /// Read file data.
        const READ_DATA = 0x0000_0001;
        /// Write file data.
        const WRITE_DATA = 0x0000_0002;
        /// Append file data.
        const APPEND_DATA = 0x0000_0004;
        /// Read named attributes.
        const READ_NAMED_ATTRS = 0x0000_0008;
        /// Write named attributes.
        const WRITE_NAMED_ATTRS = 0x0000_0010;
        /// Execute a file or search a directory.
        const EXECUTE = 0x0000_0020;
        /// Delete an entry of a directory.
        const DELETE_CHILD = 0x0000_0040;
        /// Read basic attributes.
        const READ_ATTRIBUTES = 0x0000_0080;
        /// Write basic attributes.
        const WRITE_ATTRIBUTES = 0x0000_0100;
        /// Delete the object.
        const DELETE = 0x0001_0000;
        /// Read the ACL.
        const READ_ACL = 0x0002_0000;
        /// Write the ACL.
        const WRITE_ACL = 0x0004_0000;
        /// Change the owner.
        const WRITE_OWNER = 0x0008_0000;
        /// Use the object as a synchronization primitive.
        const SYNCHRONIZE = 0x0010_0000;
    }
}

impl AceMask {
    /// List a directory.
    pub const LIST_DIRECTORY: Self = Self::READ_DATA;
    /// Create a file in a directory.
    pub const ADD_FILE: Self = Self::WRITE_DATA;
    /// Create a subdirectory.
    pub const ADD_SUBDIRECTORY: Self = Self::APPEND_DATA;
}

/// Principal an ACE applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Who {
    /// A specific user.
    User(u32),
    /// A specific group.
    Group(u32),
    /// The owner of the object.
    Owner,
    /// The owning group of the object.
    OwnerGroup,
    /// Everybody.
    Everyone,
    /// Unauthenticated callers.
    Anonymous,
    /// Authenticated callers.
    Authenticated,
}

impl Who {
    const SPECIAL: [(Who, &'static str); 5] = [
        (Who::Owner, "OWNER@"),
        (Who::OwnerGroup, "GROUP@"),
        (Who::Everyone, "EVERYONE@"),
        (Who::Anonymous, "ANONYMOUS@"),
        (Who::Authenticated, "AUTHENTICATED@"),
    ];

    /// Special principal for a wire abbreviation such as `OWNER@`.
    pub fn from_abbreviation(principal: &str) -> Option<Self> {
        Self::SPECIAL
            .iter()
            .find(|(_, abbr)| *abbr == principal)
            .map(|(who, _)| *who)
    }

    /// Wire abbreviation of a special principal; `None` for users and groups.
    pub fn abbreviation(self) -> Option<&'static str> {
        Self::SPECIAL
            .iter()
            .find(|(who, _)| *who == self)
            .map(|(_, abbr)| *abbr)
    }
}

/// A stored access control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ace {
    /// Allow, deny, audit or alarm.
    pub ace_type: AceType,
    /// Inheritance and identifier flags.
    pub flags: AceFlags,
    /// Rights this entry covers.
    pub access_mask: AceMask,
    /// Principal this entry applies to.
    pub who: Who,
}

impl Ace {
    /// Create an entry.
    pub const fn new(ace_type: AceType, flags: AceFlags, access_mask: AceMask, who: Who) -> Self {
        Self {
            ace_type,
            flags,
            access_mask,
            who,
        }
    }

    /// An ALLOW entry without flags.
    pub const fn allow(who: Who, access_mask: AceMask) -> Self {
        Self::new(AceType::Allow, AceFlags::empty(), access_mask, who)
    }

    /// A DENY entry without flags.
    pub const fn deny(who: Who, access_mask: AceMask) -> Self {
        Self::new(AceType::Deny, AceFlags::empty(), access_mask, who)
    }
}

/// NFSv4 `nfsace4`: an ACE exactly as it travels on the wire.
///
/// ```text
/// type (u32) | flag (u32) | access_mask (u32) | who (utf8str_mixed)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NfsAce {
    /// `acetype4` value.
    pub ace_type: u32,
    /// `aceflag4` bits.
    pub flag: u32,
    /// `acemask4` bits.
    pub access_mask: u32,
    /// Principal string.
    pub who: Utf8StrMixed,
}

impl NfsAce {
    /// Build a wire ACE from typed parts.
    pub fn new(
        ace_type: AceType,
        flags: AceFlags,
        access_mask: AceMask,
        who: impl Into<Utf8StrMixed>,
    ) -> Self {
        Self {
            ace_type: ace_type.value(),
            flag: flags.bits(),
            access_mask: access_mask.bits(),
            who: who.into(),
        }
    }

    /// Returns `true` if `other` has the same type, flags and principal.
    pub(crate) fn same_principal(&self, other: &NfsAce) -> bool {
        self.ace_type == other.ace_type && self.flag == other.flag && self.who == other.who
    }
}

impl XdrEncode for NfsAce {
    fn xdr_encode(&self, xdr: &mut XdrEncoder) -> Result<(), VfsError> {
        xdr.put_u32(self.ace_type);
        xdr.put_u32(self.flag);
        xdr.put_u32(self.access_mask);
        xdr.put(&self.who)
    }
}

impl XdrDecode for NfsAce {
    fn xdr_decode(xdr: &mut XdrDecoder<'_>) -> Result<Self, VfsError> {
        Ok(Self {
            ace_type: xdr.get_u32()?,
            flag: xdr.get_u32()?,
            access_mask: xdr.get_u32()?,
            who: xdr.get()?,
        })
    }
}

/// Encode a counted array of wire ACEs (the `fattr4_acl` attribute).
///
/// # Errors
///
/// - [`VfsError::MalformedWireData`] if the entry count or a principal
///   length does not fit its prefix
pub fn encode_acl(xdr: &mut XdrEncoder, acl: &[NfsAce]) -> Result<(), VfsError> {
    xdr.put_u32(wire_len(acl.len())?);
    for ace in acl {
        xdr.put(ace)?;
    }
    Ok(())
}

/// Decode a counted array of wire ACEs.
///
/// # Errors
///
/// - [`VfsError::MalformedWireData`] if the count exceeds
///   [`XdrConfig::max_acl_entries`](crate::XdrConfig::max_acl_entries) or an
///   entry is truncated
pub fn decode_acl(xdr: &mut XdrDecoder<'_>) -> Result<Vec<NfsAce>, VfsError> {
    let count = xdr.get_u32()?;
    let max = xdr.config().max_acl_entries;
    if count > max {
        return Err(VfsError::malformed(format!(
            "ACL has {count} entries, limit is {max}"
        )));
    }
    (0..count).map(|_| xdr.get::<NfsAce>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XdrConfig;

    #[test]
    fn ace_type_values() {
        assert_eq!(AceType::Allow.value(), 0);
        assert_eq!(AceType::Alarm.value(), 3);
        assert_eq!(AceType::try_from(1).unwrap(), AceType::Deny);
        assert!(matches!(
            AceType::try_from(4),
            Err(VfsError::MalformedWireData { .. })
        ));
    }

    #[test]
    fn only_allow_and_deny_decide_access() {
        assert!(AceType::Allow.is_access_type());
        assert!(AceType::Deny.is_access_type());
        assert!(!AceType::Audit.is_access_type());
        assert!(!AceType::Alarm.is_access_type());
    }

    #[test]
    fn mask_set_operations() {
        let rw = AceMask::READ_DATA | AceMask::WRITE_DATA;
        assert!(rw.contains(AceMask::READ_DATA));
        assert!(!rw.contains(AceMask::READ_DATA | AceMask::EXECUTE));
        assert!(rw.intersects(AceMask::WRITE_DATA | AceMask::EXECUTE));
        assert_eq!(rw.difference(AceMask::WRITE_DATA), AceMask::READ_DATA);
        assert!(AceMask::empty().is_empty());
        assert_eq!(AceMask::LIST_DIRECTORY, AceMask::READ_DATA);
    }

    #[test]
    fn unknown_mask_bits_are_retained() {
        let m = AceMask::from_bits_retain(0x8000_0000 | AceMask::READ_DATA.bits());
        assert_eq!(m.bits(), 0x8000_0001);
        assert!(m.contains(AceMask::READ_DATA));
        assert_eq!(m.difference(AceMask::READ_DATA).bits(), 0x8000_0000);
        assert_eq!(AceFlags::from_bits_retain(0x100).bits(), 0x100);
    }

    #[test]
    fn special_principals_round_trip() {
        for who in [
            Who::Owner,
            Who::OwnerGroup,
            Who::Everyone,
            Who::Anonymous,
            Who::Authenticated,
        ] {
            let abbr = who.abbreviation().unwrap();
            assert_eq!(Who::from_abbreviation(abbr), Some(who));
        }
        assert_eq!(Who::User(7).abbreviation(), None);
        assert_eq!(Who::from_abbreviation("alice@example.org"), None);
        assert_eq!(Who::OwnerGroup.abbreviation(), Some("GROUP@"));
    }

    #[test]
    fn nfs_ace_wire_layout() {
        let ace = NfsAce::new(
            AceType::Deny,
            AceFlags::IDENTIFIER_GROUP,
            AceMask::WRITE_DATA,
            "GROUP@",
        );
        let mut xdr = XdrEncoder::new();
        xdr.put(&ace).unwrap();
        let bytes = xdr.into_bytes();
        assert_eq!(&bytes[..12], &[0, 0, 0, 1, 0, 0, 0, 0x40, 0, 0, 0, 2]);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 6]);
        assert_eq!(&bytes[16..22], b"GROUP@");
        assert_eq!(bytes.len(), 24);
    }

    #[test]
    fn acl_array_decodes_in_order() {
        let acl = vec![
            NfsAce::new(AceType::Allow, AceFlags::empty(), AceMask::READ_DATA, "OWNER@"),
            NfsAce::new(AceType::Deny, AceFlags::empty(), AceMask::WRITE_DATA, "EVERYONE@"),
        ];
        let mut xdr = XdrEncoder::new();
        encode_acl(&mut xdr, &acl).unwrap();
        let bytes = xdr.into_bytes();

        let decoded = decode_acl(&mut XdrDecoder::new(&bytes)).unwrap();
        assert_eq!(decoded, acl);
    }

    #[test]
    fn acl_array_count_is_bounded() {
        let bytes = [0, 0, 0, 3];
        let config = XdrConfig::default().with_max_acl_entries(2);
        let err = decode_acl(&mut XdrDecoder::with_config(&bytes, config)).unwrap_err();
        assert!(err.to_string().contains("limit is 2"));
    }

    #[test]
    fn acl_array_truncated_entry_fails() {
        let bytes = [0, 0, 0, 1, 0, 0, 0, 0];
        assert!(decode_acl(&mut XdrDecoder::new(&bytes)).is_err());
    }
}
