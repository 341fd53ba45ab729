//! Conversion between stored ACEs and wire ACEs.

use super::{Ace, AceFlags, AceMask, AceType, NfsAce, Who};
use crate::{IdMapping, VfsError};

/// Render a stored ACE for the wire, naming users and groups through `ids`.
///
/// # Errors
///
/// - [`VfsError::UnknownPrincipal`] if a user or group id has no name
pub fn to_wire<M: IdMapping + ?Sized>(ace: &Ace, ids: &M) -> Result<NfsAce, VfsError> {
    let principal = match ace.who {
        Who::User(uid) => ids.uid_to_principal(uid)?,
        Who::Group(gid) => ids.gid_to_principal(gid)?,
        special => special.abbreviation().unwrap_or_default().to_owned(),
    };
    Ok(NfsAce::new(ace.ace_type, ace.flags, ace.access_mask, principal))
}

/// Parse a wire ACE into its stored form.
///
/// Special principals are matched first. Anything else is a group if the
/// entry carries `IDENTIFIER_GROUP`, a user otherwise, and is resolved to a
/// numeric id through `ids`.
///
/// # Errors
///
/// - [`VfsError::MalformedWireData`] for an unknown ACE type or a principal
///   that is not UTF-8
/// - [`VfsError::UnknownPrincipal`] if the principal cannot be resolved
pub fn from_wire<M: IdMapping + ?Sized>(ace: &NfsAce, ids: &M) -> Result<Ace, VfsError> {
    let ace_type = AceType::try_from(ace.ace_type)?;
    let flags = AceFlags::from_bits_retain(ace.flag);
    let principal = ace.who.as_str()?;

    let who = match Who::from_abbreviation(principal) {
        Some(special) => special,
        None if flags.contains(AceFlags::IDENTIFIER_GROUP) => {
            Who::Group(ids.principal_to_gid(principal)?)
        }
        None => Who::User(ids.principal_to_uid(principal)?),
    };

    Ok(Ace::new(
        ace_type,
        flags,
        AceMask::from_bits_retain(ace.access_mask),
        who,
    ))
}
