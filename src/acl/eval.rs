//! ACE evaluation.

use tracing::{debug, warn};

use super::{Ace, AceFlags, AceMask, AceType, Who};
use crate::{Subject, VfsError};

/// Outcome of walking an ACL for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AccessDecision {
    /// The first matching entry was an ALLOW.
    Allowed,
    /// The first matching entry was a DENY.
    Denied,
    /// No entry matched.
    NoMatch,
}

impl AccessDecision {
    /// Convert to the boolean-or-error form: `Allowed` is `Ok(true)`,
    /// `NoMatch` is `Ok(false)`, `Denied` is [`VfsError::AccessDenied`].
    pub fn into_result(self, mask: AceMask) -> Result<bool, VfsError> {
        match self {
            AccessDecision::Allowed => Ok(true),
            AccessDecision::NoMatch => Ok(false),
            AccessDecision::Denied => Err(VfsError::AccessDenied { mask: mask.bits() }),
        }
    }
}

fn applies_to(who: Who, subject: &Subject, owner: u32, owner_group: u32) -> bool {
    match who {
        Who::Everyone => true,
        Who::Owner => subject.has_uid(owner),
        Who::OwnerGroup => subject.has_gid(owner_group),
        Who::Group(gid) => subject.has_gid(gid),
        Who::User(uid) => subject.has_uid(uid),
        Who::Anonymous | Who::Authenticated => false,
    }
}

/// Walk `acl` in order and decide `requested` for `subject`.
///
/// Entries that are inherit-only, that are not ALLOW or DENY, or whose mask
/// shares no bit with `requested` are skipped. The first remaining entry
/// whose principal matches the subject decides.
///
/// An ALLOW decides for the whole request even when it covers only part of
/// `requested`; callers that need every bit checked ask once per right.
///
/// # Example
///
/// ```rust
/// use nfs4_vfs::acl::{evaluate, AccessDecision, Ace, AceMask, Who};
/// use nfs4_vfs::Subject;
///
/// let acl = [
///     Ace::deny(Who::Everyone, AceMask::WRITE_DATA),
///     Ace::allow(Who::Owner, AceMask::WRITE_DATA),
/// ];
/// let owner = Subject::new(100, 100);
/// let decision = evaluate(&owner, &acl, 100, 100, AceMask::WRITE_DATA);
/// assert_eq!(decision, AccessDecision::Denied);
/// ```
pub fn evaluate(
    subject: &Subject,
    acl: &[Ace],
    owner: u32,
    owner_group: u32,
    requested: AceMask,
) -> AccessDecision {
    for ace in acl {
        if ace.flags.contains(AceFlags::INHERIT_ONLY) {
            continue;
        }
        if !ace.ace_type.is_access_type() {
            continue;
        }
        if !ace.access_mask.intersects(requested) {
            continue;
        }
        if !applies_to(ace.who, subject, owner, owner_group) {
            continue;
        }

        return if ace.ace_type == AceType::Deny {
            warn!("Access deny: uid={} {:?}", subject.uid, requested);
            AccessDecision::Denied
        } else {
            debug!("Access grant: uid={} {:?}", subject.uid, requested);
            AccessDecision::Allowed
        };
    }
    AccessDecision::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: u32 = 100;
    const GROUP: u32 = 200;

    fn owner() -> Subject {
        Subject::new(OWNER, GROUP)
    }

    fn stranger() -> Subject {
        Subject::new(300, 300)
    }

    #[test]
    fn deny_before_allow_wins() {
        let acl = [
            Ace::deny(Who::Everyone, AceMask::WRITE_DATA),
            Ace::allow(Who::Owner, AceMask::WRITE_DATA),
        ];
        let decision = evaluate(&owner(), &acl, OWNER, GROUP, AceMask::WRITE_DATA);
        assert_eq!(decision, AccessDecision::Denied);
        assert!(matches!(
            decision.into_result(AceMask::WRITE_DATA),
            Err(VfsError::AccessDenied { mask: 2 })
        ));
    }

    #[test]
    fn allow_before_deny_wins() {
        let acl = [
            Ace::allow(Who::Owner, AceMask::WRITE_DATA),
            Ace::deny(Who::Everyone, AceMask::WRITE_DATA),
        ];
        assert_eq!(
            evaluate(&owner(), &acl, OWNER, GROUP, AceMask::WRITE_DATA),
            AccessDecision::Allowed
        );
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, AceMask::WRITE_DATA),
            AccessDecision::Denied
        );
    }

    #[test]
    fn empty_acl_has_no_match() {
        let decision = evaluate(&owner(), &[], OWNER, GROUP, AceMask::READ_DATA);
        assert_eq!(decision, AccessDecision::NoMatch);
        assert!(!decision.into_result(AceMask::READ_DATA).unwrap());
    }

    #[test]
    fn inherit_only_entries_are_skipped() {
        let acl = [
            Ace::new(
                AceType::Deny,
                AceFlags::INHERIT_ONLY,
                AceMask::READ_DATA,
                Who::Everyone,
            ),
            Ace::allow(Who::Everyone, AceMask::READ_DATA),
        ];
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::Allowed
        );
    }

    #[test]
    fn audit_and_alarm_entries_are_skipped() {
        let acl = [
            Ace::new(AceType::Audit, AceFlags::empty(), AceMask::READ_DATA, Who::Everyone),
            Ace::new(AceType::Alarm, AceFlags::empty(), AceMask::READ_DATA, Who::Everyone),
        ];
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::NoMatch
        );
    }

    #[test]
    fn entries_for_other_rights_are_skipped() {
        let acl = [
            Ace::deny(Who::Everyone, AceMask::EXECUTE),
            Ace::allow(Who::Everyone, AceMask::READ_DATA),
        ];
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::Allowed
        );
    }

    #[test]
    fn owner_group_matches_supplementary_groups() {
        let acl = [Ace::allow(Who::OwnerGroup, AceMask::READ_DATA)];
        let member = Subject::new(300, 1).with_groups([GROUP]);
        assert_eq!(
            evaluate(&member, &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::Allowed
        );
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::NoMatch
        );
    }

    #[test]
    fn explicit_user_and_group() {
        let acl = [
            Ace::deny(Who::User(300), AceMask::READ_DATA),
            Ace::allow(Who::Group(77), AceMask::READ_DATA),
        ];
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::Denied
        );
        let member = Subject::new(301, 77);
        assert_eq!(
            evaluate(&member, &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::Allowed
        );
    }

    #[test]
    fn owner_entry_ignores_non_owner() {
        let acl = [Ace::allow(Who::Owner, AceMask::READ_DATA)];
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::NoMatch
        );
    }

    #[test]
    fn anonymous_and_authenticated_never_match() {
        let acl = [
            Ace::allow(Who::Anonymous, AceMask::READ_DATA),
            Ace::allow(Who::Authenticated, AceMask::READ_DATA),
        ];
        assert_eq!(
            evaluate(&owner(), &acl, OWNER, GROUP, AceMask::READ_DATA),
            AccessDecision::NoMatch
        );
    }

    #[test]
    fn partial_allow_grants_whole_request() {
        let acl = [
            Ace::allow(Who::Everyone, AceMask::READ_DATA),
            Ace::deny(Who::Everyone, AceMask::WRITE_DATA),
        ];
        let requested = AceMask::READ_DATA | AceMask::WRITE_DATA;
        assert_eq!(
            evaluate(&stranger(), &acl, OWNER, GROUP, requested),
            AccessDecision::Allowed
        );
    }
}
