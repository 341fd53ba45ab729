//! ACEs derived from POSIX mode bits, and ACL compaction.

use super::{AceFlags, AceMask, AceType, NfsAce, Who};

const MODE_READ: u32 = 0o4;
const MODE_WRITE: u32 = 0o2;
const MODE_EXEC: u32 = 0o1;

/// Rights every class that is granted anything also gets.
const BASE_RIGHTS: AceMask = AceMask::READ_ATTRIBUTES
    .union(AceMask::READ_ACL)
    .union(AceMask::SYNCHRONIZE);

/// Rights only the owner gets.
const OWNER_RIGHTS: AceMask = AceMask::WRITE_ACL
    .union(AceMask::WRITE_ATTRIBUTES)
    .union(AceMask::WRITE_OWNER);

/// Rights conveyed by the `rwx` bits of a single class (low three bits).
fn rwx_rights(bits: u32, is_dir: bool) -> AceMask {
    let mut mask = AceMask::empty();
    if bits & MODE_READ != 0 {
        mask |= if is_dir {
            AceMask::LIST_DIRECTORY
        } else {
            AceMask::READ_DATA
        };
        mask |= AceMask::READ_NAMED_ATTRS;
    }
    if bits & MODE_WRITE != 0 {
        mask |= if is_dir {
            AceMask::ADD_FILE | AceMask::ADD_SUBDIRECTORY | AceMask::DELETE_CHILD
        } else {
            AceMask::WRITE_DATA | AceMask::APPEND_DATA
        };
        mask |= AceMask::WRITE_NAMED_ATTRS;
    }
    if bits & MODE_EXEC != 0 {
        mask |= AceMask::EXECUTE;
    }
    mask
}

/// ACEs equivalent to the permission bits of `mode`.
///
/// For owner, group and other in that order: an ALLOW entry with the rights
/// the class has, then a DENY entry with the `rwx` rights it lacks. Entries
/// with an empty mask are left out.
///
/// # Example
///
/// ```rust
/// use nfs4_vfs::acl::{self, AceMask};
///
/// let aces = acl::of_mode(0o644, false);
/// let owner = &aces[0];
/// assert_eq!(owner.who.to_string(), "OWNER@");
/// assert!(AceMask::from_bits_retain(owner.access_mask).contains(AceMask::WRITE_DATA));
/// ```
pub fn of_mode(mode: u32, is_dir: bool) -> Vec<NfsAce> {
    let all = rwx_rights(0o7, is_dir);
    let classes = [
        (Who::Owner, (mode >> 6) & 0o7, BASE_RIGHTS | OWNER_RIGHTS),
        (Who::OwnerGroup, (mode >> 3) & 0o7, BASE_RIGHTS),
        (Who::Everyone, mode & 0o7, BASE_RIGHTS),
    ];

    let mut aces = Vec::with_capacity(6);
    for (who, bits, extra) in classes {
        let abbr = who.abbreviation().unwrap_or_default();
        let granted = rwx_rights(bits, is_dir);
        aces.push(NfsAce::new(
            AceType::Allow,
            AceFlags::empty(),
            granted | extra,
            abbr,
        ));
        let denied = all.difference(granted);
        if !denied.is_empty() {
            aces.push(NfsAce::new(AceType::Deny, AceFlags::empty(), denied, abbr));
        }
    }
    aces
}

/// Remove redundant entries while keeping evaluation semantics.
///
/// - entries with an empty mask are dropped;
/// - an entry identical to an earlier one is dropped;
/// - an entry with the same type, flags and principal as the entry just
///   before it is merged into that entry.
///
/// The result keeps the relative order of first occurrences, and
/// `compact(compact(x)) == compact(x)`.
pub fn compact(acl: Vec<NfsAce>) -> Vec<NfsAce> {
    let mut out: Vec<NfsAce> = Vec::with_capacity(acl.len());
    for ace in acl {
        if ace.access_mask == 0 || out.contains(&ace) {
            continue;
        }
        let merge = out.last().is_some_and(|last| last.same_principal(&ace));
        if merge {
            let at = out.len() - 1;
            out[at].access_mask |= ace.access_mask;
            if out[..at].contains(&out[at]) {
                out.pop();
            }
        } else {
            out.push(ace);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(aces: &'a [NfsAce], ace_type: AceType, who: &str) -> Option<&'a NfsAce> {
        aces.iter()
            .find(|a| a.ace_type == ace_type.value() && a.who.to_string() == who)
    }

    fn mask(ace: &NfsAce) -> AceMask {
        AceMask::from_bits_retain(ace.access_mask)
    }

    #[test]
    fn mode_0644_file() {
        let aces = of_mode(0o644, false);

        let owner = find(&aces, AceType::Allow, "OWNER@").unwrap();
        assert!(mask(owner).contains(AceMask::READ_DATA | AceMask::WRITE_DATA));
        assert!(!mask(owner).intersects(AceMask::EXECUTE));

        let everyone = find(&aces, AceType::Allow, "EVERYONE@").unwrap();
        assert!(mask(everyone).contains(AceMask::READ_DATA));
        assert!(!mask(everyone).intersects(AceMask::WRITE_DATA | AceMask::APPEND_DATA));

        let group = find(&aces, AceType::Allow, "GROUP@").unwrap();
        assert!(!mask(group).intersects(AceMask::WRITE_DATA | AceMask::APPEND_DATA));

        let everyone_deny = find(&aces, AceType::Deny, "EVERYONE@").unwrap();
        assert!(mask(everyone_deny).contains(AceMask::WRITE_DATA | AceMask::EXECUTE));
    }

    #[test]
    fn order_is_owner_group_everyone() {
        let aces = of_mode(0o750, false);
        let order: Vec<String> = aces.iter().map(|a| a.who.to_string()).collect();
        assert_eq!(
            order,
            ["OWNER@", "GROUP@", "GROUP@", "EVERYONE@", "EVERYONE@"]
        );
    }

    #[test]
    fn full_permissions_emit_no_deny() {
        let aces = of_mode(0o777, false);
        assert_eq!(aces.len(), 3);
        assert!(aces.iter().all(|a| a.ace_type == AceType::Allow.value()));
    }

    #[test]
    fn directory_write_includes_delete_child() {
        let aces = of_mode(0o755, true);
        let owner = find(&aces, AceType::Allow, "OWNER@").unwrap();
        assert!(mask(owner).contains(
            AceMask::ADD_FILE | AceMask::ADD_SUBDIRECTORY | AceMask::DELETE_CHILD
        ));
        let file_owner = find(&of_mode(0o755, false), AceType::Allow, "OWNER@")
            .map(mask)
            .unwrap();
        assert!(!file_owner.intersects(AceMask::DELETE_CHILD));
    }

    #[test]
    fn only_owner_may_write_acl() {
        let aces = of_mode(0o777, false);
        for ace in &aces {
            let owner = ace.who.to_string() == "OWNER@";
            assert_eq!(mask(ace).intersects(AceMask::WRITE_ACL), owner);
        }
    }

    #[test]
    fn type_bits_are_ignored() {
        assert_eq!(of_mode(0o100644, false), of_mode(0o644, false));
    }

    fn ace(t: AceType, m: AceMask, who: &str) -> NfsAce {
        NfsAce::new(t, AceFlags::empty(), m, who)
    }

    #[test]
    fn compact_drops_duplicates() {
        let a = ace(AceType::Allow, AceMask::READ_DATA, "OWNER@");
        let b = ace(AceType::Deny, AceMask::WRITE_DATA, "EVERYONE@");
        let out = compact(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn compact_merges_adjacent_same_principal() {
        let out = compact(vec![
            ace(AceType::Allow, AceMask::READ_DATA, "OWNER@"),
            ace(AceType::Allow, AceMask::WRITE_DATA, "OWNER@"),
            ace(AceType::Allow, AceMask::READ_DATA, "EVERYONE@"),
        ]);
        assert_eq!(
            out,
            vec![
                ace(
                    AceType::Allow,
                    AceMask::READ_DATA | AceMask::WRITE_DATA,
                    "OWNER@"
                ),
                ace(AceType::Allow, AceMask::READ_DATA, "EVERYONE@"),
            ]
        );
    }

    #[test]
    fn compact_keeps_non_adjacent_same_principal() {
        let input = vec![
            ace(AceType::Allow, AceMask::READ_DATA, "OWNER@"),
            ace(AceType::Deny, AceMask::READ_DATA, "EVERYONE@"),
            ace(AceType::Allow, AceMask::WRITE_DATA, "OWNER@"),
        ];
        assert_eq!(compact(input.clone()), input);
    }

    #[test]
    fn compact_does_not_merge_different_types_or_flags() {
        let flagged = NfsAce::new(
            AceType::Allow,
            AceFlags::FILE_INHERIT,
            AceMask::WRITE_DATA,
            "OWNER@",
        );
        let input = vec![
            ace(AceType::Allow, AceMask::READ_DATA, "OWNER@"),
            ace(AceType::Deny, AceMask::WRITE_DATA, "OWNER@"),
            flagged,
        ];
        assert_eq!(compact(input.clone()), input);
    }

    #[test]
    fn compact_drops_empty_masks() {
        let out = compact(vec![
            ace(AceType::Allow, AceMask::empty(), "OWNER@"),
            ace(AceType::Allow, AceMask::READ_DATA, "GROUP@"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].who.to_string(), "GROUP@");
    }

    #[test]
    fn compact_drops_merge_result_equal_to_earlier_entry() {
        let rw = AceMask::READ_DATA | AceMask::WRITE_DATA;
        let out = compact(vec![
            ace(AceType::Allow, rw, "OWNER@"),
            ace(AceType::Allow, AceMask::READ_DATA, "GROUP@"),
            ace(AceType::Allow, AceMask::READ_DATA, "OWNER@"),
            ace(AceType::Allow, AceMask::WRITE_DATA, "OWNER@"),
        ]);
        assert_eq!(
            out,
            vec![
                ace(AceType::Allow, rw, "OWNER@"),
                ace(AceType::Allow, AceMask::READ_DATA, "GROUP@"),
            ]
        );
    }

    #[test]
    fn compact_is_idempotent() {
        let rw = AceMask::READ_DATA | AceMask::WRITE_DATA;
        let inputs = vec![
            of_mode(0o644, false),
            of_mode(0o000, true),
            vec![
                ace(AceType::Allow, rw, "OWNER@"),
                ace(AceType::Allow, AceMask::READ_DATA, "GROUP@"),
                ace(AceType::Allow, AceMask::READ_DATA, "OWNER@"),
                ace(AceType::Allow, AceMask::WRITE_DATA, "OWNER@"),
                ace(AceType::Allow, AceMask::EXECUTE, "GROUP@"),
                ace(AceType::Allow, AceMask::empty(), "GROUP@"),
                ace(AceType::Deny, AceMask::EXECUTE, "EVERYONE@"),
                ace(AceType::Deny, AceMask::EXECUTE, "EVERYONE@"),
            ],
        ];
        for input in inputs {
            let once = compact(input);
            assert_eq!(compact(once.clone()), once);
        }
    }

    #[test]
    fn compact_of_empty_is_empty() {
        assert!(compact(Vec::new()).is_empty());
    }
}
