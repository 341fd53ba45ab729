//! Identity mapping by numeric string.

use crate::{IdMapping, UnknownPrincipal};

/// Maps ids to their decimal form and back: uid `1000` is principal `"1000"`.
///
/// NFSv4 clients fall back to numeric principals when no name service is
/// shared with the server. Non-numeric principals do not resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericIdMapping;

fn parse(principal: &str) -> Result<u32, UnknownPrincipal> {
    principal
        .parse::<u32>()
        .map_err(|_| UnknownPrincipal::new(principal))
}

impl IdMapping for NumericIdMapping {
    fn uid_to_principal(&self, uid: u32) -> Result<String, UnknownPrincipal> {
        Ok(uid.to_string())
    }

    fn gid_to_principal(&self, gid: u32) -> Result<String, UnknownPrincipal> {
        Ok(gid.to_string())
    }

    fn principal_to_uid(&self, principal: &str) -> Result<u32, UnknownPrincipal> {
        parse(principal)
    }

    fn principal_to_gid(&self, principal: &str) -> Result<u32, UnknownPrincipal> {
        parse(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_render_as_decimal() {
        assert_eq!(NumericIdMapping.uid_to_principal(1000).unwrap(), "1000");
        assert_eq!(NumericIdMapping.gid_to_principal(0).unwrap(), "0");
    }

    #[test]
    fn decimal_principals_parse() {
        assert_eq!(NumericIdMapping.principal_to_uid("42").unwrap(), 42);
        assert_eq!(NumericIdMapping.principal_to_gid("7").unwrap(), 7);
    }

    #[test]
    fn names_do_not_resolve() {
        let err = NumericIdMapping.principal_to_uid("alice@example.org").unwrap_err();
        assert_eq!(err.principal, "alice@example.org");
        assert!(NumericIdMapping.principal_to_gid("-1").is_err());
        assert!(NumericIdMapping.principal_to_gid("").is_err());
    }
}
