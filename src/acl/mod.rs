//! # NFSv4 Access Control Lists
//!
//! Two representations of an ACE exist:
//!
//! | Type | Where | Principal |
//! |------|-------|-----------|
//! | [`Ace`] | backing store, evaluation | [`Who`]: special principal or numeric id |
//! | [`NfsAce`] | wire (`nfsace4`) | UTF-8 string, e.g. `OWNER@` or `alice@example.org` |
//!
//! [`to_wire`] and [`from_wire`] convert between them through an
//! [`IdMapping`](crate::IdMapping).
//!
//! ## Effective ACL
//!
//! The ACL reported to clients is the stored ACL followed by the entries
//! [`of_mode`] derives from the POSIX permission bits, passed through
//! [`compact`]. Stored entries come first and therefore take precedence.
//!
//! ## Evaluation
//!
//! [`evaluate`] walks a list of [`Ace`] in order; the first entry that
//! applies to the caller and shares a bit with the request decides. A DENY
//! ahead of an ALLOW always wins:
//!
//! ```text
//! DENY  EVERYONE@ WRITE_DATA   <- owner asking for WRITE_DATA stops here
//! ALLOW OWNER@    WRITE_DATA
//! ```

mod ace;
mod convert;
mod eval;
mod posix;

pub use ace::{Ace, AceFlags, AceMask, AceType, NfsAce, Who, decode_acl, encode_acl};
pub use convert::{from_wire, to_wire};
pub use eval::{AccessDecision, evaluate};
pub use posix::{compact, of_mode};
