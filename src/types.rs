//! Core types shared by the adapter, the ACL layer and the backing store.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// =============================================================================
// Access bits (NFSv4 ACCESS operation)
// =============================================================================

/// Read data from a file or read a directory.
pub const ACCESS4_READ: u32 = 0x0000_0001;
/// Look up a name in a directory.
pub const ACCESS4_LOOKUP: u32 = 0x0000_0002;
/// Rewrite existing file data or modify directory entries.
pub const ACCESS4_MODIFY: u32 = 0x0000_0004;
/// Write new data or add directory entries.
pub const ACCESS4_EXTEND: u32 = 0x0000_0008;
/// Delete an existing directory entry.
pub const ACCESS4_DELETE: u32 = 0x0000_0010;
/// Execute a file.
pub const ACCESS4_EXECUTE: u32 = 0x0000_0020;

// =============================================================================
// POSIX type tags
// =============================================================================

/// Mask for the file type bits of a mode.
pub const S_IFMT: u32 = 0o170000;
/// Socket.
pub const S_IFSOCK: u32 = 0o140000;
/// Symbolic link.
pub const S_IFLNK: u32 = 0o120000;
/// Regular file.
pub const S_IFREG: u32 = 0o100000;
/// Block device.
pub const S_IFBLK: u32 = 0o060000;
/// Directory.
pub const S_IFDIR: u32 = 0o040000;
/// Character device.
pub const S_IFCHR: u32 = 0o020000;
/// Named pipe.
pub const S_IFIFO: u32 = 0o010000;

// =============================================================================
// Handles
// =============================================================================

/// Opaque file handle handed to protocol clients.
///
/// The bytes are produced by the backing store's identifier codec and are
/// never interpreted by this crate. Two handles are equal iff their bytes
/// are equal, which the store guarantees means "same object".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inode(Vec<u8>);

impl Inode {
    /// Wrap handle bytes for a file system object.
    #[inline]
    pub fn for_file(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw handle bytes, as sent on the wire.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the handle and return its bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Object type requested by `create`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileType {
    /// Regular file.
    #[default]
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Unix domain socket.
    Socket,
    /// Named pipe.
    Fifo,
    /// Block device.
    Block,
    /// Character device.
    Char,
}

impl FileType {
    /// The POSIX type tag for this type.
    pub const fn type_tag(self) -> u32 {
        match self {
            FileType::Regular => S_IFREG,
            FileType::Directory => S_IFDIR,
            FileType::Symlink => S_IFLNK,
            FileType::Socket => S_IFSOCK,
            FileType::Fifo => S_IFIFO,
            FileType::Block => S_IFBLK,
            FileType::Char => S_IFCHR,
        }
    }

    /// Recover the type from the type bits of a mode.
    ///
    /// Unknown tags are reported as regular files.
    pub const fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFDIR => FileType::Directory,
            S_IFLNK => FileType::Symlink,
            S_IFSOCK => FileType::Socket,
            S_IFIFO => FileType::Fifo,
            S_IFBLK => FileType::Block,
            S_IFCHR => FileType::Char,
            _ => FileType::Regular,
        }
    }
}

/// Attributes as the protocol engine sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stat {
    /// Last access time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub atime: SystemTime,
    /// Last status change time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub ctime: SystemTime,
    /// Last modification time.
    #[cfg_attr(feature = "serde", serde(with = "system_time_serde"))]
    pub mtime: SystemTime,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// Device holding the object.
    pub dev: u64,
    /// Inode number as reported by the store.
    pub ino: u64,
    /// Type and permission bits.
    pub mode: u32,
    /// Number of hard links.
    pub nlink: u64,
    /// Device number for block and character devices.
    pub rdev: u64,
    /// Size in bytes.
    pub size: u64,
    /// Numeric file id, stable for the lifetime of the object.
    pub fileid: u64,
}

impl Stat {
    /// The object type encoded in `mode`.
    #[inline]
    pub fn file_type(&self) -> FileType {
        FileType::from_mode(self.mode)
    }

    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }
}

impl Default for Stat {
    fn default() -> Self {
        Self {
            atime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
            mtime: UNIX_EPOCH,
            uid: 0,
            gid: 0,
            dev: 0,
            ino: 0,
            mode: S_IFREG | 0o644,
            nlink: 1,
            rdev: 0,
            size: 0,
            fileid: 0,
        }
    }
}

/// Attributes as the backing store keeps them.
///
/// Times are milliseconds since the Unix epoch; device numbers and the link
/// count are 32-bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeStat {
    /// Last access time in milliseconds.
    pub atime: i64,
    /// Last status change time in milliseconds.
    pub ctime: i64,
    /// Last modification time in milliseconds.
    pub mtime: i64,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// Device holding the object.
    pub dev: u32,
    /// Inode number.
    pub ino: u64,
    /// Type and permission bits.
    pub mode: u32,
    /// Number of hard links.
    pub nlink: u32,
    /// Device number for block and character devices.
    pub rdev: u32,
    /// Size in bytes.
    pub size: u64,
}

impl NativeStat {
    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    /// Returns `true` if this is a regular file.
    #[inline]
    pub fn is_regular(&self) -> bool {
        self.mode & S_IFMT == S_IFREG
    }
}

/// A directory entry returned from `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectoryEntry {
    /// Name of the entry within its parent.
    pub name: String,
    /// Handle of the child.
    pub inode: Inode,
    /// Attributes of the child at listing time.
    pub stat: Stat,
}

/// A directory entry as the backing store lists it.
#[derive(Debug, Clone)]
pub struct StoreDirEntry<Id> {
    /// Name of the entry within its parent.
    pub name: String,
    /// Native identifier of the child.
    pub id: Id,
    /// Attributes of the child.
    pub stat: NativeStat,
}

// =============================================================================
// Filesystem usage
// =============================================================================

/// Filesystem-wide usage counters exposed to the protocol engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FsStat {
    /// Total space in bytes.
    pub total_space: u64,
    /// Total number of files.
    pub total_files: u64,
    /// Used space in bytes.
    pub used_space: u64,
    /// Used number of files.
    pub used_files: u64,
}

/// Filesystem-wide usage counters as the backing store reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeFsStat {
    /// Total space in bytes.
    pub total_space: u64,
    /// Total number of files.
    pub total_files: u64,
    /// Used space in bytes.
    pub used_space: u64,
    /// Used number of files.
    pub used_files: u64,
}

/// Storage tier on which an object's data may be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTier {
    /// Disk pool.
    Disk,
    /// Archival storage (tape and the like).
    Archival,
}

// =============================================================================
// Callers
// =============================================================================

/// Numeric identity of the caller of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subject {
    /// User id.
    pub uid: u32,
    /// Primary group first, then supplementary groups.
    pub gids: Vec<u32>,
}

impl Subject {
    /// Create a subject with a primary group and no supplementary groups.
    pub fn new(uid: u32, gid: u32) -> Self {
        Self {
            uid,
            gids: vec![gid],
        }
    }

    /// Add supplementary groups.
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = u32>) -> Self {
        self.gids.extend(groups);
        self
    }

    /// Returns `true` if the subject has this user id.
    #[inline]
    pub fn has_uid(&self, uid: u32) -> bool {
        self.uid == uid
    }

    /// Returns `true` if the subject is a member of this group.
    #[inline]
    pub fn has_gid(&self, gid: u32) -> bool {
        self.gids.contains(&gid)
    }
}

// =============================================================================
// Time conversion
// =============================================================================

/// Convert milliseconds since the epoch to a `SystemTime`.
pub(crate) fn millis_to_system_time(millis: i64) -> SystemTime {
    if millis >= 0 {
        UNIX_EPOCH + Duration::from_millis(millis.unsigned_abs())
    } else {
        UNIX_EPOCH - Duration::from_millis(millis.unsigned_abs())
    }
}

/// Convert a `SystemTime` to milliseconds since the epoch, saturating.
pub(crate) fn system_time_to_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis())
            .map(|m| -m)
            .unwrap_or(i64::MIN),
    }
}

/// Serde support for SystemTime (when serde feature is enabled).
#[cfg(feature = "serde")]
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::SystemTime;

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::system_time_to_millis(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Ok(super::millis_to_system_time(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_round_trip_through_mode() {
        for t in [
            FileType::Regular,
            FileType::Directory,
            FileType::Symlink,
            FileType::Socket,
            FileType::Fifo,
            FileType::Block,
            FileType::Char,
        ] {
            assert_eq!(FileType::from_mode(t.type_tag() | 0o755), t);
        }
    }

    #[test]
    fn default_file_type_is_regular() {
        assert_eq!(FileType::default(), FileType::Regular);
        assert_eq!(FileType::default().type_tag(), S_IFREG);
    }

    #[test]
    fn stat_is_dir() {
        let s = Stat {
            mode: S_IFDIR | 0o755,
            ..Default::default()
        };
        assert!(s.is_dir());
        assert_eq!(s.file_type(), FileType::Directory);
        assert!(!Stat::default().is_dir());
    }

    #[test]
    fn native_stat_kinds() {
        let dir = NativeStat {
            mode: S_IFDIR | 0o700,
            ..Default::default()
        };
        assert!(dir.is_dir());
        assert!(!dir.is_regular());

        let file = NativeStat {
            mode: S_IFREG | 0o600,
            ..Default::default()
        };
        assert!(file.is_regular());
    }

    #[test]
    fn inode_equality_is_byte_equality() {
        assert_eq!(Inode::for_file(vec![1, 2, 3]), Inode::for_file(vec![1, 2, 3]));
        assert_ne!(Inode::for_file(vec![1, 2, 3]), Inode::for_file(vec![1, 2]));
        assert_eq!(Inode::for_file(vec![9]).into_bytes(), vec![9]);
    }

    #[test]
    fn subject_groups() {
        let s = Subject::new(100, 10).with_groups([20, 30]);
        assert!(s.has_uid(100));
        assert!(!s.has_uid(0));
        assert!(s.has_gid(10));
        assert!(s.has_gid(30));
        assert!(!s.has_gid(40));
    }

    #[test]
    fn millis_conversion_round_trips() {
        for millis in [0, 1, 1_700_000_000_123, -5_000] {
            assert_eq!(system_time_to_millis(millis_to_system_time(millis)), millis);
        }
    }

    #[test]
    fn types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Inode>();
        assert_send_sync::<Stat>();
        assert_send_sync::<NativeStat>();
        assert_send_sync::<DirectoryEntry>();
        assert_send_sync::<FsStat>();
        assert_send_sync::<Subject>();
    }
}
