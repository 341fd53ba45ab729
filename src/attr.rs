//! Attribute translation between the store and the protocol.

use crate::types::{millis_to_system_time, system_time_to_millis};
use crate::{FileType, NativeStat, Stat};

/// Protocol attributes from store attributes. `fileid` comes from the
/// store's identifier so that it is stable across calls.
pub fn to_protocol_stat(native: &NativeStat, fileid: u64) -> Stat {
    Stat {
        atime: millis_to_system_time(native.atime),
        ctime: millis_to_system_time(native.ctime),
        mtime: millis_to_system_time(native.mtime),
        uid: native.uid,
        gid: native.gid,
        dev: u64::from(native.dev),
        ino: native.ino,
        mode: native.mode,
        nlink: u64::from(native.nlink),
        rdev: u64::from(native.rdev),
        size: native.size,
        fileid,
    }
}

/// Store attributes from protocol attributes.
///
/// Every field is copied; the store decides which ones it applies. Values
/// wider than the store's fields saturate.
pub fn to_native_stat(stat: &Stat) -> NativeStat {
    NativeStat {
        atime: system_time_to_millis(stat.atime),
        ctime: system_time_to_millis(stat.ctime),
        mtime: system_time_to_millis(stat.mtime),
        uid: stat.uid,
        gid: stat.gid,
        dev: u32::try_from(stat.dev).unwrap_or(u32::MAX),
        ino: stat.ino,
        mode: stat.mode,
        nlink: u32::try_from(stat.nlink).unwrap_or(u32::MAX),
        rdev: u32::try_from(stat.rdev).unwrap_or(u32::MAX),
        size: stat.size,
    }
}

/// Type and permission bits for a new object: `mode | type tag`.
#[inline]
pub fn mode_with_type(file_type: FileType, mode: u32) -> u32 {
    mode | file_type.type_tag()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{S_IFCHR, S_IFDIR, S_IFLNK, S_IFREG};
    use std::time::{Duration, UNIX_EPOCH};

    fn sample() -> NativeStat {
        NativeStat {
            atime: 1_700_000_000_001,
            ctime: 1_700_000_000_002,
            mtime: 1_700_000_000_003,
            uid: 1000,
            gid: 100,
            dev: 8,
            ino: 4711,
            mode: S_IFREG | 0o640,
            nlink: 2,
            rdev: 0,
            size: 12345,
        }
    }

    #[test]
    fn protocol_stat_copies_every_field() {
        let stat = to_protocol_stat(&sample(), 99);
        assert_eq!(stat.atime, UNIX_EPOCH + Duration::from_millis(1_700_000_000_001));
        assert_eq!(stat.mtime, UNIX_EPOCH + Duration::from_millis(1_700_000_000_003));
        assert_eq!(stat.uid, 1000);
        assert_eq!(stat.gid, 100);
        assert_eq!(stat.dev, 8);
        assert_eq!(stat.ino, 4711);
        assert_eq!(stat.mode, S_IFREG | 0o640);
        assert_eq!(stat.nlink, 2);
        assert_eq!(stat.size, 12345);
        assert_eq!(stat.fileid, 99);
    }

    #[test]
    fn native_stat_reverses_protocol_stat() {
        let native = sample();
        assert_eq!(to_native_stat(&to_protocol_stat(&native, 1)), native);
    }

    #[test]
    fn oversized_counts_saturate() {
        let stat = Stat {
            nlink: u64::MAX,
            rdev: 1 << 40,
            ..Default::default()
        };
        let native = to_native_stat(&stat);
        assert_eq!(native.nlink, u32::MAX);
        assert_eq!(native.rdev, u32::MAX);
    }

    #[test]
    fn mode_gets_type_tag() {
        assert_eq!(mode_with_type(FileType::Regular, 0o644), S_IFREG | 0o644);
        assert_eq!(mode_with_type(FileType::Directory, 0o755), S_IFDIR | 0o755);
        assert_eq!(mode_with_type(FileType::Symlink, 0o777), S_IFLNK | 0o777);
        assert_eq!(mode_with_type(FileType::Char, 0o600), S_IFCHR | 0o600);
    }
}
