//! Encoding versions and the version gate.

use crate::error::{PackedIntsError, Result, VersionBound};

/// Codec name written by header-producing collaborators next to the version.
pub const CODEC_NAME: &str = "PackedInts";

/// Version of the packed byte layout.
///
/// Versions are totally ordered; a later version never changes how values
/// are laid out inside blocks, only how much trailing padding is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    /// Packed footprint rounded up to whole 64-bit words.
    Start = 0,
    /// Packed footprint rounded up to whole bytes.
    ByteAligned = 1,
}

impl Version {
    pub const START: Version = Version::Start;
    pub const CURRENT: Version = Version::ByteAligned;

    /// Integer id persisted alongside encoded buffers.
    #[inline]
    pub const fn id(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for Version {
    type Error = PackedIntsError;

    fn try_from(version: i32) -> Result<Self> {
        check_version(version)
    }
}

/// Validates a persisted version id.
///
/// # Examples
///
/// ```
/// use packed_ints::{check_version, PackedIntsError, Version};
///
/// assert_eq!(check_version(1).unwrap(), Version::ByteAligned);
/// assert!(matches!(
///     check_version(2),
///     Err(PackedIntsError::InvalidVersion { .. })
/// ));
/// ```
pub fn check_version(version: i32) -> Result<Version> {
    let bound = if version < Version::START.id() {
        VersionBound::TooOld
    } else if version > Version::CURRENT.id() {
        VersionBound::TooNew
    } else if version == Version::Start.id() {
        return Ok(Version::Start);
    } else {
        return Ok(Version::ByteAligned);
    };
    Err(PackedIntsError::InvalidVersion {
        version,
        bound,
        min: Version::START.id(),
        max: Version::CURRENT.id(),
    })
}
