use crate::format::Format;
use raw_bytes::ContainerError;
#[cfg(feature = "std")]
use thiserror::Error;

/// Which end of the supported range a rejected version fell off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBound {
    TooOld,
    TooNew,
}

impl core::fmt::Display for VersionBound {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            VersionBound::TooOld => f.write_str("too old"),
            VersionBound::TooNew => f.write_str("too new"),
        }
    }
}

#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum PackedIntsError {
    #[cfg_attr(
        feature = "std",
        error("Version is {bound}, should be in {min}..={max} (got {version})")
    )]
    InvalidVersion {
        version: i32,
        bound: VersionBound,
        min: i32,
        max: i32,
    },

    #[cfg_attr(
        feature = "std",
        error("{bits_per_value} bits per value is not supported by format {format:?}")
    )]
    InvalidBitsPerValue { format: Format, bits_per_value: u32 },

    #[cfg_attr(feature = "std", error("Unknown format id {0}"))]
    InvalidFormat(i32),

    #[cfg_attr(feature = "std", error("Index {0} is out of bounds for length {1}"))]
    IndexOutOfBounds(usize, usize),

    #[cfg_attr(
        feature = "std",
        error("Value {value} does not fit in {bits_per_value} bits")
    )]
    ValueOutOfRange { value: u64, bits_per_value: u32 },

    #[cfg_attr(
        feature = "std",
        error("Insufficient bytes: expected at least {expected}, found {found}")
    )]
    InsufficientBytes { expected: usize, found: usize },

    #[cfg_attr(feature = "std", error("storage error: {0}"))]
    Container(#[cfg_attr(feature = "std", from)] ContainerError),
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for PackedIntsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PackedIntsError::InvalidVersion {
                version,
                bound,
                min,
                max,
            } => write!(
                f,
                "Version is {}, should be in {}..={} (got {})",
                bound, min, max, version
            ),
            PackedIntsError::InvalidBitsPerValue {
                format,
                bits_per_value,
            } => write!(
                f,
                "{} bits per value is not supported by format {:?}",
                bits_per_value, format
            ),
            PackedIntsError::InvalidFormat(id) => write!(f, "Unknown format id {}", id),
            PackedIntsError::IndexOutOfBounds(i, l) => {
                write!(f, "Index {} is out of bounds for length {}", i, l)
            }
            PackedIntsError::ValueOutOfRange {
                value,
                bits_per_value,
            } => write!(f, "Value {} does not fit in {} bits", value, bits_per_value),
            PackedIntsError::InsufficientBytes { expected, found } => write!(
                f,
                "Insufficient bytes: expected at least {}, found {}",
                expected, found
            ),
            PackedIntsError::Container(e) => write!(f, "storage error: {}", e),
        }
    }
}

#[cfg(not(feature = "std"))]
impl From<ContainerError> for PackedIntsError {
    fn from(err: ContainerError) -> Self {
        PackedIntsError::Container(err)
    }
}

pub type Result<T> = core::result::Result<T, PackedIntsError>;
