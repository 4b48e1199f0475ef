#[cfg(feature = "std")]
use thiserror::Error;

/// Container errors
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Out-of-bounds access
    #[cfg_attr(feature = "std", error("Index {0} out of bounds for length {1}"))]
    OutOfBounds(usize, usize),

    /// A bulk copy was given a slice of the wrong length.
    #[cfg_attr(
        feature = "std",
        error("length mismatch: expected {expected} elements, found {found}")
    )]
    LengthMismatch { expected: usize, found: usize },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContainerError::OutOfBounds(i, len) => {
                write!(f, "Index {} out of bounds for length {}", i, len)
            }
            ContainerError::LengthMismatch { expected, found } => write!(
                f,
                "length mismatch: expected {} elements, found {}",
                expected, found
            ),
        }
    }
}
