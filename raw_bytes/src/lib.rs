//! Fixed-length, zero-initialised storage for plain-old-data blocks.
//!
//! `Container<T>` is the owned backing store of the packed integer
//! containers: a flat run of `T` that never grows after construction and
//! can always be viewed as raw bytes.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
pub use std::vec::Vec;

#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;

pub mod container;
pub mod error;

pub use container::Container;
pub use error::ContainerError;
