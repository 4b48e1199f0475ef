//! # packed_ints
//!
//! A `no_std` compatible codec for arrays of small non-negative integers,
//! each stored in a fixed number of bits.
//!
//! Two layouts are supported, see [`Format`]: a continuous bit stream
//! (`Packed`) and whole values per 64-bit block (`PackedSingleBlock`).
//! Buffers carry no header; callers persist the format, [`Version`], value
//! count and width next to them.
//!
//! ```rust
//! use packed_ints::{Format, GrowableWriter, Mutable, Reader, Version, decode, encode};
//!
//! // Whole sequences
//! let values = [3u64, 1, 4, 1, 5, 9, 2, 6];
//! let bytes = encode(Format::Packed, Version::CURRENT.id(), 4, &values).unwrap();
//! assert_eq!(bytes.len(), 4);
//! assert_eq!(decode(Format::Packed, Version::CURRENT.id(), 4, &bytes, 8).unwrap(), values);
//!
//! // Random access with on-demand widening
//! let mut w = GrowableWriter::new(1, 1000).unwrap();
//! w.set(10, 1).unwrap();
//! w.set(20, 70_000).unwrap();
//! assert_eq!(w.bits_per_value(), 17);
//! assert_eq!(w.get(10).unwrap(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub use error::{PackedIntsError, Result, VersionBound};

pub mod version;
pub use version::{CODEC_NAME, Version, check_version};

pub mod format;
pub use format::{
    COMPACT, DEFAULT, FAST, FASTEST, Format, FormatAndBits, SINGLE_BLOCK_BITS, bits_required,
    max_value,
};

#[doc(hidden)]
pub mod bit_ops;

pub mod bulk;
pub use bulk::{
    BulkOperation, PackedIntsDecoder, PackedIntsEncoder, PackedIntsMeta, decode, decode_into,
    encode, encode_into, get_decoder, get_encoder,
};

pub mod reader;
pub use reader::{
    DEFAULT_COPY_BUFFER_SIZE, Mutable, PackedMutable, Reader, copy, copy_with_buffer_size,
    get_mutable, get_mutable_with_ratio, get_reader,
};

mod packed64;
pub use packed64::Packed64;

mod single_block;
pub use single_block::Packed64SingleBlock;

pub mod growable;
pub use growable::GrowableWriter;
