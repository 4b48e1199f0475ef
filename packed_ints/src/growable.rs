//! A mutable container whose bit width grows with the values stored in it.

use crate::error::Result;
use crate::format::{COMPACT, Format, bits_required, max_value};
use crate::reader::{
    Mutable, PackedMutable, Reader, check_index, check_range, copy, get_mutable_with_ratio,
};
use alloc::vec::Vec;

/// Fixed-size sequence that widens its storage instead of rejecting values.
///
/// Setting a value too large for the current width migrates every value
/// into a new, wider container first. The width never shrinks.
///
/// # Examples
///
/// ```
/// use packed_ints::{GrowableWriter, Mutable, Reader};
///
/// let mut w = GrowableWriter::new(1, 4).unwrap();
/// w.set(2, 500).unwrap();
///
/// assert_eq!(w.bits_per_value(), 9);
/// assert_eq!(w.get(2).unwrap(), 500);
/// assert_eq!(w.get(0).unwrap(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct GrowableWriter {
    current: PackedMutable,
    current_mask: u64,
    acceptable_overhead_ratio: f32,
}

impl GrowableWriter {
    /// Writer of `value_count` zeros starting at `start_bits_per_value`,
    /// with no padding allowed when widening.
    pub fn new(start_bits_per_value: u32, value_count: usize) -> Result<Self> {
        Self::with_overhead_ratio(start_bits_per_value, value_count, COMPACT)
    }

    /// Like [`new`](Self::new), letting every allocation trade up to
    /// `acceptable_overhead_ratio` padding for faster access.
    pub fn with_overhead_ratio(
        start_bits_per_value: u32,
        value_count: usize,
        acceptable_overhead_ratio: f32,
    ) -> Result<Self> {
        let current =
            get_mutable_with_ratio(value_count, start_bits_per_value, acceptable_overhead_ratio)?;
        Ok(GrowableWriter {
            current_mask: max_value(current.bits_per_value()),
            current,
            acceptable_overhead_ratio,
        })
    }

    /// The container currently holding the values.
    pub fn mutable(&self) -> &PackedMutable {
        &self.current
    }

    pub fn into_mutable(self) -> PackedMutable {
        self.current
    }

    fn ensure_capacity(&mut self, value: u64) -> Result<()> {
        if value & self.current_mask == value {
            return Ok(());
        }
        let from_bits = self.current.bits_per_value();
        let bits = bits_required(value).max(from_bits);
        let size = self.current.size();
        let mut next = get_mutable_with_ratio(size, bits, self.acceptable_overhead_ratio)?;
        copy(&self.current, 0, &mut next, 0, size)?;
        tracing::debug!(
            from_bits,
            to_bits = next.bits_per_value(),
            format = ?next.format(),
            size,
            "growable writer widened"
        );
        self.current_mask = max_value(next.bits_per_value());
        self.current = next;
        Ok(())
    }

    /// A writer of `new_size` values with the same width and ratio, holding
    /// the common prefix of this one's values. Added slots are 0.
    pub fn resize(&self, new_size: usize) -> Result<GrowableWriter> {
        let mut next = GrowableWriter::with_overhead_ratio(
            self.current.bits_per_value(),
            new_size,
            self.acceptable_overhead_ratio,
        )?;
        let limit = self.size().min(new_size);
        copy(&self.current, 0, &mut next.current, 0, limit)?;
        tracing::debug!(
            from = self.size(),
            to = new_size,
            bits_per_value = next.bits_per_value(),
            "growable writer resized"
        );
        Ok(next)
    }
}

impl Reader for GrowableWriter {
    fn get(&self, index: usize) -> Result<u64> {
        self.current.get(index)
    }

    fn size(&self) -> usize {
        self.current.size()
    }

    fn bulk_get(&self, index: usize, out: &mut [u64]) -> Result<usize> {
        self.current.bulk_get(index, out)
    }
}

impl Mutable for GrowableWriter {
    fn bits_per_value(&self) -> u32 {
        self.current.bits_per_value()
    }

    fn format(&self) -> Format {
        self.current.format()
    }

    /// Never fails with `ValueOutOfRange`; widens instead.
    fn set(&mut self, index: usize, value: u64) -> Result<()> {
        check_index(index, self.size())?;
        self.ensure_capacity(value)?;
        self.current.set(index, value)
    }

    fn bulk_set(&mut self, index: usize, values: &[u64]) -> Result<usize> {
        check_index(index, self.size())?;
        let n = values.len().min(self.size() - index);
        // same width as the largest value
        let widest = values[..n].iter().fold(0u64, |acc, &v| acc | v);
        self.ensure_capacity(widest)?;
        self.current.bulk_set(index, &values[..n])
    }

    fn fill(&mut self, from: usize, to: usize, value: u64) -> Result<()> {
        check_range(from, to, self.size())?;
        self.ensure_capacity(value)?;
        self.current.fill(from, to, value)
    }

    fn clear(&mut self) {
        self.current.clear()
    }

    fn to_bytes(&self, version: i32) -> Result<Vec<u8>> {
        self.current.to_bytes(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackedIntsError;
    use crate::format::{FAST, FASTEST};

    #[test]
    fn grows_on_demand() {
        let mut w = GrowableWriter::new(1, 4).unwrap();
        assert_eq!(w.bits_per_value(), 1);
        w.set(1, 1).unwrap();
        assert_eq!(w.bits_per_value(), 1);

        w.set(2, 500).unwrap();
        assert_eq!(w.bits_per_value(), 9);
        assert_eq!(w.format(), Format::Packed);
        assert_eq!(w.iter().collect::<Vec<_>>(), [0, 1, 500, 0]);
    }

    #[test]
    fn width_never_shrinks() {
        let mut w = GrowableWriter::new(1, 3).unwrap();
        w.set(0, 1 << 40).unwrap();
        assert_eq!(w.bits_per_value(), 41);
        w.set(0, 0).unwrap();
        w.clear();
        assert_eq!(w.bits_per_value(), 41);
        w.set(1, u64::MAX).unwrap();
        assert_eq!(w.bits_per_value(), 64);
        assert_eq!(w.get(1).unwrap(), u64::MAX);
    }

    #[test]
    fn index_errors_do_not_migrate() {
        let mut w = GrowableWriter::new(2, 4).unwrap();
        assert_eq!(
            w.set(4, 1000),
            Err(PackedIntsError::IndexOutOfBounds(4, 4))
        );
        assert_eq!(w.bits_per_value(), 2);
        assert!(w.fill(1, 5, 1000).is_err());
        assert_eq!(w.bits_per_value(), 2);
    }

    #[test]
    fn ratio_allows_faster_layouts() {
        let mut w = GrowableWriter::with_overhead_ratio(1, 10, FASTEST).unwrap();
        assert_eq!(w.bits_per_value(), 8);
        w.set(0, 300).unwrap();
        assert_eq!(w.bits_per_value(), 16);

        let mut w = GrowableWriter::with_overhead_ratio(1, 10, FAST).unwrap();
        w.set(9, (1 << 20) - 1).unwrap();
        assert_eq!(w.format(), Format::PackedSingleBlock);
        assert_eq!(w.bits_per_value(), 21);
    }

    #[test]
    fn fill_and_bulk_set_widen() {
        let mut w = GrowableWriter::new(1, 100).unwrap();
        w.fill(10, 90, 77).unwrap();
        assert_eq!(w.bits_per_value(), 7);
        assert_eq!(w.bulk_set(95, &[1, 2, 3, 4, 5, 6]).unwrap(), 5);
        w.bulk_set(0, &[1 << 12]).unwrap();
        assert_eq!(w.bits_per_value(), 13);
        assert_eq!(w.get(0).unwrap(), 1 << 12);
        assert_eq!(w.get(50).unwrap(), 77);
        assert_eq!(w.get(99).unwrap(), 5);
    }

    #[test]
    fn resize_keeps_prefix() {
        let mut w = GrowableWriter::new(1, 5).unwrap();
        for i in 0..5 {
            w.set(i, i as u64 * 100).unwrap();
        }
        let bigger = w.resize(8).unwrap();
        assert_eq!(bigger.size(), 8);
        assert_eq!(bigger.bits_per_value(), w.bits_per_value());
        assert_eq!(bigger.iter().collect::<Vec<_>>(), [0, 100, 200, 300, 400, 0, 0, 0]);

        let smaller = w.resize(2).unwrap();
        assert_eq!(smaller.iter().collect::<Vec<_>>(), [0, 100]);
    }

    #[test]
    fn bytes_match_underlying_mutable() {
        let mut w = GrowableWriter::new(3, 9).unwrap();
        w.set(8, 1023).unwrap();
        let bytes = w.to_bytes(1).unwrap();
        assert_eq!(bytes, w.mutable().to_bytes(1).unwrap());
        assert_eq!(bytes.len(), 12);
    }
}
