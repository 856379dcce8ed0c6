//! A collection of offsets for variable-length data.

use std::ops::Range;

use strata_common::{Result, error::Error};

/// A collection of offsets for variable-length data.
///
/// Stores a sequence of monotonically non-decreasing offsets, where each pair of
/// adjacent offsets defines the range of a single item. The first offset is
/// always included, representing the start position of the first item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offsets(Vec<u64>);

impl Offsets {
    /// Creates a new empty `Offsets` collection.
    ///
    /// The resulting collection will have a single offset at position 0.
    pub fn new() -> Offsets {
        Self::with_capacity(0)
    }

    /// Creates a new `Offsets` collection with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Offsets {
        let mut buf = Vec::with_capacity(capacity + 1);
        buf.push(0u64);
        Offsets(buf)
    }

    /// Creates an `Offsets` collection from raw offsets.
    ///
    /// # Errors
    ///
    /// Returns an error if `offsets` is empty or not monotonically non-decreasing.
    pub fn try_from_vec(offsets: Vec<u64>) -> Result<Offsets> {
        if offsets.is_empty() {
            return Err(Error::invalid_arg("offsets", "at least one offset is required"));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::invalid_arg("offsets", "offsets must be non-decreasing"));
        }
        Ok(Offsets(offsets))
    }

    /// Returns the number of items represented by these offsets.
    ///
    /// This is one less than the number of stored offsets.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.0.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    #[inline]
    pub fn first(&self) -> u64 {
        self.0[0]
    }

    /// Returns the last offset, which marks the end of the last item.
    #[inline]
    pub fn last(&self) -> u64 {
        self.0[self.0.len() - 1]
    }

    /// Returns the range of the item at a given logical index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= item_count()`.
    #[inline]
    pub fn range_at(&self, index: usize) -> Range<u64> {
        self.0[index]..self.0[index + 1]
    }

    /// Adds a new offset to the end of the collection.
    ///
    /// # Panics
    ///
    /// Panics if `next_offset` is less than the current last offset.
    #[inline]
    pub fn push_offset(&mut self, next_offset: u64) {
        assert!(next_offset >= self.last());
        self.0.push(next_offset);
    }

    /// Adds a new offset by incrementing the last offset by the given length.
    #[inline]
    pub fn push_length(&mut self, len: usize) {
        let last = self.last();
        self.0.push(last + len as u64);
    }

    /// Appends `count` zero-sized items to the collection.
    #[inline]
    pub fn push_empty(&mut self, count: usize) {
        let last = self.last();
        self.0.resize(self.0.len() + count, last);
    }
}

impl Default for Offsets {
    fn default() -> Self {
        Self::new()
    }
}
