//! Fixed-width bit field storage.
//!
//! [`BitArray`] is an immutable, flat array of bits with LSB-first ordering: bit `i`
//! lives in byte `i / 8` at position `i % 8`. It is used to hold one fixed-width
//! packed word per row, where a word of `w` bits for row `r` occupies the bit range
//! `r * w..(r + 1) * w`. Words are read back as unsigned integers of up to 64 bits.
//!
//! ```rust
//! use strata_bits::bitpacking::BitArrayBuilder;
//!
//! let mut builder = BitArrayBuilder::new();
//! builder.push_bits(0b101, 3);
//! builder.push_bits(0b11, 2);
//! let bits = builder.build();
//! assert_eq!(bits.len(), 5);
//! assert_eq!(bits.read_bits(0, 3).unwrap(), 0b101);
//! assert_eq!(bits.read_bits(3, 2).unwrap(), 0b11);
//! ```

use strata_common::{Result, error::Error};

/// Maximum width of a single bit field read.
pub const MAX_FIELD_BITS: usize = 64;

/// Immutable LSB-first array of bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitArray {
    bytes: Vec<u8>,
    len: usize,
}

impl BitArray {
    /// Creates an empty bit array.
    pub fn new() -> BitArray {
        BitArray::default()
    }

    /// Wraps existing LSB-first packed bytes holding `len` bits.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is too short to hold `len` bits.
    pub fn from_bytes(bytes: Vec<u8>, len: usize) -> Result<BitArray> {
        if len.div_ceil(8) > bytes.len() {
            return Err(Error::invalid_arg(
                "len",
                format!("{len} bits do not fit into {} bytes", bytes.len()),
            ));
        }
        Ok(BitArray { bytes, len })
    }

    /// Returns the number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the underlying packed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        Ok(self.read_bits(index, 1)? != 0)
    }

    /// Reads `width` bits starting at bit `offset` as an unsigned integer.
    ///
    /// The first bit read becomes the least significant bit of the result.
    /// A `width` of zero reads nothing and returns `0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` exceeds 64 bits or the range runs past the
    /// end of the array.
    pub fn read_bits(&self, offset: usize, width: usize) -> Result<u64> {
        if width > MAX_FIELD_BITS {
            return Err(Error::invalid_arg(
                "width",
                format!("bit field of {width} bits exceeds {MAX_FIELD_BITS}"),
            ));
        }
        let end = offset
            .checked_add(width)
            .ok_or_else(|| Error::out_of_range("bit offset", offset as u64, self.len as u64))?;
        if end > self.len {
            return Err(Error::out_of_range("bit offset", end as u64, self.len as u64 + 1));
        }
        if width == 0 {
            return Ok(0);
        }
        Ok(self.read_bits_unchecked(offset, width))
    }

    #[inline]
    fn read_bits_unchecked(&self, offset: usize, width: usize) -> u64 {
        let start = offset / 8;
        let shift = offset % 8;
        let mask = if width == MAX_FIELD_BITS {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };

        if let Some(chunk) = self.bytes.get(start..start + 16) {
            let mut buf = [0u8; 16];
            buf.copy_from_slice(chunk);
            return (u128::from_le_bytes(buf) >> shift) as u64 & mask;
        }

        // Tail of the array: assemble byte by byte.
        let mut result = 0u64;
        let mut produced = 0;
        let mut pos = offset;
        while produced < width {
            let bit = pos % 8;
            let take = (8 - bit).min(width - produced);
            let chunk = (self.bytes[pos / 8] >> bit) as u64 & ((1u64 << take) - 1);
            result |= chunk << produced;
            produced += take;
            pos += take;
        }
        result
    }
}

/// Append-only builder for a [`BitArray`].
#[derive(Debug, Default)]
pub struct BitArrayBuilder {
    bytes: Vec<u8>,
    len: usize,
}

impl BitArrayBuilder {
    pub fn new() -> BitArrayBuilder {
        BitArrayBuilder::default()
    }

    /// Creates a builder with space reserved for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> BitArrayBuilder {
        BitArrayBuilder {
            bytes: Vec::with_capacity(capacity.div_ceil(8)),
            len: 0,
        }
    }

    /// Returns the number of bits pushed so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends the low `width` bits of `value`, least significant bit first.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds 64 or `value` does not fit into `width` bits.
    pub fn push_bits(&mut self, value: u64, width: usize) {
        assert!(width <= MAX_FIELD_BITS);
        assert!(width == MAX_FIELD_BITS || value >> width == 0);
        let mut pos = self.len;
        let mut consumed = 0;
        self.bytes.resize((self.len + width).div_ceil(8), 0);
        while consumed < width {
            let bit = pos % 8;
            let take = (8 - bit).min(width - consumed);
            let chunk = ((value >> consumed) & ((1u64 << take) - 1)) as u8;
            self.bytes[pos / 8] |= chunk << bit;
            consumed += take;
            pos += take;
        }
        self.len += width;
    }

    /// Appends a single bit.
    pub fn push(&mut self, bit: bool) {
        self.push_bits(bit as u64, 1);
    }

    pub fn build(self) -> BitArray {
        BitArray {
            bytes: self.bytes,
            len: self.len,
        }
    }
}
