//! A collection of fixed-width values stored as bytes.

/// A collection of fixed-width values stored as little-endian bytes.
///
/// Values are read back with unaligned loads, so the buffer carries no alignment
/// requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(Vec<u8>);

impl Values {
    /// Creates a new, empty `Values` instance.
    pub fn new() -> Values {
        Values(Vec::new())
    }

    /// Wraps an existing byte buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Values {
        Values(bytes)
    }

    /// Creates a new `Values` instance with a specified byte capacity.
    pub fn with_byte_capacity(capacity: usize) -> Values {
        Values(Vec::with_capacity(capacity))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of complete elements of type `T` in the buffer.
    #[inline]
    pub fn len<T>(&self) -> usize {
        self.0.len() / std::mem::size_of::<T>()
    }

    #[inline]
    pub fn bytes_len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the element of type `T` at `index`, or `None` past the end.
    #[inline]
    pub fn get<T>(&self, index: usize) -> Option<T>
    where
        T: bytemuck::AnyBitPattern,
    {
        let size = std::mem::size_of::<T>();
        let start = index.checked_mul(size)?;
        self.0
            .get(start..start + size)
            .map(bytemuck::pod_read_unaligned)
    }

    /// Returns the byte range `start..end`, or `None` if it is out of bounds.
    #[inline]
    pub fn byte_range(&self, start: usize, end: usize) -> Option<&[u8]> {
        self.0.get(start..end)
    }

    /// Appends a value.
    #[inline]
    pub fn push<T>(&mut self, value: T)
    where
        T: bytemuck::NoUninit,
    {
        self.0.extend_from_slice(bytemuck::bytes_of(&value));
    }

    /// Appends a slice of values.
    pub fn extend_from_slice<T>(&mut self, values: &[T])
    where
        T: bytemuck::NoUninit,
    {
        self.0.extend_from_slice(bytemuck::cast_slice(values));
    }

    /// Resizes the buffer to exactly `new_len` bytes, filling any additional space
    /// with zeroes.
    pub fn resize_zeroed_bytes(&mut self, new_len: usize) {
        self.0.resize(new_len, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut values = Values::new();
        values.push(1i32);
        values.push(-2i32);
        values.push(i32::MAX);
        assert_eq!(values.len::<i32>(), 3);
        assert_eq!(values.bytes_len(), 12);
        assert_eq!(values.get::<i32>(1), Some(-2));
        assert_eq!(values.get::<i32>(2), Some(i32::MAX));
        assert_eq!(values.get::<i32>(3), None);
    }

    #[test]
    fn test_unaligned_wide_values() {
        let mut values = Values::new();
        values.push(7u8);
        values.push(i128::MIN);
        assert_eq!(values.byte_range(0, 1), Some(&[7u8][..]));
        let wide = bytemuck::pod_read_unaligned::<i128>(values.byte_range(1, 17).unwrap());
        assert_eq!(wide, i128::MIN);
    }

    #[test]
    fn test_extend_and_resize() {
        let mut values = Values::with_byte_capacity(16);
        values.extend_from_slice(&[1.5f64, 2.5]);
        assert_eq!(values.get::<f64>(1), Some(2.5));
        values.resize_zeroed_bytes(24);
        assert_eq!(values.get::<f64>(2), Some(0.0));
    }
}
