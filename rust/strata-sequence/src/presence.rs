//! Validity (null) tracking for the values in a column.

/// Validity information for the values of a column.
///
/// This enum provides three different storage methods for tracking null/non-null values:
/// - `Trivial`: All values are valid (non-null) - most memory efficient for non-null data
/// - `Nulls`: All values are null - memory efficient for all-null data
/// - `Bytes`: Mixed null/non-null values using a byte array (1=present, 0=null)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// All values are valid (present).
    Trivial(usize),

    /// All values are null.
    Nulls(usize),

    /// Presence encoded as byte array, where a byte at position `i` indicates whether
    /// the value at position `i` is valid or not (`1` - value is present, `0` - value
    /// is null).
    Bytes(Vec<u8>),
}

impl Presence {
    /// Returns the number of values tracked, regardless of whether they are null.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Trivial(len) => *len,
            Self::Nulls(len) => *len,
            Self::Bytes(presence) => presence.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of null values.
    pub fn count_nulls(&self) -> usize {
        match self {
            Self::Trivial(_) => 0,
            Self::Nulls(len) => *len,
            Self::Bytes(presence) => presence.iter().filter(|&&b| b == 0).count(),
        }
    }

    /// Returns `true` if the value at the specified index is null.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds of a `Bytes` presence.
    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        match self {
            Self::Trivial(_) => false,
            Self::Nulls(_) => true,
            Self::Bytes(presence) => presence[index] == 0,
        }
    }

    /// Returns `true` if the value at the specified index is valid (not null).
    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        !self.is_null(index)
    }

    /// Pushes a null value.
    pub fn push_null(&mut self) {
        match self {
            Presence::Trivial(len) => {
                if *len > 0 {
                    let mut presence = Vec::with_capacity(*len + 1);
                    presence.resize(*len, 1u8);
                    presence.push(0);
                    *self = Presence::Bytes(presence);
                } else {
                    *self = Presence::Nulls(1);
                }
            }
            Presence::Nulls(len) => *len += 1,
            Presence::Bytes(presence) => presence.push(0),
        }
    }

    /// Pushes a non-null value.
    pub fn push_non_null(&mut self) {
        match self {
            Presence::Trivial(len) => *len += 1,
            Presence::Nulls(len) => {
                let mut presence = Vec::with_capacity(*len + 1);
                presence.resize(*len, 0u8);
                presence.push(1);
                *self = Presence::Bytes(presence);
            }
            Presence::Bytes(presence) => presence.push(1),
        }
    }
}

impl Default for Presence {
    fn default() -> Self {
        Presence::Trivial(0)
    }
}
