use strata_common::{Result, error::Error, result::verify_index, verify_data};
use strata_format::Kind;
use strata_sequence::{
    data_node::DataNode,
    value::{Scalar, Value},
};

/// The elements of one list value: a window of `length` consecutive entries
/// starting at `offset` in the list's flattened item node.
///
/// Local index `i` maps to item `offset + i`; indices outside `0..len()` are
/// rejected rather than read from a neighboring list.
#[derive(Debug, Clone, Copy)]
pub struct ListAccessor<'a> {
    node: &'a DataNode,
    offset: usize,
    length: usize,
}

impl<'a> ListAccessor<'a> {
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the window extends past the end of `node`.
    pub fn try_new(node: &'a DataNode, offset: usize, length: usize) -> Result<ListAccessor<'a>> {
        verify_data!(
            length,
            offset.checked_add(length).is_some_and(|end| end <= node.len())
        );
        Ok(ListAccessor {
            node,
            offset,
            length,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Position of the first element in the item node.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn item_kind(&self) -> Kind {
        self.node.kind()
    }

    pub fn is_null(&self, index: usize) -> Result<bool> {
        self.node.is_null(self.item(index)?)
    }

    /// Reads element `index` as `T`.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `index >= len()`.
    /// - `TypeMismatch` if the item kind cannot be read as `T`.
    #[inline]
    pub fn read<T: Scalar<'a>>(&self, index: usize) -> Result<T> {
        self.node.read::<T>(self.item(index)?)
    }

    /// Reads element `index` as a tagged value, or `None` if it is null.
    pub fn value(&self, index: usize) -> Result<Option<Value<'a>>> {
        self.node.value_at(self.item(index)?)
    }

    /// Returns the elements of the nested list at `index`.
    pub fn read_list(&self, index: usize) -> Result<ListAccessor<'a>> {
        if self.node.kind() != Kind::List {
            return Err(Error::schema(
                "item",
                format!("expected a list, found {}", self.node.kind()),
            ));
        }
        let (offset, length) = self.node.offset_and_length(self.item(index)?)?;
        ListAccessor::try_new(self.node.child_at(0)?, offset as usize, length as usize)
    }

    /// Iterates over the elements read as `T`.
    pub fn iter<T: Scalar<'a>>(self) -> impl Iterator<Item = Result<T>> {
        (0..self.length).map(move |i| self.read::<T>(i))
    }

    #[inline]
    fn item(&self, index: usize) -> Result<usize> {
        verify_index("list index", index as u64, self.length as u64)?;
        Ok(self.offset + index)
    }
}
