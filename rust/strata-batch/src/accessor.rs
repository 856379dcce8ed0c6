//! Row-oriented reads over a columnar [`Batch`].
//!
//! [`Row`] is a position in a batch: the row id plus the row's packed word,
//! fetched once when the row is entered. Reads of a non-null field first try to
//! decode it from the packed word and fall back to the field's column otherwise;
//! both paths produce the same value for every field that has both.
//!
//! [`RowAccessor`] is the cursor form of the same thing, for callers that walk a
//! batch by repositioning a single accessor.

use std::convert::Infallible;

use strata_common::{Result, error::Error};
use strata_format::Kind;
use strata_sequence::{
    data_node::DataNode,
    value::{Scalar, Value},
};

use crate::{batch::Batch, list::ListAccessor};

/// A positioned row of a batch.
///
/// `Row` is a small `Copy` value; it borrows the batch and does not mutate it, so
/// any number of rows may be read concurrently from different threads.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    batch: &'a Batch,
    id: usize,
    word: u64,
}

impl<'a> Row<'a> {
    pub(crate) fn new(batch: &'a Batch, id: usize, word: u64) -> Row<'a> {
        Row { batch, id, word }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn batch(&self) -> &'a Batch {
        self.batch
    }

    /// The row's packed word, if the batch has packed storage.
    pub fn packed_word(&self) -> Option<u64> {
        self.batch.packed().map(|_| self.word)
    }

    /// Returns `true` if `field` is null in this row.
    pub fn is_null(&self, field: &str) -> Result<bool> {
        self.batch.column(field)?.is_null(self.id)
    }

    /// Reads `field` as `T`, decoding it from the packed word when the field is
    /// packed and not null in this row. A null slot reads as the column's zero
    /// value on both paths.
    ///
    /// # Errors
    ///
    /// - `FieldNotFound` if the batch has no such field.
    /// - `TypeMismatch` if the field's kind cannot be read as `T`.
    #[inline]
    pub fn read<T: Scalar<'a>>(&self, field: &str) -> Result<T> {
        let column = self.batch.column(field)?;
        if let Some(value) = self.decode_packed(field, column)? {
            return value.get::<T>();
        }
        column.read::<T>(self.id)
    }

    /// Reads `field` as `T` from its column, bypassing the packed word.
    pub fn read_unpacked<T: Scalar<'a>>(&self, field: &str) -> Result<T> {
        self.batch.column(field)?.read::<T>(self.id)
    }

    /// Reads `field` as a tagged value, or `None` if it is null in this row.
    pub fn value(&self, field: &str) -> Result<Option<Value<'a>>> {
        let column = self.batch.column(field)?;
        if let Some(value) = self.decode_packed(field, column)? {
            return Ok(Some(value));
        }
        column.value_at(self.id)
    }

    /// Returns the element window of the list `field` in this row.
    ///
    /// # Errors
    ///
    /// - `FieldNotFound` if the batch has no such field.
    /// - `SchemaError` if the field is not a list with a single item child.
    pub fn read_list(&self, field: &str) -> Result<ListAccessor<'a>> {
        let node = self.batch.column(field)?;
        if node.kind() != Kind::List || node.child_count() != 1 {
            return Err(Error::schema(
                field,
                format!(
                    "expected a list with one item child, found {} with {} children",
                    node.kind(),
                    node.child_count()
                ),
            ));
        }
        let (offset, length) = node.offset_and_length(self.id)?;
        ListAccessor::try_new(node.child_at(0)?, offset as usize, length as usize)
    }

    /// Map reads are not supported; this always fails with `Unsupported`.
    pub fn read_map(&self, field: &str) -> Result<Infallible> {
        Err(Error::unsupported(format!("reading map field {field}")))
    }

    /// Decodes `field` from the packed word. Nulls are never packed: a null slot
    /// yields `None` so the caller reads it from the column.
    #[inline]
    fn decode_packed(&self, field: &str, column: &DataNode) -> Result<Option<Value<'a>>> {
        let Some(packed) = self.batch.packed() else {
            return Ok(None);
        };
        if column.is_null(self.id)? {
            return Ok(None);
        }
        Ok(packed.decode(field, self.word))
    }
}

/// Cursor over the rows of a batch.
///
/// An accessor starts unpositioned; every read before the first successful
/// [`seek`](Self::seek) fails with `NotPositioned`. A failed seek leaves the
/// previous position in place.
#[derive(Debug, Clone)]
pub struct RowAccessor<'a> {
    batch: &'a Batch,
    row: Option<Row<'a>>,
}

impl<'a> RowAccessor<'a> {
    pub fn new(batch: &'a Batch) -> RowAccessor<'a> {
        RowAccessor { batch, row: None }
    }

    /// Positions the accessor on `row_id`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `row_id` is not a row of the batch.
    pub fn seek(&mut self, row_id: usize) -> Result<&mut Self> {
        self.row = Some(self.batch.row(row_id)?);
        Ok(self)
    }

    /// The current row id, if positioned.
    pub fn position(&self) -> Option<usize> {
        self.row.map(|row| row.id())
    }

    /// The current row.
    pub fn row(&self) -> Result<Row<'a>> {
        self.row.ok_or_else(Error::not_positioned)
    }

    pub fn is_null(&self, field: &str) -> Result<bool> {
        self.row()?.is_null(field)
    }

    pub fn read<T: Scalar<'a>>(&self, field: &str) -> Result<T> {
        self.row()?.read(field)
    }

    pub fn read_unpacked<T: Scalar<'a>>(&self, field: &str) -> Result<T> {
        self.row()?.read_unpacked(field)
    }

    pub fn value(&self, field: &str) -> Result<Option<Value<'a>>> {
        self.row()?.value(field)
    }

    pub fn read_list(&self, field: &str) -> Result<ListAccessor<'a>> {
        self.row()?.read_list(field)
    }

    pub fn read_map(&self, field: &str) -> Result<Infallible> {
        self.row()?.read_map(field)
    }
}
