//! Column batches.

use ahash::AHashMap;
use strata_common::{
    Result,
    error::{Error, ErrorKind},
    result::verify_index,
};
use strata_format::DataType;
use strata_sequence::data_node::DataNode;

use crate::{
    accessor::{Row, RowAccessor},
    packed::PackedRows,
};

/// A fixed number of rows stored column-wise: one [`DataNode`] per field, and
/// optionally one packed word per row for the dimension fields.
///
/// A batch is immutable once built and can be shared by any number of readers.
#[derive(Debug)]
pub struct Batch {
    rows: usize,
    columns: AHashMap<String, DataNode>,
    packed: Option<PackedRows>,
}

impl Batch {
    /// Creates a batch of `rows` rows.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a field name appears twice.
    /// - `InvalidFormat` if a column does not hold exactly `rows` values, or the
    ///   packed store is too short for `rows` words.
    /// - `SchemaError` if a packed field has no column, or decodes to a kind other
    ///   than its column's.
    pub fn try_new(
        rows: usize,
        columns: impl IntoIterator<Item = (String, DataNode)>,
        packed: Option<PackedRows>,
    ) -> Result<Batch> {
        let mut map = AHashMap::new();
        for (name, node) in columns {
            if node.len() != rows {
                return Err(ErrorKind::InvalidFormat {
                    element: format!("column {name}"),
                    message: format!("{} values in a batch of {rows} rows", node.len()),
                }
                .into());
            }
            if map.insert(name.clone(), node).is_some() {
                return Err(Error::invalid_arg("columns", format!("duplicate field {name}")));
            }
        }

        if let Some(packed) = &packed {
            let required = rows
                .checked_mul(packed.word_bits())
                .ok_or_else(|| Error::invalid_format("packed store size"))?;
            if packed.store().len() < required {
                return Err(ErrorKind::InvalidFormat {
                    element: "packed store".to_string(),
                    message: format!(
                        "{} bits, {rows} words of {} bits need {required}",
                        packed.store().len(),
                        packed.word_bits()
                    ),
                }
                .into());
            }
            for field in packed.layout().fields() {
                let column = map
                    .get(field)
                    .ok_or_else(|| Error::schema(field, "packed field has no column"))?;
                if let Some(kind) = packed.kind(field)
                    && kind != column.kind()
                {
                    return Err(Error::schema(
                        field,
                        format!("packed as {kind}, stored as {}", column.kind()),
                    ));
                }
            }
        }

        log::debug!(
            "batch: {rows} rows, {} columns, packed word of {} bits",
            map.len(),
            packed.as_ref().map_or(0, PackedRows::word_bits)
        );
        Ok(Batch {
            rows,
            columns: map,
            packed,
        })
    }

    pub fn builder(rows: usize) -> BatchBuilder {
        BatchBuilder::new(rows)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the column of `field`.
    ///
    /// # Errors
    ///
    /// Returns `FieldNotFound` if the batch has no such field.
    #[inline]
    pub fn column(&self, field: &str) -> Result<&DataNode> {
        self.columns
            .get(field)
            .ok_or_else(|| Error::field_not_found(field))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    /// Field names in lexicographic order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names = self.columns.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    #[inline]
    pub fn packed(&self) -> Option<&PackedRows> {
        self.packed.as_ref()
    }

    /// Describes the batch as a `Struct` type named `name` with one child per field,
    /// in field name order.
    pub fn schema(&self, name: &str) -> Result<DataType> {
        let fields = self
            .field_names()
            .into_iter()
            .map(|field| self.columns[field].data_type(field))
            .collect::<Result<Vec<_>>>()?;
        DataType::structure(name, fields)
    }

    /// Positions on `row_id`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `row_id >= rows()`.
    pub fn row(&self, row_id: usize) -> Result<Row<'_>> {
        verify_index("row id", row_id as u64, self.rows as u64)?;
        let word = match &self.packed {
            Some(packed) => packed.word(row_id)?,
            None => 0,
        };
        Ok(Row::new(self, row_id, word))
    }

    /// Returns an unpositioned accessor over this batch.
    pub fn accessor(&self) -> RowAccessor<'_> {
        RowAccessor::new(self)
    }
}

/// Assembles a [`Batch`] from prebuilt columns.
#[derive(Debug)]
pub struct BatchBuilder {
    rows: usize,
    columns: Vec<(String, DataNode)>,
    packed: Option<PackedRows>,
}

impl BatchBuilder {
    pub fn new(rows: usize) -> BatchBuilder {
        BatchBuilder {
            rows,
            columns: Vec::new(),
            packed: None,
        }
    }

    pub fn column(mut self, name: impl Into<String>, node: DataNode) -> Self {
        self.columns.push((name.into(), node));
        self
    }

    pub fn packed(mut self, packed: PackedRows) -> Self {
        self.packed = Some(packed);
        self
    }

    pub fn build(self) -> Result<Batch> {
        Batch::try_new(self.rows, self.columns, self.packed)
    }
}
