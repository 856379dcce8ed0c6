//! Append-only construction of [`DataNode`]s.

use strata_common::{Result, error::Error};
use strata_format::Kind;

use crate::{
    data_node::DataNode, offsets::Offsets, presence::Presence, value::Value, values::Values,
};

/// Builds a [`DataNode`] one value slot at a time.
///
/// Scalar builders take values through [`push`](Self::push) and
/// [`push_null`](Self::push_null). Collection builders take their elements through
/// the child builder(s) and then close each row's entry with
/// [`close_entry`](Self::close_entry):
///
/// ```rust
/// use strata_format::Kind;
/// use strata_sequence::{builder::DataNodeBuilder, value::Value};
///
/// let mut tags = DataNodeBuilder::list(DataNodeBuilder::new(Kind::String).unwrap());
/// tags.item_mut().unwrap().push(Value::String("a")).unwrap();
/// tags.item_mut().unwrap().push(Value::String("b")).unwrap();
/// tags.close_entry().unwrap();
/// let node = tags.build().unwrap();
/// assert_eq!(node.offset_and_length(0).unwrap(), (0, 2));
/// ```
#[derive(Debug)]
pub struct DataNodeBuilder {
    kind: Kind,
    values: Values,
    offsets: Option<Offsets>,
    presence: Presence,
    children: Vec<DataNodeBuilder>,
}

impl DataNodeBuilder {
    /// Creates a builder for a scalar column.
    ///
    /// # Errors
    ///
    /// Returns a schema error for composite kinds; use [`list`](Self::list) or
    /// [`map`](Self::map) for those.
    pub fn new(kind: Kind) -> Result<DataNodeBuilder> {
        if !kind.is_primitive() {
            return Err(Error::schema(
                kind.name(),
                "composite columns are built with list() or map()",
            ));
        }
        Ok(Self::with_children(kind, Vec::new()))
    }

    /// Creates a builder for a `List` column with the given item builder.
    pub fn list(item: DataNodeBuilder) -> DataNodeBuilder {
        Self::with_children(Kind::List, vec![item])
    }

    /// Creates a builder for a `Map` column with the given key and value builders.
    pub fn map(key: DataNodeBuilder, value: DataNodeBuilder) -> DataNodeBuilder {
        Self::with_children(Kind::Map, vec![key, value])
    }

    fn with_children(kind: Kind, children: Vec<DataNodeBuilder>) -> DataNodeBuilder {
        DataNodeBuilder {
            kind,
            values: Values::new(),
            offsets: kind.requires_offsets().then(Offsets::new),
            presence: Presence::default(),
            children,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the number of value slots pushed so far.
    pub fn len(&self) -> usize {
        self.presence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a non-null scalar value.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if the value's kind differs from the column's.
    pub fn push(&mut self, value: Value<'_>) -> Result<()> {
        if value.kind() != self.kind {
            return Err(Error::type_mismatch(value.kind().name(), self.kind.name()));
        }
        match value {
            Value::Bool(v) => self.values.push(v as u8),
            Value::Int8(v) => self.values.push(v),
            Value::Int16(v) => self.values.push(v),
            Value::Int32(v) => self.values.push(v),
            Value::Int64(v) | Value::Timestamp(v) => self.values.push(v),
            Value::Float32(v) => self.values.push(v),
            Value::Float64(v) => self.values.push(v),
            Value::Int128(v) => self.values.push(v),
            Value::String(v) => self.push_bytes(v.as_bytes()),
            Value::Binary(v) => self.push_bytes(v),
        }
        self.presence.push_non_null();
        Ok(())
    }

    /// Appends a value, or a null for `None`.
    pub fn push_opt(&mut self, value: Option<Value<'_>>) -> Result<()> {
        match value {
            Some(value) => self.push(value),
            None => {
                self.push_null();
                Ok(())
            }
        }
    }

    /// Appends a null slot. For collections this is an empty, null entry.
    pub fn push_null(&mut self) {
        match self.offsets.as_mut() {
            Some(offsets) => offsets.push_empty(1),
            None => {
                let len = self.values.bytes_len() + self.kind.width();
                self.values.resize_zeroed_bytes(len);
            }
        }
        self.presence.push_null();
    }

    /// Returns the child builder at `index`.
    pub fn child_mut(&mut self, index: usize) -> Result<&mut DataNodeBuilder> {
        let kind = self.kind;
        self.children.get_mut(index).ok_or_else(|| {
            Error::schema(kind.name(), format!("builder has no child {index}"))
        })
    }

    /// Returns the item builder of a `List` column.
    pub fn item_mut(&mut self) -> Result<&mut DataNodeBuilder> {
        if self.kind != Kind::List {
            return Err(Error::schema(self.kind.name(), "only lists have an item builder"));
        }
        self.child_mut(0)
    }

    /// Closes the current entry of a collection column: everything pushed into the
    /// child builder(s) since the previous entry belongs to this one.
    pub fn close_entry(&mut self) -> Result<()> {
        if !matches!(self.kind, Kind::List | Kind::Map) {
            return Err(Error::schema(self.kind.name(), "only collections have entries"));
        }
        let end = self.children[0].len();
        if self.children.iter().any(|child| child.len() != end) {
            return Err(Error::invalid_arg(
                "map",
                "key and value builders must have the same length",
            ));
        }
        if let Some(offsets) = self.offsets.as_mut() {
            offsets.push_offset(end as u64);
        }
        self.presence.push_non_null();
        Ok(())
    }

    pub fn build(self) -> Result<DataNode> {
        let children = self
            .children
            .into_iter()
            .map(DataNodeBuilder::build)
            .collect::<Result<Vec<_>>>()?;
        DataNode::try_new(
            self.kind,
            self.values,
            self.offsets,
            self.presence,
            children,
        )
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.values.extend_from_slice(bytes);
        if let Some(offsets) = self.offsets.as_mut() {
            offsets.push_length(bytes.len());
        }
    }
}
