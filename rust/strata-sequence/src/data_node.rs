//! Storage for a single column.

use strata_common::{Result, error::Error, result::verify_index, verify_data};
use strata_format::{DataType, Kind};

use crate::{
    offsets::Offsets,
    presence::Presence,
    value::{Scalar, Value},
    values::Values,
};

/// Storage for the values of one column.
///
/// - Fixed-width scalar kinds keep `len * width` bytes in `values` and no offsets.
///   `Boolean` values take one byte each.
/// - `String` and `Binary` keep concatenated bytes in `values`, with the value at
///   index `i` occupying `offsets[i]..offsets[i + 1]`.
/// - `List` and `Map` keep no values of their own. `offsets[i]..offsets[i + 1]` is
///   the window of the row's elements in the flattened child node(s): one `item`
///   child for `List`, a `key` and a `value` child of equal length for `Map`.
///
/// Null slots still occupy a (zeroed or empty) value slot, so positions in
/// `values` and `offsets` always line up with positions in `presence`.
#[derive(Debug, Clone)]
pub struct DataNode {
    kind: Kind,
    values: Values,
    offsets: Option<Offsets>,
    presence: Presence,
    children: Vec<DataNode>,
}

impl DataNode {
    /// Creates a node from its parts, validating that they are consistent.
    ///
    /// # Errors
    ///
    /// - `Unsupported` for `Struct` nodes: struct fields are stored as separate columns.
    /// - `SchemaError` if the number of children does not match the kind.
    /// - `InvalidFormat` if offsets, values and presence disagree on the length,
    ///   or offsets point past the end of the values or child nodes.
    pub fn try_new(
        kind: Kind,
        values: Values,
        offsets: Option<Offsets>,
        presence: Presence,
        children: Vec<DataNode>,
    ) -> Result<DataNode> {
        if kind == Kind::Struct {
            return Err(Error::unsupported(
                "struct nodes; store struct fields as separate columns",
            ));
        }
        if !kind.child_arity().accepts(children.len()) {
            return Err(Error::schema(
                kind.name(),
                format!("unexpected number of child nodes: {}", children.len()),
            ));
        }
        verify_data!(offsets, offsets.is_some() == kind.requires_offsets());

        let len = presence.len();
        if let Some(offsets) = offsets.as_ref() {
            verify_data!(offsets, offsets.item_count() == len);
        }
        match kind {
            Kind::String | Kind::Binary => {
                let end = offsets.as_ref().map_or(0, Offsets::last);
                verify_data!(values, end as usize <= values.bytes_len());
            }
            Kind::List | Kind::Map => {
                verify_data!(values, values.is_empty());
                let end = offsets.as_ref().map_or(0, Offsets::last);
                verify_data!(children, children.iter().all(|c| end as usize <= c.len()));
                if kind == Kind::Map {
                    verify_data!(children, children[0].len() == children[1].len());
                }
            }
            _ => {
                verify_data!(values, values.bytes_len() == len * kind.width());
            }
        }

        Ok(DataNode {
            kind,
            values,
            offsets,
            presence,
            children,
        })
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the number of value slots, null or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.presence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn values(&self) -> &Values {
        &self.values
    }

    #[inline]
    pub fn offsets(&self) -> Option<&Offsets> {
        self.offsets.as_ref()
    }

    #[inline]
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the child node at `index`: the `item` of a list, or the `key` (0)
    /// and `value` (1) of a map.
    pub fn child_at(&self, index: usize) -> Result<&DataNode> {
        self.children.get(index).ok_or_else(|| {
            Error::schema(
                self.kind.name(),
                format!("node has {} children, no child {index}", self.children.len()),
            )
        })
    }

    /// Returns `true` if the value at `index` is null.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        self.verify_index(index)?;
        Ok(self.presence.is_null(index))
    }

    /// Reads the value at `index` as `T`.
    ///
    /// A null slot reads as the zero value of its kind (empty for strings and
    /// binaries); check [`is_null`](Self::is_null) to tell nulls apart.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `index >= len()`.
    /// - `TypeMismatch` if the node's kind cannot be read as `T`.
    pub fn read<'a, T: Scalar<'a>>(&'a self, index: usize) -> Result<T> {
        self.verify_index(index)?;
        if !T::accepts(self.kind) {
            return Err(Error::type_mismatch(T::KIND.name(), self.kind.name()));
        }
        T::read_at(self, index)
    }

    /// Reads the value at `index` as a tagged [`Value`], or `None` for a null slot.
    pub fn value_at(&self, index: usize) -> Result<Option<Value<'_>>> {
        if self.is_null(index)? {
            return Ok(None);
        }
        let value = match self.kind {
            Kind::Boolean => Value::Bool(self.read(index)?),
            Kind::Int8 => Value::Int8(self.read(index)?),
            Kind::Int16 => Value::Int16(self.read(index)?),
            Kind::Int32 => Value::Int32(self.read(index)?),
            Kind::Int64 => Value::Int64(self.read(index)?),
            Kind::Float32 => Value::Float32(self.read(index)?),
            Kind::Float64 => Value::Float64(self.read(index)?),
            Kind::Int128 => Value::Int128(self.read(index)?),
            Kind::String => Value::String(self.read(index)?),
            Kind::Binary => Value::Binary(self.read(index)?),
            Kind::Timestamp => Value::Timestamp(self.read(index)?),
            Kind::List | Kind::Map | Kind::Struct => {
                return Err(Error::type_mismatch("scalar", self.kind.name()));
            }
        };
        Ok(Some(value))
    }

    /// Returns the `(offset, length)` window of the collection at `index` in the
    /// flattened child node(s).
    ///
    /// # Errors
    ///
    /// Returns a schema error for nodes that are not `List` or `Map`.
    pub fn offset_and_length(&self, index: usize) -> Result<(u64, u64)> {
        if !matches!(self.kind, Kind::List | Kind::Map) {
            return Err(Error::schema(
                self.kind.name(),
                "offset and length are only defined for collections",
            ));
        }
        self.verify_index(index)?;
        let range = self
            .offsets
            .as_ref()
            .ok_or_else(|| Error::invalid_format("offsets"))?
            .range_at(index);
        Ok((range.start, range.end - range.start))
    }

    /// Builds the data type tree describing this node, named `name`.
    pub fn data_type(&self, name: &str) -> Result<DataType> {
        match self.kind {
            Kind::List => DataType::list(name, self.children[0].data_type("item")?),
            Kind::Map => DataType::map(
                name,
                self.children[0].data_type("key")?,
                self.children[1].data_type("value")?,
            ),
            kind => DataType::primitive(name, kind),
        }
    }

    pub(crate) fn bytes_at(&self, index: usize) -> Result<&[u8]> {
        let range = self
            .offsets
            .as_ref()
            .ok_or_else(|| Error::invalid_format("offsets"))?
            .range_at(index);
        self.values
            .byte_range(range.start as usize, range.end as usize)
            .ok_or_else(|| Error::invalid_format(format!("{} values", self.kind)))
    }

    #[inline]
    fn verify_index(&self, index: usize) -> Result<()> {
        verify_index("index", index as u64, self.len() as u64)
    }
}
