//! Owned data type trees.
//!
//! A [`DataType`] node holds a name, a [`Kind`] and an ordered list of owned
//! children. Trees are built leaves-first with ordinary constructors, and the
//! number of children is checked against [`Kind::child_arity`] at construction.

use std::fmt;

use ahash::AHashSet;
use strata_common::{Result, error::Error};

use crate::kind::{Arity, Kind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    name: String,
    kind: Kind,
    children: Vec<DataType>,
}

impl DataType {
    /// Creates a data type node, validating the children against the kind's arity.
    ///
    /// # Errors
    ///
    /// Returns a schema error if the number of children does not match the kind
    /// (0 for scalars, 1 for `List`, 2 for `Map`), or if `Struct` field names
    /// are not unique.
    pub fn try_new(name: impl Into<String>, kind: Kind, children: Vec<DataType>) -> Result<DataType> {
        let name = name.into();
        let arity = kind.child_arity();
        if !arity.accepts(children.len()) {
            let expected = match arity {
                Arity::None => "no children".to_string(),
                Arity::Exactly(n) => format!("exactly {n} children"),
                Arity::Any => unreachable!(),
            };
            return Err(Error::schema(
                &name,
                format!("{kind} requires {expected}, got {}", children.len()),
            ));
        }
        if kind == Kind::Struct {
            let mut seen = AHashSet::with_capacity(children.len());
            for child in &children {
                if !seen.insert(child.name.as_str()) {
                    return Err(Error::schema(
                        &name,
                        format!("duplicate struct field '{}'", child.name),
                    ));
                }
            }
        }
        let data_type = DataType {
            name,
            kind,
            children,
        };
        log::trace!("Construct a type {data_type}");
        Ok(data_type)
    }

    /// Creates a scalar data type node.
    pub fn primitive(name: impl Into<String>, kind: Kind) -> Result<DataType> {
        Self::try_new(name, kind, Vec::new())
    }

    /// Creates a `List` node with the given item type.
    pub fn list(name: impl Into<String>, item: DataType) -> Result<DataType> {
        Self::try_new(name, Kind::List, vec![item])
    }

    /// Creates a `Map` node with the given key and value types.
    pub fn map(name: impl Into<String>, key: DataType, value: DataType) -> Result<DataType> {
        Self::try_new(name, Kind::Map, vec![key, value])
    }

    /// Creates a `Struct` node with the given fields.
    pub fn structure(name: impl Into<String>, fields: Vec<DataType>) -> Result<DataType> {
        Self::try_new(name, Kind::Struct, fields)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn children(&self) -> &[DataType] {
        &self.children
    }

    pub fn child_at(&self, index: usize) -> Option<&DataType> {
        self.children.get(index)
    }

    /// Finds a direct child by name.
    pub fn find_child(&self, name: &str) -> Option<&DataType> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn is_primitive(&self) -> bool {
        self.kind.is_primitive()
    }

    pub fn is_fixed_width(&self) -> bool {
        self.kind.is_fixed_width()
    }

    pub fn width(&self) -> usize {
        self.kind.width()
    }

    fn fmt_kind(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::List => {
                f.write_str("list<")?;
                self.children[0].fmt_kind(f)?;
                f.write_str(">")
            }
            Kind::Map => {
                f.write_str("map<")?;
                self.children[0].fmt_kind(f)?;
                f.write_str(", ")?;
                self.children[1].fmt_kind(f)?;
                f.write_str(">")
            }
            Kind::Struct => {
                f.write_str("struct<")?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(">")
            }
            kind => write!(f, "{kind}"),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        self.fmt_kind(f)
    }
}
