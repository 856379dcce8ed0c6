//! The closed enumeration of value kinds and their static traits.

use std::fmt;

/// All value kinds supported by strata.
///
/// Scalar kinds are stored directly in a column; `List`, `Map` and `Struct` are
/// composite kinds whose values live in child columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    Boolean = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    Float32 = 6,
    Float64 = 7,
    String = 8,
    Binary = 9,
    Timestamp = 10,
    List = 11,
    Map = 12,
    Struct = 13,
    Int128 = 14,
}

/// Static per-kind metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindTraits {
    pub kind: Kind,
    /// `true` for scalar kinds stored directly in a column.
    pub primitive: bool,
    /// Value width in bytes, `0` for variable-length and composite kinds.
    pub width: usize,
    pub name: &'static str,
}

const fn traits(kind: Kind, primitive: bool, width: usize, name: &'static str) -> KindTraits {
    KindTraits {
        kind,
        primitive,
        width,
        name,
    }
}

static KIND_TRAITS: [KindTraits; 14] = [
    traits(Kind::Boolean, true, 1, "BOOLEAN"),
    traits(Kind::Int8, true, 1, "TINYINT"),
    traits(Kind::Int16, true, 2, "SMALLINT"),
    traits(Kind::Int32, true, 4, "INTEGER"),
    traits(Kind::Int64, true, 8, "BIGINT"),
    traits(Kind::Float32, true, 4, "REAL"),
    traits(Kind::Float64, true, 8, "DOUBLE"),
    traits(Kind::String, true, 0, "VARCHAR"),
    traits(Kind::Binary, true, 0, "VARBINARY"),
    traits(Kind::Timestamp, true, 8, "TIMESTAMP"),
    traits(Kind::List, false, 0, "ARRAY"),
    traits(Kind::Map, false, 0, "MAP"),
    traits(Kind::Struct, false, 0, "STRUCT"),
    traits(Kind::Int128, true, 16, "INT128"),
];

/// Number of child `DataType` nodes a kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Scalar kinds have no children.
    None,
    /// `List` has exactly one item child, `Map` exactly a key and a value child.
    Exactly(usize),
    /// `Struct` takes any number of named fields.
    Any,
}

impl Arity {
    /// Returns `true` if `count` children satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::None => count == 0,
            Arity::Exactly(n) => count == *n,
            Arity::Any => true,
        }
    }
}

impl Kind {
    /// All kinds, in declaration order.
    pub const ALL: [Kind; 14] = [
        Kind::Boolean,
        Kind::Int8,
        Kind::Int16,
        Kind::Int32,
        Kind::Int64,
        Kind::Float32,
        Kind::Float64,
        Kind::String,
        Kind::Binary,
        Kind::Timestamp,
        Kind::List,
        Kind::Map,
        Kind::Struct,
        Kind::Int128,
    ];

    /// Returns the static traits of this kind.
    #[inline]
    pub fn traits(&self) -> &'static KindTraits {
        &KIND_TRAITS[*self as usize - 1]
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.traits().primitive
    }

    #[inline]
    pub fn is_fixed_width(&self) -> bool {
        self.traits().width > 0
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.traits().width
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.traits().name
    }

    /// Returns `true` if the kind is a composite (container) kind.
    pub fn is_composite(&self) -> bool {
        matches!(self, Kind::List | Kind::Map | Kind::Struct)
    }

    /// Returns `true` if a column of this kind carries an offsets array:
    /// variable-length scalars (`String`, `Binary`) and collections (`List`, `Map`).
    pub fn requires_offsets(&self) -> bool {
        matches!(self, Kind::String | Kind::Binary | Kind::List | Kind::Map)
    }

    /// Returns `true` for the integer-valued kinds, `Timestamp` included.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 | Kind::Int128 | Kind::Timestamp
        )
    }

    /// Returns the number of children a node of this kind must have.
    pub fn child_arity(&self) -> Arity {
        match self {
            Kind::List => Arity::Exactly(1),
            Kind::Map => Arity::Exactly(2),
            Kind::Struct => Arity::Any,
            _ => Arity::None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
