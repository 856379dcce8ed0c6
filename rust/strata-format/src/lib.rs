//! Type definitions for strata batches: the closed set of value kinds, their
//! static traits, and owned data type trees built from those kinds.

pub mod data_type;
pub mod kind;

pub use data_type::DataType;
pub use kind::{Arity, Kind, KindTraits};
