//! Column storage for strata batches.
//!
//! A [`crate::data_node::DataNode`] holds the values of one column: scalar values in
//! a contiguous byte buffer, offsets for variable-length values and collections,
//! presence (null) information, and child nodes for `List` and `Map` columns.
//!
//! # Main Components
//!
//! - [`crate::values::Values`]: raw fixed-width values, read back through `bytemuck`
//! - [`crate::offsets::Offsets`]: N+1 offsets delimiting variable-length items
//! - [`crate::presence::Presence`]: null tracking (all present, all null, or per-slot bytes)
//! - [`crate::value::Value`] and [`crate::value::Scalar`]: the typed read surface
//! - [`crate::builder::DataNodeBuilder`]: append-only construction of nodes
//!
//! Nodes are immutable once built and are `Send + Sync`, so a column can be read
//! from any number of threads at once.

pub mod builder;
pub mod data_node;
pub mod offsets;
pub mod presence;
pub mod value;
pub mod values;
