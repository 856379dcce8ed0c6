//! Row-oriented read access to columnar batches.
//!
//! A [`batch::Batch`] stores a fixed number of rows column by column. Readers
//! position a [`accessor::RowAccessor`] (or take a [`accessor::Row`]) on a row id
//! and read fields by name:
//!
//! - scalar fields through the generic [`accessor::Row::read`], typed by the caller
//! - list fields through a [`list::ListAccessor`] over the row's element window
//! - map fields are not readable and report `Unsupported`
//!
//! Batches may also carry a packed word per row ([`packed::PackedRows`]). Reads of
//! the fields it covers decode the value straight from the word; only the
//! column's null flags are consulted.
//!
//! ```
//! use strata_batch::batch::Batch;
//! use strata_format::Kind;
//! use strata_sequence::{builder::DataNodeBuilder, value::Value};
//!
//! let mut ids = DataNodeBuilder::new(Kind::Int64).unwrap();
//! ids.push(Value::Int64(7)).unwrap();
//! ids.push(Value::Int64(9)).unwrap();
//! let batch = Batch::builder(2).column("id", ids.build().unwrap()).build().unwrap();
//!
//! let mut accessor = batch.accessor();
//! accessor.seek(1).unwrap();
//! assert_eq!(accessor.read::<i64>("id").unwrap(), 9);
//! ```

pub mod accessor;
pub mod batch;
pub mod list;
pub mod packed;

pub use strata_sequence::value::{OwnedValue, Scalar, Value};

#[cfg(test)]
mod tests;
