//! # Strata: row access over columnar batches
//!
//! Strata stores rows column by column and reads them back one row at a time.
//! A batch holds one column per field; readers position a cursor on a row and
//! read fields by name, as typed scalars or as list element windows. Fields with
//! few distinct values can additionally be packed into a per-row word, from which
//! they are decoded without reading column values.
//!
//! ## Module Organization
//!
//! * [`batch`] - Batches, the packed dimension word, row and list accessors
//! * [`common`] - Errors and result helpers shared by all crates
//! * [`format`] - The closed set of value kinds and data type trees
//! * [`node`] - Channels to storage nodes and the per-address connection pool
//! * [`sequence`] - Column storage: values, offsets, presence and data nodes
//!
//! ### Support Modules
//!
//! * [`support::bits`] - LSB-first bit arrays backing the packed words

pub use strata_batch as batch;
pub use strata_common as common;
pub use strata_format as format;
pub use strata_node as node;
pub use strata_sequence as sequence;

pub mod support {
    pub use strata_bits as bits;
}
