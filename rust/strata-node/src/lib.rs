//! Channels to storage nodes.
//!
//! The transport itself lives outside this crate: callers plug it in through
//! [`channel::ChannelFactory`], and [`connection_pool::ConnectionPool`] keeps one
//! live channel per node address.

pub mod channel;
pub mod connection_pool;
