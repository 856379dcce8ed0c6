//! Per-address channel cache.

use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use strata_common::{Result, error::Error};

use crate::channel::{Channel, ChannelFactory, ChannelOptions, ChannelState};

/// Keeps one channel per node address.
///
/// Channels are created on first use and handed out as shared `Arc`s. A cached
/// channel that has reached [`ChannelState::Shutdown`] is dropped from the pool and
/// replaced the next time its address is requested; every other state, transient
/// failure included, is left to the channel to recover from.
///
/// The pool is safe to share between threads. Concurrent requests for the same
/// address create at most one channel.
pub struct ConnectionPool<F: ChannelFactory> {
    factory: F,
    options: ChannelOptions,
    channels: RwLock<AHashMap<String, Arc<F::Channel>>>,
}

impl<F: ChannelFactory> ConnectionPool<F> {
    /// Creates a pool with default channel options.
    pub fn new(factory: F) -> ConnectionPool<F> {
        ConnectionPool {
            factory,
            options: ChannelOptions::default(),
            channels: Default::default(),
        }
    }

    /// Creates a pool whose channels are created with `options`.
    pub fn with_options(factory: F, options: ChannelOptions) -> Result<ConnectionPool<F>> {
        options.validate()?;
        Ok(ConnectionPool {
            factory,
            options,
            channels: Default::default(),
        })
    }

    pub fn options(&self) -> &ChannelOptions {
        &self.options
    }

    /// Returns the channel to `address`, creating it if the pool has none or the
    /// cached one is shut down.
    ///
    /// # Errors
    ///
    /// Returns a `Connection` error carrying the factory's error if a channel has
    /// to be created and creation fails. Nothing is cached in that case.
    pub fn connection(&self, address: &str) -> Result<Arc<F::Channel>> {
        if let Some(channel) = self.try_get_live(address) {
            return Ok(channel);
        }

        let mut channels = self.channels.write().expect("write lock");
        if let Some(channel) = channels.get(address) {
            if channel.state() != ChannelState::Shutdown {
                return Ok(channel.clone());
            }
            log::info!("Seeing a dead channel to {address}, replacing it");
            channels.remove(address);
        }

        log::info!("Creating a channel to {address}");
        let channel = self
            .factory
            .connect(address, &self.options)
            .map(Arc::new)
            .map_err(|e| Error::connection(address, e))?;
        channels.insert(address.to_string(), channel.clone());
        Ok(channel)
    }

    /// Removes the channel to `address` from the pool and returns it.
    pub fn evict(&self, address: &str) -> Option<Arc<F::Channel>> {
        self.channels.write().expect("write lock").remove(address)
    }

    /// Number of cached channels.
    pub fn len(&self) -> usize {
        self.channels.read().expect("read lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn try_get_live(&self, address: &str) -> Option<Arc<F::Channel>> {
        self.channels
            .read()
            .expect("read lock")
            .get(address)
            .filter(|channel| channel.state() != ChannelState::Shutdown)
            .cloned()
    }
}

impl<F: ChannelFactory> std::fmt::Debug for ConnectionPool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("options", &self.options)
            .field("channels", &self.len())
            .finish_non_exhaustive()
    }
}
