use serde::{Deserialize, Serialize};
use strata_common::{Result, error::Error};

/// Default channel connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 20_000;

/// Connectivity state of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelState {
    Idle,
    Connecting,
    Ready,
    TransientFailure,
    /// The channel is closed for good and must be replaced.
    Shutdown,
}

/// A client channel to one node.
pub trait Channel: Send + Sync + 'static {
    fn state(&self) -> ChannelState;
}

/// Creates channels for a [`ConnectionPool`](crate::connection_pool::ConnectionPool).
pub trait ChannelFactory: Send + Sync {
    type Channel: Channel;
    type Error: std::error::Error + Send + Sync + 'static;

    fn connect(
        &self,
        address: &str,
        options: &ChannelOptions,
    ) -> std::result::Result<Self::Channel, Self::Error>;
}

/// Options passed to every channel a pool creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelOptions {
    /// Largest message the channel accepts, `None` for no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_receive_message_size: Option<usize>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            max_receive_message_size: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl ChannelOptions {
    /// Validates the options and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.max_receive_message_size == Some(0) {
            return Err(Error::invalid_arg(
                "max_receive_message_size",
                "must be greater than 0",
            ));
        }
        if self.connect_timeout_ms == 0 {
            return Err(Error::invalid_arg(
                "connect_timeout_ms",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}
