use crate::common::BusMessage;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("publish to {topic} failed: {reason}")]
    Publish { topic: String, reason: String },

    #[error("subscribe to {pattern} failed: {reason}")]
    Subscribe { pattern: String, reason: String },

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("bus closed")]
    Closed,
}

/// Port for the publish/subscribe transport the agent talks through.
/// Adapters own connection, authentication and delivery; the agent only sees topics and text.
#[async_trait]
pub trait MessageBus: Send {
    /// Subscribe to a topic pattern (`+` matches one level, `#` the rest).
    async fn subscribe(&mut self, pattern: &str) -> Result<(), BusError>;

    async fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BusError>;

    /// Next delivered message, or `None` once the bus has shut down.
    async fn next_message(&mut self) -> Result<Option<BusMessage>, BusError>;
}
