use crate::common::BusMessage;
use crate::domains::sync::{BusError, MessageBus, TopicPattern};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

struct Subscriber {
    client_id: String,
    patterns: Vec<TopicPattern>,
    sender: mpsc::UnboundedSender<BusMessage>,
}

#[derive(Default)]
struct BrokerState {
    subscribers: Vec<Subscriber>,
    history: Vec<BusMessage>,
    closed: bool,
}

/// In-process broker for tests and local matches. Every publication reaches
/// every client with a matching subscription, the publisher included.
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn connect(&self, client_id: impl Into<String>) -> InMemoryBus {
        let (sender, receiver) = mpsc::unbounded_channel();
        let client_id = client_id.into();
        let mut state = self.lock();
        if !state.closed {
            state.subscribers.push(Subscriber {
                client_id: client_id.clone(),
                patterns: Vec::new(),
                sender,
            });
        }
        InMemoryBus {
            client_id,
            broker: self.clone(),
            receiver,
        }
    }

    /// Publishes on behalf of an outside party, e.g. the game server in tests.
    pub fn publish(&self, topic: &str, payload: &str) {
        let message = BusMessage::new(topic, payload);
        let mut state = self.lock();
        state.subscribers.retain(|sub| !sub.sender.is_closed());
        for sub in &state.subscribers {
            if sub.patterns.iter().any(|p| p.matches(topic)) {
                let _ = sub.sender.send(message.clone());
            }
        }
        state.history.push(message);
    }

    /// Every message published so far, in order.
    pub fn history(&self) -> Vec<BusMessage> {
        self.lock().history.clone()
    }

    pub fn published_on(&self, topic: &str) -> Vec<String> {
        self.lock()
            .history
            .iter()
            .filter(|m| m.topic == topic)
            .map(|m| m.payload.clone())
            .collect()
    }

    /// Disconnects everyone; pending `next_message` calls return `None`.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.subscribers.clear();
    }

    fn subscribe(&self, client_id: &str, pattern: &str) -> Result<(), BusError> {
        let mut state = self.lock();
        let sub = state
            .subscribers
            .iter_mut()
            .find(|sub| sub.client_id == client_id)
            .ok_or(BusError::Closed)?;
        let pattern = TopicPattern::new(pattern);
        if !sub.patterns.contains(&pattern) {
            sub.patterns.push(pattern);
        }
        Ok(())
    }
}

pub struct InMemoryBus {
    client_id: String,
    broker: InMemoryBroker,
    receiver: mpsc::UnboundedReceiver<BusMessage>,
}

impl InMemoryBus {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn subscribe(&mut self, pattern: &str) -> Result<(), BusError> {
        self.broker.subscribe(&self.client_id, pattern)
    }

    async fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BusError> {
        if self.broker.lock().closed {
            return Err(BusError::Closed);
        }
        self.broker.publish(topic, payload);
        Ok(())
    }

    async fn next_message(&mut self) -> Result<Option<BusMessage>, BusError> {
        Ok(self.receiver.recv().await)
    }
}
