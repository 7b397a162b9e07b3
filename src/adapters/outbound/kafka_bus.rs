use crate::common::BusMessage;
use crate::config::BusConfig;
use crate::domains::sync::{BusError, MessageBus, TopicPattern};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::Message;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use uuid::Uuid;

const ASSIGNMENT_TIMEOUT: Duration = Duration::from_secs(10);
const ASSIGNMENT_POLL: Duration = Duration::from_millis(100);

/// Carries the game's hierarchical topics over a single Kafka topic: the game
/// topic is the record key, and subscriptions are applied on the consumer side.
pub struct KafkaBus {
    producer: FutureProducer,
    consumer: StreamConsumer,
    topic: String,
    patterns: Vec<TopicPattern>,
    subscribed: bool,
    assignment_timeout: Duration,
    /// Records polled while waiting for the partition assignment, not yet filtered.
    pending: VecDeque<BusMessage>,
}

impl KafkaBus {
    pub fn new(config: &BusConfig, player: &str) -> Result<Self, BusError> {
        let client_id = format!("{}-{}", config.client_id, player);

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("client.id", &client_id)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| BusError::Connection(format!("Failed to create Kafka producer: {}", e)))?;

        // Own consumer group per agent so every agent sees every record.
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("group.id", format!("{}-{}", client_id, Uuid::new_v4()))
            .set("client.id", &client_id)
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "6000")
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest")
            .create()
            .map_err(|e| BusError::Connection(format!("Failed to create Kafka consumer: {}", e)))?;

        Ok(Self {
            producer,
            consumer,
            topic: config.topic.clone(),
            patterns: Vec::new(),
            subscribed: false,
            assignment_timeout: ASSIGNMENT_TIMEOUT,
            pending: VecDeque::new(),
        })
    }

    pub fn with_assignment_timeout(mut self, assignment_timeout: Duration) -> Self {
        self.assignment_timeout = assignment_timeout;
        self
    }

    /// With `auto.offset.reset = latest` nothing published before the group owns
    /// its partitions is ever delivered, so the join request must wait for them.
    /// The rebalance only runs while the consumer is polled; records that arrive
    /// meanwhile are kept for `next_message`.
    async fn await_assignment(&mut self, pattern: &str) -> Result<(), BusError> {
        let deadline = Instant::now() + self.assignment_timeout;
        loop {
            let assigned = self
                .consumer
                .assignment()
                .map(|partitions| partitions.count() > 0)
                .unwrap_or(false);
            if assigned {
                tracing::debug!(topic = %self.topic, buffered = self.pending.len(), "partitions assigned");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BusError::Subscribe {
                    pattern: pattern.to_string(),
                    reason: format!(
                        "no partitions of {} assigned within {:?}",
                        self.topic, self.assignment_timeout
                    ),
                });
            }
            match timeout(ASSIGNMENT_POLL, self.consumer.recv()).await {
                Ok(Ok(record)) => {
                    if let Some(message) = keyed_message(record.key(), record.payload()) {
                        self.pending.push_back(message);
                    }
                }
                Ok(Err(e)) => return Err(BusError::Receive(e.to_string())),
                Err(_) => {}
            }
        }
    }

    fn accepts(&self, message: &BusMessage) -> bool {
        self.patterns.iter().any(|p| p.matches(&message.topic))
    }
}

fn keyed_message(key: Option<&[u8]>, payload: Option<&[u8]>) -> Option<BusMessage> {
    let topic = String::from_utf8_lossy(key?).into_owned();
    let payload = payload
        .map(|p| String::from_utf8_lossy(p).into_owned())
        .unwrap_or_default();
    Some(BusMessage::new(topic, payload))
}

#[async_trait]
impl MessageBus for KafkaBus {
    async fn subscribe(&mut self, pattern: &str) -> Result<(), BusError> {
        if !self.subscribed {
            self.consumer
                .subscribe(&[self.topic.as_str()])
                .map_err(|e| BusError::Subscribe {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
            self.await_assignment(pattern).await?;
            self.subscribed = true;
        }
        let pattern = TopicPattern::new(pattern);
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        Ok(())
    }

    async fn publish(&mut self, topic: &str, payload: &str) -> Result<(), BusError> {
        let record = FutureRecord::to(&self.topic).key(topic).payload(payload);
        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map(|_| ())
            .map_err(|(e, _)| BusError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }

    async fn next_message(&mut self) -> Result<Option<BusMessage>, BusError> {
        while let Some(message) = self.pending.pop_front() {
            if self.accepts(&message) {
                return Ok(Some(message));
            }
        }
        loop {
            let record = self
                .consumer
                .recv()
                .await
                .map_err(|e| BusError::Receive(e.to_string()))?;
            let Some(message) = keyed_message(record.key(), record.payload()) else {
                continue;
            };
            if self.accepts(&message) {
                return Ok(Some(message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_bus() -> KafkaBus {
        let config = BusConfig {
            brokers: vec!["127.0.0.1:1".to_string()],
            ..BusConfig::default()
        };
        KafkaBus::new(&config, "alice")
            .unwrap()
            .with_assignment_timeout(Duration::from_millis(300))
    }

    #[tokio::test]
    async fn test_subscribe_fails_without_partition_assignment() {
        let mut bus = unreachable_bus();

        let result = bus.subscribe("games/lobby1/alice/game_state").await;

        assert!(matches!(result, Err(BusError::Subscribe { .. })));
        assert!(bus.patterns.is_empty());
    }

    #[tokio::test]
    async fn test_records_from_the_assignment_wait_are_delivered_first() {
        let mut bus = unreachable_bus();
        bus.patterns.push(TopicPattern::new("games/lobby1/alice/game_state"));
        bus.pending.push_back(BusMessage::new("games/lobby1/scores", "{}"));
        bus.pending.push_back(BusMessage::new(
            "games/lobby1/alice/game_state",
            r#"{"currentPosition": [1, 1]}"#,
        ));

        let first = bus.next_message().await.unwrap();

        assert_eq!(
            first,
            Some(BusMessage::new(
                "games/lobby1/alice/game_state",
                r#"{"currentPosition": [1, 1]}"#
            ))
        );
        assert!(bus.pending.is_empty());
    }

    #[test]
    fn test_records_without_key_are_skipped() {
        assert_eq!(keyed_message(None, Some(&b"[1, 1]"[..])), None);
        assert_eq!(
            keyed_message(Some(&b"games/lobby1/start"[..]), None),
            Some(BusMessage::new("games/lobby1/start", ""))
        );
    }
}
