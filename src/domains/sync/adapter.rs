use super::codec::{decode_coordinate, encode_coordinate};
use super::topics::{BroadcastKind, TopicScheme};
use crate::common::{DomainResult, OutboundMessage};
use crate::domains::knowledge::{Coordinate, GridKnowledgeStore};
use crate::domains::reconciliation::MapDelta;

/// What happened to an inbound team broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// The fact was new and the store changed.
    Applied(BroadcastKind),
    /// Already known (or redelivered); nothing changed.
    Stale(BroadcastKind),
    /// Published by this agent.
    OwnEcho,
    /// Not a team broadcast.
    Ignored,
}

/// Translates deltas to team broadcasts and team broadcasts back into store mutations.
#[derive(Debug, Clone)]
pub struct SyncBusAdapter {
    scheme: TopicScheme,
}

impl SyncBusAdapter {
    pub fn new(scheme: TopicScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &TopicScheme {
        &self.scheme
    }

    pub fn outbound(&self, deltas: &[MapDelta]) -> Vec<OutboundMessage> {
        deltas
            .iter()
            .filter_map(|delta| {
                let kind = match *delta {
                    MapDelta::CoinSeen { coin, .. } => BroadcastKind::SeenCoin(coin),
                    MapDelta::CoinCollected { coin, .. } => BroadcastKind::Collected(coin),
                    MapDelta::WallSeen { .. } => BroadcastKind::SeenWall,
                    MapDelta::CellSeen { .. } => return None,
                };
                Some(OutboundMessage::new(
                    self.scheme.broadcast(kind),
                    encode_coordinate(delta.coordinate()),
                ))
            })
            .collect()
    }

    pub fn position_broadcast(&self, at: Coordinate) -> OutboundMessage {
        OutboundMessage::new(self.scheme.broadcast(BroadcastKind::Position), encode_coordinate(at))
    }

    /// Applies a teammate's broadcast through the same idempotent mutators the
    /// reconciler uses. Redelivered facts come back as [`InboundOutcome::Stale`].
    pub fn apply_inbound(
        &self,
        store: &mut GridKnowledgeStore,
        topic: &str,
        payload: &str,
    ) -> DomainResult<InboundOutcome> {
        let Some((sender, kind)) = self.scheme.parse_broadcast(topic) else {
            return Ok(InboundOutcome::Ignored);
        };
        if sender == self.scheme.identity().player {
            return Ok(InboundOutcome::OwnEcho);
        }

        let at = decode_coordinate(topic, payload)?;
        let changed = match kind {
            BroadcastKind::Position => {
                let changed = store.teammate(sender) != Some(at);
                store.upsert_teammate(sender, at);
                changed
            }
            BroadcastKind::SeenCoin(coin) => store.mark_coin(coin, at),
            BroadcastKind::Collected(coin) => store.remove_coin(coin, at),
            BroadcastKind::SeenWall => store.mark_wall(at),
        };

        Ok(if changed {
            InboundOutcome::Applied(kind)
        } else {
            InboundOutcome::Stale(kind)
        })
    }
}
