use crate::common::{ApplicationResult, BusMessage, DomainError, OutboundMessage};
use crate::domains::logger::DynLogger;
use crate::domains::reconciliation::Observation;
use crate::domains::sync::{Dispatcher, MessageBus, Route, Termination, NEW_GAME_TOPIC};
use crate::domains::turn::TurnController;
use serde::Serialize;
use std::future::Future;
use tracing::{debug, info, warn};

pub const START_COMMAND: &str = "START";
pub const STOP_COMMAND: &str = "STOP";

#[derive(Debug, Clone, Serialize)]
struct JoinRequest<'a> {
    lobby_name: &'a str,
    team_name: &'a str,
    player_name: &'a str,
}

/// How an agent's message loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    /// The server announced the end of the match.
    Completed(String),
    /// The server reported a fatal error.
    Failed(String),
    /// A local stop request was honoured.
    Stopped,
    /// The bus went away underneath the agent.
    Disconnected,
}

impl AgentOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            AgentOutcome::Completed(_) | AgentOutcome::Stopped => 0,
            AgentOutcome::Failed(_) | AgentOutcome::Disconnected => 1,
        }
    }
}

/// Drives one agent: owns the bus connection and the controller, and routes
/// each inbound message through the dispatch table.
pub struct AgentRuntime<B: MessageBus> {
    bus: B,
    controller: TurnController,
    dispatcher: Dispatcher,
    logger: DynLogger,
}

impl<B: MessageBus> AgentRuntime<B> {
    pub fn new(bus: B, controller: TurnController, logger: DynLogger) -> Self {
        let dispatcher = Dispatcher::new(controller.scheme());
        Self {
            bus,
            controller,
            dispatcher,
            logger,
        }
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn into_parts(self) -> (B, TurnController) {
        (self.bus, self.controller)
    }

    /// Subscribes to every routed topic, registers with the lobby and asks for the game to start.
    pub async fn join(&mut self) -> ApplicationResult<()> {
        let patterns: Vec<String> = self.dispatcher.subscriptions().map(str::to_string).collect();
        for pattern in &patterns {
            self.bus.subscribe(pattern).await?;
            debug!(%pattern, "subscribed");
        }

        let scheme = self.controller.scheme().clone();
        let identity = scheme.identity();
        let request = serde_json::to_string(&JoinRequest {
            lobby_name: &identity.lobby,
            team_name: &identity.team,
            player_name: &identity.player,
        })
        .map_err(DomainError::from)?;
        self.bus.publish(NEW_GAME_TOPIC, &request).await?;
        self.bus.publish(&scheme.start(), START_COMMAND).await?;

        self.logger.info(&format!(
            "joined lobby {} as {} of team {}",
            identity.lobby, identity.player, identity.team
        ));
        Ok(())
    }

    /// Processes messages until the match ends, the bus closes, or `shutdown`
    /// resolves. A handler in flight always runs to completion first.
    pub async fn run_until<F>(&mut self, shutdown: F) -> ApplicationResult<AgentOutcome>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let next = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                received = self.bus.next_message() => Some(received?),
            };

            match next {
                None => {
                    let start_topic = self.controller.scheme().start();
                    self.bus.publish(&start_topic, STOP_COMMAND).await?;
                    self.controller.stop("local stop request");
                    return Ok(AgentOutcome::Stopped);
                }
                Some(None) => {
                    self.controller.stop("bus closed");
                    return Ok(AgentOutcome::Disconnected);
                }
                Some(Some(message)) => match self.handle_message(&message).await {
                    Ok(Some(outcome)) => return Ok(outcome),
                    Ok(None) => {}
                    Err(e) => {
                        self.controller.stop(format!("handler failed: {}", e));
                        return Err(e);
                    }
                },
            }
        }
    }

    pub async fn run(&mut self) -> ApplicationResult<AgentOutcome> {
        self.run_until(std::future::pending()).await
    }

    /// Handles one message. Returns an outcome when the message ends the match.
    pub async fn handle_message(&mut self, message: &BusMessage) -> ApplicationResult<Option<AgentOutcome>> {
        if let Some(termination) = Termination::scan(&message.payload) {
            let outcome = match termination {
                Termination::Failed(payload) => {
                    self.logger.error(&format!("server reported an error on {}: {}", message.topic, payload));
                    AgentOutcome::Failed(payload)
                }
                Termination::Completed(payload) => AgentOutcome::Completed(payload),
            };
            self.controller.stop(format!("{:?}", outcome));
            return Ok(Some(outcome));
        }

        match self.dispatcher.route(&message.topic) {
            Some(Route::GameState) => {
                let observation = match Observation::from_json(&message.payload) {
                    Ok(observation) => observation,
                    Err(e) => {
                        self.logger.error(&format!("unreadable game state: {}", e));
                        return Err(e.into());
                    }
                };
                let output = self.controller.on_observation(&observation)?;
                self.publish_all(output.messages).await?;
            }
            Some(Route::TeamBroadcast) => {
                match self.controller.on_team_broadcast(&message.topic, &message.payload) {
                    Ok(outcome) => debug!(topic = %message.topic, ?outcome, "team broadcast"),
                    Err(DomainError::MalformedPayload { topic, reason }) => {
                        warn!(%topic, %reason, "skipping malformed team broadcast");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Some(Route::Scores) => match self.controller.on_scores(&message.topic, &message.payload) {
                Ok(messages) => self.publish_all(messages).await?,
                Err(DomainError::MalformedPayload { topic, reason }) => {
                    warn!(%topic, %reason, "skipping malformed scores");
                }
                Err(e) => return Err(e.into()),
            },
            Some(Route::Lobby) => info!(payload = %message.payload, "lobby"),
            None => debug!(topic = %message.topic, "no route for topic"),
        }
        Ok(None)
    }

    async fn publish_all(&mut self, messages: Vec<OutboundMessage>) -> ApplicationResult<()> {
        for message in messages {
            self.bus.publish(&message.topic, &message.payload).await?;
        }
        Ok(())
    }
}
