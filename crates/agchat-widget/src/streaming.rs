//! Streaming chat widget driven by an AG-UI agent subscription

use std::sync::Arc;

use agchat_client::{AgentClient, AgentEvent, HttpAgent, Message, SubscriptionId};
use tokio::sync::mpsc;

use crate::{
    error::{Error, Result},
    inbound::{ChannelSubscriber, Inbound},
    status::StreamStatus,
    timer::{DEFAULT_REDRAW_DELAY, FallbackTimer},
    transcript::{PLACEHOLDER, Transcript},
};

/// Where the streaming widget connects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl StreamingConfig {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// An empty endpoint counts as unset
    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

/// Builds the agent client for a configuration
pub type ClientFactory =
    Arc<dyn Fn(&StreamingConfig) -> agchat_client::Result<Arc<dyn AgentClient>> + Send + Sync>;

/// Factory producing [`HttpAgent`] clients
pub fn http_factory() -> ClientFactory {
    Arc::new(|config: &StreamingConfig| {
        let agent = HttpAgent::new(config.endpoint.clone(), config.api_key.clone())?;
        Ok(Arc::new(agent) as Arc<dyn AgentClient>)
    })
}

/// Result of [`StreamingChat::send`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The message was appended and a run started
    Sent,
    /// Empty input, or no agent connected
    Ignored,
}

struct Connection {
    client: Arc<dyn AgentClient>,
    subscription: SubscriptionId,
    tx: mpsc::UnboundedSender<Inbound>,
    rx: mpsc::UnboundedReceiver<Inbound>,
}

/// Chat widget whose replies stream in from an agent client.
///
/// All state changes happen on the task that owns the widget. Agent callbacks
/// and run failures arrive through an inbound channel drained by
/// [`next_inbound`](Self::next_inbound) or [`drain_inbound`](Self::drain_inbound).
pub struct StreamingChat {
    factory: ClientFactory,
    config: StreamingConfig,
    connection: Option<Connection>,
    transcript: Transcript,
    status: StreamStatus,
    timer: FallbackTimer,
}

impl StreamingChat {
    /// Create an unconnected widget
    pub fn new(factory: ClientFactory) -> Self {
        Self {
            factory,
            config: StreamingConfig::default(),
            connection: None,
            transcript: Transcript::new(),
            status: StreamStatus::Idle,
            timer: FallbackTimer::new(),
        }
    }

    /// Create a widget that talks to AG-UI agents over HTTP
    pub fn with_http() -> Self {
        Self::new(http_factory())
    }

    /// Apply a configuration, reconnecting when it changed.
    ///
    /// The previous subscription is removed and its channel dropped before
    /// the new client is subscribed, so nothing from the old agent is applied
    /// after this returns.
    pub fn configure(&mut self, config: StreamingConfig) -> Result<()> {
        if self.connection.is_some() && self.config == config {
            return Ok(());
        }

        self.disconnect();
        self.status = StreamStatus::Idle;
        self.config = config;

        if !self.config.has_endpoint() {
            tracing::debug!("no agent endpoint configured");
            return Ok(());
        }

        let client = (self.factory)(&self.config)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = client.subscribe(Arc::new(ChannelSubscriber::new(tx.clone())));
        self.transcript = Transcript::from(client.messages());

        tracing::info!(endpoint = %self.config.endpoint, "agent client connected");
        self.connection = Some(Connection {
            client,
            subscription,
            tx,
            rx,
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        self.timer.disarm();
        if let Some(connection) = self.connection.take() {
            connection.client.unsubscribe(connection.subscription);
            tracing::debug!(endpoint = %self.config.endpoint, "agent client disconnected");
        }
    }

    /// Send a user message and start an agent run
    pub fn send(&mut self, text: &str) -> SendOutcome {
        let content = text.trim();
        if content.is_empty() {
            return SendOutcome::Ignored;
        }
        let Some(connection) = self.connection.as_ref() else {
            tracing::debug!("send ignored: no agent connected");
            return SendOutcome::Ignored;
        };
        let client = Arc::clone(&connection.client);
        let tx = connection.tx.clone();

        let message = Message::user(content);
        self.transcript = self.transcript.appended(message.clone());
        self.status = StreamStatus::Awaiting;
        self.timer.arm(tx.clone(), DEFAULT_REDRAW_DELAY);

        client.add_message(message);

        let run = tokio::spawn(async move { client.run_agent().await });
        tokio::spawn(async move {
            let error = match run.await {
                Ok(Ok(())) => None,
                Ok(Err(e)) if e.is_reported_by_agent() => None,
                Ok(Err(e)) => Some(Error::from(e)),
                Err(e) => Some(Error::Other(format!("agent run aborted: {}", e))),
            };
            if let Some(error) = error {
                tracing::error!("agent run failed: {}", error);
                let _ = tx.send(Inbound::Agent(AgentEvent::RunError {
                    message: error.to_string(),
                }));
            }
            let _ = tx.send(Inbound::RunEnded);
        });

        SendOutcome::Sent
    }

    /// Apply one agent event
    pub fn apply(&mut self, event: AgentEvent) {
        tracing::debug!(?event, "agent event");
        match event {
            AgentEvent::RunStarted => {
                self.status = StreamStatus::Awaiting;
            }
            AgentEvent::TextMessageStart => {}
            AgentEvent::MessageContentDelta { buffer } => {
                self.timer.disarm();
                self.status = StreamStatus::Streaming(buffer);
            }
            AgentEvent::MessagesChanged { messages } => {
                self.transcript = Transcript::from(messages);
                if !self.status.is_in_progress() {
                    self.status = StreamStatus::Idle;
                }
            }
            AgentEvent::MessageEnd | AgentEvent::RunFinished => {
                self.timer.disarm();
                self.status = StreamStatus::Idle;
            }
            AgentEvent::RunError { message } => {
                self.timer.disarm();
                self.status = StreamStatus::error(message);
            }
        }
    }

    fn handle(&mut self, inbound: &Inbound) {
        if let Inbound::Agent(event) = inbound {
            self.apply(event.clone());
        }
    }

    /// Wait for the next inbound message and apply it.
    ///
    /// Never resolves while no agent is connected. Cancel safe.
    pub async fn next_inbound(&mut self) -> Inbound {
        let received = match self.connection.as_mut() {
            Some(connection) => connection.rx.recv().await,
            None => None,
        };
        match received {
            Some(inbound) => {
                self.handle(&inbound);
                inbound
            }
            None => std::future::pending().await,
        }
    }

    /// Apply everything already queued without waiting
    pub fn drain_inbound(&mut self) -> Vec<Inbound> {
        let mut drained = Vec::new();
        while let Some(inbound) = self
            .connection
            .as_mut()
            .and_then(|c| c.rx.try_recv().ok())
        {
            self.handle(&inbound);
            drained.push(inbound);
        }
        drained
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> &StreamStatus {
        &self.status
    }

    /// Messages to draw, without empty ones
    pub fn visible_messages(&self) -> Vec<&Message> {
        self.transcript.visible()
    }

    /// Invitation text while nothing is visible
    pub fn placeholder(&self) -> Option<&'static str> {
        self.visible_messages().is_empty().then_some(PLACEHOLDER)
    }

    /// Whether the thinking indicator should be drawn
    pub fn thinking_visible(&self) -> bool {
        self.status.is_awaiting()
    }

    /// Whether the fallback redraw is still pending
    pub fn redraw_pending(&self) -> bool {
        self.timer.is_armed()
    }
}

impl Drop for StreamingChat {
    fn drop(&mut self) {
        self.disconnect();
    }
}
