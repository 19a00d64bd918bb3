//! AG-UI agent client: subscription registry plus the HTTP/SSE transport

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use reqwest_eventsource::{Event, EventSource};
use tokio_stream::Stream;

use crate::{
    error::{Error, Result},
    events::{AgentEvent, AguiEvent},
    types::{Message, Role, RunAgentInput, WireMessage, next_message_id},
};

/// Handle returned by [`AgentClient::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receives events from an agent client, in arrival order
pub trait AgentSubscriber: Send + Sync {
    /// Called for every subscriber-facing event
    fn on_event(&self, event: &AgentEvent);

    /// Called with each raw wire event before it is interpreted
    fn on_raw_event(&self, _event: &AguiEvent) {}
}

/// A push-based agent client owning the authoritative message history
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Register a subscriber
    fn subscribe(&self, subscriber: Arc<dyn AgentSubscriber>) -> SubscriptionId;

    /// Remove a subscriber; returns false if it was not registered
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Append a message to the history
    fn add_message(&self, message: Message);

    /// Snapshot of the current history
    fn messages(&self) -> Vec<Message>;

    /// Run one agent turn over the current history
    async fn run_agent(&self) -> Result<()>;
}

/// Subscriber list shared by agent client implementations
#[derive(Default)]
pub struct Subscribers {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Arc<dyn AgentSubscriber>)>>,
}

impl Subscribers {
    /// Create an empty subscriber list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber
    pub fn add(&self, subscriber: Arc<dyn AgentSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, subscriber));
        id
    }

    /// Remove a subscriber
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every subscriber
    pub fn emit(&self, event: &AgentEvent) {
        // Snapshot first so subscribers may (un)subscribe from inside a callback
        for subscriber in self.snapshot() {
            subscriber.on_event(event);
        }
    }

    /// Deliver a raw wire event to every subscriber
    pub fn emit_raw(&self, event: &AguiEvent) {
        for subscriber in self.snapshot() {
            subscriber.on_raw_event(event);
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn AgentSubscriber>> {
        self.entries
            .lock()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect()
    }
}

/// A stream of decoded AG-UI events
pub type AguiEventStream = Pin<Box<dyn Stream<Item = Result<AguiEvent>> + Send>>;

/// AG-UI agent reached over HTTP with server-sent events
pub struct HttpAgent {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    thread_id: String,
    messages: Mutex<Vec<Message>>,
    subscribers: Subscribers,
}

impl HttpAgent {
    /// Create an agent client for an endpoint with an optional bearer token
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::InvalidConfig("agent endpoint is empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            url,
            api_key: api_key.filter(|k| !k.is_empty()),
            thread_id: uuid::Uuid::new_v4().to_string(),
            messages: Mutex::new(Vec::new()),
            subscribers: Subscribers::new(),
        })
    }

    /// Open the event stream for one run
    fn stream(&self, input: &RunAgentInput) -> Result<AguiEventStream> {
        let mut request = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(input);

        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let event_source = EventSource::new(request)
            .map_err(|e| Error::Sse(format!("Failed to create event source: {}", e)))?;

        Ok(Box::pin(create_stream(event_source)))
    }

    fn set_messages(&self, messages: Vec<Message>) -> Vec<Message> {
        let mut current = self.messages.lock();
        *current = messages;
        current.clone()
    }

    fn push_message(&self, message: Message) -> Vec<Message> {
        let mut current = self.messages.lock();
        current.push(message);
        current.clone()
    }
}

#[async_trait]
impl AgentClient for HttpAgent {
    fn subscribe(&self, subscriber: Arc<dyn AgentSubscriber>) -> SubscriptionId {
        self.subscribers.add(subscriber)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn add_message(&self, message: Message) {
        let messages = self.push_message(message);
        self.subscribers
            .emit(&AgentEvent::MessagesChanged { messages });
    }

    fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    async fn run_agent(&self) -> Result<()> {
        let input = RunAgentInput::new(self.thread_id.clone(), self.messages());
        tracing::debug!(run_id = %input.run_id, url = %self.url, "starting agent run");

        let mut events = self.stream(&input)?;
        let mut buffer = String::new();

        while let Some(event) = events.next().await {
            let event = event?;
            tracing::debug!(event = event.name(), "agent event");
            self.subscribers.emit_raw(&event);

            match event {
                AguiEvent::RunStarted { .. } => {
                    self.subscribers.emit(&AgentEvent::RunStarted);
                }
                AguiEvent::TextMessageStart { .. } => {
                    buffer.clear();
                    self.subscribers.emit(&AgentEvent::TextMessageStart);
                }
                AguiEvent::TextMessageContent { delta, .. } => {
                    buffer.push_str(&delta);
                    self.subscribers.emit(&AgentEvent::MessageContentDelta {
                        buffer: buffer.clone(),
                    });
                }
                AguiEvent::TextMessageEnd { message_id } => {
                    let content = std::mem::take(&mut buffer);
                    let id = message_id.unwrap_or_else(next_message_id);
                    let messages = self.push_message(Message::with_id(id, Role::Assistant, content));
                    self.subscribers.emit(&AgentEvent::MessageEnd);
                    self.subscribers
                        .emit(&AgentEvent::MessagesChanged { messages });
                }
                AguiEvent::MessagesSnapshot { messages } => {
                    let messages = self.set_messages(
                        messages
                            .into_iter()
                            .filter_map(WireMessage::into_message)
                            .collect(),
                    );
                    self.subscribers
                        .emit(&AgentEvent::MessagesChanged { messages });
                }
                AguiEvent::RunFinished { .. } => {
                    self.subscribers.emit(&AgentEvent::RunFinished);
                    return Ok(());
                }
                ref error @ AguiEvent::RunError { .. } => {
                    let message = error.error_message().unwrap_or_default();
                    tracing::error!("agent run failed: {}", message);
                    self.subscribers.emit(&AgentEvent::RunError {
                        message: message.clone(),
                    });
                    return Err(Error::Run(message));
                }
                AguiEvent::Unknown => {}
            }
        }

        tracing::warn!("agent event stream closed without a terminal event");
        Err(Error::Sse("stream ended before RUN_FINISHED".to_string()))
    }
}

fn create_stream(mut event_source: EventSource) -> impl Stream<Item = Result<AguiEvent>> {
    stream! {
        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(msg)) => {
                    if msg.data.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<AguiEvent>(&msg.data) {
                        Ok(event) => {
                            let terminal = event.is_terminal();
                            yield Ok(event);
                            if terminal {
                                event_source.close();
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Failed to decode agent event: {}", e);
                            event_source.close();
                            yield Err(Error::Json(e));
                            return;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    event_source.close();
                    return;
                }
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, _)) => {
                    event_source.close();
                    yield Err(Error::status(status));
                    return;
                }
                Err(e) => {
                    event_source.close();
                    yield Err(Error::Sse(e.to_string()));
                    return;
                }
            }
        }
    }
}
