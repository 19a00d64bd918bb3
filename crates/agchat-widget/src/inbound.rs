//! Channel bridging agent callbacks onto the UI task

use agchat_client::{AgentEvent, AgentSubscriber};
use tokio::sync::mpsc;

/// Messages delivered to a widget's UI task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// An event from the agent client
    Agent(AgentEvent),
    /// The fallback redraw timer fired
    Redraw,
    /// The spawned run task is over, whatever its outcome
    RunEnded,
}

/// Forwards agent events into an inbound channel
pub struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<Inbound>,
}

impl ChannelSubscriber {
    pub fn new(tx: mpsc::UnboundedSender<Inbound>) -> Self {
        Self { tx }
    }
}

impl AgentSubscriber for ChannelSubscriber {
    fn on_event(&self, event: &AgentEvent) {
        // Receiver gone means the widget was reconfigured or dropped
        if self.tx.send(Inbound::Agent(event.clone())).is_err() {
            tracing::trace!("dropping agent event for closed widget channel");
        }
    }
}
