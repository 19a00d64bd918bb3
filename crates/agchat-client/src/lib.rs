//! agchat-client: remote collaborators of the chat widgets
//!
//! This crate provides the AG-UI HTTP agent client consumed by the streaming
//! widget and the single request/response client used by the simple widget.

pub mod agent;
pub mod endpoint;
pub mod error;
pub mod events;
pub mod types;

pub use agent::{AgentClient, AgentSubscriber, HttpAgent, SubscriptionId, Subscribers};
pub use endpoint::{ChatEndpoint, extract_content};
pub use error::{Error, Result};
pub use events::{AgentEvent, AguiEvent, EXPECTED_RUN_EVENTS};
pub use types::*;
