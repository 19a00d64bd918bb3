//! agchat-widget: chat widget state machines
//!
//! Two independent widgets share the transcript type: a streaming widget fed
//! by an AG-UI agent subscription, and a simple widget that makes one HTTP
//! request per user turn. Neither knows how it is drawn.

pub mod error;
pub mod inbound;
pub mod simple;
pub mod status;
pub mod streaming;
pub mod timer;
pub mod transcript;

pub use error::{Error, Result};
pub use inbound::{ChannelSubscriber, Inbound};
pub use simple::{PendingRequest, SimpleChat, SimpleConfig};
pub use status::{LoadingState, StreamStatus};
pub use streaming::{ClientFactory, SendOutcome, StreamingChat, StreamingConfig};
pub use timer::FallbackTimer;
pub use transcript::{PLACEHOLDER, Transcript};
