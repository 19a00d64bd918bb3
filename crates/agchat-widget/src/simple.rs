//! Simple chat widget: one HTTP request per user turn

use agchat_client::{ChatEndpoint, Message};

use crate::{
    error::Result,
    status::LoadingState,
    transcript::{PLACEHOLDER, Transcript},
};

/// Where the simple widget posts transcripts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl SimpleConfig {
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

/// A request prepared by [`SimpleChat::begin_send`].
///
/// Owns everything it needs, so it can run on another task while the widget
/// keeps drawing its loading state.
#[derive(Debug)]
pub struct PendingRequest {
    endpoint: ChatEndpoint,
    messages: Vec<Message>,
}

impl PendingRequest {
    /// Transcript snapshot that will be posted
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Perform the request and return the reply text
    pub async fn execute(self) -> Result<String> {
        Ok(self.endpoint.complete(&self.messages).await?)
    }
}

/// Chat widget that posts the whole transcript and appends one reply
#[derive(Debug)]
pub struct SimpleChat {
    config: SimpleConfig,
    endpoint: Option<ChatEndpoint>,
    transcript: Transcript,
    loading: LoadingState,
}

impl SimpleChat {
    pub fn new(config: SimpleConfig) -> Result<Self> {
        let mut chat = Self {
            config: SimpleConfig::default(),
            endpoint: None,
            transcript: Transcript::new(),
            loading: LoadingState::default(),
        };
        chat.configure(config)?;
        Ok(chat)
    }

    /// Point the widget at another endpoint; the transcript is kept
    pub fn configure(&mut self, config: SimpleConfig) -> Result<()> {
        if self.config == config {
            return Ok(());
        }
        self.endpoint = if config.has_endpoint() {
            Some(ChatEndpoint::new(
                config.endpoint.clone(),
                config.api_key.clone(),
            )?)
        } else {
            None
        };
        self.config = config;
        Ok(())
    }

    /// Start a turn.
    ///
    /// Returns `None` without touching any state for empty input, an unset
    /// endpoint, or while a request is in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingRequest> {
        let content = text.trim();
        if content.is_empty() || self.loading.is_loading {
            return None;
        }
        let endpoint = self.endpoint.clone()?;

        self.transcript = self.transcript.appended(Message::user(content));
        self.loading = LoadingState {
            is_loading: true,
            last_error: None,
        };
        tracing::debug!(endpoint = endpoint.url(), "sending chat request");

        Some(PendingRequest {
            endpoint,
            messages: self.transcript.messages().to_vec(),
        })
    }

    /// Record the outcome of a request started with [`begin_send`](Self::begin_send)
    pub fn finish(&mut self, result: Result<String>) {
        match result {
            Ok(content) => {
                self.transcript = self.transcript.appended(Message::assistant(content));
            }
            Err(e) => {
                tracing::error!("chat request failed: {}", e);
                self.loading.last_error = Some(e.to_string());
            }
        }
        self.loading.is_loading = false;
    }

    /// Run a whole turn; returns false if the input was ignored
    pub async fn send(&mut self, text: &str) -> bool {
        let Some(request) = self.begin_send(text) else {
            return false;
        };
        let result = request.execute().await;
        self.finish(result);
        true
    }

    /// Forget every message and any error
    pub fn clear_chat(&mut self) {
        self.transcript = Transcript::new();
        self.loading.last_error = None;
    }

    /// Dismiss the error banner
    pub fn clear_error(&mut self) {
        self.loading.last_error = None;
    }

    pub fn status_line(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("Connected to: {}", endpoint.url()),
            None => "No endpoint configured".to_string(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn visible_messages(&self) -> Vec<&Message> {
        self.transcript.visible()
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.visible_messages().is_empty().then_some(PLACEHOLDER)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.loading.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agchat_client::Role;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn chat_against(server: &MockServer) -> SimpleChat {
        SimpleChat::new(SimpleConfig::new(server.uri(), None)).unwrap()
    }

    #[test]
    fn test_status_line() {
        let chat = SimpleChat::new(SimpleConfig::default()).unwrap();
        assert_eq!(chat.status_line(), "No endpoint configured");

        let chat = SimpleChat::new(SimpleConfig::new("http://chat.test/api", None)).unwrap();
        assert_eq!(chat.status_line(), "Connected to: http://chat.test/api");
    }

    #[test]
    fn test_rejects_empty_input_and_unset_endpoint() {
        let mut chat = SimpleChat::new(SimpleConfig::default()).unwrap();
        assert!(chat.begin_send("hello").is_none());
        assert!(chat.transcript().is_empty());

        let mut chat = SimpleChat::new(SimpleConfig::new("http://chat.test", None)).unwrap();
        assert!(chat.begin_send("  ").is_none());
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_begin_send_appends_and_clears_error() {
        let mut chat = SimpleChat::new(SimpleConfig::new("http://chat.test", None)).unwrap();
        chat.finish(Err(crate::Error::Other("earlier".into())));
        assert_eq!(chat.last_error(), Some("earlier"));

        let request = chat.begin_send(" hi ").unwrap();
        assert!(chat.is_loading());
        assert_eq!(chat.last_error(), None);
        assert_eq!(request.messages().len(), 1);
        assert_eq!(request.messages()[0].content, "hi");
        assert_eq!(request.messages()[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_send_while_loading_is_noop() {
        let mut chat = SimpleChat::new(SimpleConfig::new("http://chat.test", None)).unwrap();
        let _pending = chat.begin_send("first").unwrap();

        assert!(!chat.send("second").await);
        assert_eq!(chat.transcript().len(), 1);
        assert!(chat.is_loading());
    }

    #[tokio::test]
    async fn test_successful_turn_appends_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "hey"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut chat = chat_against(&server).await;
        assert!(chat.send("hi").await);

        let messages = chat.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "hey");
        assert!(!chat.is_loading());
        assert_ne!(messages[0].id, messages[1].id);
    }

    #[tokio::test]
    async fn test_whole_transcript_is_posted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let mut chat = chat_against(&server).await;
        chat.send("one").await;
        chat.send("two").await;

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        let contents: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["one", "ok", "two"]);
    }

    #[tokio::test]
    async fn test_server_error_sets_error_without_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut chat = chat_against(&server).await;
        assert!(chat.send("hi").await);

        assert_eq!(chat.last_error(), Some("HTTP 500: Internal Server Error"));
        assert_eq!(chat.transcript().len(), 1);
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_configure_keeps_transcript() {
        let mut chat = SimpleChat::new(SimpleConfig::new("http://one.test", None)).unwrap();
        let _ = chat.begin_send("hi");
        chat.finish(Ok("hello".into()));

        chat.configure(SimpleConfig::new("http://one.test", None)).unwrap();
        assert_eq!(chat.status_line(), "Connected to: http://one.test");

        chat.configure(SimpleConfig::new("http://two.test", None)).unwrap();
        assert_eq!(chat.status_line(), "Connected to: http://two.test");
        assert_eq!(chat.transcript().len(), 2);

        chat.configure(SimpleConfig::default()).unwrap();
        assert!(chat.begin_send("anyone?").is_none());
        assert_eq!(chat.transcript().len(), 2);
    }

    #[test]
    fn test_clear_chat_and_clear_error() {
        let mut chat = SimpleChat::new(SimpleConfig::new("http://chat.test", None)).unwrap();
        let _ = chat.begin_send("hi");
        chat.finish(Err(crate::Error::Other("boom".into())));

        chat.clear_error();
        assert_eq!(chat.last_error(), None);
        assert_eq!(chat.transcript().len(), 1);

        chat.finish(Err(crate::Error::Other("again".into())));
        chat.clear_chat();
        assert!(chat.transcript().is_empty());
        assert_eq!(chat.last_error(), None);
        assert_eq!(chat.placeholder(), Some(PLACEHOLDER));
    }
}
