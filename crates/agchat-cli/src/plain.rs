//! Line-oriented and one-shot modes

use std::io::{self, Write};
use std::sync::Arc;

use agchat_client::{AgentClient, AgentEvent, HttpAgent, Role};
use agchat_widget::{
    ClientFactory, Inbound, SendOutcome, SimpleChat, SimpleConfig, StreamingChat,
    StreamingConfig, streaming::http_factory,
};

use crate::{Settings, config::Mode, trace::TraceSubscriber};

/// Either widget, driven without a screen
enum Chat {
    Streaming(StreamingChat),
    Simple(SimpleChat),
}

impl Chat {
    fn new(settings: &Settings, trace: Option<Arc<TraceSubscriber>>) -> anyhow::Result<Self> {
        match settings.mode {
            Mode::Streaming => {
                let factory = match trace {
                    Some(trace) => traced_factory(trace),
                    None => http_factory(),
                };
                let mut chat = StreamingChat::new(factory);
                chat.configure(StreamingConfig::new(
                    settings.endpoint.clone(),
                    settings.api_key.clone(),
                ))?;
                Ok(Self::Streaming(chat))
            }
            Mode::Simple => Ok(Self::Simple(SimpleChat::new(SimpleConfig::new(
                settings.endpoint.clone(),
                settings.api_key.clone(),
            ))?)),
        }
    }

    /// Send one message and write the reply to `out`
    async fn turn(&mut self, text: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        match self {
            Self::Streaming(chat) => stream_turn(chat, text, out).await,
            Self::Simple(chat) => simple_turn(chat, text, out).await,
        }
    }
}

/// HTTP clients that also report raw wire events to `trace`
fn traced_factory(trace: Arc<TraceSubscriber>) -> ClientFactory {
    Arc::new(move |config: &StreamingConfig| {
        let agent = HttpAgent::new(config.endpoint.clone(), config.api_key.clone())?;
        agent.subscribe(trace.clone());
        Ok(Arc::new(agent) as Arc<dyn AgentClient>)
    })
}

async fn stream_turn(chat: &mut StreamingChat, text: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    if !chat.is_connected() {
        anyhow::bail!("message not sent: no endpoint configured");
    }
    let before = chat.transcript().len();
    if chat.send(text) == SendOutcome::Ignored {
        anyhow::bail!("message not sent: empty input");
    }

    let mut printed = 0;
    let mut streamed = false;
    let mut failure = None;
    loop {
        match chat.next_inbound().await {
            Inbound::Agent(AgentEvent::MessageContentDelta { buffer }) => {
                // Buffer is cumulative; print only what is new
                let chars: Vec<char> = buffer.chars().collect();
                if chars.len() > printed {
                    let new_text: String = chars[printed..].iter().collect();
                    write!(out, "{}", new_text)?;
                    out.flush()?;
                    printed = chars.len();
                    streamed = true;
                }
            }
            Inbound::Agent(AgentEvent::MessageEnd) => {
                if printed > 0 {
                    writeln!(out)?;
                }
                printed = 0;
            }
            Inbound::Agent(AgentEvent::RunError { message }) => failure = Some(message),
            Inbound::RunEnded => break,
            _ => {}
        }
    }

    if let Some(message) = failure {
        anyhow::bail!(message);
    }

    // Agents that only send a snapshot never stream a delta
    if !streamed && chat.transcript().len() > before + 1 {
        if let Some(reply) = chat.transcript().last().filter(|m| m.role == Role::Assistant) {
            writeln!(out, "{}", reply.content)?;
        }
    }
    Ok(())
}

async fn simple_turn(chat: &mut SimpleChat, text: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    if !chat.send(text).await {
        anyhow::bail!("message not sent: no endpoint configured");
    }
    if let Some(error) = chat.last_error() {
        anyhow::bail!(error.to_string());
    }
    if let Some(reply) = chat.transcript().last() {
        writeln!(out, "{}", reply.content)?;
    }
    Ok(())
}

/// Send a single message, print the reply and exit
pub async fn run_command(settings: &Settings, command: &str, trace: bool) -> anyhow::Result<()> {
    if trace && settings.mode == Mode::Simple {
        eprintln!("Warning: --trace only applies to streaming mode");
    }
    let trace = (trace && settings.mode == Mode::Streaming)
        .then(|| Arc::new(TraceSubscriber::stdout()));
    let mut chat = Chat::new(settings, trace.clone())?;

    println!("agchat> {}", command);
    println!();

    let result = chat.turn(command, &mut io::stdout()).await;

    if let Some(trace) = trace {
        println!();
        println!("AG-UI protocol check:");
        for line in trace.report() {
            println!("{}", line);
        }
        let missing = trace.missing();
        if !missing.is_empty() {
            result?;
            anyhow::bail!("missing events: {}", missing.join(", "));
        }
    }

    result
}

/// Read messages from stdin until EOF
pub async fn run_interactive(settings: &Settings) -> anyhow::Result<()> {
    let mut chat = Chat::new(settings, None)?;

    // Show minimal startup info (only if TTY)
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        let mode = match settings.mode {
            Mode::Streaming => "streaming",
            Mode::Simple => "simple",
        };
        eprintln!("agchat ({}) {}", mode, settings.connection_label());
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        println!();
        if let Err(e) = chat.turn(input, &mut io::stdout()).await {
            eprintln!("Error: {}", e);
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agchat_tui::Theme;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(endpoint: String, mode: Mode) -> Settings {
        Settings {
            endpoint,
            api_key: None,
            mode,
            theme: Theme::dark(),
        }
    }

    fn sse_body(events: &[serde_json::Value]) -> String {
        events.iter().map(|e| format!("data: {}\n\n", e)).collect()
    }

    async fn sse_server(events: &[serde_json::Value]) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body(events), "text/event-stream"))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_streamed_reply_is_printed_once() {
        let server = sse_server(&[
            serde_json::json!({"type": "RUN_STARTED", "threadId": "t", "runId": "r"}),
            serde_json::json!({"type": "TEXT_MESSAGE_START", "messageId": "a1", "role": "assistant"}),
            serde_json::json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": "a1", "delta": "Hel"}),
            serde_json::json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": "a1", "delta": "lo"}),
            serde_json::json!({"type": "TEXT_MESSAGE_END", "messageId": "a1"}),
            serde_json::json!({"type": "RUN_FINISHED", "threadId": "t", "runId": "r"}),
        ])
        .await;

        let mut chat = Chat::new(&settings(server.uri(), Mode::Streaming), None).unwrap();
        let mut out = Vec::new();
        chat.turn("hi", &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello\n");
    }

    #[tokio::test]
    async fn test_snapshot_only_reply_is_printed() {
        let server = sse_server(&[
            serde_json::json!({"type": "RUN_STARTED", "threadId": "t", "runId": "r"}),
            serde_json::json!({"type": "MESSAGES_SNAPSHOT", "messages": [
                {"id": "u1", "role": "user", "content": "hi"},
                {"id": "a1", "role": "assistant", "content": "from snapshot"}
            ]}),
            serde_json::json!({"type": "RUN_FINISHED", "threadId": "t", "runId": "r"}),
        ])
        .await;

        let mut chat = Chat::new(&settings(server.uri(), Mode::Streaming), None).unwrap();
        let mut out = Vec::new();
        chat.turn("hi", &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "from snapshot\n");
    }

    #[tokio::test]
    async fn test_run_error_fails_the_turn() {
        let server = sse_server(&[
            serde_json::json!({"type": "RUN_STARTED", "threadId": "t", "runId": "r"}),
            serde_json::json!({"type": "RUN_ERROR", "message": "model overloaded"}),
        ])
        .await;

        let mut chat = Chat::new(&settings(server.uri(), Mode::Streaming), None).unwrap();
        let err = chat.turn("hi", &mut Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "model overloaded");
    }

    #[tokio::test]
    async fn test_simple_reply_and_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"content": "pong"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut chat = Chat::new(&settings(server.uri(), Mode::Simple), None).unwrap();
        let mut out = Vec::new();
        chat.turn("ping", &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "pong\n");

        let err = chat.turn("again", &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().starts_with("HTTP 503"));
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_is_reported() {
        let mut chat = Chat::new(&settings(String::new(), Mode::Simple), None).unwrap();
        assert!(chat.turn("hi", &mut Vec::new()).await.is_err());

        let mut chat = Chat::new(&settings(String::new(), Mode::Streaming), None).unwrap();
        assert!(chat.turn("hi", &mut Vec::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_trace_sees_every_wire_event() {
        let server = sse_server(&[
            serde_json::json!({"type": "RUN_STARTED", "threadId": "t", "runId": "r"}),
            serde_json::json!({"type": "TEXT_MESSAGE_START", "messageId": "a1", "role": "assistant"}),
            serde_json::json!({"type": "TEXT_MESSAGE_CONTENT", "messageId": "a1", "delta": "ok"}),
            serde_json::json!({"type": "TEXT_MESSAGE_END", "messageId": "a1"}),
            serde_json::json!({"type": "RUN_FINISHED", "threadId": "t", "runId": "r"}),
        ])
        .await;

        let trace = Arc::new(TraceSubscriber::to_writer(Box::new(io::sink())));
        let mut chat =
            Chat::new(&settings(server.uri(), Mode::Streaming), Some(trace.clone())).unwrap();
        chat.turn("hi", &mut Vec::new()).await.unwrap();

        assert_eq!(trace.missing(), vec!["MESSAGES_SNAPSHOT"]);
        assert_eq!(trace.content(), "ok");
    }
}
