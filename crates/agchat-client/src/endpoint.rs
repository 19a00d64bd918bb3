//! Single request/response chat endpoint

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    types::Message,
};

/// Client for an endpoint that answers a whole transcript with one reply
#[derive(Debug, Clone)]
pub struct ChatEndpoint {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

impl ChatEndpoint {
    /// Create a client for an endpoint with an optional bearer token
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::InvalidConfig("chat endpoint is empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post the transcript and return the assistant reply text
    pub async fn complete(&self, messages: &[Message]) -> Result<String> {
        let mut request = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&ChatRequest { messages });

        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "chat request failed");
            return Err(Error::status(status));
        }

        let body = response.text().await?;
        Ok(extract_content(&body))
    }
}

/// Pull the reply text out of a response body.
///
/// Order: a truthy `content` field, a truthy `response` field, a bare JSON
/// string, the raw body when it is not JSON, and finally the compact JSON text
/// of whatever was returned. Truthy means anything but `null`, `false`, `0`
/// and `""`; non-string values are rendered as text.
pub fn extract_content(body: &str) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return body.to_string(),
    };

    if let Some(text) = truthy_field(&value, "content") {
        return text;
    }
    if let Some(text) = truthy_field(&value, "response") {
        return text;
    }

    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn truthy_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
