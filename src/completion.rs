use std::env;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::http_client::http_client;

pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Seam for the chat-completion service so the gateway can be exercised
/// without the network.
pub trait CompletionClient {
    fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String>;
}

pub struct GroqClient {
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: GROQ_MODEL.to_string(),
        }
    }

    /// None when GROQ_API_KEY is absent; the gateway turns that into its
    /// "not configured" answer.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GROQ_API_KEY")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())?;
        Some(Self::new(api_key))
    }
}

impl CompletionClient for GroqClient {
    fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        let client = http_client()?;
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": max_tokens,
        });

        let resp = client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("request failed")?;

        let status = resp.status();
        let text = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {}: {}", status, text));
        }

        let root: Value = serde_json::from_str(&text).context("invalid completion json")?;
        root.get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .context("completion response missing content")
    }
}
