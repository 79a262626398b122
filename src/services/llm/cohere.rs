// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{GenerationSettings, LineEvent, collect_lines, request_error, send, sse_data};
use crate::domain::{ProviderConfig, ProviderKind};
use crate::error::{Error, Result};

pub struct CohereProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    delta: Option<EventDelta>,
}

#[derive(Deserialize)]
struct EventDelta {
    message: Option<DeltaMessage>,
}

#[derive(Deserialize)]
struct DeltaMessage {
    content: Option<DeltaContent>,
}

#[derive(Deserialize)]
struct DeltaContent {
    text: Option<String>,
}

impl CohereProvider {
    pub fn new(provider: &ProviderConfig, model: String, settings: &GenerationSettings) -> Self {
        Self {
            client: super::http_client(settings),
            base_url: super::base_url(provider),
            model,
            api_key: SecretString::from(provider.api_key.clone().unwrap_or_default()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    pub async fn verify_connection(&self) -> Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(Error::Provider {
                provider: "cohere".into(),
                message: "API key not configured".into(),
            });
        }
        Ok(())
    }

    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
        token_tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<String> {
        let url = format!("{}/chat", self.base_url);
        debug!(model = %self.model, %url, "sending cohere chat request");

        let response = send(
            ProviderKind::Cohere,
            self.client
                .post(&url)
                .bearer_auth(self.api_key.expose_secret())
                .json(&ChatRequest {
                    model: &self.model,
                    messages: vec![
                        Message {
                            role: "system",
                            content: system,
                        },
                        Message {
                            role: "user",
                            content: prompt,
                        },
                    ],
                    temperature: self.temperature,
                    max_tokens: self.max_tokens,
                    stream: true,
                }),
            &cancel,
            |e| request_error(ProviderKind::Cohere, e),
        )
        .await?;

        collect_lines(ProviderKind::Cohere, response, &token_tx, &cancel, |line| {
            let Some(data) = sse_data(line) else {
                return LineEvent::Skip;
            };
            let Ok(event) = serde_json::from_str::<StreamEvent>(data) else {
                return LineEvent::Skip;
            };
            match event.event_type.as_str() {
                "content-delta" => match event
                    .delta
                    .and_then(|d| d.message)
                    .and_then(|m| m.content)
                    .and_then(|c| c.text)
                {
                    Some(text) => LineEvent::Token(text),
                    None => LineEvent::Skip,
                },
                "message-end" => LineEvent::Done(None),
                _ => LineEvent::Skip,
            }
        })
        .await
    }

    pub fn name(&self) -> &str {
        "cohere"
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
