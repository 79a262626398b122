// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! OpenAI chat completions and the many services that mirror it
//! (Mistral, Groq, DeepSeek, OpenRouter, Workers AI, ...).

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{GenerationSettings, LineEvent, collect_lines, request_error, send, sse_data};
use crate::domain::{ProviderConfig, ProviderKind};
use crate::error::{Error, Result};

const OPENROUTER_REFERER: &str = "https://github.com/vercel/ai";
const OPENROUTER_TITLE: &str = "Prism Translate";

pub struct OpenAiProvider {
    client: Client,
    kind: ProviderKind,
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
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: Delta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Delta {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(provider: &ProviderConfig, model: String, settings: &GenerationSettings) -> Result<Self> {
        let base_url = match (provider.kind, provider.base_url.as_deref()) {
            (ProviderKind::Workers, None) => {
                let account_id = provider
                    .account_id
                    .as_deref()
                    .filter(|a| !a.trim().is_empty())
                    .ok_or_else(|| {
                        Error::Config(format!(
                            "provider '{}' (workers) requires account_id",
                            provider.name
                        ))
                    })?;
                ProviderKind::workers_base_url(account_id.trim())
            }
            _ => super::base_url(provider),
        };

        Ok(Self {
            client: super::http_client(settings),
            kind: provider.kind,
            base_url,
            model,
            api_key: SecretString::from(provider.api_key.clone().unwrap_or_default()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.bearer_auth(self.api_key.expose_secret());
        if self.kind == ProviderKind::OpenRouter {
            builder
                .header("HTTP-Referer", OPENROUTER_REFERER)
                .header("X-Title", OPENROUTER_TITLE)
        } else {
            builder
        }
    }

    pub async fn verify_connection(&self) -> Result<()> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| request_error(self.kind, e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Provider {
                provider: self.kind.to_string(),
                message: "invalid API key".into(),
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
        let url = format!("{}/chat/completions", self.base_url);
        debug!(provider = %self.kind, model = %self.model, %url, "sending chat completion");

        let request = ChatRequest {
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
        };

        let response = send(
            self.kind,
            self.authorized(self.client.post(&url)).json(&request),
            &cancel,
            |e| request_error(self.kind, e),
        )
        .await?;

        collect_lines(self.kind, response, &token_tx, &cancel, |line| {
            let Some(data) = sse_data(line) else {
                return LineEvent::Skip;
            };
            if data == "[DONE]" {
                return LineEvent::Done(None);
            }
            let Ok(chunk) = serde_json::from_str::<ChatChunk>(data) else {
                return LineEvent::Skip;
            };

            let mut text = String::new();
            let mut finished = false;
            for choice in chunk.choices {
                if let Some(content) = choice.delta.content {
                    text.push_str(&content);
                }
                finished |= choice.finish_reason.is_some();
            }

            match (finished, text.is_empty()) {
                (true, true) => LineEvent::Done(None),
                (true, false) => LineEvent::Done(Some(text)),
                (false, true) => LineEvent::Skip,
                (false, false) => LineEvent::Token(text),
            }
        })
        .await
    }

    pub fn name(&self) -> &str {
        self.kind.as_str()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
