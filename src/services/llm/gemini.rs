// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Google Gemini over the REST `streamGenerateContent` endpoint.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{GenerationSettings, LineEvent, collect_lines, request_error, send, sse_data};
use crate::domain::{ProviderConfig, ProviderKind};
use crate::error::{Error, Result};

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiProvider {
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
                provider: "google".into(),
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
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        );
        debug!(model = %self.model, "sending gemini request");

        let response = send(
            ProviderKind::Google,
            self.client
                .post(&url)
                .header("x-goog-api-key", self.api_key.expose_secret())
                .json(&GenerateRequest {
                    system_instruction: Content {
                        role: None,
                        parts: vec![Part { text: system }],
                    },
                    contents: vec![Content {
                        role: Some("user"),
                        parts: vec![Part { text: prompt }],
                    }],
                    generation_config: GenerationConfig {
                        max_output_tokens: self.max_tokens,
                        temperature: self.temperature,
                    },
                }),
            &cancel,
            |e| request_error(ProviderKind::Google, e),
        )
        .await?;

        collect_lines(ProviderKind::Google, response, &token_tx, &cancel, |line| {
            let Some(data) = sse_data(line) else {
                return LineEvent::Skip;
            };
            let Ok(chunk) = serde_json::from_str::<StreamChunk>(data) else {
                return LineEvent::Skip;
            };

            let mut text = String::new();
            let mut finished = false;
            for candidate in chunk.candidates.into_iter().take(1) {
                if let Some(content) = candidate.content {
                    for part in content.parts {
                        if let Some(t) = part.text {
                            text.push_str(&t);
                        }
                    }
                }
                finished = candidate.finish_reason.is_some();
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
        "google"
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
