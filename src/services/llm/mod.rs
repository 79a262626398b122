// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

pub mod anthropic;
pub mod cohere;
pub mod gemini;
pub mod ollama;
pub mod openai;

use crate::domain::{ProviderConfig, ProviderKind, Transport};
use crate::error::{Error, Result};

/// Request knobs shared by every transport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 1800,
            max_tokens: 4096,
            temperature: None,
        }
    }
}

pub enum LlmProvider {
    OpenAi(openai::OpenAiProvider),
    Anthropic(anthropic::AnthropicProvider),
    Gemini(gemini::GeminiProvider),
    Cohere(cohere::CohereProvider),
    Ollama(ollama::OllamaProvider),
}

impl LlmProvider {
    /// Generate with streaming tokens and cancellation support
    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
        token_tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<String> {
        match self {
            Self::OpenAi(p) => p.generate(system, prompt, token_tx, cancel).await,
            Self::Anthropic(p) => p.generate(system, prompt, token_tx, cancel).await,
            Self::Gemini(p) => p.generate(system, prompt, token_tx, cancel).await,
            Self::Cohere(p) => p.generate(system, prompt, token_tx, cancel).await,
            Self::Ollama(p) => p.generate(system, prompt, token_tx, cancel).await,
        }
    }

    /// Cheap reachability/credential check before the real request.
    pub async fn verify(&self) -> Result<()> {
        match self {
            Self::OpenAi(p) => p.verify_connection().await,
            Self::Anthropic(p) => p.verify_connection().await,
            Self::Gemini(p) => p.verify_connection().await,
            Self::Cohere(p) => p.verify_connection().await,
            Self::Ollama(p) => p.verify_model().await,
        }
    }

    /// Provider kind, used as the label in errors and logs.
    pub fn name(&self) -> &str {
        match self {
            Self::OpenAi(p) => p.name(),
            Self::Anthropic(p) => p.name(),
            Self::Gemini(p) => p.name(),
            Self::Cohere(p) => p.name(),
            Self::Ollama(p) => p.name(),
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(p) => p.model(),
            Self::Anthropic(p) => p.model(),
            Self::Gemini(p) => p.model(),
            Self::Cohere(p) => p.model(),
            Self::Ollama(p) => p.model(),
        }
    }
}

/// Map a provider entry and model id to a concrete client.
pub fn create_provider(
    provider: &ProviderConfig,
    model_id: &str,
    settings: &GenerationSettings,
) -> Result<LlmProvider> {
    if provider.kind.requires_api_key() && !provider.has_api_key() {
        return Err(Error::MissingApiKey {
            provider: provider.name.clone(),
            env: provider.kind.api_key_env().unwrap_or("PRISM_API_KEY").into(),
        });
    }

    let model = match model_id.trim() {
        "" => provider.kind.default_model().map(str::to_string).ok_or_else(|| {
            Error::Config(format!(
                "provider '{}' ({}) has no default model; pick one with --model",
                provider.name, provider.kind
            ))
        })?,
        m => m.to_string(),
    };

    Ok(match provider.kind.transport() {
        Transport::OpenAiChat => {
            LlmProvider::OpenAi(openai::OpenAiProvider::new(provider, model, settings)?)
        }
        Transport::Anthropic => {
            LlmProvider::Anthropic(anthropic::AnthropicProvider::new(provider, model, settings))
        }
        Transport::Gemini => {
            LlmProvider::Gemini(gemini::GeminiProvider::new(provider, model, settings))
        }
        Transport::Cohere => {
            LlmProvider::Cohere(cohere::CohereProvider::new(provider, model, settings))
        }
        Transport::Ollama => {
            LlmProvider::Ollama(ollama::OllamaProvider::new(provider, model, settings))
        }
    })
}

pub(crate) fn http_client(settings: &GenerationSettings) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Configured base URL, else the kind's default, without a trailing slash.
pub(crate) fn base_url(provider: &ProviderConfig) -> String {
    provider
        .base_url
        .as_deref()
        .or(provider.kind.default_base_url())
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string()
}

pub(crate) fn request_error(provider: ProviderKind, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Provider {
            provider: provider.to_string(),
            message: "request timed out".into(),
        }
    } else {
        Error::Provider {
            provider: provider.to_string(),
            message: e.to_string(),
        }
    }
}

/// Pass through 2xx responses; anything else becomes a provider error
/// carrying the status and body.
pub(crate) async fn check_status(provider: ProviderKind, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Provider {
        provider: provider.to_string(),
        message: format!("HTTP {status}: {body}"),
    })
}

/// Send `request` and check its status, giving up as soon as `cancel` fires.
pub(crate) async fn send<F>(
    provider: ProviderKind,
    request: RequestBuilder,
    cancel: &CancellationToken,
    on_error: F,
) -> Result<Response>
where
    F: FnOnce(reqwest::Error) -> Error,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        response = async {
            let response = request.send().await.map_err(on_error)?;
            check_status(provider, response).await
        } => response,
    }
}

/// What a single stream line contributed.
pub(crate) enum LineEvent {
    Skip,
    Token(String),
    /// Final line, possibly carrying a last token.
    Done(Option<String>),
}

/// Drive a line-delimited stream (SSE or NDJSON) to completion, forwarding
/// tokens to `token_tx`.
pub(crate) async fn collect_lines<F>(
    provider: ProviderKind,
    response: Response,
    token_tx: &mpsc::Sender<String>,
    cancel: &CancellationToken,
    mut parse_line: F,
) -> Result<String>
where
    F: FnMut(&str) -> LineEvent,
{
    let mut stream = response.bytes_stream();
    let mut full_response = String::new();

    // Chunks from bytes_stream() are not aligned to newlines or to UTF-8
    // boundaries, so only complete lines are decoded.
    let mut line_buffer: Vec<u8> = Vec::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(Error::Cancelled);
            }
            chunk = stream.next() => {
                let Some(chunk) = chunk else { break };

                let chunk = chunk.map_err(|e| request_error(provider, e))?;
                line_buffer.extend_from_slice(&chunk);

                while let Some(newline_pos) = line_buffer.iter().position(|&b| b == b'\n') {
                    let raw: Vec<u8> = line_buffer.drain(..=newline_pos).collect();
                    let line = String::from_utf8_lossy(&raw);
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match parse_line(line) {
                        LineEvent::Skip => {}
                        LineEvent::Token(text) => {
                            let _ = token_tx.send(text.clone()).await;
                            full_response.push_str(&text);
                        }
                        LineEvent::Done(last) => {
                            if let Some(text) = last {
                                let _ = token_tx.send(text.clone()).await;
                                full_response.push_str(&text);
                            }
                            return Ok(full_response.trim().to_string());
                        }
                    }
                }
            }
        }
    }

    // Stream closed without a trailing newline
    let rest = String::from_utf8_lossy(&line_buffer);
    let rest = rest.trim();
    if !rest.is_empty() {
        match parse_line(rest) {
            LineEvent::Token(text) | LineEvent::Done(Some(text)) => {
                let _ = token_tx.send(text.clone()).await;
                full_response.push_str(&text);
            }
            LineEvent::Skip | LineEvent::Done(None) => {}
        }
    }

    Ok(full_response.trim().to_string())
}

/// Payload of an SSE `data:` line, `None` for anything else.
pub(crate) fn sse_data(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}
