// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{GenerationSettings, LineEvent, check_status, collect_lines, send};
use crate::domain::{ProviderConfig, ProviderKind};
use crate::error::{Error, Result};

pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
    temperature: Option<f32>,
    num_predict: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    done: bool,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaProvider {
    pub fn new(provider: &ProviderConfig, model: String, settings: &GenerationSettings) -> Self {
        // Accept both "http://host:11434" and "http://host:11434/api"
        let host = super::base_url(provider);
        let host = host.strip_suffix("/api").unwrap_or(&host).to_string();

        Self {
            client: super::http_client(settings),
            host,
            model,
            temperature: settings.temperature,
            num_predict: settings.max_tokens,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Names of locally pulled models.
    pub async fn health_check(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.host);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|_| Error::OllamaNotRunning {
                host: self.host.clone(),
            })?;
        let response = check_status(ProviderKind::Ollama, response).await?;

        let tags: TagsResponse = response.json().await.map_err(|e| Error::Provider {
            provider: "ollama".into(),
            message: e.to_string(),
        })?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    pub async fn verify_model(&self) -> Result<()> {
        let available = self.health_check().await?;

        // "llama3.2" is served as "llama3.2:latest"
        let found = available.iter().any(|name| {
            name == &self.model || name.strip_suffix(":latest") == Some(self.model.as_str())
        });

        if !found {
            return Err(Error::ModelNotFound {
                model: self.model.clone(),
                available,
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
        let url = format!("{}/api/generate", self.host);
        debug!(model = %self.model, %url, "sending ollama generate request");

        let request = self.client.post(&url).json(&GenerateRequest {
            model: &self.model,
            system,
            prompt,
            stream: true,
            options: GenerateOptions {
                num_predict: self.num_predict,
                temperature: self.temperature,
            },
        });
        let response = send(ProviderKind::Ollama, request, &cancel, |e| {
            if e.is_connect() {
                Error::OllamaNotRunning {
                    host: self.host.clone(),
                }
            } else {
                super::request_error(ProviderKind::Ollama, e)
            }
        })
        .await?;

        // Newline-delimited JSON
        collect_lines(ProviderKind::Ollama, response, &token_tx, &cancel, |line| {
            match serde_json::from_str::<GenerateResponse>(line) {
                Ok(resp) if resp.done => {
                    LineEvent::Done(Some(resp.response).filter(|r| !r.is_empty()))
                }
                Ok(resp) if !resp.response.is_empty() => LineEvent::Token(resp.response),
                _ => LineEvent::Skip,
            }
        })
        .await
    }

    pub fn name(&self) -> &str {
        "ollama"
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
