// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Wire protocol a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `POST {base}/chat/completions` with SSE streaming
    OpenAiChat,
    /// `POST {base}/messages`
    Anthropic,
    /// `POST {base}/models/{model}:streamGenerateContent?alt=sse`
    Gemini,
    /// `POST {base}/chat` (v2 API)
    Cohere,
    /// `POST {host}/api/generate` with NDJSON streaming
    Ollama,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAI,
    Custom,
    Google,
    Anthropic,
    Mistral,
    Xai,
    Cohere,
    Groq,
    DeepSeek,
    Together,
    Fireworks,
    DeepInfra,
    Perplexity,
    Cerebras,
    Ollama,
    Zhipu,
    Workers,
    OpenRouter,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 18] = [
        Self::OpenAI,
        Self::Custom,
        Self::Google,
        Self::Anthropic,
        Self::Mistral,
        Self::Xai,
        Self::Cohere,
        Self::Groq,
        Self::DeepSeek,
        Self::Together,
        Self::Fireworks,
        Self::DeepInfra,
        Self::Perplexity,
        Self::Cerebras,
        Self::Ollama,
        Self::Zhipu,
        Self::Workers,
        Self::OpenRouter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Custom => "custom",
            Self::Google => "google",
            Self::Anthropic => "anthropic",
            Self::Mistral => "mistral",
            Self::Xai => "xai",
            Self::Cohere => "cohere",
            Self::Groq => "groq",
            Self::DeepSeek => "deepseek",
            Self::Together => "together",
            Self::Fireworks => "fireworks",
            Self::DeepInfra => "deepinfra",
            Self::Perplexity => "perplexity",
            Self::Cerebras => "cerebras",
            Self::Ollama => "ollama",
            Self::Zhipu => "zhipu",
            Self::Workers => "workers",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Model used when a request does not name one.
    ///
    /// `openai` and `custom` have no default: OpenAI-compatible endpoints
    /// host arbitrary models, so the caller has to pick.
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            Self::Google => Some("gemini-2.0-flash"),
            Self::Anthropic => Some("claude-3-5-sonnet-20241022"),
            Self::Mistral => Some("mistral-large-latest"),
            Self::Xai => Some("grok-2"),
            Self::Cohere => Some("command-r-plus"),
            Self::Groq => Some("llama-3.3-70b-versatile"),
            Self::DeepSeek => Some("deepseek-chat"),
            Self::Together => Some("meta-llama/Llama-3.3-70B-Instruct-Turbo"),
            Self::Fireworks => Some("accounts/fireworks/models/llama-v3p3-70b-instruct"),
            Self::DeepInfra => Some("meta-llama/Llama-3.3-70B-Instruct"),
            Self::Perplexity => Some("sonar-pro"),
            Self::Cerebras => Some("llama-3.3-70b"),
            Self::Ollama => Some("llama3.2"),
            Self::Zhipu => Some("glm-4-plus"),
            Self::Workers => Some("@cf/meta/llama-3.3-70b-instruct-fp8-fast"),
            Self::OpenRouter => Some("openai/gpt-4o"),
            Self::OpenAI | Self::Custom => None,
        }
    }

    pub fn transport(&self) -> Transport {
        match self {
            Self::Anthropic => Transport::Anthropic,
            Self::Google => Transport::Gemini,
            Self::Cohere => Transport::Cohere,
            Self::Ollama => Transport::Ollama,
            _ => Transport::OpenAiChat,
        }
    }

    /// Endpoint used when the provider entry has no `base_url`.
    ///
    /// Workers AI is account-scoped and has no static endpoint; see
    /// [`ProviderKind::workers_base_url`].
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Self::OpenAI | Self::Custom => Some("https://api.openai.com/v1"),
            Self::Google => Some("https://generativelanguage.googleapis.com/v1beta"),
            Self::Anthropic => Some("https://api.anthropic.com/v1"),
            Self::Mistral => Some("https://api.mistral.ai/v1"),
            Self::Xai => Some("https://api.x.ai/v1"),
            Self::Cohere => Some("https://api.cohere.com/v2"),
            Self::Groq => Some("https://api.groq.com/openai/v1"),
            Self::DeepSeek => Some("https://api.deepseek.com/v1"),
            Self::Together => Some("https://api.together.xyz/v1"),
            Self::Fireworks => Some("https://api.fireworks.ai/inference/v1"),
            Self::DeepInfra => Some("https://api.deepinfra.com/v1/openai"),
            Self::Perplexity => Some("https://api.perplexity.ai"),
            Self::Cerebras => Some("https://api.cerebras.ai/v1"),
            Self::Ollama => Some("http://localhost:11434"),
            Self::Zhipu => Some("https://open.bigmodel.cn/api/paas/v4"),
            Self::OpenRouter => Some("https://openrouter.ai/api/v1"),
            Self::Workers => None,
        }
    }

    pub fn workers_base_url(account_id: &str) -> String {
        format!("https://api.cloudflare.com/client/v4/accounts/{account_id}/ai/v1")
    }

    /// Conventional environment variable holding this provider's key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::OpenAI | Self::Custom => Some("OPENAI_API_KEY"),
            Self::Google => Some("GOOGLE_GENERATIVE_AI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Mistral => Some("MISTRAL_API_KEY"),
            Self::Xai => Some("XAI_API_KEY"),
            Self::Cohere => Some("COHERE_API_KEY"),
            Self::Groq => Some("GROQ_API_KEY"),
            Self::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Self::Together => Some("TOGETHER_AI_API_KEY"),
            Self::Fireworks => Some("FIREWORKS_API_KEY"),
            Self::DeepInfra => Some("DEEPINFRA_API_KEY"),
            Self::Perplexity => Some("PERPLEXITY_API_KEY"),
            Self::Cerebras => Some("CEREBRAS_API_KEY"),
            Self::Zhipu => Some("ZHIPU_API_KEY"),
            Self::Workers => Some("CLOUDFLARE_API_TOKEN"),
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
            Self::Ollama => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }

    /// Human-readable label for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Custom => "OpenAI-compatible",
            Self::Google => "Google Gemini",
            Self::Anthropic => "Anthropic",
            Self::Mistral => "Mistral",
            Self::Xai => "xAI",
            Self::Cohere => "Cohere",
            Self::Groq => "Groq",
            Self::DeepSeek => "DeepSeek",
            Self::Together => "Together AI",
            Self::Fireworks => "Fireworks",
            Self::DeepInfra => "DeepInfra",
            Self::Perplexity => "Perplexity",
            Self::Cerebras => "Cerebras",
            Self::Ollama => "Ollama",
            Self::Zhipu => "Zhipu AI",
            Self::Workers => "Cloudflare Workers AI",
            Self::OpenRouter => "OpenRouter",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == needle)
            .ok_or_else(|| Error::UnknownProvider(s.to_string()))
    }
}

/// A configured provider endpoint.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// User-facing label, unique within a config. Forms the prefix of
    /// unique model ids, so it cannot contain `:`.
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: ProviderKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Cloudflare account id (Workers AI only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Provider entry named after its kind, with no key or models.
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            name: kind.as_str().to_string(),
            kind,
            api_key: None,
            base_url: None,
            account_id: None,
            models: Vec::new(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Models offered by this provider, falling back to the kind default.
    pub fn offered_models(&self) -> Vec<String> {
        if !self.models.is_empty() {
            return self.models.clone();
        }
        self.kind
            .default_model()
            .map(|m| vec![m.to_string()])
            .unwrap_or_default()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("models", &self.models)
            .finish()
    }
}
