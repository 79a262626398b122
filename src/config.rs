// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Cli;
use crate::domain::{ModelCatalog, ModelOption, ModelSelection, ProviderConfig, ProviderKind};
use crate::error::{Error, Result};
use crate::services::llm::GenerationSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Global default model: `<provider>:<model>` or a bare model name
    #[serde(default)]
    pub default_model: Option<String>,

    /// Target languages used when none are given on the command line
    #[serde(default)]
    pub targets: Vec<String>,

    /// Request timeout in seconds (default 1800)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum tokens to generate (default 4096)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature, provider default when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub providers: Vec<ProviderConfig>,

    /// Per-language model overrides: language -> model id
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30 * 60
}
fn default_max_tokens() -> u32 {
    4096
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: None,
            targets: Vec::new(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: None,
            providers: Vec::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.prism.toml in the working directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".prism.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        // User-level config
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            figment = figment.merge(Toml::file(&path));
        }

        // PRISM_TIMEOUT_SECS, PRISM_DEFAULT_MODEL, PRISM_OVERRIDES__JAPANESE, ...
        figment = figment.merge(Env::prefixed("PRISM_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.apply_cli(cli)?;
        config.register_models();
        config.resolve_api_keys();
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "prism").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Fold command-line selections into the loaded config.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        let mut preferred: Option<String> = None;

        if let Some(ref p) = cli.provider {
            let kind: ProviderKind = p.parse()?;
            let name = match self
                .providers
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(p) || c.kind == kind)
            {
                Some(existing) => existing.name.clone(),
                None => {
                    self.providers.push(ProviderConfig::for_kind(kind));
                    kind.as_str().to_string()
                }
            };
            preferred = Some(name);
        }

        if self.providers.is_empty() {
            let fallback = ProviderConfig::for_kind(ProviderKind::default());
            preferred = Some(fallback.name.clone());
            self.providers.push(fallback);
        }

        match (cli.model.as_deref(), preferred.as_deref()) {
            (Some(model), Some(provider)) if !self.is_unique_id(model) => {
                self.default_model = Some(ModelOption::make_id(provider, model));
            }
            (Some(model), _) => self.default_model = Some(model.to_string()),
            (None, Some(provider)) => {
                self.default_model = self
                    .providers
                    .iter()
                    .find(|c| c.name == provider)
                    .and_then(|c| c.offered_models().into_iter().next())
                    .map(|m| ModelOption::make_id(provider, &m));
            }
            (None, None) => {}
        }

        let targets: Vec<String> = cli
            .to
            .iter()
            .flat_map(|t| t.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        if !targets.is_empty() {
            self.targets = targets;
        }

        for spec in &cli.overrides {
            let Some((language, model)) = spec.split_once('=') else {
                return Err(Error::Config(format!(
                    "override must look like LANGUAGE=MODEL, got '{spec}'"
                )));
            };
            let (language, model) = (language.trim(), model.trim());
            if language.is_empty() || model.is_empty() {
                return Err(Error::Config(format!(
                    "override must look like LANGUAGE=MODEL, got '{spec}'"
                )));
            }
            self.overrides.insert(language.to_string(), model.to_string());
        }

        Ok(())
    }

    fn is_unique_id(&self, spec: &str) -> bool {
        spec.split_once(':')
            .is_some_and(|(prefix, _)| self.providers.iter().any(|p| p.name == prefix))
    }

    /// Add models named as `<provider>:<model>` in `default_model` or
    /// `overrides` to that provider's offered list.
    pub fn register_models(&mut self) {
        let specs: Vec<String> = self
            .default_model
            .iter()
            .chain(self.overrides.values())
            .cloned()
            .collect();

        for spec in specs {
            let spec = spec.trim();
            let (provider, model) = match spec.split_once(':') {
                Some((prefix, model)) if self.providers.iter().any(|p| p.name == prefix) => {
                    (prefix.to_string(), model.to_string())
                }
                // Bare names must already be offered; anything else is left
                // for selection to report as not found.
                _ => continue,
            };

            if let Some(entry) = self.providers.iter_mut().find(|p| p.name == provider) {
                let mut models = entry.offered_models();
                if !models.contains(&model) {
                    debug!(provider = %entry.name, %model, "registering model");
                    models.push(model);
                }
                entry.models = models;
            }
        }
    }

    /// Fill missing keys from the provider's conventional env var, then the
    /// OS keychain.
    pub fn resolve_api_keys(&mut self) {
        for provider in &mut self.providers {
            if provider.has_api_key() || !provider.kind.requires_api_key() {
                continue;
            }

            provider.api_key = provider
                .kind
                .api_key_env()
                .and_then(|var| std::env::var(var).ok())
                .filter(|k| !k.trim().is_empty());

            #[cfg(feature = "secure-storage")]
            if provider.api_key.is_none()
                && let Ok(entry) = keyring::Entry::new("prism", &provider.name)
                && let Ok(key) = entry.get_password()
            {
                provider.api_key = Some(key);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            return Err(Error::Config("at least one provider is required".into()));
        }

        let mut names: Vec<&str> = Vec::new();
        for provider in &self.providers {
            let name = provider.name.trim();
            if name.is_empty() {
                return Err(Error::Config("provider name cannot be empty".into()));
            }
            if name.contains(':') {
                return Err(Error::Config(format!(
                    "provider name '{name}' cannot contain ':'"
                )));
            }
            if names.contains(&name) {
                return Err(Error::Config(format!("duplicate provider name '{name}'")));
            }
            names.push(name);

            if let Some(ref base_url) = provider.base_url {
                let parsed = url::Url::parse(base_url).map_err(|e| {
                    Error::Config(format!("provider '{name}': invalid base_url '{base_url}': {e}"))
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(Error::Config(format!(
                        "provider '{name}': base_url must start with http:// or https://, got '{base_url}'"
                    )));
                }
            }

            if provider.kind == ProviderKind::Workers
                && provider.base_url.is_none()
                && provider.account_id.as_deref().is_none_or(|a| a.trim().is_empty())
            {
                return Err(Error::Config(format!(
                    "provider '{name}' (workers) requires account_id"
                )));
            }
        }

        if !(1..=86_400).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–86400, got {}",
                self.timeout_secs
            )));
        }

        if !(1..=200_000).contains(&self.max_tokens) {
            return Err(Error::Config(format!(
                "max_tokens must be 1–200000, got {}",
                self.max_tokens
            )));
        }

        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {t}"
            )));
        }

        Ok(())
    }

    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::from_providers(&self.providers)
    }

    /// Resolve the global default and overrides against `catalog`.
    pub fn selection(&self, catalog: &ModelCatalog) -> Result<ModelSelection> {
        let not_found = |model: &str| Error::ModelNotFound {
            model: model.to_string(),
            available: catalog.unique_ids(),
        };

        let default_id = match self.default_model.as_deref() {
            Some(spec) => catalog
                .resolve(spec)
                .map(|o| o.unique_id.clone())
                .ok_or_else(|| not_found(spec))?,
            None => catalog
                .options()
                .first()
                .map(|o| o.unique_id.clone())
                .ok_or_else(|| {
                    Error::Config(
                        "no models configured; set default_model or list models for a provider"
                            .into(),
                    )
                })?,
        };

        let mut selection = ModelSelection::new(default_id);
        for (language, spec) in &self.overrides {
            let option = catalog.resolve(spec).ok_or_else(|| not_found(spec))?;
            selection.set_override(language, Some(option.unique_id.clone()));
        }
        Ok(selection)
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            timeout_secs: self.timeout_secs,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Create default config file with secure permissions.
    ///
    /// An existing file is only replaced when `overwrite` is set.
    pub fn create_default(overwrite: bool) -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        if path.exists() && !overwrite {
            return Err(Error::Config(format!(
                "config already exists at {}",
                path.display()
            )));
        }
        let content = r#"# Prism Translate Configuration

# Global default model as <provider name>:<model>
default_model = "openai:gpt-4o-mini"

# Languages to translate into when --to is not given
targets = ["Japanese", "French"]

# Request timeout in seconds (default: 30 minutes)
# timeout_secs = 1800

# Maximum tokens the model may generate
# max_tokens = 4096

# temperature = 0.3

# Provider types: openai, custom, google, anthropic, mistral, xai, cohere,
# groq, deepseek, together, fireworks, deepinfra, perplexity, cerebras,
# ollama, zhipu, workers, openrouter
[[providers]]
name = "openai"
type = "openai"
# api_key = "sk-..."   # or OPENAI_API_KEY, or `prism set-key openai`
models = ["gpt-4o-mini", "gpt-4o"]

[[providers]]
name = "local"
type = "ollama"
# base_url = "http://localhost:11434"
models = ["llama3.2"]

# OpenAI-compatible endpoint (Kimi, Qwen, MiniMax, Doubao, ...)
# [[providers]]
# name = "kimi"
# type = "custom"
# base_url = "https://api.moonshot.cn/v1"
# models = ["moonshot-v1-8k"]

# Per-language model overrides
[overrides]
# Japanese = "local:llama3.2"
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}
