// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("API key is missing for provider '{provider}'")]
    #[diagnostic(
        code(prism::provider::missing_key),
        help("Set api_key in the [[providers]] entry, export {env}, or run: prism set-key {provider}")
    )]
    MissingApiKey { provider: String, env: String },

    #[error("No response from AI model ({provider})")]
    #[diagnostic(code(prism::response::empty))]
    EmptyResponse { provider: String },

    #[error("Could not extract JSON from AI response")]
    #[diagnostic(
        code(prism::response::no_json),
        help("The model did not return a JSON array. Try a larger or instruction-tuned model")
    )]
    JsonNotFound,

    #[error("Invalid translation payload: {0}")]
    #[diagnostic(code(prism::response::invalid))]
    InvalidResponse(String),

    #[error("Nothing to translate")]
    #[diagnostic(
        code(prism::input::empty),
        help("Pass the text as an argument or pipe it on stdin")
    )]
    EmptyText,

    #[error("No target languages selected")]
    #[diagnostic(
        code(prism::input::no_targets),
        help("Pick languages with --to ja,fr or set `targets` in the config file")
    )]
    NoTargetLanguages,

    #[error("Unknown provider type '{0}'")]
    #[diagnostic(
        code(prism::provider::unknown),
        help("Supported types: openai, custom, google, anthropic, mistral, xai, cohere, groq, deepseek, together, fireworks, deepinfra, perplexity, cerebras, ollama, zhipu, workers, openrouter")
    )]
    UnknownProvider(String),

    #[error("Model '{model}' not found. Available: {}", available.join(", "))]
    #[diagnostic(
        code(prism::model::not_found),
        help("Use a unique id of the form <provider>:<model>, see `prism models`")
    )]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },

    #[error("Cannot connect to Ollama at {host}")]
    #[diagnostic(
        code(prism::ollama::not_running),
        help("Start Ollama with: ollama serve")
    )]
    OllamaNotRunning { host: String },

    #[error("Provider '{provider}' error: {message}")]
    #[diagnostic(code(prism::provider::error))]
    Provider { provider: String, message: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(prism::config::error))]
    Config(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[cfg(feature = "secure-storage")]
    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(prism::keyring::error),
        help("Check your system keychain configuration")
    )]
    Keyring(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
