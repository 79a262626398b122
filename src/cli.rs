// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug, Default)]
#[command(name = "prism")]
#[command(version)]
#[command(about = "Translate text into several languages at once with LLMs", long_about = None)]
pub struct Cli {
    /// Text to translate (reads stdin when omitted or "-")
    pub text: Option<String>,

    /// Target languages, comma separated or repeated (e.g. --to ja,fr)
    #[arg(short = 't', long = "to", value_name = "LANG")]
    pub to: Vec<String>,

    /// Provider type to use when none is configured (openai, anthropic, ollama, ...)
    #[arg(short, long, env = "PRISM_PROVIDER")]
    pub provider: Option<String>,

    /// Global default model, as <provider>:<model> or a bare model name
    #[arg(short, long, env = "PRISM_MODEL")]
    pub model: Option<String>,

    /// Per-language model override, e.g. -o Japanese=groq:llama-3.3-70b-versatile
    #[arg(short = 'o', long = "override", value_name = "LANG=MODEL")]
    pub overrides: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the prompt sent to the LLM
    #[arg(long)]
    pub show_prompt: bool,

    /// Stream the raw model output to stderr
    #[arg(long)]
    pub show_raw: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// List configured models grouped by provider
    Models {
        /// Only show providers or models containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List known target languages
    Languages,
    /// Check provider keys and connectivity
    Doctor,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Store an API key in the system keychain
    #[cfg(feature = "secure-storage")]
    SetKey {
        /// Provider name as configured
        provider: String,
    },
    /// Check whether an API key is stored in the system keychain
    #[cfg(feature = "secure-storage")]
    GetKey {
        /// Provider name as configured
        provider: String,
    },
}
