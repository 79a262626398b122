// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use std::io::IsTerminal;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncReadExt;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::domain::{LANGUAGES, Language, ModelSelection, TranslationResult};
use crate::error::{Error, Result};
use crate::services::llm;
use crate::services::prompt::{self, SYSTEM_PROMPT};
use crate::services::translator::{self, Translator};

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            providers = config.providers.len(),
            default_model = ?config.default_model,
            targets = ?config.targets,
            "config loaded"
        );
        let cancel_token = CancellationToken::new();
        Ok(Self {
            cli,
            config,
            cancel_token,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup Ctrl+C handler with CancellationToken
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        if let Some(ref cmd) = self.cli.command {
            return self.handle_command(cmd).await;
        }

        self.translate().await
    }

    async fn translate(&self) -> Result<()> {
        let text = self.read_text().await?;
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        if self.config.targets.is_empty() {
            return Err(Error::NoTargetLanguages);
        }

        let catalog = self.config.catalog();
        let selection = self.config.selection(&catalog)?;
        let jobs = translator::plan(&catalog, &selection, &self.config.targets)?;

        for job in &jobs {
            let names: Vec<String> = job
                .languages
                .iter()
                .map(|l| Language::display_name(l))
                .collect();
            self.print_status(&format!(
                "{} → {}",
                names.join(", "),
                style(&job.model.unique_id).bold()
            ));

            if self.cli.show_prompt {
                eprintln!("{}", style("--- SYSTEM ---").dim());
                eprintln!("{SYSTEM_PROMPT}");
                eprintln!("{}", style("--- PROMPT ---").dim());
                eprintln!("{}", prompt::user_prompt(&text, &job.languages));
                eprintln!("{}", style("--- END PROMPT ---").dim());
            }
        }

        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let (tx, mut rx) = mpsc::channel::<String>(64);
        let show_raw = self.cli.show_raw;
        let cancel_for_printer = self.cancel_token.clone();
        let print_handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel_for_printer.cancelled() => break,
                    token = rx.recv() => {
                        match token {
                            Some(t) if show_raw => eprint!("{t}"),
                            Some(_) => {}
                            None => break,
                        }
                    }
                }
            }
        });

        let spinner = (!show_raw && std::io::stderr().is_terminal()).then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Translating...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let translator = Translator::new(
            self.config.generation_settings(),
            self.cancel_token.clone(),
        );
        let outcome = translator
            .translate(&text, &self.config.targets, &catalog, &selection, tx)
            .await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        let _ = print_handle.await;
        if show_raw {
            eprintln!();
        }

        let results = outcome?;
        debug!(count = results.len(), "translations received");
        self.render(&results)
    }

    async fn read_text(&self) -> Result<String> {
        match self.cli.text.as_deref() {
            Some(text) if text != "-" => Ok(text.to_string()),
            _ => {
                if std::io::stdin().is_terminal() {
                    return Err(Error::EmptyText);
                }
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await?;
                Ok(buf.trim_end_matches(['\n', '\r']).to_string())
            }
        }
    }

    fn render(&self, results: &[TranslationResult]) -> Result<()> {
        if self.cli.json {
            let json = serde_json::to_string_pretty(results)
                .map_err(|e| Error::InvalidResponse(e.to_string()))?;
            println!("{json}");
            return Ok(());
        }

        for result in results {
            let confidence = format!("{:.0}%", result.confidence);
            let confidence = match result.confidence {
                c if c >= 80.0 => style(confidence).green(),
                c if c >= 50.0 => style(confidence).yellow(),
                _ => style(confidence).red(),
            };
            let tone = if result.tone.is_empty() {
                String::new()
            } else {
                format!("{} · ", result.tone)
            };

            println!(
                "{} {}  {}{}",
                style(&result.language).bold(),
                style(format!("({})", result.code)).dim(),
                style(tone).dim(),
                confidence
            );
            println!("  {}", result.text);
            println!();
        }
        Ok(())
    }

    async fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Init => {
                let overwrite = match Config::config_path() {
                    Some(path) if path.exists() && std::io::stdin().is_terminal() => {
                        dialoguer::Confirm::new()
                            .with_prompt(format!("{} exists. Overwrite?", path.display()))
                            .default(false)
                            .interact()?
                    }
                    _ => false,
                };
                let path = Config::create_default(overwrite)?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                self.print_config();
                Ok(())
            }
            Commands::Models { search } => {
                self.print_models(search.as_deref().unwrap_or(""));
                Ok(())
            }
            Commands::Languages => {
                for lang in LANGUAGES {
                    println!("{:<7} {:<20} {}", lang.code, lang.name, lang.native_name);
                }
                Ok(())
            }
            Commands::Doctor => self.run_doctor().await,
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "prism", &mut std::io::stdout());
                Ok(())
            }
            #[cfg(feature = "secure-storage")]
            Commands::SetKey { provider } => self.set_api_key(provider),
            #[cfg(feature = "secure-storage")]
            Commands::GetKey { provider } => self.get_api_key(provider),
        }
    }

    fn print_config(&self) {
        let config = &self.config;
        println!(
            "Default model: {}",
            config.default_model.as_deref().unwrap_or("(first listed)")
        );
        println!("Targets: {}", config.targets.join(", "));
        println!("Timeout: {}s", config.timeout_secs);
        println!("Max tokens: {}", config.max_tokens);
        match config.temperature {
            Some(t) => println!("Temperature: {t}"),
            None => println!("Temperature: (provider default)"),
        }

        for provider in &config.providers {
            println!();
            println!("[[providers]] {}", provider.name);
            println!("  type: {} ({})", provider.kind, provider.kind.display_name());
            let key = if provider.has_api_key() {
                "configured"
            } else if provider.kind.requires_api_key() {
                "MISSING"
            } else {
                "not required"
            };
            println!("  api_key: {key}");
            if let Some(ref url) = provider.base_url {
                println!("  base_url: {url}");
            }
            if let Some(ref account) = provider.account_id {
                println!("  account_id: {account}");
            }
            println!("  models: {}", provider.offered_models().join(", "));
        }

        if !config.overrides.is_empty() {
            println!();
            println!("[overrides]");
            for (language, model) in &config.overrides {
                println!("  {language} = {model}");
            }
        }
    }

    fn print_models(&self, search: &str) {
        let catalog = self.config.catalog();
        let selection = self.config.selection(&catalog).ok();
        let groups = catalog.search(search);

        if groups.is_empty() {
            eprintln!("No models found");
            return;
        }

        for group in groups {
            println!("{}", style(group.provider_name).bold().underlined());
            for option in group.models {
                let mut line = format!("  {}", option.unique_id);
                if let Some(ref selection) = selection {
                    if option.unique_id == selection.default_model() {
                        line.push_str(&format!(" {}", style("(Global Default)").dim()));
                    }
                    let languages = Self::overridden_languages(selection, &option.unique_id);
                    if !languages.is_empty() {
                        line.push_str(&format!(" {}", style(format!("[{languages}]")).cyan()));
                    }
                }
                println!("{line}");
            }
        }
    }

    fn overridden_languages(selection: &ModelSelection, unique_id: &str) -> String {
        selection
            .overrides()
            .filter(|(_, model)| *model == unique_id)
            .map(|(language, _)| language)
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn run_doctor(&self) -> Result<()> {
        eprintln!("{} Running diagnostics...\n", style("→").cyan());

        eprintln!("{}", style("Configuration").bold().underlined());
        eprintln!("  Timeout:     {}s", self.config.timeout_secs);
        if let Some(ref path) = Config::config_path() {
            let status = if path.exists() { "found" } else { "not found" };
            eprintln!("  Config file: {} ({})", path.display(), status);
        }
        let catalog = self.config.catalog();
        match self.config.selection(&catalog) {
            Ok(selection) => eprintln!("  Default:     {}", selection.default_model()),
            Err(e) => eprintln!("  Default:     {}: {}", style("ERROR").red().bold(), e),
        }
        eprintln!();

        eprintln!("{}", style("Providers").bold().underlined());
        let settings = self.config.generation_settings();
        for provider in &self.config.providers {
            eprint!("  {} ({}): ", provider.name, provider.kind);

            let model = provider.offered_models().into_iter().next().unwrap_or_default();
            let client = match llm::create_provider(provider, &model, &settings) {
                Ok(client) => client,
                Err(Error::MissingApiKey { env, .. }) => {
                    eprintln!("{} (set {})", style("API KEY MISSING").red().bold(), env);
                    continue;
                }
                Err(e) => {
                    eprintln!("{}: {}", style("ERROR").red().bold(), e);
                    continue;
                }
            };

            match client.verify().await {
                Ok(()) => eprintln!("{}", style("OK").green().bold()),
                Err(Error::OllamaNotRunning { .. }) => {
                    eprintln!("{}", style("NOT RUNNING").red().bold());
                    eprintln!("    Start with: {}", style("ollama serve").yellow());
                }
                Err(Error::ModelNotFound { ref model, .. }) => {
                    eprintln!("{}", style("connected").green());
                    eprintln!(
                        "    Model '{}': {}  pull with: {}",
                        model,
                        style("NOT FOUND").red().bold(),
                        style(format!("ollama pull {model}")).yellow()
                    );
                }
                Err(e) => eprintln!("{}: {}", style("ERROR").red().bold(), e),
            }
        }

        eprintln!();
        eprintln!("{} Diagnostics complete.", style("✓").green().bold());
        Ok(())
    }

    // ─── Keyring Commands ───

    #[cfg(feature = "secure-storage")]
    fn keyed_provider(&self, provider: &str) -> Result<String> {
        let Some(entry) = self.config.providers.iter().find(|p| p.name == provider) else {
            return Err(Error::Config(format!(
                "No provider named '{provider}' is configured"
            )));
        };
        if !entry.kind.requires_api_key() {
            return Err(Error::Config(format!(
                "Provider '{provider}' ({}) does not use an API key",
                entry.kind
            )));
        }
        Ok(entry.name.clone())
    }

    #[cfg(feature = "secure-storage")]
    fn set_api_key(&self, provider: &str) -> Result<()> {
        let name = self.keyed_provider(provider)?;

        eprintln!(
            "Enter API key for {} (input will be hidden):",
            style(&name).bold()
        );

        let key = dialoguer::Password::new()
            .with_prompt("API key")
            .interact()?;

        if key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".into()));
        }

        let entry =
            keyring::Entry::new("prism", &name).map_err(|e| Error::Keyring(e.to_string()))?;
        entry
            .set_password(key.trim())
            .map_err(|e| Error::Keyring(e.to_string()))?;

        eprintln!("{} API key stored for {}", style("✓").green().bold(), name);
        Ok(())
    }

    #[cfg(feature = "secure-storage")]
    fn get_api_key(&self, provider: &str) -> Result<()> {
        let name = self.keyed_provider(provider)?;

        let entry =
            keyring::Entry::new("prism", &name).map_err(|e| Error::Keyring(e.to_string()))?;

        match entry.get_password() {
            Ok(_) => {
                eprintln!(
                    "{} API key for {} is stored in keychain",
                    style("✓").green().bold(),
                    name
                );
            }
            Err(keyring::Error::NoEntry) => {
                eprintln!(
                    "{} No API key found for {} in keychain",
                    style("✗").red().bold(),
                    name
                );
                eprintln!(
                    "  Store one with: {}",
                    style(format!("prism set-key {name}")).yellow()
                );
            }
            Err(e) => return Err(Error::Keyring(e.to_string())),
        }

        Ok(())
    }

    // ─── Output Helpers ───

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }
}
