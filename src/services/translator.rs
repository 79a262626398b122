// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::llm::{self, GenerationSettings};
use super::parser::ResponseParser;
use super::prompt::{self, SYSTEM_PROMPT};
use crate::domain::{
    Language, ModelCatalog, ModelOption, ModelSelection, TranslationRequest, TranslationResult,
};
use crate::error::{Error, Result};

/// Translate one request with a single provider call.
pub async fn translate_text(
    request: &TranslationRequest,
    settings: &GenerationSettings,
    token_tx: mpsc::Sender<String>,
    cancel: CancellationToken,
) -> Result<Vec<TranslationResult>> {
    if request.text.trim().is_empty() {
        return Err(Error::EmptyText);
    }
    if request.target_languages.is_empty() {
        return Err(Error::NoTargetLanguages);
    }

    let provider = llm::create_provider(&request.provider, &request.model_id, settings)?;
    let user_prompt = prompt::user_prompt(&request.text, &request.target_languages);

    info!(
        provider = provider.name(),
        model = provider.model(),
        languages = request.target_languages.len(),
        "requesting translation"
    );

    let outcome = async {
        let raw = provider
            .generate(SYSTEM_PROMPT, &user_prompt, token_tx, cancel)
            .await?;

        if raw.trim().is_empty() {
            return Err(Error::EmptyResponse {
                provider: provider.name().into(),
            });
        }

        debug!(raw_len = raw.len(), "parsing model response");
        ResponseParser::parse(&raw)
    }
    .await;

    match outcome {
        Err(Error::Cancelled) => Err(Error::Cancelled),
        Err(e) => {
            debug!(provider = provider.name(), error = %e, "translation failed");
            Err(e)
        }
        ok => ok,
    }
}

/// Target languages that share one model, and so one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob<'a> {
    pub model: &'a ModelOption,
    pub languages: Vec<String>,
}

impl TranslationJob<'_> {
    pub fn to_request(&self, text: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.to_string(),
            target_languages: self.languages.clone(),
            provider: self.model.provider.clone(),
            model_id: self.model.model_name.clone(),
        }
    }
}

/// Canonical names of `targets`, blanks and duplicates dropped.
fn canonical_targets(targets: &[String]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for target in targets {
        let language = Language::canonical_name(target);
        if language.is_empty()
            || languages
                .iter()
                .any(|l| l.to_lowercase() == language.to_lowercase())
        {
            continue;
        }
        languages.push(language);
    }
    languages
}

/// Group targets by effective model, in order of first appearance.
pub fn plan<'a>(
    catalog: &'a ModelCatalog,
    selection: &ModelSelection,
    targets: &[String],
) -> Result<Vec<TranslationJob<'a>>> {
    let mut jobs: Vec<TranslationJob<'a>> = Vec::new();

    for language in canonical_targets(targets) {
        let model_id = selection.effective(&language);
        let model = catalog
            .resolve(model_id)
            .ok_or_else(|| Error::ModelNotFound {
                model: model_id.to_string(),
                available: catalog.unique_ids(),
            })?;

        match jobs.iter_mut().find(|j| j.model.unique_id == model.unique_id) {
            Some(job) => job.languages.push(language),
            None => jobs.push(TranslationJob {
                model,
                languages: vec![language],
            }),
        }
    }

    if jobs.is_empty() {
        return Err(Error::NoTargetLanguages);
    }

    debug!(jobs = jobs.len(), "translation planned");
    Ok(jobs)
}

/// Runs a planned translation, one provider call per model.
pub struct Translator {
    settings: GenerationSettings,
    cancel: CancellationToken,
}

impl Translator {
    pub fn new(settings: GenerationSettings, cancel: CancellationToken) -> Self {
        Self { settings, cancel }
    }

    pub async fn translate(
        &self,
        text: &str,
        targets: &[String],
        catalog: &ModelCatalog,
        selection: &ModelSelection,
        token_tx: mpsc::Sender<String>,
    ) -> Result<Vec<TranslationResult>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        let jobs = plan(catalog, selection, targets)?;
        let mut results = Vec::new();

        for job in &jobs {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            debug!(
                model = %job.model.unique_id,
                languages = ?job.languages,
                "running translation job"
            );
            let request = job.to_request(text);
            let batch =
                translate_text(&request, &self.settings, token_tx.clone(), self.cancel.clone())
                    .await?;
            results.extend(batch);
        }

        sort_by_targets(&mut results, &canonical_targets(targets));
        Ok(results)
    }
}

/// Stable sort by position in `targets`; unmatched results go last.
pub fn sort_by_targets(results: &mut [TranslationResult], targets: &[String]) {
    let position = |r: &TranslationResult| {
        let language = Language::canonical_name(&r.language).to_lowercase();
        let code = Language::canonical_name(&r.code).to_lowercase();
        targets
            .iter()
            .map(|t| t.to_lowercase())
            .position(|t| t == language || t == code)
            .unwrap_or(usize::MAX)
    };
    results.sort_by_key(position);
}
