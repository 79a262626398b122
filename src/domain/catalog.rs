// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use super::ProviderConfig;

/// A selectable model on a configured provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    /// `<provider name>:<model>`
    pub unique_id: String,
    pub model_name: String,
    pub provider_name: String,
    pub provider: ProviderConfig,
}

impl ModelOption {
    pub fn new(provider: &ProviderConfig, model: &str) -> Self {
        Self {
            unique_id: Self::make_id(&provider.name, model),
            model_name: model.to_string(),
            provider_name: provider.name.clone(),
            provider: provider.clone(),
        }
    }

    pub fn make_id(provider_name: &str, model: &str) -> String {
        format!("{provider_name}:{model}")
    }
}

/// Options from one provider, as shown in a listing.
#[derive(Debug)]
pub struct ProviderGroup<'a> {
    pub provider_name: &'a str,
    pub models: Vec<&'a ModelOption>,
}

/// Every model offered by the configured providers.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    options: Vec<ModelOption>,
}

impl ModelCatalog {
    pub fn from_providers(providers: &[ProviderConfig]) -> Self {
        let options = providers
            .iter()
            .flat_map(|p| {
                p.offered_models()
                    .into_iter()
                    .map(move |m| ModelOption::new(p, &m))
            })
            .collect();
        Self { options }
    }

    pub fn options(&self) -> &[ModelOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn find(&self, unique_id: &str) -> Option<&ModelOption> {
        self.options.iter().find(|o| o.unique_id == unique_id)
    }

    /// Accepts a unique id or a bare model name (first provider wins).
    pub fn resolve(&self, spec: &str) -> Option<&ModelOption> {
        let spec = spec.trim();
        self.find(spec)
            .or_else(|| self.options.iter().find(|o| o.model_name == spec))
    }

    pub fn unique_ids(&self) -> Vec<String> {
        self.options.iter().map(|o| o.unique_id.clone()).collect()
    }

    pub fn grouped(&self) -> Vec<ProviderGroup<'_>> {
        self.search("")
    }

    /// Groups by provider, keeping providers whose name or any model name
    /// contains `term`. A provider-name hit lists all of its models.
    pub fn search(&self, term: &str) -> Vec<ProviderGroup<'_>> {
        let term = term.trim().to_lowercase();
        let mut groups: Vec<ProviderGroup<'_>> = Vec::new();

        for option in &self.options {
            let provider_match = option.provider_name.to_lowercase().contains(&term);
            let model_match = option.model_name.to_lowercase().contains(&term);
            if !(term.is_empty() || provider_match || model_match) {
                continue;
            }

            match groups
                .iter_mut()
                .find(|g| g.provider_name == option.provider_name)
            {
                Some(group) => group.models.push(option),
                None => groups.push(ProviderGroup {
                    provider_name: &option.provider_name,
                    models: vec![option],
                }),
            }
        }

        groups
    }
}
