use serde::Serialize;
use std::collections::HashMap;

use super::library;
use super::template::{InvocationStrategy, OptionalParam, Template};

/// Immutable mapping from prompt type to template
///
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: HashMap<String, Template>,
}

/// Public description of one catalog entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub prompt_type: String,
    pub strategy: InvocationStrategy,
    pub required: Vec<String>,
    pub optional: Vec<OptionalParam>,
}

impl TemplateCatalog {
    /// The catalog backing the assistant
    pub fn standard() -> Self {
        Self::from_entries(library::all())
    }

    /// Build a catalog from explicit entries
    pub fn from_entries<K>(entries: impl IntoIterator<Item = (K, Template)>) -> Self
    where
        K: Into<String>,
    {
        let mut templates = HashMap::new();
        for (key, template) in entries {
            let key = key.into();
            if templates.contains_key(&key) {
                tracing::warn!("Duplicate prompt type {} in catalog, keeping the last one", key);
            }
            templates.insert(key, template);
        }
        Self { templates }
    }

    /// Look up a template by prompt type
    pub fn lookup(&self, prompt_type: &str) -> Option<&Template> {
        self.templates.get(prompt_type)
    }

    /// All entries, sorted by prompt type
    pub fn descriptors(&self) -> Vec<TemplateDescriptor> {
        let mut descriptors: Vec<_> = self
            .templates
            .iter()
            .map(|(key, template)| TemplateDescriptor {
                prompt_type: key.clone(),
                strategy: template.strategy(),
                required: template
                    .required_params()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                optional: template.optional_params().to_vec(),
            })
            .collect();
        descriptors.sort_by(|a, b| a.prompt_type.cmp(&b.prompt_type));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
