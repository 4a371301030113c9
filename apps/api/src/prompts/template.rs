// Template variants
//
// A template is either a flat placeholder string or a pair of pure
// system/human render functions. Strategy selection matches on the variant.

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

use super::errors::ValidationError;
use super::types::ParameterSet;
use crate::llm::ChatMessage;

/// Protocol used to turn a bound template into a model call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InvocationStrategy {
    DirectCompletion,
    ComposablePipeline,
}

impl std::fmt::Display for InvocationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationStrategy::DirectCompletion => write!(f, "direct_completion"),
            InvocationStrategy::ComposablePipeline => write!(f, "composable_pipeline"),
        }
    }
}

/// A parameterized recipe for model input
#[derive(Debug, Clone)]
pub enum Template {
    Flat(FlatTemplate),
    RoleStructured(RoleTemplate),
}

impl Template {
    /// Flat templates complete directly, role templates run as a pipeline
    pub fn strategy(&self) -> InvocationStrategy {
        match self {
            Template::Flat(_) => InvocationStrategy::DirectCompletion,
            Template::RoleStructured(_) => InvocationStrategy::ComposablePipeline,
        }
    }

    pub fn required_params(&self) -> Vec<&str> {
        match self {
            Template::Flat(flat) => flat.placeholders(),
            Template::RoleStructured(role) => role.required.to_vec(),
        }
    }

    pub fn optional_params(&self) -> &[OptionalParam] {
        match self {
            Template::Flat(_) => &[],
            Template::RoleStructured(role) => role.optional,
        }
    }

    /// Every parameter the template reads, required first
    pub fn declared_params(&self) -> Vec<&str> {
        let mut names = self.required_params();
        names.extend(self.optional_params().iter().map(|param| param.name));
        names
    }

    /// Ensure every required parameter is supplied
    pub fn check_params(
        &self,
        prompt_type: &str,
        params: &ParameterSet,
    ) -> Result<(), ValidationError> {
        match self
            .required_params()
            .into_iter()
            .find(|name| !params.is_supplied(name))
        {
            Some(missing) => Err(ValidationError::MissingTemplateParameter {
                prompt_type: prompt_type.to_string(),
                param: missing.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Single string with `{name}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTemplate {
    text: String,
}

impl FlatTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for captures in placeholder_pattern().captures_iter(&self.text) {
            if let Some(name) = captures.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder; unknown names stay as literal text
    pub fn render(&self, params: &ParameterSet) -> String {
        placeholder_pattern()
            .replace_all(&self.text, |captures: &Captures| match params.get(&captures[1]) {
                Some(value) => value.to_string(),
                None => captures[0].to_string(),
            })
            .into_owned()
    }
}

/// Pure function from parameters to a message body
pub type RenderFn = fn(&ParameterSet) -> String;

/// Optional parameter and the default its render functions fall back to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionalParam {
    pub name: &'static str,
    pub default: Option<&'static str>,
}

/// Separately rendered system and human messages
#[derive(Clone, Copy)]
pub struct RoleTemplate {
    pub required: &'static [&'static str],
    pub optional: &'static [OptionalParam],
    pub system: RenderFn,
    pub human: RenderFn,
}

impl std::fmt::Debug for RoleTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleTemplate")
            .field("required", &self.required)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

impl RoleTemplate {
    /// Render both roles, system first
    pub fn messages(&self, params: &ParameterSet) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system((self.system)(params)),
            ChatMessage::user((self.human)(params)),
        ]
    }
}
