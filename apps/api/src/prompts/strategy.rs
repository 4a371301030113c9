// Invocation strategies
//
// Direct completion renders a flat template to one string and calls the
// completion capability. The pipeline binds a role template to an adapter and
// is invoked with raw parameters.

use tracing::debug;

use super::template::{FlatTemplate, RoleTemplate};
use super::types::ParameterSet;
use crate::llm::{GenerationSettings, LlmResult, ModelAdapter};

/// Render-then-complete for flat templates
pub struct DirectCompletion<'a> {
    adapter: &'a dyn ModelAdapter,
    settings: GenerationSettings,
}

impl<'a> DirectCompletion<'a> {
    pub fn new(adapter: &'a dyn ModelAdapter, settings: GenerationSettings) -> Self {
        Self { adapter, settings }
    }

    pub async fn run(&self, template: &FlatTemplate, params: &ParameterSet) -> LlmResult<String> {
        let prompt = template.render(params);
        debug!(chars = prompt.chars().count(), "Rendered flat prompt");
        self.adapter.complete(&prompt, &self.settings).await
    }
}

/// A role template bound to a configured model adapter
///
/// Holds no state between invocations; build one per request.
pub struct Pipeline<'a> {
    template: &'a RoleTemplate,
    adapter: &'a dyn ModelAdapter,
    settings: GenerationSettings,
}

impl RoleTemplate {
    /// Bind this template to an adapter
    pub fn pipe<'a>(
        &'a self,
        adapter: &'a dyn ModelAdapter,
        settings: GenerationSettings,
    ) -> Pipeline<'a> {
        Pipeline {
            template: self,
            adapter,
            settings,
        }
    }
}

impl Pipeline<'_> {
    pub async fn invoke(&self, params: &ParameterSet) -> LlmResult<String> {
        let messages = self.template.messages(params);
        debug!(messages = messages.len(), "Rendered role-structured prompt");
        self.adapter.chat(&messages, &self.settings).await
    }
}
