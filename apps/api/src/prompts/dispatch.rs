use serde_json::Value;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::catalog::TemplateCatalog;
use super::errors::{DispatchResult, ValidationError};
use super::strategy::DirectCompletion;
use super::template::Template;
use super::types::{GenerationResult, ParameterSet};
use crate::config::GenerationDefaults;
use crate::llm::{GenerationSettings, ModelAdapter};

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt_type: String,
    pub params: ParameterSet,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

/// Validates generation requests and runs them against the model adapter
pub struct DispatchEngine {
    catalog: Arc<TemplateCatalog>,
    adapter: Arc<dyn ModelAdapter>,
    defaults: GenerationDefaults,
}

impl DispatchEngine {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        adapter: Arc<dyn ModelAdapter>,
        defaults: GenerationDefaults,
    ) -> Self {
        Self {
            catalog,
            adapter,
            defaults,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Validate a raw request body and generate text for it
    ///
    /// Makes exactly one adapter call for a valid request and none otherwise.
    pub async fn handle(&self, body: &Value) -> DispatchResult<GenerationResult> {
        let (template, request) = self.validate(body)?;

        let span = info_span!(
            "dispatch",
            request_id = %Uuid::new_v4(),
            prompt_type = %request.prompt_type,
            strategy = %template.strategy(),
        );
        self.execute(template, request).instrument(span).await
    }

    /// Check a request body, first violation wins
    ///
    /// Order: promptType, catalog lookup, params shape, param values,
    /// required template parameters.
    pub fn validate(
        &self,
        body: &Value,
    ) -> Result<(&Template, GenerationRequest), ValidationError> {
        let prompt_type = body
            .get("promptType")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingPromptType)?;

        let template = self
            .catalog
            .lookup(prompt_type)
            .ok_or_else(|| ValidationError::UnknownPromptType(prompt_type.to_string()))?;

        let fields = body
            .get("params")
            .and_then(Value::as_object)
            .ok_or(ValidationError::MissingOrInvalidParams)?;

        let params = ParameterSet::from_json(fields, &template.declared_params())?;
        template.check_params(prompt_type, &params)?;

        let model = body
            .get("model")
            .and_then(Value::as_str)
            .filter(|model| !model.trim().is_empty())
            .map(str::to_string);
        let temperature = body
            .get("temperature")
            .and_then(Value::as_f64)
            .map(|t| t as f32);

        Ok((
            template,
            GenerationRequest {
                prompt_type: prompt_type.to_string(),
                params,
                model,
                temperature,
            },
        ))
    }

    async fn execute(
        &self,
        template: &Template,
        request: GenerationRequest,
    ) -> DispatchResult<GenerationResult> {
        let adapter = self.adapter.as_ref();

        let (model, outcome) = match template {
            Template::Flat(flat) => {
                // Direct completion always runs with the configured settings
                let settings = GenerationSettings {
                    model: request
                        .model
                        .unwrap_or_else(|| self.defaults.completion_model.clone()),
                    temperature: self.defaults.temperature,
                    max_tokens: self.defaults.max_tokens,
                };
                let model = settings.model.clone();
                let outcome = DirectCompletion::new(adapter, settings)
                    .run(flat, &request.params)
                    .await;
                (model, outcome)
            }
            Template::RoleStructured(role) => {
                let settings = GenerationSettings {
                    model: request
                        .model
                        .unwrap_or_else(|| self.defaults.chat_model.clone()),
                    temperature: request.temperature.unwrap_or(self.defaults.temperature),
                    max_tokens: self.defaults.max_tokens,
                };
                let model = settings.model.clone();
                let outcome = role.pipe(adapter, settings).invoke(&request.params).await;
                (model, outcome)
            }
        };

        match outcome {
            Ok(text) => {
                info!(model = %model, chars = text.chars().count(), "Generation completed");
                Ok(GenerationResult {
                    text,
                    model,
                    prompt_type: request.prompt_type,
                })
            }
            Err(e) => {
                warn!(model = %model, error = %e, "Model adapter call failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, LlmError, LlmResult};
    use crate::prompts::errors::DispatchError;
    use crate::prompts::template::FlatTemplate;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Echoes its input and counts calls
    #[derive(Default)]
    struct EchoAdapter {
        calls: AtomicUsize,
        settings: Mutex<Vec<GenerationSettings>>,
    }

    #[async_trait]
    impl ModelAdapter for EchoAdapter {
        async fn complete(&self, prompt: &str, settings: &GenerationSettings) -> LlmResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.settings.lock().unwrap().push(settings.clone());
            Ok(format!("ECHO: {}", prompt))
        }

        async fn chat(
            &self,
            messages: &[ChatMessage],
            settings: &GenerationSettings,
        ) -> LlmResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.settings.lock().unwrap().push(settings.clone());
            let joined: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
            Ok(format!("ECHO: {}", joined.join(" | ")))
        }
    }

    struct FailingAdapter;

    #[async_trait]
    impl ModelAdapter for FailingAdapter {
        async fn complete(&self, _prompt: &str, _settings: &GenerationSettings) -> LlmResult<String> {
            Err(LlmError::Provider {
                status: 429,
                body: "rate limited".to_string(),
            })
        }

        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _settings: &GenerationSettings,
        ) -> LlmResult<String> {
            Err(LlmError::MalformedResponse("no choices".to_string()))
        }
    }

    fn engine_with(adapter: Arc<dyn ModelAdapter>) -> DispatchEngine {
        let catalog = TemplateCatalog::from_entries(
            crate::prompts::library::all()
                .into_iter()
                .map(|(key, template)| (key.to_string(), template))
                .chain([(
                    "hello".to_string(),
                    Template::Flat(FlatTemplate::new("Hello {name}")),
                )]),
        );
        DispatchEngine::new(Arc::new(catalog), adapter, GenerationDefaults::default())
    }

    fn validation_error(result: DispatchResult<GenerationResult>) -> ValidationError {
        match result {
            Err(DispatchError::Validation(e)) => e,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_or_non_string_prompt_type() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        for body in [
            json!({"params": {"name": "x"}}),
            json!({"promptType": 42, "params": {"name": "x"}}),
            json!({"promptType": null, "params": {}}),
            json!("smartGoal"),
            Value::Null,
        ] {
            assert_eq!(
                validation_error(engine.handle(&body).await),
                ValidationError::MissingPromptType
            );
        }
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_prompt_type() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        let body = json!({"promptType": "writePoem", "params": {}});
        assert_eq!(
            validation_error(engine.handle(&body).await),
            ValidationError::UnknownPromptType("writePoem".to_string())
        );
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_prompt_type_wins_over_bad_params() {
        let engine = engine_with(Arc::new(EchoAdapter::default()));

        let body = json!({"promptType": "writePoem"});
        assert_eq!(
            validation_error(engine.handle(&body).await),
            ValidationError::UnknownPromptType("writePoem".to_string())
        );
    }

    #[tokio::test]
    async fn missing_or_invalid_params() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        for body in [
            json!({"promptType": "hello"}),
            json!({"promptType": "hello", "params": null}),
            json!({"promptType": "hello", "params": "name=World"}),
            json!({"promptType": "hello", "params": 7}),
            json!({"promptType": "hello", "params": ["World"]}),
        ] {
            assert_eq!(
                validation_error(engine.handle(&body).await),
                ValidationError::MissingOrInvalidParams
            );
        }
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_placeholder_is_rejected_before_adapter() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        let body = json!({"promptType": "hello", "params": {"other": "x"}});
        assert_eq!(
            validation_error(engine.handle(&body).await),
            ValidationError::MissingTemplateParameter {
                prompt_type: "hello".to_string(),
                param: "name".to_string(),
            }
        );
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn flat_template_round_trip() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        let body = json!({"promptType": "hello", "params": {"name": "World"}});
        let result = engine.handle(&body).await.unwrap();

        assert_eq!(result.text, "ECHO: Hello World");
        assert_eq!(result.prompt_type, "hello");
        assert_eq!(result.model, "gpt-3.5-turbo-instruct");
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn flat_template_ignores_requested_temperature() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        let body = json!({
            "promptType": "hello",
            "params": {"name": "World"},
            "model": "custom-model",
            "temperature": 0.1
        });
        let result = engine.handle(&body).await.unwrap();

        assert_eq!(result.model, "custom-model");
        let settings = adapter.settings.lock().unwrap();
        assert_eq!(settings[0].temperature, 0.7);
        assert_eq!(settings[0].max_tokens, 1000);
    }

    #[tokio::test]
    async fn role_template_uses_requested_settings() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        let body = json!({
            "promptType": "generateContent",
            "params": {"topic": "x"},
            "temperature": 0.2
        });
        let result = engine.handle(&body).await.unwrap();

        assert!(result.text.contains("篇幅：中等"));
        assert!(result.text.ends_with("主题：x"));
        assert_eq!(result.model, "gpt-3.5-turbo");
        assert_eq!(adapter.settings.lock().unwrap()[0].temperature, 0.2);
    }

    #[tokio::test]
    async fn smart_goal_end_to_end() {
        let engine = engine_with(Arc::new(EchoAdapter::default()));

        let body = json!({"promptType": "smartGoal", "params": {"input": "learn guitar"}});
        let result = engine.handle(&body).await.unwrap();

        assert!(result.text.starts_with("ECHO: "));
        assert!(result.text.contains("learn guitar"));
        assert!(!result.text.contains("{input}"));
    }

    #[tokio::test]
    async fn adapter_failure_is_upstream_error() {
        let engine = engine_with(Arc::new(FailingAdapter));

        let body = json!({"promptType": "hello", "params": {"name": "World"}});
        match engine.handle(&body).await {
            Err(DispatchError::Upstream(LlmError::Provider { status, .. })) => {
                assert_eq!(status, 429)
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn null_optional_param_uses_default() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        let body = json!({
            "promptType": "generateContent",
            "params": {"topic": "x", "length": null}
        });
        let result = engine.handle(&body).await.unwrap();

        assert!(result.text.contains("篇幅：中等"));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unused_nested_param_is_ignored() {
        let engine = engine_with(Arc::new(EchoAdapter::default()));

        let body = json!({
            "promptType": "smartGoal",
            "params": {"input": "learn guitar", "meta": {"source": "ui"}}
        });
        let result = engine.handle(&body).await.unwrap();

        assert!(result.text.contains("learn guitar"));
    }

    #[tokio::test]
    async fn nested_value_for_declared_param_is_rejected() {
        let adapter = Arc::new(EchoAdapter::default());
        let engine = engine_with(adapter.clone());

        let body = json!({
            "promptType": "generateContent",
            "params": {"topic": "x", "tone": {"style": "warm"}}
        });
        assert_eq!(
            validation_error(engine.handle(&body).await),
            ValidationError::InvalidParamValue("tone".to_string())
        );
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn validate_reads_optional_settings() {
        let engine = engine_with(Arc::new(EchoAdapter::default()));

        let body = json!({
            "promptType": "hello",
            "params": {"name": "World"},
            "model": "  ",
            "temperature": "hot"
        });
        let (_, request) = engine.validate(&body).unwrap();

        assert_eq!(request.model, None);
        assert_eq!(request.temperature, None);
        assert_eq!(request.params.text("name").unwrap(), "World");
    }
}
