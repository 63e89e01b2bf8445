//! Text generation through a remote model service.

use crate::backend::{ClientSettings, GenerationBackend};
use crate::environment::ClientEnvironment;
use crate::registry::GenerationRegistry;
use modelwrap_core::{
    merge, ComponentDescriptor, Describe, DescriptorError, GenerationError, GenerationResult,
    GeneratorConfig,
};
use std::sync::Arc;
use toml::{Table, Value};

pub const DEFAULT_MODEL_NAME: &str = "text-bison@latest";

/// Constructor arguments of a [`GenerationComponent`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub project_id: String,
    pub location: String,
    pub model_name: String,
    /// Defaults for every call, e.g. `max_output_tokens`, `temperature`,
    /// `top_p`, `top_k`.
    pub generation_kwargs: Table,
}

impl GenerationSettings {
    pub fn new(project_id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            generation_kwargs: Table::new(),
        }
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_generation_kwargs(mut self, generation_kwargs: Table) -> Self {
        self.generation_kwargs = generation_kwargs;
        self
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            project_id: self.project_id.clone(),
            location: self.location.clone(),
        }
    }
}

/// Generates text for a prompt, merging call-time parameters over the
/// instance defaults.
///
/// The model handle is resolved from the backend on every call and never
/// cached; the one-time cost is the client configuration done at construction.
pub struct GenerationComponent {
    backend: Arc<dyn GenerationBackend>,
    settings: GenerationSettings,
}

impl GenerationComponent {
    /// Configures the backend's process-wide client (once per settings) and
    /// builds the component.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        settings: GenerationSettings,
    ) -> Result<Self, GenerationError> {
        ClientEnvironment::ensure(backend.as_ref(), &settings.client_settings())?;
        Ok(Self { backend, settings })
    }

    pub fn from_config(
        config: &GeneratorConfig,
        registry: &GenerationRegistry,
    ) -> Result<Self, GenerationError> {
        let backend = registry.create(&config.backend)?;
        let settings = GenerationSettings::new(&config.project_id, &config.location)
            .with_model_name(&config.model_name)
            .with_generation_kwargs(config.params.clone());
        Self::new(backend, settings)
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Usage-reporting fields: the target model name.
    pub fn telemetry(&self) -> Table {
        let mut data = Table::new();
        data.insert(
            "model".to_string(),
            Value::String(self.settings.model_name.clone()),
        );
        data
    }

    pub async fn run(
        &self,
        prompt: &str,
        overrides: Option<&Table>,
    ) -> Result<GenerationResult, GenerationError> {
        let params = merge(&self.settings.generation_kwargs, overrides);
        tracing::debug!(
            model = %self.settings.model_name,
            params = ?params.keys().collect::<Vec<_>>(),
            "generating"
        );

        let model = self.backend.resolve_model(&self.settings.model_name).await?;
        let response = model.predict(prompt, &params).await?;
        Ok(GenerationResult::single(response))
    }
}

impl Describe for GenerationComponent {
    const TYPE_NAME: &'static str = "modelwrap_generate::GenerationComponent";
    type Registry = GenerationRegistry;

    fn to_descriptor(&self) -> ComponentDescriptor {
        let mut init = Table::new();
        init.insert(
            "backend".to_string(),
            Value::String(self.backend.name().to_string()),
        );
        init.insert(
            "project_id".to_string(),
            Value::String(self.settings.project_id.clone()),
        );
        init.insert(
            "location".to_string(),
            Value::String(self.settings.location.clone()),
        );
        init.insert(
            "model_name".to_string(),
            Value::String(self.settings.model_name.clone()),
        );
        init.insert(
            "generation_kwargs".to_string(),
            Value::Table(self.settings.generation_kwargs.clone()),
        );
        ComponentDescriptor::new(Self::TYPE_NAME, init)
    }

    fn from_descriptor(
        descriptor: &ComponentDescriptor,
        registry: &GenerationRegistry,
    ) -> Result<Self, DescriptorError> {
        descriptor.expect_type(Self::TYPE_NAME)?;
        let backend = registry.create(descriptor.str_param("backend")?)?;
        let settings = GenerationSettings::new(
            descriptor.str_param("project_id")?,
            descriptor.str_param("location")?,
        )
        .with_model_name(
            descriptor
                .optional_str_param("model_name")?
                .unwrap_or(DEFAULT_MODEL_NAME),
        )
        .with_generation_kwargs(descriptor.table_param("generation_kwargs")?);
        Ok(Self::new(backend, settings)?)
    }
}

impl std::fmt::Debug for GenerationComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationComponent")
            .field("backend", &self.backend.name())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TextModel;
    use async_trait::async_trait;
    use modelwrap_core::GenerationResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        configures: AtomicUsize,
        resolves: AtomicUsize,
        last_params: Mutex<Option<Table>>,
    }

    struct MockModel {
        recorder: Arc<Recorder>,
    }

    #[async_trait]
    impl TextModel for MockModel {
        async fn predict(
            &self,
            prompt: &str,
            params: &Table,
        ) -> Result<GenerationResponse, GenerationError> {
            if params.contains_key("bogus") {
                return Err(GenerationError::Backend(
                    "unknown parameter: bogus".into(),
                ));
            }
            *self.recorder.last_params.lock().unwrap() = Some(params.clone());
            let mut raw = Table::new();
            raw.insert("prompt".to_string(), Value::String(prompt.to_string()));
            raw.insert("blocked".to_string(), Value::Boolean(false));
            Ok(GenerationResponse {
                text: "I'm fine, thanks.".to_string(),
                raw,
            })
        }
    }

    struct MockBackend {
        name: &'static str,
        recorder: Arc<Recorder>,
    }

    impl MockBackend {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                recorder: Arc::new(Recorder::default()),
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for MockBackend {
        fn name(&self) -> &str {
            self.name
        }

        fn configure(&self, _settings: &ClientSettings) -> Result<(), GenerationError> {
            self.recorder.configures.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn resolve_model(
            &self,
            _model_name: &str,
        ) -> Result<Box<dyn TextModel>, GenerationError> {
            self.recorder.resolves.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockModel {
                recorder: Arc::clone(&self.recorder),
            }))
        }
    }

    fn kwargs(entries: &[(&str, Value)]) -> Table {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_new_keeps_settings_and_configures_client() {
        let backend = MockBackend::new("gen-test-new");
        let recorder = Arc::clone(&backend.recorder);
        let settings = GenerationSettings::new("project_id", "us-central1")
            .with_generation_kwargs(kwargs(&[("temperature", Value::Float(0.1))]));
        let comp = GenerationComponent::new(Arc::new(backend), settings).unwrap();

        assert_eq!(comp.settings().model_name, "text-bison@latest");
        assert_eq!(comp.settings().project_id, "project_id");
        assert_eq!(comp.settings().location, "us-central1");
        assert_eq!(
            comp.settings().generation_kwargs,
            kwargs(&[("temperature", Value::Float(0.1))])
        );
        assert_eq!(recorder.configures.load(Ordering::SeqCst), 1);
        assert!(ClientEnvironment::is_configured("gen-test-new"));
    }

    #[test]
    fn test_repeated_construction_configures_once() {
        let backend: Arc<dyn GenerationBackend> = Arc::new(MockBackend::new("gen-test-repeat"));
        for _ in 0..3 {
            GenerationComponent::new(
                Arc::clone(&backend),
                GenerationSettings::new("p", "europe-west4"),
            )
            .unwrap();
        }
        assert_eq!(
            ClientEnvironment::current("gen-test-repeat"),
            Some(ClientSettings {
                project_id: "p".to_string(),
                location: "europe-west4".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_run_passes_defaults_only() {
        let backend = MockBackend::new("gen-test-defaults");
        let recorder = Arc::clone(&backend.recorder);
        let settings = GenerationSettings::new("project_id", "us-central1")
            .with_generation_kwargs(kwargs(&[("temperature", Value::Float(0.1))]));
        let comp = GenerationComponent::new(Arc::new(backend), settings).unwrap();

        let result = comp.run("Hello, how are you?", None).await.unwrap();
        assert_eq!(
            recorder.last_params.lock().unwrap().clone(),
            Some(kwargs(&[("temperature", Value::Float(0.1))]))
        );
        assert_eq!(result.replies().len(), 1);
        assert_eq!(result.metadata().len(), 1);
        assert_eq!(result.replies()[0], result.metadata()[0].text);
    }

    #[tokio::test]
    async fn test_run_overrides_win_without_touching_defaults() {
        let backend = MockBackend::new("gen-test-overrides");
        let recorder = Arc::clone(&backend.recorder);
        let settings = GenerationSettings::new("project_id", "us-central1")
            .with_generation_kwargs(kwargs(&[("temperature", Value::Float(0.1))]));
        let comp = GenerationComponent::new(Arc::new(backend), settings).unwrap();

        let overrides = kwargs(&[
            ("temperature", Value::Float(0.8)),
            ("max_output_tokens", Value::Integer(256)),
        ]);
        let result = comp.run("How are you?", Some(&overrides)).await.unwrap();

        assert_eq!(
            recorder.last_params.lock().unwrap().clone(),
            Some(kwargs(&[
                ("max_output_tokens", Value::Integer(256)),
                ("temperature", Value::Float(0.8)),
            ]))
        );
        assert_eq!(result.replies(), &["I'm fine, thanks.".to_string()]);
        assert_eq!(
            comp.settings().generation_kwargs,
            kwargs(&[("temperature", Value::Float(0.1))])
        );

        comp.run("Again", None).await.unwrap();
        assert_eq!(
            recorder.last_params.lock().unwrap().clone(),
            Some(kwargs(&[("temperature", Value::Float(0.1))]))
        );
    }

    #[tokio::test]
    async fn test_run_resolves_model_every_call() {
        let backend = MockBackend::new("gen-test-resolve");
        let recorder = Arc::clone(&backend.recorder);
        let comp = GenerationComponent::new(
            Arc::new(backend),
            GenerationSettings::new("p", "us-central1"),
        )
        .unwrap();
        for _ in 0..3 {
            comp.run("ping", None).await.unwrap();
        }
        assert_eq!(recorder.resolves.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_backend_rejection_is_surfaced() {
        let comp = GenerationComponent::new(
            Arc::new(MockBackend::new("gen-test-reject")),
            GenerationSettings::new("p", "us-central1"),
        )
        .unwrap();
        let overrides = kwargs(&[("bogus", Value::Boolean(true))]);
        match comp.run("hi", Some(&overrides)).await {
            Err(GenerationError::Backend(e)) => {
                assert_eq!(e.to_string(), "unknown parameter: bogus")
            }
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_descriptor_round_trip() {
        let registry = GenerationRegistry::new();
        let settings = GenerationSettings::new("project_id", "us-central1")
            .with_model_name("text-bison@001")
            .with_generation_kwargs(kwargs(&[("temperature", Value::Float(0.5))]));
        let comp = GenerationComponent::new(registry.create("null").unwrap(), settings).unwrap();

        let descriptor = comp.to_descriptor();
        assert_eq!(descriptor.type_name, "modelwrap_generate::GenerationComponent");
        let init = &descriptor.init_parameters;
        assert_eq!(init["model_name"].as_str(), Some("text-bison@001"));
        assert_eq!(init["project_id"].as_str(), Some("project_id"));
        assert_eq!(init["location"].as_str(), Some("us-central1"));
        assert_eq!(
            init["generation_kwargs"],
            Value::Table(kwargs(&[("temperature", Value::Float(0.5))]))
        );

        let text = descriptor.to_toml_string().unwrap();
        let parsed = ComponentDescriptor::from_toml_str(&text).unwrap();
        let rebuilt = GenerationComponent::from_descriptor(&parsed, &registry).unwrap();
        assert_eq!(rebuilt.settings(), comp.settings());
        assert_eq!(rebuilt.backend_name(), "null");
    }

    #[test]
    fn test_from_descriptor_requires_project() {
        let mut init = Table::new();
        init.insert("backend".to_string(), Value::String("null".to_string()));
        init.insert("location".to_string(), Value::String("us-central1".to_string()));
        let descriptor = ComponentDescriptor::new(GenerationComponent::TYPE_NAME, init);
        assert!(matches!(
            GenerationComponent::from_descriptor(&descriptor, &GenerationRegistry::new()),
            Err(DescriptorError::MissingParameter(name)) if name == "project_id"
        ));
    }

    #[test]
    fn test_from_config() {
        let config = GeneratorConfig {
            backend: "null".to_string(),
            project_id: "p".to_string(),
            location: "us-central1".to_string(),
            model_name: "gemini-pro".to_string(),
            params: kwargs(&[("top_k", Value::Integer(40))]),
        };
        let comp = GenerationComponent::from_config(&config, &GenerationRegistry::new()).unwrap();
        assert_eq!(comp.settings().model_name, "gemini-pro");
        assert_eq!(
            comp.settings().generation_kwargs,
            kwargs(&[("top_k", Value::Integer(40))])
        );
    }

    #[test]
    fn test_telemetry_reports_model_name() {
        let comp = GenerationComponent::new(
            Arc::new(MockBackend::new("gen-test-telemetry")),
            GenerationSettings::new("p", "us-central1").with_model_name("gemini-pro"),
        )
        .unwrap();
        let data = comp.telemetry();
        assert_eq!(data.len(), 1);
        assert_eq!(data["model"].as_str(), Some("gemini-pro"));
    }

    #[test]
    fn test_component_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GenerationComponent>();
    }
}
