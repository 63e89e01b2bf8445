//! Speech-to-text component over a lazily loaded local model.

use crate::backend::{SpeechBackend, SpeechModel};
use crate::models::{validate_model, DEFAULT_DEVICE, DEFAULT_MODEL};
use crate::registry::BackendRegistry;
use modelwrap_core::{
    classify, AsrError, AudioInput, ComponentDescriptor, Describe, DescriptorError, ModelHandle,
    TranscriberConfig, TranscriptionOutput, TranscriptionResult,
};
use std::sync::Arc;
use toml::{Table, Value};

/// Transcribes audio items with a whisper-family model.
///
/// Lifecycle: construct (validates the model name, loads nothing), then
/// [`warm_up`](Self::warm_up) once, then [`run`](Self::run) any number of
/// times. Running before warm-up fails with [`AsrError::NotReady`].
pub struct TranscriptionComponent {
    backend: Arc<dyn SpeechBackend>,
    model: String,
    device: String,
    params: Table,
    handle: ModelHandle<Arc<dyn SpeechModel>>,
}

impl TranscriptionComponent {
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        model: &str,
        device: &str,
        params: Table,
    ) -> Result<Self, AsrError> {
        validate_model(model)?;
        Ok(Self {
            backend,
            model: model.to_string(),
            device: device.to_string(),
            params,
            handle: ModelHandle::new(model),
        })
    }

    /// `large` on `cpu` with no extra backend parameters.
    pub fn with_defaults(backend: Arc<dyn SpeechBackend>) -> Result<Self, AsrError> {
        Self::new(backend, DEFAULT_MODEL, DEFAULT_DEVICE, Table::new())
    }

    pub fn from_config(
        config: &TranscriberConfig,
        registry: &BackendRegistry,
    ) -> Result<Self, AsrError> {
        let backend = registry.create(&config.backend)?;
        Self::new(backend, &config.model, &config.device, config.params.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn params(&self) -> &Table {
        &self.params
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn is_warm(&self) -> bool {
        self.handle.is_loaded()
    }

    /// Load the model. Only the first successful call reaches the backend.
    pub async fn warm_up(&self) -> Result<(), AsrError> {
        let loaded = self
            .handle
            .warm_up(|| {
                tracing::info!(
                    backend = self.backend.name(),
                    model = %self.model,
                    device = %self.device,
                    "loading speech model"
                );
                self.backend.load(&self.model, &self.device)
            })
            .await?;
        if loaded {
            tracing::info!(model = %self.model, "speech model ready");
        }
        Ok(())
    }

    /// Transcribe `audio_files` in order, one result per item.
    ///
    /// The first backend failure aborts the whole call; no partial results
    /// are returned.
    pub async fn transcribe(
        &self,
        audio_files: Vec<AudioInput>,
    ) -> Result<Vec<TranscriptionResult>, AsrError> {
        let model = self.handle.get()?;
        let mut results = Vec::with_capacity(audio_files.len());

        for mut audio in audio_files {
            let descriptor = classify(&audio);
            tracing::debug!(
                audio_file = %descriptor.identity,
                kind = ?descriptor.kind,
                "transcribing"
            );
            let raw = model.transcribe(&mut audio, &self.params).await?;
            results.push(TranscriptionResult::from_raw(&descriptor.identity, raw)?);
        }

        Ok(results)
    }

    pub async fn run(&self, audio_files: Vec<AudioInput>) -> Result<TranscriptionOutput, AsrError> {
        let documents = self.transcribe(audio_files).await?;
        Ok(TranscriptionOutput { documents })
    }
}

impl Describe for TranscriptionComponent {
    const TYPE_NAME: &'static str = "modelwrap_transcribe::TranscriptionComponent";
    type Registry = BackendRegistry;

    fn to_descriptor(&self) -> ComponentDescriptor {
        let mut init = Table::new();
        init.insert(
            "backend".to_string(),
            Value::String(self.backend.name().to_string()),
        );
        init.insert("model".to_string(), Value::String(self.model.clone()));
        init.insert("device".to_string(), Value::String(self.device.clone()));
        init.insert("params".to_string(), Value::Table(self.params.clone()));
        ComponentDescriptor::new(Self::TYPE_NAME, init)
    }

    fn from_descriptor(
        descriptor: &ComponentDescriptor,
        registry: &BackendRegistry,
    ) -> Result<Self, DescriptorError> {
        descriptor.expect_type(Self::TYPE_NAME)?;
        let backend = registry.create(descriptor.str_param("backend")?)?;
        let model = descriptor
            .optional_str_param("model")?
            .unwrap_or(DEFAULT_MODEL);
        let device = descriptor
            .optional_str_param("device")?
            .unwrap_or(DEFAULT_DEVICE);
        let params = descriptor.table_param("params")?;
        Ok(Self::new(backend, model, device, params)?)
    }
}

impl std::fmt::Debug for TranscriptionComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionComponent")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .field("device", &self.device)
            .field("params", &self.params)
            .field("handle", &self.handle)
            .finish()
    }
}
