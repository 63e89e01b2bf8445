use crate::backend::{ClientSettings, GenerationBackend, TextModel};
use async_trait::async_trait;
use modelwrap_core::{GenerationError, GenerationResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use toml::{Table, Value};

/// Offline backend that echoes prompts back.
pub struct NullGenerationBackend {
    configure_count: AtomicUsize,
    resolve_count: AtomicUsize,
}

impl NullGenerationBackend {
    pub fn new() -> Self {
        Self {
            configure_count: AtomicUsize::new(0),
            resolve_count: AtomicUsize::new(0),
        }
    }

    pub fn configure_count(&self) -> usize {
        self.configure_count.load(Ordering::Relaxed)
    }

    pub fn resolve_count(&self) -> usize {
        self.resolve_count.load(Ordering::Relaxed)
    }
}

impl Default for NullGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for NullGenerationBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn configure(&self, settings: &ClientSettings) -> Result<(), GenerationError> {
        if settings.project_id.is_empty() {
            return Err(GenerationError::InitializationFailed(
                "project_id must not be empty".to_string(),
            ));
        }
        self.configure_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn resolve_model(&self, model_name: &str) -> Result<Box<dyn TextModel>, GenerationError> {
        self.resolve_count.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(NullTextModel {
            model_name: model_name.to_string(),
        }))
    }
}

pub struct NullTextModel {
    model_name: String,
}

#[async_trait]
impl TextModel for NullTextModel {
    async fn predict(
        &self,
        prompt: &str,
        params: &Table,
    ) -> Result<GenerationResponse, GenerationError> {
        let mut raw = Table::new();
        raw.insert("model".to_string(), Value::String(self.model_name.clone()));
        raw.insert(
            "prompt_chars".to_string(),
            Value::Integer(prompt.chars().count() as i64),
        );
        raw.insert("parameters".to_string(), Value::Table(params.clone()));
        Ok(GenerationResponse {
            text: format!("[null] {prompt}"),
            raw,
        })
    }
}
