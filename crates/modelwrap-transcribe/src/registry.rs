use crate::backend::SpeechBackend;
use modelwrap_core::AsrError;
use std::collections::HashMap;
use std::sync::Arc;

pub struct BackendRegistry {
    factories: HashMap<String, fn() -> Arc<dyn SpeechBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("null", || Arc::new(crate::null_backend::NullBackend::new()));
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Arc<dyn SpeechBackend>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Arc<dyn SpeechBackend>, AsrError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| AsrError::EngineNotFound(name.to_string()))
    }

    pub fn list_backends(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}
