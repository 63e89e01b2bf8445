use crate::backend::GenerationBackend;
use modelwrap_core::GenerationError;
use std::collections::HashMap;
use std::sync::Arc;

pub struct GenerationRegistry {
    factories: HashMap<String, fn() -> Arc<dyn GenerationBackend>>,
}

impl GenerationRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("null", || {
            Arc::new(crate::null_backend::NullGenerationBackend::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Arc<dyn GenerationBackend>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Arc<dyn GenerationBackend>, GenerationError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| GenerationError::BackendNotFound(name.to_string()))
    }

    pub fn list_backends(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for GenerationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
