use async_trait::async_trait;
use modelwrap_core::{GenerationError, GenerationResponse};
use toml::Table;

/// Routing information for a remote generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub project_id: String,
    pub location: String,
}

/// A remote text-generation service.
///
/// Implementations are registered via [`GenerationRegistry`](crate::GenerationRegistry).
/// [`configure`](Self::configure) sets the service SDK's process-wide state and
/// is only called through [`ClientEnvironment`](crate::ClientEnvironment).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Returns the backend's registry name (e.g. `"null"`).
    fn name(&self) -> &str;
    /// One-time global client setup for the given project and location.
    fn configure(&self, settings: &ClientSettings) -> Result<(), GenerationError>;
    /// Obtain a handle to `model_name`. Called once per generation request.
    async fn resolve_model(&self, model_name: &str) -> Result<Box<dyn TextModel>, GenerationError>;
}

#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a completion for `prompt`. `params` is passed through unvalidated.
    async fn predict(&self, prompt: &str, params: &Table)
        -> Result<GenerationResponse, GenerationError>;
}
