use async_trait::async_trait;
use modelwrap_core::{AsrError, AudioInput};
use std::sync::Arc;
use toml::Table;

/// A local speech-recognition backend that can load model weights.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Returns the backend's registry name (e.g. `"null"`).
    fn name(&self) -> &str;
    /// Load `model` onto `device`. May block on disk, CPU or GPU for a long time.
    async fn load(&self, model: &str, device: &str) -> Result<Arc<dyn SpeechModel>, AsrError>;
}

/// A loaded speech model.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Transcribe one input. The raw result must carry a string `text` entry;
    /// every other entry is passed through as metadata.
    async fn transcribe(&self, audio: &mut AudioInput, params: &Table) -> Result<Table, AsrError>;
}
