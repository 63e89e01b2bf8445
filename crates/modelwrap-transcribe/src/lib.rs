pub mod backend;
pub mod models;
pub mod null_backend;
pub mod registry;
pub mod transcriber;

pub use backend::{SpeechBackend, SpeechModel};
pub use models::{validate_model, DEFAULT_DEVICE, DEFAULT_MODEL, WHISPER_MODELS};
pub use null_backend::{NullBackend, NullModel};
pub use registry::BackendRegistry;
pub use transcriber::TranscriptionComponent;
