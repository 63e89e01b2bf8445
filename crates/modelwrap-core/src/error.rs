use thiserror::Error;

/// Error type produced by external backends, carried unchanged as a source.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Inference was attempted on a handle that has not been warmed up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model '{resource}' is not loaded; call warm_up() before running")]
pub struct NotReadyError {
    pub resource: String,
}

impl NotReadyError {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AsrError {
    #[error("model name '{model}' not recognized; choose one among: {}", .available.join(", "))]
    UnknownModel {
        model: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    NotReady(#[from] NotReadyError),

    #[error("ASR initialization failed: {0}")]
    InitializationFailed(String),

    #[error("ASR processing failed: {0}")]
    ProcessingFailed(String),

    #[error("ASR engine not found: {0}")]
    EngineNotFound(String),

    #[error("speech backend error: {0}")]
    Backend(#[source] BackendError),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation client initialization failed: {0}")]
    InitializationFailed(String),

    #[error("generation backend not found: {0}")]
    BackendNotFound(String),

    #[error("generation failed: {0}")]
    ProcessingFailed(String),

    #[error("generation backend error: {0}")]
    Backend(#[source] BackendError),
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("descriptor type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    #[error("missing init parameter: {0}")]
    MissingParameter(String),

    #[error("init parameter '{name}' must be {expected}")]
    InvalidParameter { name: String, expected: &'static str },

    #[error("failed to encode descriptor: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("failed to decode descriptor: {0}")]
    Decode(#[from] toml::de::Error),

    #[error(transparent)]
    Asr(#[from] AsrError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
