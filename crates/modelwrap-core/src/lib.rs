pub mod audio;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod handle;
pub mod params;
pub mod types;

pub use audio::{
    classify, AudioDescriptor, AudioIdentity, AudioInput, AudioInputKind, AudioStream,
    BINARY_STREAM_IDENTITY,
};
pub use config::{AppConfig, GeneralConfig, GeneratorConfig, TranscriberConfig};
pub use descriptor::{ComponentDescriptor, Describe};
pub use error::{AsrError, BackendError, ConfigError, DescriptorError, GenerationError, NotReadyError};
pub use handle::{HandleState, ModelHandle};
pub use params::merge;
pub use types::{
    GenerationResponse, GenerationResult, TranscriptionOutput, TranscriptionResult,
    AUDIO_FILE_KEY, TEXT_KEY,
};
