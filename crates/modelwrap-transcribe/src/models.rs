use modelwrap_core::AsrError;

/// Whisper checkpoints a transcription component accepts.
pub const WHISPER_MODELS: &[&str] = &[
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large",
    "large-v1",
    "large-v2",
    "large-v3",
];

pub const DEFAULT_MODEL: &str = "large";
pub const DEFAULT_DEVICE: &str = "cpu";

pub fn validate_model(model: &str) -> Result<(), AsrError> {
    if WHISPER_MODELS.contains(&model) {
        Ok(())
    } else {
        Err(AsrError::UnknownModel {
            model: model.to_string(),
            available: WHISPER_MODELS.iter().map(|m| m.to_string()).collect(),
        })
    }
}
