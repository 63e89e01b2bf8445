use crate::audio::AudioIdentity;
use crate::error::AsrError;
use toml::{Table, Value};

/// Key under which speech backends report the recognized text.
pub const TEXT_KEY: &str = "text";

/// Metadata key that labels every transcription with its input identity.
pub const AUDIO_FILE_KEY: &str = "audio_file";

/// Transcription of a single audio item.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    content: String,
    meta: Table,
}

impl TranscriptionResult {
    /// Build a result from a backend's raw output.
    ///
    /// The `text` entry becomes the content, every other entry is kept as
    /// metadata, and `audio_file` is always set to `identity`.
    pub fn from_raw(identity: &AudioIdentity, mut raw: Table) -> Result<Self, AsrError> {
        let content = match raw.remove(TEXT_KEY) {
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(AsrError::ProcessingFailed(format!(
                    "backend '{TEXT_KEY}' field is a {}, expected a string",
                    other.type_str()
                )))
            }
            None => {
                return Err(AsrError::ProcessingFailed(format!(
                    "backend result has no '{TEXT_KEY}' field"
                )))
            }
        };

        raw.insert(AUDIO_FILE_KEY.to_string(), identity.to_value());
        Ok(Self { content, meta: raw })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn meta(&self) -> &Table {
        &self.meta
    }

    pub fn audio_file(&self) -> Option<&str> {
        self.meta.get(AUDIO_FILE_KEY).and_then(|v| v.as_str())
    }

    pub fn into_parts(self) -> (String, Table) {
        (self.content, self.meta)
    }
}

/// Named output of a transcription run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionOutput {
    pub documents: Vec<TranscriptionResult>,
}

/// One raw reply from a text-generation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    pub text: String,
    pub raw: Table,
}

/// Replies and backend metadata, aligned by position.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    replies: Vec<String>,
    metadata: Vec<GenerationResponse>,
}

impl GenerationResult {
    pub fn from_responses(responses: Vec<GenerationResponse>) -> Self {
        let replies = responses.iter().map(|r| r.text.clone()).collect();
        Self {
            replies,
            metadata: responses,
        }
    }

    pub fn single(response: GenerationResponse) -> Self {
        Self::from_responses(vec![response])
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn metadata(&self) -> &[GenerationResponse] {
        &self.metadata
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<GenerationResponse>) {
        (self.replies, self.metadata)
    }
}
