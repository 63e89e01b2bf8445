use crate::backend::{SpeechBackend, SpeechModel};
use async_trait::async_trait;
use modelwrap_core::{AsrError, AudioInput, AudioStream};
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use toml::{Table, Value};

/// Backend without real inference. Reports the size of each input instead of
/// its words, which is enough to exercise the transcription pipeline.
pub struct NullBackend {
    load_count: AtomicUsize,
}

impl NullBackend {
    pub fn new() -> Self {
        Self {
            load_count: AtomicUsize::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::Relaxed)
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    async fn load(&self, model: &str, device: &str) -> Result<Arc<dyn SpeechModel>, AsrError> {
        if device.trim().is_empty() {
            return Err(AsrError::InitializationFailed(format!(
                "no device given for model '{model}'"
            )));
        }
        let count = self.load_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!("NullBackend load #{count}: {model} on {device}");
        Ok(Arc::new(NullModel {
            model: model.to_string(),
            transcribe_count: AtomicUsize::new(0),
        }))
    }
}

pub struct NullModel {
    model: String,
    transcribe_count: AtomicUsize,
}

impl NullModel {
    pub fn transcribe_count(&self) -> usize {
        self.transcribe_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpeechModel for NullModel {
    async fn transcribe(&self, audio: &mut AudioInput, params: &Table) -> Result<Table, AsrError> {
        let location = audio.location().map(Path::to_path_buf);
        let bytes = match (location, audio) {
            (Some(path), _) => file_len(&path).await?,
            (None, AudioInput::Stream(stream)) => {
                remaining_len(stream.as_mut()).map_err(|e| AsrError::Backend(Box::new(e)))?
            }
            (None, _) => 0,
        };
        self.transcribe_count.fetch_add(1, Ordering::Relaxed);

        let mut raw = Table::new();
        raw.insert(
            "text".to_string(),
            Value::String(format!("[null] {bytes} bytes")),
        );
        raw.insert("bytes".to_string(), Value::Integer(bytes as i64));
        raw.insert("model".to_string(), Value::String(self.model.clone()));
        if let Some(language) = params.get("language") {
            raw.insert("language".to_string(), language.clone());
        }
        Ok(raw)
    }
}

async fn file_len(path: &Path) -> Result<u64, AsrError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| AsrError::Backend(Box::new(e)))?;
    Ok(metadata.len())
}

/// Bytes between the current position and the end; the position is kept.
fn remaining_len(stream: &mut dyn AudioStream) -> std::io::Result<u64> {
    let pos = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(pos))?;
    Ok(end.saturating_sub(pos))
}
