//! Audio input forms accepted by transcription components.
//!
//! Callers hand over a path, a string, or an already-open binary stream.
//! The form is fixed once in [`AudioInput`] and [`classify`] derives the
//! identity used to label the transcription of that item.

use std::fmt;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

/// Identity reported for stream inputs, which have no stable external name.
pub const BINARY_STREAM_IDENTITY: &str = "<<binary stream>>";

/// An open, seekable binary handle that can be handed to a speech backend.
pub trait AudioStream: Read + Seek + Send {}

impl<T: Read + Seek + Send> AudioStream for T {}

/// One audio item to transcribe.
pub enum AudioInput {
    Path(PathBuf),
    StringPath(String),
    Stream(Box<dyn AudioStream>),
}

impl AudioInput {
    pub fn stream<R>(reader: R) -> Self
    where
        R: Read + Seek + Send + 'static,
    {
        Self::Stream(Box::new(reader))
    }

    pub fn kind(&self) -> AudioInputKind {
        match self {
            Self::Path(_) => AudioInputKind::Path,
            Self::StringPath(_) => AudioInputKind::StringPath,
            Self::Stream(_) => AudioInputKind::Stream,
        }
    }

    /// Filesystem location for path-like inputs, `None` for streams.
    pub fn location(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::StringPath(s) => Some(Path::new(s)),
            Self::Stream(_) => None,
        }
    }
}

impl fmt::Debug for AudioInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::StringPath(s) => f.debug_tuple("StringPath").field(s).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<PathBuf> for AudioInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for AudioInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<String> for AudioInput {
    fn from(s: String) -> Self {
        Self::StringPath(s)
    }
}

impl From<&str> for AudioInput {
    fn from(s: &str) -> Self {
        Self::StringPath(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioInputKind {
    Path,
    StringPath,
    Stream,
}

/// Stable label of an input item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioIdentity {
    Path(PathBuf),
    StringPath(String),
    Stream,
}

impl AudioIdentity {
    pub fn kind(&self) -> AudioInputKind {
        match self {
            Self::Path(_) => AudioInputKind::Path,
            Self::StringPath(_) => AudioInputKind::StringPath,
            Self::Stream => AudioInputKind::Stream,
        }
    }

    /// Metadata value stored under `audio_file`.
    pub fn to_value(&self) -> toml::Value {
        let s = match self {
            Self::Path(path) => path.to_string_lossy().into_owned(),
            Self::StringPath(s) => s.clone(),
            Self::Stream => BINARY_STREAM_IDENTITY.to_string(),
        };
        toml::Value::String(s)
    }
}

impl fmt::Display for AudioIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::StringPath(s) => f.write_str(s),
            Self::Stream => f.write_str(BINARY_STREAM_IDENTITY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDescriptor {
    pub kind: AudioInputKind,
    pub identity: AudioIdentity,
}

/// Derive the kind and identity of an input. Performs no I/O.
pub fn classify(input: &AudioInput) -> AudioDescriptor {
    let identity = match input {
        AudioInput::Stream(_) => AudioIdentity::Stream,
        AudioInput::StringPath(s) => AudioIdentity::StringPath(s.clone()),
        AudioInput::Path(path) => AudioIdentity::Path(path.clone()),
    };
    AudioDescriptor {
        kind: identity.kind(),
        identity,
    }
}
