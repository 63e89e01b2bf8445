pub mod backend;
pub mod environment;
pub mod generator;
pub mod null_backend;
pub mod registry;

pub use backend::{ClientSettings, GenerationBackend, TextModel};
pub use environment::ClientEnvironment;
pub use generator::{GenerationComponent, GenerationSettings, DEFAULT_MODEL_NAME};
pub use null_backend::{NullGenerationBackend, NullTextModel};
pub use registry::GenerationRegistry;
