//! Load-once ownership of a heavyweight model resource.

use crate::error::NotReadyError;
use std::future::Future;
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Unloaded,
    Loaded,
}

/// Holds a model resource that is acquired at most once.
///
/// The handle starts [`HandleState::Unloaded`]. [`warm_up`](Self::warm_up)
/// runs the loader on the first successful call only; concurrent callers
/// wait for the in-flight load instead of starting their own. A failed load
/// leaves the handle unloaded so a later call can retry. There is no way back
/// to `Unloaded` once loaded.
pub struct ModelHandle<T> {
    name: String,
    slot: OnceCell<T>,
}

impl<T> ModelHandle<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.initialized()
    }

    pub fn state(&self) -> HandleState {
        if self.is_loaded() {
            HandleState::Loaded
        } else {
            HandleState::Unloaded
        }
    }

    pub fn get(&self) -> Result<&T, NotReadyError> {
        self.slot.get().ok_or_else(|| NotReadyError::new(&self.name))
    }

    /// Load the resource if it is not loaded yet.
    ///
    /// Returns `true` when this call performed the load, `false` when the
    /// resource was already present.
    pub async fn warm_up<F, Fut, E>(&self, load: F) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.slot.initialized() {
            tracing::trace!(model = %self.name, "warm_up skipped, already loaded");
            return Ok(false);
        }

        let mut loaded = false;
        self.slot
            .get_or_try_init(|| {
                loaded = true;
                load()
            })
            .await?;
        Ok(loaded)
    }
}

impl<T> std::fmt::Debug for ModelHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
