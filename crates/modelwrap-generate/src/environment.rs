//! Process-wide client configuration for generation backends.
//!
//! Remote SDKs often keep project and location in global state that must be
//! set before any model can be resolved. Each backend name gets one slot
//! here: the first [`ClientEnvironment::ensure`] configures it, later calls
//! with the same settings do nothing, and calls with different settings
//! reconfigure it. [`ClientEnvironment::teardown`] forgets the slot.

use crate::backend::{ClientSettings, GenerationBackend};
use modelwrap_core::GenerationError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

static CONFIGURED: Mutex<BTreeMap<String, ClientSettings>> = Mutex::new(BTreeMap::new());

fn configured() -> MutexGuard<'static, BTreeMap<String, ClientSettings>> {
    CONFIGURED.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ClientEnvironment;

impl ClientEnvironment {
    /// Configure `backend` for `settings` unless it already is.
    ///
    /// Returns `true` when the backend's `configure` ran.
    pub fn ensure(
        backend: &dyn GenerationBackend,
        settings: &ClientSettings,
    ) -> Result<bool, GenerationError> {
        let mut slots = configured();
        match slots.get(backend.name()) {
            Some(current) if current == settings => {
                tracing::debug!(
                    backend = backend.name(),
                    project_id = %settings.project_id,
                    location = %settings.location,
                    "generation client already configured"
                );
                return Ok(false);
            }
            Some(current) => {
                tracing::warn!(
                    backend = backend.name(),
                    from_project = %current.project_id,
                    from_location = %current.location,
                    project_id = %settings.project_id,
                    location = %settings.location,
                    "reconfiguring generation client"
                );
            }
            None => {}
        }

        backend.configure(settings)?;
        slots.insert(backend.name().to_string(), settings.clone());
        tracing::info!(
            backend = backend.name(),
            project_id = %settings.project_id,
            location = %settings.location,
            "generation client configured"
        );
        Ok(true)
    }

    pub fn current(backend_name: &str) -> Option<ClientSettings> {
        configured().get(backend_name).cloned()
    }

    pub fn is_configured(backend_name: &str) -> bool {
        configured().contains_key(backend_name)
    }

    /// Forget the recorded settings; the next `ensure` configures again.
    pub fn teardown(backend_name: &str) -> Option<ClientSettings> {
        let removed = configured().remove(backend_name);
        if removed.is_some() {
            tracing::debug!(backend = backend_name, "generation client torn down");
        }
        removed
    }
}
