//! Late-read references to live forms.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

/// A live form exposed by a mounted container.
pub trait FormHandle: Send + Sync {
    /// Current field values as a JSON object.
    fn values(&self) -> Value;

    /// Runs the form's own validation; inline errors are the form's business.
    fn validate(&self) -> bool;
}

/// Cell holding the currently live form for one logical input.
///
/// The renderer fills it when the owning container mounts; unmounting does
/// not clear it, so values can still be read after the container has been
/// replaced. It never owns the container.
#[derive(Clone, Default)]
pub struct FormRef {
    current: Arc<Mutex<Option<Arc<dyn FormHandle>>>>,
}

impl FormRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, form: Arc<dyn FormHandle>) {
        *self.current.lock() = Some(form);
    }

    pub fn clear(&self) {
        *self.current.lock() = None;
    }

    pub fn current(&self) -> Option<Arc<dyn FormHandle>> {
        self.current.lock().clone()
    }

    pub fn is_set(&self) -> bool {
        self.current.lock().is_some()
    }
}

impl std::fmt::Debug for FormRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRef")
            .field("is_set", &self.is_set())
            .finish()
    }
}
