//! Memoizing id → handle cache.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;

use crate::component::Props;
use crate::error::Result;
use crate::renderer::Handle;

/// Which layer a registry caches, used for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    /// Leaf widgets: buttons, spinner.
    Component,
    /// Composite containers bound to domain data: forms, lists.
    Container,
}

impl RegistryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Component => "component",
            RegistryKind::Container => "container",
        }
    }
}

/// Keeps at most one live UI instance per stable, human-readable id.
///
/// `get_or_render` with a known id returns the stored handle and does not run
/// the builder. The lock is released while the builder runs; if another
/// render for the same id lands first, the freshly built handle is removed
/// and the stored one wins.
pub struct Registry {
    kind: RegistryKind,
    entries: Mutex<HashMap<String, Handle>>,
}

impl Registry {
    pub fn new(kind: RegistryKind) -> Self {
        Self {
            kind,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn components() -> Self {
        Self::new(RegistryKind::Component)
    }

    pub fn containers() -> Self {
        Self::new(RegistryKind::Container)
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Returns the handle stored under `id`, building and storing it first if
    /// absent. Builder errors propagate and leave the registry untouched.
    pub async fn get_or_render<F, Fut>(&self, id: &str, builder: F) -> Result<Handle>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Handle>>,
    {
        let existing = self.entries.lock().get(id).cloned();
        if let Some(handle) = existing {
            metrics::counter!("ui_registry_hits_total", "registry" => self.kind.as_str())
                .increment(1);
            tracing::trace!(registry = self.kind.as_str(), id, "registry hit");
            return Ok(handle);
        }

        let handle = builder().await?;

        let mut entries = self.entries.lock();
        if let Some(winner) = entries.get(id) {
            handle.remove();
            return Ok(winner.clone());
        }
        entries.insert(id.to_string(), handle.clone());
        metrics::counter!("ui_renders_total", "registry" => self.kind.as_str()).increment(1);
        tracing::debug!(registry = self.kind.as_str(), id, "rendered");
        Ok(handle)
    }

    /// Removes the UI and forgets the entry. Returns false if `id` was absent.
    pub fn unmount(&self, id: &str) -> bool {
        let removed = self.entries.lock().remove(id);
        match removed {
            Some(handle) => {
                handle.remove();
                tracing::debug!(registry = self.kind.as_str(), id, "unmounted");
                true
            }
            None => false,
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Forwards a partial props update. Silently does nothing for unknown ids.
    pub fn update_props(&self, id: &str, patch: Props) -> bool {
        let handle = self.entries.lock().get(id).cloned();
        match handle {
            Some(handle) => {
                handle.set_props(patch);
                true
            }
            None => false,
        }
    }

    /// Unmounts every entry.
    pub fn clear(&self) {
        let drained: Vec<(String, Handle)> = self.entries.lock().drain().collect();
        for (_, handle) in drained {
            handle.remove();
        }
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentKind};
    use crate::error::UiError;
    use crate::memory::InMemoryRenderer;
    use crate::region::Region;
    use crate::renderer::Renderer;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_get_or_render_builds_once() {
        let renderer = InMemoryRenderer::new();
        let region = Region::new("shipping-actions");
        let registry = Registry::components();
        let calls = AtomicUsize::new(0);

        let first = registry
            .get_or_render("shipping-continue", || {
                calls.fetch_add(1, Ordering::SeqCst);
                renderer.render(Component::new(ComponentKind::Button), &region)
            })
            .await
            .unwrap();
        let second = registry
            .get_or_render("shipping-continue", || {
                calls.fetch_add(1, Ordering::SeqCst);
                renderer.render(Component::new(ComponentKind::Button), &region)
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(region.children().len(), 1);
    }

    #[tokio::test]
    async fn test_builder_failure_stores_nothing() {
        let renderer = InMemoryRenderer::new();
        renderer.set_fail_on(ComponentKind::AddressForm, true);
        let region = Region::new("shipping-content");
        let registry = Registry::containers();

        let result = registry
            .get_or_render("shipping-address-form", || {
                renderer.render(Component::new(ComponentKind::AddressForm), &region)
            })
            .await;

        assert!(matches!(result, Err(UiError::RenderFailed { .. })));
        assert!(!registry.has("shipping-address-form"));

        renderer.set_fail_on(ComponentKind::AddressForm, false);
        registry
            .get_or_render("shipping-address-form", || {
                renderer.render(Component::new(ComponentKind::AddressForm), &region)
            })
            .await
            .unwrap();
        assert!(registry.has("shipping-address-form"));
    }

    #[tokio::test]
    async fn test_unmount_then_render_creates_fresh_instance() {
        let renderer = InMemoryRenderer::new();
        let region = Region::new("payment-content");
        let registry = Registry::containers();

        let first = registry
            .get_or_render("payment-methods", || {
                renderer.render(Component::new(ComponentKind::PaymentMethods), &region)
            })
            .await
            .unwrap();
        assert!(registry.unmount("payment-methods"));
        assert!(!registry.unmount("payment-methods"));
        assert!(region.is_empty());

        let second = registry
            .get_or_render("payment-methods", || {
                renderer.render(Component::new(ComponentKind::PaymentMethods), &region)
            })
            .await
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(renderer.render_count(ComponentKind::PaymentMethods), 2);
    }

    #[tokio::test]
    async fn test_update_props_on_unknown_id_is_a_no_op() {
        let registry = Registry::containers();
        let mut patch = Props::new();
        patch.insert("disabled".to_string(), false.into());
        assert!(!registry.update_props("place-order", patch));
    }

    #[tokio::test]
    async fn test_clear_removes_all_ui() {
        let renderer = InMemoryRenderer::new();
        let region = Region::new("main");
        let registry = Registry::containers();
        for id in ["a", "b"] {
            registry
                .get_or_render(id, || {
                    renderer.render(Component::new(ComponentKind::Button), &region)
                })
                .await
                .unwrap();
        }
        assert_eq!(registry.ids(), vec!["a", "b"]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(region.is_empty());
    }
}
