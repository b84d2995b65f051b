//! Headless renderer that records what would be on the page.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::component::{Component, ComponentKind, Props};
use crate::error::{Result, UiError};
use crate::form::FormHandle;
use crate::region::{MountedComponent, Region};
use crate::renderer::{ComponentHandle, Handle, Renderer};

/// A mounted component in the in-memory renderer.
pub struct MemoryHandle {
    id: u64,
    kind: ComponentKind,
    props: Mutex<Props>,
    region: Region,
    removed: AtomicBool,
}

impl MemoryHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn props(&self) -> Props {
        self.props.lock().clone()
    }

    pub fn region_id(&self) -> &str {
        self.region.id()
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }
}

impl ComponentHandle for MemoryHandle {
    fn set_props(&self, patch: Props) {
        let mut props = self.props.lock();
        for (key, value) in patch {
            props.insert(key, value);
        }
    }

    fn remove(&self) {
        if !self.removed.swap(true, Ordering::SeqCst) {
            self.region.detach(self.id);
        }
    }
}

/// A form whose values and validity are set by the test or script.
///
/// A form with no values never validates.
pub struct MemoryForm {
    kind: ComponentKind,
    values: Mutex<Value>,
    valid: AtomicBool,
}

impl MemoryForm {
    fn new(kind: ComponentKind, values: Value) -> Self {
        Self {
            kind,
            values: Mutex::new(values),
            valid: AtomicBool::new(true),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn fill(&self, values: Value) {
        *self.values.lock() = values;
    }

    pub fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }
}

impl FormHandle for MemoryForm {
    fn values(&self) -> Value {
        self.values.lock().clone()
    }

    fn validate(&self) -> bool {
        let has_values = match &*self.values.lock() {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        };
        has_values && self.valid.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct InMemoryRendererState {
    next_id: u64,
    render_counts: HashMap<ComponentKind, usize>,
    fail_on: HashSet<ComponentKind>,
    prefill: HashMap<ComponentKind, Value>,
    forms: HashMap<ComponentKind, Arc<MemoryForm>>,
    handles: Vec<Arc<MemoryHandle>>,
}

/// In-memory renderer for tests and scripted runs.
#[derive(Clone, Default)]
pub struct InMemoryRenderer {
    state: Arc<RwLock<InMemoryRendererState>>,
}

impl InMemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every render of `kind` fail while set.
    pub fn set_fail_on(&self, kind: ComponentKind, fail: bool) {
        let mut state = self.state.write();
        if fail {
            state.fail_on.insert(kind);
        } else {
            state.fail_on.remove(&kind);
        }
    }

    /// Values newly mounted forms of `kind` start with.
    pub fn prefill(&self, kind: ComponentKind, values: Value) {
        self.state.write().prefill.insert(kind, values);
    }

    /// Number of successful renders of `kind` so far.
    pub fn render_count(&self, kind: ComponentKind) -> usize {
        self.state
            .read()
            .render_counts
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// The most recently mounted form of `kind`.
    pub fn form(&self, kind: ComponentKind) -> Option<Arc<MemoryForm>> {
        self.state.read().forms.get(&kind).cloned()
    }

    /// Live (not removed) handles of `kind`, oldest first.
    pub fn live(&self, kind: ComponentKind) -> Vec<Arc<MemoryHandle>> {
        self.state
            .read()
            .handles
            .iter()
            .filter(|handle| handle.kind == kind && !handle.is_removed())
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Renderer for InMemoryRenderer {
    async fn render(&self, component: Component, region: &Region) -> Result<Handle> {
        let mut state = self.state.write();

        if state.fail_on.contains(&component.kind) {
            return Err(UiError::RenderFailed {
                kind: component.kind,
                region: region.id().to_string(),
                reason: "renderer configured to fail".to_string(),
            });
        }

        state.next_id += 1;
        let handle = Arc::new(MemoryHandle {
            id: state.next_id,
            kind: component.kind,
            props: Mutex::new(component.props),
            region: region.clone(),
            removed: AtomicBool::new(false),
        });
        region.attach(MountedComponent {
            handle_id: handle.id,
            kind: handle.kind,
        });

        if let Some(form_ref) = component.form_ref {
            let values = state
                .prefill
                .get(&component.kind)
                .cloned()
                .unwrap_or(Value::Null);
            let form = Arc::new(MemoryForm::new(component.kind, values));
            form_ref.set(form.clone());
            state.forms.insert(component.kind, form);
        }

        *state.render_counts.entry(component.kind).or_default() += 1;
        state.handles.push(handle.clone());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormRef;
    use serde_json::json;

    #[tokio::test]
    async fn test_render_attaches_and_remove_detaches() {
        let renderer = InMemoryRenderer::new();
        let region = Region::new("billing-content");

        let handle = renderer
            .render(Component::new(ComponentKind::AddressForm), &region)
            .await
            .unwrap();
        assert_eq!(region.children().len(), 1);
        assert_eq!(renderer.live(ComponentKind::AddressForm).len(), 1);

        handle.remove();
        handle.remove();
        assert!(region.is_empty());
        assert!(renderer.live(ComponentKind::AddressForm).is_empty());
    }

    #[tokio::test]
    async fn test_set_props_merges() {
        let renderer = InMemoryRenderer::new();
        let region = Region::new("place-order");
        let handle = renderer
            .render(
                Component::new(ComponentKind::PlaceOrder)
                    .prop("disabled", true)
                    .prop("label", "Place order"),
                &region,
            )
            .await
            .unwrap();

        let mut patch = Props::new();
        patch.insert("disabled".to_string(), false.into());
        handle.set_props(patch);

        let live = renderer.live(ComponentKind::PlaceOrder);
        let props = live[0].props();
        assert_eq!(props["disabled"], false);
        assert_eq!(props["label"], "Place order");
    }

    #[tokio::test]
    async fn test_form_ref_receives_prefilled_form() {
        let renderer = InMemoryRenderer::new();
        renderer.prefill(ComponentKind::LoginForm, json!({"email": "a@b.com"}));
        let form_ref = FormRef::new();

        renderer
            .render(
                Component::new(ComponentKind::LoginForm).form_ref(form_ref.clone()),
                &Region::new("shipping-login"),
            )
            .await
            .unwrap();

        let form = form_ref.current().unwrap();
        assert!(form.validate());
        assert_eq!(form.values()["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_empty_or_invalid_form_does_not_validate() {
        let form = MemoryForm::new(ComponentKind::AddressForm, Value::Null);
        assert!(!form.validate());

        form.fill(json!({"city": "London"}));
        assert!(form.validate());

        form.set_valid(false);
        assert!(!form.validate());
    }
}
