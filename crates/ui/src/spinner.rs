//! Shared overlay spinner wrapped around user-triggered actions.

use std::future::Future;
use std::sync::Arc;

use crate::component::{Component, ComponentKind};
use crate::error::UiError;
use crate::region::Region;
use crate::registry::Registry;
use crate::renderer::Renderer;

/// Registry id of the one shared spinner instance.
pub const SPINNER_ID: &str = "overlay-spinner";

/// Shows a loading indicator for the duration of an action.
///
/// The spinner is rendered through the component registry, so there is only
/// ever one instance. Nesting is unsupported: the inner action's completion
/// hides the spinner for the outer one too.
#[derive(Clone)]
pub struct OverlaySpinner {
    renderer: Arc<dyn Renderer>,
    registry: Arc<Registry>,
    region: Region,
}

impl OverlaySpinner {
    pub fn new(renderer: Arc<dyn Renderer>, registry: Arc<Registry>, region: Region) -> Self {
        Self {
            renderer,
            registry,
            region,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Runs `action` with the spinner shown.
    ///
    /// The spinner is removed once the action finishes, fails, panics or is
    /// dropped mid-flight. The action's result is returned unchanged. A
    /// spinner render failure propagates without running the action.
    pub async fn run<T, E, Fut>(&self, action: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: From<UiError>,
    {
        self.registry
            .get_or_render(SPINNER_ID, || {
                self.renderer
                    .render(Component::new(ComponentKind::Spinner), &self.region)
            })
            .await?;
        let _guard = SpinnerGuard {
            registry: &self.registry,
        };
        action.await
    }
}

struct SpinnerGuard<'a> {
    registry: &'a Registry,
}

impl Drop for SpinnerGuard<'_> {
    fn drop(&mut self) {
        self.registry.unmount(SPINNER_ID);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRenderer;

    fn spinner() -> (OverlaySpinner, InMemoryRenderer) {
        let renderer = InMemoryRenderer::new();
        let spinner = OverlaySpinner::new(
            Arc::new(renderer.clone()),
            Arc::new(Registry::components()),
            Region::new("overlay-spinner"),
        );
        (spinner, renderer)
    }

    #[tokio::test]
    async fn test_spinner_visible_during_action_and_removed_after() {
        let (spinner, _) = spinner();
        let region = spinner.region().clone();

        let value: Result<u32, UiError> = spinner
            .run(async {
                assert_eq!(region.children().len(), 1);
                Ok(42)
            })
            .await;

        assert_eq!(value.unwrap(), 42);
        assert!(spinner.region().is_empty());
    }

    #[tokio::test]
    async fn test_spinner_removed_when_action_fails() {
        let (spinner, _) = spinner();

        let result: Result<(), UiError> = spinner
            .run(async {
                Err(UiError::RenderFailed {
                    kind: ComponentKind::AddressForm,
                    region: "shipping".to_string(),
                    reason: "boom".to_string(),
                })
            })
            .await;

        assert!(result.is_err());
        assert!(spinner.region().is_empty());
    }

    #[tokio::test]
    async fn test_spinner_render_failure_skips_action() {
        let (spinner, renderer) = spinner();
        renderer.set_fail_on(ComponentKind::Spinner, true);
        let mut ran = false;

        let result: Result<(), UiError> = spinner
            .run(async {
                ran = true;
                Ok(())
            })
            .await;

        assert!(result.is_err());
        assert!(!ran);
    }

    #[tokio::test]
    async fn test_sequential_runs_reuse_single_instance_each_time() {
        let (spinner, renderer) = spinner();
        for _ in 0..3 {
            let _: Result<(), UiError> = spinner.run(async { Ok(()) }).await;
        }
        assert_eq!(renderer.render_count(ComponentKind::Spinner), 3);
        assert!(spinner.region().is_empty());
    }
}
