//! Contract of the external rendering library.

use std::sync::Arc;

use async_trait::async_trait;

use crate::component::{Component, Props};
use crate::error::Result;
use crate::region::Region;

/// A live, mounted component.
pub trait ComponentHandle: Send + Sync {
    /// Applies a partial props update; keys in `patch` replace existing ones.
    fn set_props(&self, patch: Props);

    /// Detaches the component from its region.
    fn remove(&self);
}

/// Shared handle to a mounted component.
pub type Handle = Arc<dyn ComponentHandle>;

/// Mounts components into page regions.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, component: Component, region: &Region) -> Result<Handle>;
}
