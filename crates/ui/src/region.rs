//! Named page regions and their visual state.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::component::ComponentKind;

/// Read-only rendering of a committed value, with an optional edit link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub lines: Vec<String>,
    pub editable: bool,
}

impl Summary {
    pub fn editable(lines: Vec<String>) -> Self {
        Self {
            lines,
            editable: true,
        }
    }

    pub fn read_only(lines: Vec<String>) -> Self {
        Self {
            lines,
            editable: false,
        }
    }
}

/// A component the renderer attached to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MountedComponent {
    pub handle_id: u64,
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionState {
    pub active: bool,
    pub hidden: bool,
    pub summary: Option<Summary>,
    pub children: Vec<MountedComponent>,
}

/// A named area of the page.
///
/// Cloning yields another reference to the same area.
#[derive(Clone)]
pub struct Region {
    id: Arc<str>,
    state: Arc<RwLock<RegionState>>,
}

impl Region {
    pub fn new(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            state: Arc::new(RwLock::new(RegionState::default())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.state.read().active
    }

    pub fn set_active(&self, active: bool) {
        self.state.write().active = active;
    }

    pub fn is_hidden(&self) -> bool {
        self.state.read().hidden
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.state.write().hidden = hidden;
    }

    pub fn summary(&self) -> Option<Summary> {
        self.state.read().summary.clone()
    }

    /// Replaces the region's summary content.
    pub fn set_summary(&self, summary: Summary) {
        self.state.write().summary = Some(summary);
    }

    /// Drops summary content and the active flag. Mounted children are
    /// detached by their own handles, not here.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.summary = None;
        state.active = false;
    }

    pub fn children(&self) -> Vec<MountedComponent> {
        self.state.read().children.clone()
    }

    /// True when nothing is mounted and no summary is shown.
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.children.is_empty() && state.summary.is_none()
    }

    pub fn snapshot(&self) -> RegionState {
        self.state.read().clone()
    }

    /// Called by renderers after mounting a component here.
    pub fn attach(&self, mounted: MountedComponent) {
        self.state.write().children.push(mounted);
    }

    /// Called by renderers when a component is removed.
    pub fn detach(&self, handle_id: u64) {
        self.state
            .write()
            .children
            .retain(|child| child.handle_id != handle_id);
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("id", &self.id)
            .field("state", &*self.state.read())
            .finish()
    }
}
