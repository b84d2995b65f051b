//! UI plumbing for the checkout surface.
//!
//! The actual widgets come from an external rendering library reached through
//! [`Renderer`]. This crate owns what sits between that library and the
//! checkout flow:
//! - [`Region`]: a named area of the page with active/hidden/summary state
//! - [`Registry`]: memoizing id → handle cache, at most one live instance per id
//! - [`OverlaySpinner`]: shared loading indicator wrapped around an action
//! - [`FormRef`]: late-read cell for the currently live form
//! - [`InMemoryRenderer`]: headless renderer for tests and scripted runs

pub mod component;
pub mod error;
pub mod form;
pub mod memory;
pub mod region;
pub mod registry;
pub mod renderer;
pub mod spinner;

pub use component::{Component, ComponentKind, Props};
pub use error::{Result, UiError};
pub use form::{FormHandle, FormRef};
pub use memory::{InMemoryRenderer, MemoryForm, MemoryHandle};
pub use region::{MountedComponent, Region, RegionState, Summary};
pub use registry::{Registry, RegistryKind};
pub use renderer::{ComponentHandle, Handle, Renderer};
pub use spinner::{OverlaySpinner, SPINNER_ID};
