#![forbid(unsafe_code)]

//! Dashkit Core
//!
//! Pure interaction state machines for the dashboard chrome. This crate owns
//! the transient UI state with no I/O of its own:
//!
//! - [`OverlayController`] - reference-counted loading-overlay lifecycle
//! - [`ConfirmFlow`] - destructive-action confirmation state machine
//! - [`SidebarController`] - collapsible sidebar state and layout tokens
//! - [`table`] - client-side table filter/sort helpers
//!
//! # Role in dashkit
//! `dashkit-core` is the bottom layer. The shell crate composes these
//! controllers with page collaborators and a dialog provider; nothing here
//! touches storage, streams, or the page directly. Collaborator seams are
//! traits ([`OverlaySurface`], [`SidebarSurface`]) so a missing page element
//! degrades to a no-op instead of an error.

pub mod confirm;
pub mod overlay;
pub mod sidebar;
pub mod table;

pub use confirm::{ConfirmError, ConfirmFlow, ConfirmationRequest, Decision};
pub use overlay::{OverlayConfig, OverlayController, OverlaySurface, WorkToken};
pub use sidebar::{
    Breakpoints, ClickTarget, LayoutTokens, SidebarController, SidebarState, SidebarSurface,
};
pub use table::{SortDirection, filter_rows, row_matches, sort_rows};
