#![forbid(unsafe_code)]

//! dashkit-shell: the composition root tying the dashboard chrome together.
//!
//! # Role in dashkit
//!
//! `dashkit-core` owns the pure state machines (overlay, confirmation,
//! sidebar) and `dashkit-prefs` the persisted preferences; this crate is
//! where a host wires them to a concrete page. It adds the pieces that only
//! make sense at the edge:
//!
//! - [`Shell`] and [`ShellBuilder`]: explicit construction of the page-wide
//!   controller and routing of [`PageEvent`]s to the owning state machine.
//! - [`DialogProvider`]: the capability seam for confirmation prompts and
//!   notices, with [`FallbackDialog`] as the blocking stdio implementation
//!   used when no richer provider is injected.
//! - [`Operation`]: the cooperative contract for long-running page work, so
//!   overlay visibility is tied to real completion instead of timers.
//! - [`Navigator`] / [`FormHost`]: the only routes out of the page, both
//!   optional; a missing collaborator degrades to a logged no-op.
//!
//! ```text
//!         host input                    collaborators (injected)
//!             │                               ▲
//!             ▼                               │
//!       ┌──────────┐   routes to   ┌──────────┴──────────┐
//!       │PageEvent │ ───────────▶  │        Shell        │
//!       └──────────┘               │ overlay / confirm / │
//!                                  │ sidebar / prefs     │
//!                                  └─────────────────────┘
//! ```

mod dialog;
mod op;
mod page;
mod shell;

pub use dialog::{ConfirmPrompt, DialogProvider, FallbackDialog, Notice, NoticeLevel, Presentation};
pub use op::{Delayed, Immediate, OpError, OpPoll, Operation};
pub use page::{DestructiveTrigger, FormHost, Navigator, TriggerShape};
pub use shell::{PageEvent, Shell, ShellBuilder, ShellConfig};

pub use dashkit_core::{
    Breakpoints, ClickTarget, ConfirmError, Decision, LayoutTokens, OverlayConfig, OverlaySurface,
    SidebarState, SidebarSurface,
};
