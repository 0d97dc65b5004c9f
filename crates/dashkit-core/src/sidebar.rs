#![forbid(unsafe_code)]

//! Collapsible sidebar state and layout.
//!
//! The sidebar has two states, [`Expanded`] and [`Collapsed`]. On wide
//! viewports the state also drives a pair of layout tokens (sidebar width
//! and content margin); both are derived from the state by one pure function
//! and handed to the surface in a single call, so the page can never observe
//! a mismatched width/margin pair. On narrow viewports the sidebar floats
//! over the content and the tokens are not applied.
//!
//! Dismissal inputs: a click outside the sidebar and toggle control (narrow
//! viewports only), the Escape key (always), and following a navigation link
//! (narrow viewports only). Restore/persist of the collapsed flag goes
//! through the composition root, which owns the preference store.
//!
//! [`Expanded`]: SidebarState::Expanded
//! [`Collapsed`]: SidebarState::Collapsed

/// Sidebar visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarState {
    /// Full-width navigation panel.
    #[default]
    Expanded,
    /// Icon-rail (wide viewports) or hidden (narrow viewports).
    Collapsed,
}

impl SidebarState {
    /// The opposite state.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }

    /// Whether this is the collapsed state.
    #[must_use]
    pub fn is_collapsed(self) -> bool {
        matches!(self, Self::Collapsed)
    }
}

/// Viewport thresholds, in CSS pixels. Tunables, not a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    /// At or above this width the desktop layout swap applies.
    pub wide: u16,
    /// At or below this width the sidebar is overlay-style.
    pub narrow: u16,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            wide: 992,
            narrow: 768,
        }
    }
}

/// Width/margin pair applied together on wide viewports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTokens {
    /// Sidebar width in pixels.
    pub sidebar_width: u16,
    /// Main-content left margin in pixels.
    pub content_margin: u16,
}

impl LayoutTokens {
    const EXPANDED_WIDTH: u16 = 260;
    const COLLAPSED_WIDTH: u16 = 70;

    /// Derive the token pair for a state. The margin always equals the
    /// sidebar width, which is what keeps the pair consistent.
    #[must_use]
    pub fn for_state(state: SidebarState) -> Self {
        let width = match state {
            SidebarState::Expanded => Self::EXPANDED_WIDTH,
            SidebarState::Collapsed => Self::COLLAPSED_WIDTH,
        };
        Self {
            sidebar_width: width,
            content_margin: width,
        }
    }
}

/// Where a click landed, relative to the elements the controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickTarget {
    /// The click landed inside the sidebar container.
    pub inside_sidebar: bool,
    /// The click landed on the toggle control.
    pub on_toggle: bool,
}

impl ClickTarget {
    /// A click outside both the sidebar and the toggle control.
    #[must_use]
    pub fn outside() -> Self {
        Self::default()
    }
}

/// The sidebar element plus main-content pair the controller mutates.
///
/// `layout` is `Some` only when the desktop layout swap applies; state and
/// tokens arrive in the same call so they change atomically or not at all.
pub trait SidebarSurface {
    fn apply(&mut self, state: SidebarState, layout: Option<LayoutTokens>);
}

/// Owns sidebar expanded/collapsed state and its dismissal rules.
pub struct SidebarController {
    state: SidebarState,
    breakpoints: Breakpoints,
    viewport_width: Option<u16>,
    surface: Option<Box<dyn SidebarSurface>>,
}

impl SidebarController {
    /// Create an expanded controller with no surface wired.
    #[must_use]
    pub fn new(breakpoints: Breakpoints) -> Self {
        Self {
            state: SidebarState::Expanded,
            breakpoints,
            viewport_width: None,
            surface: None,
        }
    }

    /// Attach the sidebar surface element.
    #[must_use]
    pub fn with_surface(mut self, surface: Box<dyn SidebarSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Record the current viewport width.
    pub fn set_viewport(&mut self, width: u16) {
        self.viewport_width = Some(width);
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SidebarState {
        self.state
    }

    /// Whether the desktop layout swap applies.
    ///
    /// An unknown viewport is treated as wide (desktop-first).
    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.viewport_width
            .is_none_or(|w| w >= self.breakpoints.wide)
    }

    /// Whether the sidebar floats over the content as an overlay.
    #[must_use]
    pub fn is_narrow(&self) -> bool {
        self.viewport_width
            .is_some_and(|w| w <= self.breakpoints.narrow)
    }

    /// Flip the state in response to the toggle control.
    pub fn toggle(&mut self) -> SidebarState {
        self.set_state(self.state.toggled());
        self.state
    }

    /// Collapse in response to a click outside the sidebar and toggle.
    ///
    /// Applies only below the wide breakpoint, where the sidebar covers the
    /// content; on desktop layouts an outside click is ordinary interaction.
    /// Returns `true` if the state changed.
    pub fn collapse_if_outside(&mut self, target: ClickTarget) -> bool {
        if self.is_wide() || self.state.is_collapsed() {
            return false;
        }
        if target.inside_sidebar || target.on_toggle {
            return false;
        }
        self.set_state(SidebarState::Collapsed);
        true
    }

    /// Collapse in response to the Escape key. Unconditional.
    pub fn collapse_on_escape(&mut self) -> bool {
        if self.state.is_collapsed() {
            return false;
        }
        self.set_state(SidebarState::Collapsed);
        true
    }

    /// Collapse when a navigation link is followed on a narrow viewport,
    /// where the overlay-style sidebar would otherwise cover the new page.
    pub fn collapse_on_navigate(&mut self) -> bool {
        if !self.is_narrow() || self.state.is_collapsed() {
            return false;
        }
        self.set_state(SidebarState::Collapsed);
        true
    }

    /// Set the initial state from the persisted preference.
    ///
    /// `None` (nothing stored) defaults to expanded.
    pub fn restore(&mut self, collapsed: Option<bool>) {
        let state = if collapsed.unwrap_or(false) {
            SidebarState::Collapsed
        } else {
            SidebarState::Expanded
        };
        tracing::debug!(?state, stored = collapsed.is_some(), "sidebar state restored");
        self.set_state(state);
    }

    /// The value to persist for the `sidebarCollapsed` preference.
    #[must_use]
    pub fn persisted_value(&self) -> bool {
        self.state.is_collapsed()
    }

    fn set_state(&mut self, state: SidebarState) {
        self.state = state;
        let layout = self.is_wide().then(|| LayoutTokens::for_state(state));
        if let Some(surface) = self.surface.as_mut() {
            surface.apply(state, layout);
        }
    }
}

impl Default for SidebarController {
    fn default() -> Self {
        Self::new(Breakpoints::default())
    }
}

impl std::fmt::Debug for SidebarController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidebarController")
            .field("state", &self.state)
            .field("viewport_width", &self.viewport_width)
            .field("surface", &self.surface.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Applied = Rc<RefCell<Vec<(SidebarState, Option<LayoutTokens>)>>>;

    struct RecordingSurface {
        applied: Applied,
    }

    impl SidebarSurface for RecordingSurface {
        fn apply(&mut self, state: SidebarState, layout: Option<LayoutTokens>) {
            self.applied.borrow_mut().push((state, layout));
        }
    }

    fn controller_with_log() -> (SidebarController, Applied) {
        let applied: Applied = Rc::new(RefCell::new(Vec::new()));
        let surface = RecordingSurface {
            applied: Rc::clone(&applied),
        };
        let controller = SidebarController::default().with_surface(Box::new(surface));
        (controller, applied)
    }

    // --- Toggle and layout tokens ---

    #[test]
    fn toggle_flips_state() {
        let mut sidebar = SidebarController::default();
        assert_eq!(sidebar.state(), SidebarState::Expanded);
        assert_eq!(sidebar.toggle(), SidebarState::Collapsed);
        assert_eq!(sidebar.toggle(), SidebarState::Expanded);
    }

    #[test]
    fn wide_toggle_applies_matched_token_pair() {
        let (mut sidebar, applied) = controller_with_log();
        sidebar.set_viewport(1280);
        sidebar.toggle();

        let (state, layout) = applied.borrow().last().copied().unwrap();
        assert_eq!(state, SidebarState::Collapsed);
        let tokens = layout.unwrap();
        assert_eq!(tokens.sidebar_width, 70);
        assert_eq!(tokens.content_margin, tokens.sidebar_width);

        sidebar.toggle();
        let (_, layout) = applied.borrow().last().copied().unwrap();
        let tokens = layout.unwrap();
        assert_eq!(tokens.sidebar_width, 260);
        assert_eq!(tokens.content_margin, tokens.sidebar_width);
    }

    #[test]
    fn narrow_toggle_skips_layout_tokens() {
        let (mut sidebar, applied) = controller_with_log();
        sidebar.set_viewport(480);
        sidebar.toggle();

        let (state, layout) = applied.borrow().last().copied().unwrap();
        assert_eq!(state, SidebarState::Collapsed);
        assert!(layout.is_none());
    }

    #[test]
    fn tokens_always_match_for_both_states() {
        for state in [SidebarState::Expanded, SidebarState::Collapsed] {
            let tokens = LayoutTokens::for_state(state);
            assert_eq!(tokens.sidebar_width, tokens.content_margin);
        }
    }

    // --- Outside click ---

    #[test]
    fn outside_click_collapses_on_narrow_viewport() {
        let mut sidebar = SidebarController::default();
        sidebar.set_viewport(480);
        assert!(sidebar.collapse_if_outside(ClickTarget::outside()));
        assert_eq!(sidebar.state(), SidebarState::Collapsed);
    }

    #[test]
    fn outside_click_is_inert_on_wide_viewport() {
        let mut sidebar = SidebarController::default();
        sidebar.set_viewport(1280);
        assert!(!sidebar.collapse_if_outside(ClickTarget::outside()));
        assert_eq!(sidebar.state(), SidebarState::Expanded);
    }

    #[test]
    fn unknown_viewport_is_treated_as_wide() {
        let mut sidebar = SidebarController::default();
        assert!(!sidebar.collapse_if_outside(ClickTarget::outside()));
        assert_eq!(sidebar.state(), SidebarState::Expanded);
    }

    #[test]
    fn clicks_on_sidebar_or_toggle_do_not_dismiss() {
        let mut sidebar = SidebarController::default();
        sidebar.set_viewport(480);
        assert!(!sidebar.collapse_if_outside(ClickTarget {
            inside_sidebar: true,
            on_toggle: false,
        }));
        assert!(!sidebar.collapse_if_outside(ClickTarget {
            inside_sidebar: false,
            on_toggle: true,
        }));
        assert_eq!(sidebar.state(), SidebarState::Expanded);
    }

    // --- Escape and navigation ---

    #[test]
    fn escape_collapses_regardless_of_viewport() {
        let mut sidebar = SidebarController::default();
        sidebar.set_viewport(1280);
        assert!(sidebar.collapse_on_escape());
        assert_eq!(sidebar.state(), SidebarState::Collapsed);
        // Already collapsed: nothing to do.
        assert!(!sidebar.collapse_on_escape());
    }

    #[test]
    fn navigate_collapses_only_overlay_sidebar() {
        let mut sidebar = SidebarController::default();
        sidebar.set_viewport(480);
        assert!(sidebar.collapse_on_navigate());

        let mut sidebar = SidebarController::default();
        sidebar.set_viewport(1280);
        assert!(!sidebar.collapse_on_navigate());
        assert_eq!(sidebar.state(), SidebarState::Expanded);
    }

    // --- Restore / persist ---

    #[test]
    fn restore_defaults_to_expanded() {
        let mut sidebar = SidebarController::default();
        sidebar.restore(None);
        assert_eq!(sidebar.state(), SidebarState::Expanded);
        assert!(!sidebar.persisted_value());
    }

    #[test]
    fn restore_collapsed_preference() {
        let (mut sidebar, applied) = controller_with_log();
        sidebar.restore(Some(true));
        assert_eq!(sidebar.state(), SidebarState::Collapsed);
        assert!(sidebar.persisted_value());
        // Restore goes through the surface like any other state change.
        assert_eq!(applied.borrow().len(), 1);
    }

    #[test]
    fn restore_explicit_false_is_expanded() {
        let mut sidebar = SidebarController::default();
        sidebar.restore(Some(false));
        assert_eq!(sidebar.state(), SidebarState::Expanded);
    }

    #[test]
    fn custom_breakpoints_are_honored() {
        let mut sidebar = SidebarController::new(Breakpoints {
            wide: 1200,
            narrow: 900,
        });
        sidebar.set_viewport(1000);
        // 1000 is below the custom wide threshold: outside click dismisses.
        assert!(sidebar.collapse_if_outside(ClickTarget::outside()));
    }
}
