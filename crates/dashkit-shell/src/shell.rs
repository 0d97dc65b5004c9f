#![forbid(unsafe_code)]

//! The composition root of the dashboard chrome.
//!
//! One [`Shell`] per page, constructed explicitly through [`ShellBuilder`]
//! with its collaborators injected — no module-level singleton. The host
//! translates raw page input into [`PageEvent`]s and feeds them through
//! [`Shell::handle_event`]; the shell routes each event to the controller
//! that owns the corresponding state.
//!
//! The shell is also where the destructive-action pieces meet: it binds the
//! trigger's shape to a navigation or form-submit action, presents the
//! prompt through the dialog provider, and on confirmation wraps the action
//! in overlay work and a success notice.

use std::cell::RefCell;
use std::rc::Rc;

use dashkit_core::{
    Breakpoints, ClickTarget, ConfirmationRequest, Decision, OverlayConfig, OverlayController,
    OverlaySurface, SidebarController, SidebarState, SidebarSurface, WorkToken,
};
use dashkit_prefs::PreferenceStore;

use crate::dialog::{ConfirmPrompt, DialogProvider, FallbackDialog, Notice, Presentation};
use crate::op::{OpError, OpPoll, Operation};
use crate::page::{DestructiveTrigger, FormHost, Navigator, TriggerShape};

/// Page input, as translated by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The sidebar toggle control was clicked.
    SidebarToggle,
    /// A click landed somewhere on the page.
    OutsideClick(ClickTarget),
    /// The Escape key was pressed.
    EscapePressed,
    /// The viewport was resized to the given width.
    ViewportResized(u16),
    /// A destructive-action trigger fired.
    DestructiveTriggered(DestructiveTrigger),
    /// A link marked navigate-with-loading was followed.
    NavigateWithLoading(String),
    /// A (non-destructive) form was submitted.
    FormSubmitted(String),
    /// The search input was submitted with the given query.
    SearchSubmitted(String),
    /// Network connectivity was restored (`true`) or lost (`false`).
    ConnectivityChanged(bool),
    /// The next page finished loading after a navigation.
    PageLoaded,
    /// The page is being torn down.
    PageTeardown,
}

/// Tunables for the shell and its controllers.
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    pub breakpoints: Breakpoints,
    pub overlay: OverlayConfig,
}

/// Builder for [`Shell`]. Collaborators default to absent; the dialog
/// provider defaults to the blocking stdio fallback and the preference
/// store to ephemeral memory.
pub struct ShellBuilder {
    config: ShellConfig,
    prefs: Option<PreferenceStore>,
    dialog: Option<Box<dyn DialogProvider>>,
    overlay_surface: Option<Box<dyn OverlaySurface>>,
    sidebar_surface: Option<Box<dyn SidebarSurface>>,
    navigator: Option<Rc<RefCell<dyn Navigator>>>,
    forms: Option<Rc<RefCell<dyn FormHost>>>,
}

impl ShellBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ShellConfig::default(),
            prefs: None,
            dialog: None,
            overlay_surface: None,
            sidebar_surface: None,
            navigator: None,
            forms: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn prefs(mut self, prefs: PreferenceStore) -> Self {
        self.prefs = Some(prefs);
        self
    }

    #[must_use]
    pub fn dialog(mut self, dialog: Box<dyn DialogProvider>) -> Self {
        self.dialog = Some(dialog);
        self
    }

    #[must_use]
    pub fn overlay_surface(mut self, surface: Box<dyn OverlaySurface>) -> Self {
        self.overlay_surface = Some(surface);
        self
    }

    #[must_use]
    pub fn sidebar_surface(mut self, surface: Box<dyn SidebarSurface>) -> Self {
        self.sidebar_surface = Some(surface);
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Rc::new(RefCell::new(navigator)));
        self
    }

    #[must_use]
    pub fn forms(mut self, forms: impl FormHost + 'static) -> Self {
        self.forms = Some(Rc::new(RefCell::new(forms)));
        self
    }

    /// Assemble the shell. Call [`Shell::init`] before delivering events.
    #[must_use]
    pub fn build(self) -> Shell {
        let mut overlay = OverlayController::new(self.config.overlay);
        if let Some(surface) = self.overlay_surface {
            overlay = overlay.with_surface(surface);
        }
        let mut sidebar = SidebarController::new(self.config.breakpoints);
        if let Some(surface) = self.sidebar_surface {
            sidebar = sidebar.with_surface(surface);
        }
        Shell {
            overlay,
            confirm: dashkit_core::ConfirmFlow::new(),
            sidebar,
            prefs: self.prefs.unwrap_or_else(PreferenceStore::in_memory),
            dialog: self
                .dialog
                .unwrap_or_else(|| Box::new(FallbackDialog::stdio())),
            navigator: self.navigator,
            forms: self.forms,
            initialized: false,
            nav_token: None,
        }
    }
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The page-wide UI interaction controller.
pub struct Shell {
    overlay: OverlayController,
    confirm: dashkit_core::ConfirmFlow,
    sidebar: SidebarController,
    prefs: PreferenceStore,
    dialog: Box<dyn DialogProvider>,
    navigator: Option<Rc<RefCell<dyn Navigator>>>,
    forms: Option<Rc<RefCell<dyn FormHost>>>,
    initialized: bool,
    /// Overlay work taken by a pending full-page navigation, released when
    /// the next page reports loaded.
    nav_token: Option<WorkToken>,
}

impl Shell {
    /// Start building a shell.
    #[must_use]
    pub fn builder() -> ShellBuilder {
        ShellBuilder::new()
    }

    /// One-time startup: load preferences and restore the sidebar state.
    ///
    /// Idempotent — a second call is a logged no-op, so hosts cannot
    /// double-register the event path.
    pub fn init(&mut self) {
        if self.initialized {
            tracing::warn!("shell already initialized; ignoring repeated init");
            return;
        }
        if let Err(e) = self.prefs.load() {
            tracing::warn!(error = %e, "preference load failed; using defaults");
        }
        self.sidebar.restore(self.prefs.sidebar_collapsed());
        self.initialized = true;
        tracing::debug!(prefs = %self.prefs.backend_name(), "shell initialized");
    }

    /// Route one page event. Events before [`init`](Self::init) are dropped.
    pub fn handle_event(&mut self, event: PageEvent) {
        if !self.initialized {
            tracing::warn!(?event, "event delivered before init; dropped");
            return;
        }
        match event {
            PageEvent::SidebarToggle => {
                self.sidebar.toggle();
            }
            PageEvent::OutsideClick(target) => {
                self.sidebar.collapse_if_outside(target);
            }
            PageEvent::EscapePressed => {
                self.sidebar.collapse_on_escape();
            }
            PageEvent::ViewportResized(width) => {
                self.sidebar.set_viewport(width);
            }
            PageEvent::DestructiveTriggered(trigger) => {
                self.handle_destructive(trigger);
            }
            PageEvent::NavigateWithLoading(target) => {
                self.begin_navigation();
                if let Some(navigator) = &self.navigator {
                    navigator.borrow_mut().navigate(&target);
                } else {
                    tracing::warn!(target, "no navigator wired; navigation skipped");
                }
            }
            PageEvent::FormSubmitted(form_id) => {
                self.begin_navigation();
                if let Some(forms) = &self.forms {
                    forms.borrow_mut().submit(&form_id);
                } else {
                    tracing::warn!(form_id, "no form host wired; submit skipped");
                }
            }
            PageEvent::SearchSubmitted(query) => {
                self.search(&query, crate::op::Immediate::ok());
            }
            PageEvent::ConnectivityChanged(online) => {
                if online {
                    self.notify_success("Internet connection restored", None);
                } else {
                    self.notify_warning("Internet connection lost", None);
                }
            }
            PageEvent::PageLoaded => {
                if let Some(token) = self.nav_token.take() {
                    self.overlay.release(token);
                }
            }
            PageEvent::PageTeardown => {
                self.prefs
                    .set_sidebar_collapsed(self.sidebar.persisted_value());
                if let Err(e) = self.prefs.flush() {
                    tracing::warn!(error = %e, "preference flush failed at teardown");
                }
            }
        }
    }

    /// Resolve the pending confirmation with the user's decision.
    ///
    /// Rich dialog providers that answered [`Presentation::Displayed`] call
    /// this when their prompt settles. Confirmation wraps the bound action
    /// in overlay work and reports success; cancellation runs the request's
    /// cancel action, if any.
    pub fn resolve_confirmation(&mut self, decision: Decision) {
        if !self.confirm.is_pending() {
            tracing::warn!(?decision, "confirmation resolved with none pending");
            return;
        }
        match decision {
            Decision::Confirmed => {
                let token = self.overlay.begin_work(None);
                let resolved = self.confirm.resolve(Decision::Confirmed);
                self.overlay.release(token);
                if resolved.is_ok() {
                    self.notify_success("The record has been deleted.", None);
                }
            }
            Decision::Cancelled => {
                let _ = self.confirm.resolve(Decision::Cancelled);
            }
        }
    }

    // --- Notification helpers ---

    /// Show a success toast (auto-dismissed).
    pub fn notify_success(&mut self, message: &str, title: Option<&str>) {
        self.toast(Notice::success(message), title);
    }

    /// Show a warning notice.
    pub fn notify_warning(&mut self, message: &str, title: Option<&str>) {
        self.toast(Notice::warning(message), title);
    }

    /// Show an error notice.
    pub fn notify_error(&mut self, message: &str, title: Option<&str>) {
        self.toast(Notice::error(message), title);
    }

    fn toast(&mut self, notice: Notice, title: Option<&str>) {
        let notice = match title {
            Some(title) => notice.with_title(title),
            None => notice,
        };
        self.dialog.toast(&notice);
    }

    // --- Long-running page work ---

    /// Export dashboard data, reporting the outcome by notice.
    ///
    /// The overlay stays up for as long as `op` reports pending.
    pub fn export_data(&mut self, format: &str, op: impl Operation) {
        let format = format.to_uppercase();
        let message = format!("Exporting data as {format}...");
        match self.run_with_overlay(Some(&message), op) {
            Ok(()) => self.notify_success(&format!("Data exported as {format}"), None),
            Err(e) => self.notify_error(&e.to_string(), Some("Export failed")),
        }
    }

    /// Run a search submission. Empty and whitespace-only queries are
    /// ignored; the backend resolving the query is the caller's operation.
    pub fn search(&mut self, query: &str, op: impl Operation) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        match self.run_with_overlay(None, op) {
            Ok(()) => {
                let notice =
                    Notice::info(format!("Searching for \"{query}\"")).with_title("Search results");
                self.dialog.toast(&notice);
            }
            Err(e) => self.notify_error(&e.to_string(), None),
        }
    }

    fn run_with_overlay(
        &mut self,
        message: Option<&str>,
        mut op: impl Operation,
    ) -> Result<(), OpError> {
        let token = self.overlay.begin_work(message);
        let result = loop {
            match op.poll() {
                OpPoll::Pending => {}
                OpPoll::Complete(result) => break result,
            }
        };
        self.overlay.release(token);
        result
    }

    // --- Destructive actions ---

    fn handle_destructive(&mut self, trigger: DestructiveTrigger) {
        let prompt = ConfirmPrompt::for_subject(&trigger.subject);
        let action = self.bind_trigger_action(trigger.shape);
        let request = ConfirmationRequest::new(trigger.subject, action);

        // Rejection while pending is already logged by the flow.
        if self.confirm.request(request).is_err() {
            return;
        }
        match self.dialog.present_confirm(&prompt) {
            Presentation::Decided(decision) => self.resolve_confirmation(decision),
            Presentation::Displayed => {}
        }
    }

    fn bind_trigger_action(&self, shape: TriggerShape) -> Box<dyn FnOnce()> {
        match shape {
            TriggerShape::Link { href } => {
                let navigator = self.navigator.clone();
                Box::new(move || match navigator {
                    Some(navigator) => navigator.borrow_mut().navigate(&href),
                    None => {
                        tracing::warn!(target = %href, "no navigator wired; delete skipped")
                    }
                })
            }
            TriggerShape::Submit { form_id } => {
                let forms = self.forms.clone();
                Box::new(move || match forms {
                    Some(forms) => forms.borrow_mut().submit(&form_id),
                    None => {
                        tracing::warn!(form_id = %form_id, "no form host wired; delete skipped")
                    }
                })
            }
        }
    }

    /// A full-page navigation is starting: show the overlay until the next
    /// page reports loaded, and close an overlay-style sidebar behind it.
    fn begin_navigation(&mut self) {
        // Beginning before releasing keeps the overlay from blinking when
        // navigations overlap.
        let token = self.overlay.begin_work(None);
        if let Some(stale) = self.nav_token.replace(token) {
            tracing::warn!("navigation started while one was pending");
            self.overlay.release(stale);
        }
        self.sidebar.collapse_on_navigate();
    }

    // --- Introspection ---

    /// The overlay controller (read-only).
    #[must_use]
    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    /// Current sidebar state.
    #[must_use]
    pub fn sidebar_state(&self) -> SidebarState {
        self.sidebar.state()
    }

    /// Whether a confirmation is awaiting resolution.
    #[must_use]
    pub fn confirmation_pending(&self) -> bool {
        self.confirm.is_pending()
    }

    /// The preference store (read-only).
    #[must_use]
    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("initialized", &self.initialized)
            .field("overlay", &self.overlay)
            .field("sidebar_state", &self.sidebar.state())
            .field("confirmation_pending", &self.confirm.is_pending())
            .finish()
    }
}
