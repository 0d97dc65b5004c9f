#![forbid(unsafe_code)]

//! Loading-overlay lifecycle.
//!
//! The overlay is a full-page blocking indicator shown while work is in
//! flight. Several operations may overlap, so visibility is driven by a
//! reference count of outstanding [`WorkToken`]s rather than a boolean:
//!
//! - the surface is visible iff at least one token is outstanding;
//! - the message shown is the *first* acquirer's message, so nested
//!   operations never cause the text to flicker;
//! - releasing a token twice (or a token that was never issued) is a
//!   reported no-op, never a panic and never a negative count.
//!
//! The controller mutates exactly one [`OverlaySurface`]. When no surface is
//! wired (the page has no overlay element), counting still works and surface
//! calls are skipped.

use std::collections::BTreeSet;

/// Default message shown when the acquirer does not supply one.
pub const DEFAULT_MESSAGE: &str = "Processing request...";

/// The single overlay element the controller is allowed to mutate.
///
/// Implementations do nothing but flip visibility and fill the message slot;
/// any other page mutation belongs to a different owner.
pub trait OverlaySurface {
    /// Show the overlay with the given message.
    fn show(&mut self, message: &str);
    /// Hide the overlay.
    fn hide(&mut self);
}

/// Handle for one outstanding unit of overlay work.
///
/// Tokens are cheap copyable identifiers. Dropping a token without releasing
/// it keeps the overlay up; pairing is the caller's contract, which the
/// shell's operation driver upholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkToken(u64);

/// Configuration for the overlay controller.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Message used when `begin_work` is called without one.
    pub default_message: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            default_message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Owns loading-overlay visibility with acquire/release semantics.
pub struct OverlayController {
    config: OverlayConfig,
    next_token: u64,
    outstanding: BTreeSet<u64>,
    active_message: Option<String>,
    surface: Option<Box<dyn OverlaySurface>>,
}

impl OverlayController {
    /// Create a controller with no surface wired.
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            next_token: 0,
            outstanding: BTreeSet::new(),
            active_message: None,
            surface: None,
        }
    }

    /// Attach the overlay surface element.
    #[must_use]
    pub fn with_surface(mut self, surface: Box<dyn OverlaySurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Begin a unit of work, showing the overlay if it was hidden.
    ///
    /// If the overlay is already visible the message is NOT replaced: the
    /// first caller's message wins until the count drains to zero.
    pub fn begin_work(&mut self, message: Option<&str>) -> WorkToken {
        let token = self.next_token;
        self.next_token += 1;
        self.outstanding.insert(token);

        if self.outstanding.len() == 1 {
            let message = message.unwrap_or(&self.config.default_message).to_string();
            if let Some(surface) = self.surface.as_mut() {
                surface.show(&message);
            }
            self.active_message = Some(message);
        }

        WorkToken(token)
    }

    /// Release a unit of work, hiding the overlay when the count hits zero.
    ///
    /// Returns `true` if the token was outstanding. Releasing an unknown or
    /// already-released token leaves the state untouched and is reported as
    /// a logic error.
    pub fn release(&mut self, token: WorkToken) -> bool {
        if !self.outstanding.remove(&token.0) {
            tracing::warn!(token = token.0, "released overlay token that was not outstanding");
            return false;
        }
        if self.outstanding.is_empty() {
            if let Some(surface) = self.surface.as_mut() {
                surface.hide();
            }
            self.active_message = None;
        }
        true
    }

    /// Whether the overlay is currently visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Number of outstanding work tokens.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Message currently shown, if the overlay is visible.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.active_message.as_deref()
    }
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("outstanding", &self.outstanding.len())
            .field("message", &self.active_message)
            .field("surface", &self.surface.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every show/hide so tests can assert ordering.
    #[derive(Default)]
    struct RecordingSurface {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl OverlaySurface for RecordingSurface {
        fn show(&mut self, message: &str) {
            self.log.borrow_mut().push(format!("show:{message}"));
        }
        fn hide(&mut self) {
            self.log.borrow_mut().push("hide".to_string());
        }
    }

    fn controller_with_log() -> (OverlayController, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let surface = RecordingSurface { log: Rc::clone(&log) };
        let controller =
            OverlayController::new(OverlayConfig::default()).with_surface(Box::new(surface));
        (controller, log)
    }

    // --- Basic lifecycle ---

    #[test]
    fn begin_then_release_toggles_visibility() {
        let (mut overlay, log) = controller_with_log();
        assert!(!overlay.visible());

        let token = overlay.begin_work(None);
        assert!(overlay.visible());
        assert_eq!(overlay.message(), Some(DEFAULT_MESSAGE));

        assert!(overlay.release(token));
        assert!(!overlay.visible());
        assert_eq!(overlay.message(), None);
        assert_eq!(*log.borrow(), vec![format!("show:{DEFAULT_MESSAGE}"), "hide".to_string()]);
    }

    #[test]
    fn first_message_wins_for_nested_work() {
        let (mut overlay, log) = controller_with_log();
        let a = overlay.begin_work(Some("Loading A"));
        let b = overlay.begin_work(Some("Loading B"));

        assert_eq!(overlay.message(), Some("Loading A"));
        assert_eq!(overlay.outstanding(), 2);

        overlay.release(a);
        // Still visible, message unchanged until the count drains.
        assert!(overlay.visible());
        assert_eq!(overlay.message(), Some("Loading A"));

        overlay.release(b);
        assert!(!overlay.visible());
        // Exactly one show and one hide across the whole sequence.
        assert_eq!(*log.borrow(), vec!["show:Loading A".to_string(), "hide".to_string()]);
    }

    #[test]
    fn custom_default_message() {
        let mut overlay = OverlayController::new(OverlayConfig {
            default_message: "Un momento...".to_string(),
        });
        overlay.begin_work(None);
        assert_eq!(overlay.message(), Some("Un momento..."));
    }

    // --- Idempotent release ---

    #[test]
    fn double_release_is_a_noop() {
        let (mut overlay, log) = controller_with_log();
        let a = overlay.begin_work(None);
        let b = overlay.begin_work(None);

        assert!(overlay.release(a));
        assert!(!overlay.release(a));
        // The stale release must not have hidden the overlay.
        assert!(overlay.visible());
        assert_eq!(overlay.outstanding(), 1);

        assert!(overlay.release(b));
        assert!(!overlay.visible());
        assert_eq!(log.borrow().iter().filter(|e| *e == "hide").count(), 1);
    }

    #[test]
    fn release_without_begin_is_clamped() {
        let mut overlay = OverlayController::default();
        let token = overlay.begin_work(None);
        overlay.release(token);
        assert!(!overlay.release(token));
        assert_eq!(overlay.outstanding(), 0);
        assert!(!overlay.visible());
    }

    // --- Missing surface ---

    #[test]
    fn no_surface_never_panics() {
        let mut overlay = OverlayController::default();
        let token = overlay.begin_work(Some("anything"));
        assert!(overlay.visible());
        assert!(overlay.release(token));
        assert!(!overlay.visible());
    }

    // --- Property: visibility tracks the outstanding count ---

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// For any interleaving of begins and (possibly stale) releases,
            /// visibility equals count > 0 and the count never underflows.
            #[test]
            fn visibility_equals_outstanding(ops in proptest::collection::vec(0u8..3, 0..64)) {
                let mut overlay = OverlayController::default();
                let mut live: Vec<WorkToken> = Vec::new();
                let mut released: Vec<WorkToken> = Vec::new();

                for op in ops {
                    match op {
                        0 => live.push(overlay.begin_work(None)),
                        1 => {
                            if let Some(token) = live.pop() {
                                prop_assert!(overlay.release(token));
                                released.push(token);
                            }
                        }
                        _ => {
                            // Stale release: must be rejected without
                            // touching the live count.
                            if let Some(token) = released.last().copied() {
                                prop_assert!(!overlay.release(token));
                            }
                        }
                    }
                    prop_assert_eq!(overlay.outstanding(), live.len());
                    prop_assert_eq!(overlay.visible(), !live.is_empty());
                    prop_assert_eq!(overlay.message().is_some(), !live.is_empty());
                }
            }
        }
    }
}
