#![forbid(unsafe_code)]

//! Destructive-action confirmation flow.
//!
//! State machine: `Idle -> Pending -> {Confirmed, Cancelled} -> Idle`.
//!
//! A [`ConfirmationRequest`] carries the caller's follow-up actions as boxed
//! closures; whichever one matches the user's decision runs exactly once and
//! the request is discarded. Presentation is decoupled from the machine: the
//! composition root shows the prompt through its dialog provider and feeds
//! the outcome back via [`ConfirmFlow::resolve`], so a blocking native
//! prompt and a deferred rich dialog drive the same transitions.
//!
//! Overlapping destructive intents are rejected: a second request while one
//! is pending fails with [`ConfirmError::AlreadyPending`] instead of
//! stacking prompts.

use std::fmt;

/// Outcome of a presented confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The user confirmed the destructive action.
    Confirmed,
    /// The user cancelled, or the prompt was dismissed.
    Cancelled,
}

/// Errors reported by the confirmation flow.
///
/// Both variants are invalid state transitions: they are reported to the
/// caller and logged, and the flow stays in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmError {
    /// A request arrived while another confirmation was pending.
    AlreadyPending,
    /// A resolution arrived while no confirmation was pending.
    NotPending,
}

impl fmt::Display for ConfirmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmError::AlreadyPending => write!(f, "a confirmation is already pending"),
            ConfirmError::NotPending => write!(f, "no confirmation is pending"),
        }
    }
}

impl std::error::Error for ConfirmError {}

/// One "are you sure?" intercept with its follow-up actions.
pub struct ConfirmationRequest {
    /// Human-readable description of what is about to be destroyed.
    pub subject: String,
    on_confirm: Option<Box<dyn FnOnce()>>,
    on_cancel: Option<Box<dyn FnOnce()>>,
}

impl ConfirmationRequest {
    /// Create a request with the action to run on confirmation.
    #[must_use]
    pub fn new(subject: impl Into<String>, on_confirm: impl FnOnce() + 'static) -> Self {
        Self {
            subject: subject.into(),
            on_confirm: Some(Box::new(on_confirm)),
            on_cancel: None,
        }
    }

    /// Attach an action to run on cancellation or dismissal.
    #[must_use]
    pub fn on_cancel(mut self, action: impl FnOnce() + 'static) -> Self {
        self.on_cancel = Some(Box::new(action));
        self
    }
}

impl fmt::Debug for ConfirmationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationRequest")
            .field("subject", &self.subject)
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

enum FlowState {
    Idle,
    Pending(ConfirmationRequest),
}

/// Orchestrates at most one confirmation at a time.
pub struct ConfirmFlow {
    state: FlowState,
}

impl ConfirmFlow {
    /// Create an idle flow.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
        }
    }

    /// Transition `Idle -> Pending` with the given request.
    ///
    /// Rejected while another request is pending; the incoming request is
    /// dropped without running either of its actions.
    pub fn request(&mut self, request: ConfirmationRequest) -> Result<(), ConfirmError> {
        match self.state {
            FlowState::Idle => {
                tracing::debug!(subject = %request.subject, "confirmation pending");
                self.state = FlowState::Pending(request);
                Ok(())
            }
            FlowState::Pending(_) => {
                tracing::warn!(
                    subject = %request.subject,
                    "confirmation requested while another is pending; dropped"
                );
                Err(ConfirmError::AlreadyPending)
            }
        }
    }

    /// Resolve the pending request, running its matching action exactly once.
    ///
    /// Returns the decision so the caller can sequence follow-up work
    /// (overlay, notices) around the action it supplied.
    pub fn resolve(&mut self, decision: Decision) -> Result<Decision, ConfirmError> {
        match std::mem::replace(&mut self.state, FlowState::Idle) {
            FlowState::Idle => {
                tracing::warn!(?decision, "confirmation resolved while idle; ignored");
                Err(ConfirmError::NotPending)
            }
            FlowState::Pending(mut request) => {
                match decision {
                    Decision::Confirmed => {
                        if let Some(action) = request.on_confirm.take() {
                            action();
                        }
                    }
                    Decision::Cancelled => {
                        if let Some(action) = request.on_cancel.take() {
                            action();
                        }
                    }
                }
                Ok(decision)
            }
        }
    }

    /// Whether a confirmation is awaiting resolution.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, FlowState::Pending(_))
    }

    /// Subject of the pending request, if any.
    #[must_use]
    pub fn pending_subject(&self) -> Option<&str> {
        match &self.state {
            FlowState::Idle => None,
            FlowState::Pending(request) => Some(&request.subject),
        }
    }
}

impl Default for ConfirmFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfirmFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmFlow")
            .field("pending", &self.pending_subject())
            .finish()
    }
}
