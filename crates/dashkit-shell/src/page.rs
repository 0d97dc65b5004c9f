#![forbid(unsafe_code)]

//! Page collaborator seams.
//!
//! The shell consumes these elements of the page, it does not own them.
//! Every collaborator is optional: a page without a navigator or forms
//! degrades the corresponding action to a logged no-op.

/// Navigates the page to a target location.
pub trait Navigator {
    fn navigate(&mut self, target: &str);
}

/// Submits a form on the page by identifier.
pub trait FormHost {
    fn submit(&mut self, form_id: &str);
}

/// The two shapes a destructive-action trigger can take.
///
/// A navigable link carries the location to visit on confirmation; a submit
/// control carries the enclosing form to submit. The host derives the shape
/// from the triggering element and the shell binds the confirmed action
/// accordingly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerShape {
    /// `<a>`-style trigger: confirm, then navigate.
    Link { href: String },
    /// Submit-button trigger: confirm, then submit the enclosing form.
    Submit { form_id: String },
}

/// A fired destructive-action trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructiveTrigger {
    /// What is about to be destroyed, for the prompt text.
    pub subject: String,
    pub shape: TriggerShape,
}

impl DestructiveTrigger {
    /// A delete link pointing at `href`.
    #[must_use]
    pub fn link(subject: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            shape: TriggerShape::Link { href: href.into() },
        }
    }

    /// A delete submit button inside form `form_id`.
    #[must_use]
    pub fn submit(subject: impl Into<String>, form_id: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            shape: TriggerShape::Submit {
                form_id: form_id.into(),
            },
        }
    }
}
