#![forbid(unsafe_code)]

//! Dialog provider capability.
//!
//! The rich-dialog library of the original page is modeled as a capability
//! interface injected at construction time: [`DialogProvider`] covers the
//! modal confirmation prompt and transient toast notifications. The built-in
//! [`FallbackDialog`] is an alternate implementation of the same interface
//! over plain byte streams, standing in for the blocking native prompt, so
//! callers select a provider explicitly instead of probing at runtime.
//!
//! A rich provider may answer a confirmation later (it returns
//! [`Presentation::Displayed`] and the host resolves through the shell); the
//! fallback always answers inline with [`Presentation::Decided`].

use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Duration;

use dashkit_core::Decision;

/// Semantic level of a notice, driving icon and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
    Info,
}

impl NoticeLevel {
    /// Uppercase label used by the fallback renderer.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Info => "INFO",
        }
    }

    fn default_title(self) -> &'static str {
        match self {
            Self::Success => "Success!",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Info => "Notice",
        }
    }
}

/// One transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// `Some` for auto-dismissing toasts; `None` sticks until dismissed.
    pub auto_dismiss: Option<Duration>,
}

impl Notice {
    /// Default auto-dismiss for success toasts.
    pub const SUCCESS_DISMISS: Duration = Duration::from_secs(3);

    fn new(level: NoticeLevel, message: impl Into<String>, auto_dismiss: Option<Duration>) -> Self {
        Self {
            level,
            title: level.default_title().to_string(),
            message: message.into(),
            auto_dismiss,
        }
    }

    /// A success toast, auto-dismissed after three seconds.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message, Some(Self::SUCCESS_DISMISS))
    }

    /// A warning notice, shown until dismissed.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message, None)
    }

    /// An error notice, shown until dismissed.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message, None)
    }

    /// An informational notice, shown until dismissed.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message, None)
    }

    /// Replace the level's default title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// The modal prompt preceding a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmPrompt {
    /// The standard delete prompt for a described subject.
    #[must_use]
    pub fn for_subject(subject: &str) -> Self {
        Self {
            title: "Are you sure?".to_string(),
            text: format!("{subject} will be deleted. This action cannot be undone."),
            confirm_label: "Yes, delete".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// How a provider handled a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// The prompt blocked and the user already decided.
    Decided(Decision),
    /// The prompt is on screen; the decision arrives later via the shell.
    Displayed,
}

/// Capability interface for modal prompts and toast notifications.
pub trait DialogProvider {
    /// Present a confirmation prompt.
    fn present_confirm(&mut self, prompt: &ConfirmPrompt) -> Presentation;

    /// Show a transient notice. Must not panic; failures are logged.
    fn toast(&mut self, notice: &Notice);
}

/// Blocking fallback over generic streams.
///
/// Confirmation writes the prompt and reads one line: `y`/`yes` (any case)
/// confirms, anything else — including end of input or a read error — is
/// treated as cancellation. Notices render as single prefixed lines, the
/// alert-box analog.
pub struct FallbackDialog<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> FallbackDialog<R, W> {
    /// Create a fallback dialog over the given streams.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl FallbackDialog<BufReader<io::Stdin>, io::Stderr> {
    /// Fallback dialog over the process's standard streams.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R, W> fmt::Debug for FallbackDialog<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackDialog").finish_non_exhaustive()
    }
}

impl<R: BufRead, W: Write> DialogProvider for FallbackDialog<R, W> {
    fn present_confirm(&mut self, prompt: &ConfirmPrompt) -> Presentation {
        let ask = write!(
            self.output,
            "{} {} [{}/{}]: ",
            prompt.title, prompt.text, prompt.confirm_label, prompt.cancel_label
        )
        .and_then(|()| self.output.flush());
        if let Err(e) = ask {
            tracing::warn!(error = %e, "fallback prompt could not be written; cancelling");
            return Presentation::Decided(Decision::Cancelled);
        }

        let mut line = String::new();
        let decision = match self.input.read_line(&mut line) {
            // Zero bytes means end of input: a dismissal.
            Ok(0) => Decision::Cancelled,
            Ok(_) => match line.trim().to_lowercase().as_str() {
                "y" | "yes" => Decision::Confirmed,
                _ => Decision::Cancelled,
            },
            Err(e) => {
                tracing::warn!(error = %e, "fallback prompt read failed; cancelling");
                Decision::Cancelled
            }
        };
        Presentation::Decided(decision)
    }

    fn toast(&mut self, notice: &Notice) {
        let result = writeln!(
            self.output,
            "[{}] {}: {}",
            notice.level.label(),
            notice.title,
            notice.message
        );
        if let Err(e) = result {
            tracing::warn!(error = %e, "fallback notice could not be written");
        }
    }
}
