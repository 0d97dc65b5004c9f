#![forbid(unsafe_code)]

//! Cooperative operation contract.
//!
//! The original page simulated long-running work with fixed timers. Here an
//! in-flight operation is an explicit value the shell polls to completion,
//! so overlay begin/release pairs correctly with real latency: the overlay
//! stays up for exactly as long as the operation reports [`OpPoll::Pending`].
//!
//! Operations must be finite; the driver polls until completion on the
//! single cooperative thread. Once an operation reports
//! [`OpPoll::Complete`] it is not polled again.

use std::fmt;

/// Failure reported by an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpError {
    message: String,
}

impl OpError {
    /// Create an error with a user-presentable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for OpError {}

/// One cooperative step of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpPoll {
    /// Still in flight; poll again.
    Pending,
    /// Finished with the given outcome.
    Complete(Result<(), OpError>),
}

/// A unit of long-running page work driven by the shell.
pub trait Operation {
    /// Advance the operation by one step.
    fn poll(&mut self) -> OpPoll;
}

/// An operation that completes on its first poll.
#[derive(Debug)]
pub struct Immediate {
    result: Option<Result<(), OpError>>,
}

impl Immediate {
    /// Completes successfully.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            result: Some(Ok(())),
        }
    }

    /// Completes with an error.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            result: Some(Err(OpError::new(message))),
        }
    }
}

impl Operation for Immediate {
    fn poll(&mut self) -> OpPoll {
        OpPoll::Complete(self.result.take().unwrap_or(Ok(())))
    }
}

/// An operation that stays pending for a fixed number of polls.
///
/// Stands in for work with real latency in examples and tests.
#[derive(Debug)]
pub struct Delayed {
    remaining: u32,
    result: Option<Result<(), OpError>>,
}

impl Delayed {
    /// Pending for `polls` steps, then the given outcome.
    #[must_use]
    pub fn new(polls: u32, result: Result<(), OpError>) -> Self {
        Self {
            remaining: polls,
            result: Some(result),
        }
    }
}

impl Operation for Delayed {
    fn poll(&mut self) -> OpPoll {
        if self.remaining > 0 {
            self.remaining -= 1;
            return OpPoll::Pending;
        }
        OpPoll::Complete(self.result.take().unwrap_or(Ok(())))
    }
}
