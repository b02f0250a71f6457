// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution results reported by a runner.

use std::{str::FromStr, time::Duration};

use derive_more::with_trait::{Display, Error};

/// Outcome of a test step or test case, as reported by a runner.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Status {
    /// Execution succeeded.
    #[display("passed")]
    Passed,

    /// Execution failed.
    #[display("failed")]
    Failed,

    /// Execution was skipped.
    #[display("skipped")]
    Skipped,

    /// Step definition is marked as pending.
    #[display("pending")]
    Pending,

    /// Step text matches multiple step definitions.
    #[display("ambiguous")]
    Ambiguous,

    /// Step text matches no step definition.
    #[display("undefined")]
    Undefined,
}

impl Status {
    /// Indicates whether this [`Status`] is [`Status::Passed`].
    #[must_use]
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Error of parsing an unrecognized runner [`Status`].
#[derive(Clone, Debug, Display, Error)]
#[display("Unknown runner status: `{status}`")]
pub struct ParseStatusError {
    /// Unrecognized status text.
    pub status: String,
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "skipped" => Self::Skipped,
            "pending" => Self::Pending,
            "ambiguous" => Self::Ambiguous,
            "undefined" => Self::Undefined,
            _ => return Err(ParseStatusError { status: s.to_owned() }),
        })
    }
}

/// Result of a finished test step or test case.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepResult {
    /// Outcome of the execution.
    pub status: Status,

    /// Error message or stack trace, if any.
    pub error: Option<String>,

    /// Measured execution time, if any.
    pub duration: Option<Duration>,
}

impl StepResult {
    /// Creates a new [`StepResult`] with no error.
    #[must_use]
    pub const fn new(status: Status) -> Self {
        Self { status, error: None, duration: None }
    }

    /// Creates a new [`StepResult`] of a [`Status::Passed`] execution.
    #[must_use]
    pub const fn passed() -> Self {
        Self::new(Status::Passed)
    }

    /// Creates a new [`StepResult`] of a [`Status::Failed`] execution.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            error: Some(error.into()),
            duration: None,
        }
    }

    /// Sets the measured execution time.
    #[must_use]
    pub fn took(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl From<Status> for StepResult {
    fn from(status: Status) -> Self {
        Self::new(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_runner_statuses_case_insensitively() {
        assert_eq!("PASSED".parse::<Status>().ok(), Some(Status::Passed));
        assert_eq!(
            " undefined ".parse::<Status>().ok(),
            Some(Status::Undefined),
        );
        assert_eq!("Ambiguous".parse::<Status>().ok(), Some(Status::Ambiguous));
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "flaky".parse::<Status>().unwrap_err();

        assert_eq!(err.status, "flaky");
        assert_eq!(err.to_string(), "Unknown runner status: `flaky`");
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(Status::Pending.to_string(), "pending");
    }
}
