// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Structural errors of event correlation.
//!
//! Every variant here means the event stream and the parsed `.feature`
//! source have diverged. Such errors are propagated out of
//! [`Reporter::handle_event()`], as any further mapping would be silently
//! wrong. Recoverable faults (unknown MIME types, degraded statuses, missing
//! item ids at finish) never surface as an [`Error`], they're only logged.
//!
//! [`Reporter::handle_event()`]: crate::Reporter::handle_event

use derive_more::with_trait::{Display, Error as StdError};

/// Fault of mapping a runner event onto the parsed [`gherkin::Feature`].
#[derive(Clone, Debug, Display, PartialEq, Eq, StdError)]
pub enum Error {
    /// No source text was read for the referenced feature URI.
    #[display("No source was read for feature `{uri}`")]
    UnknownSource {
        /// URI of the feature.
        uri: String,
    },

    /// Source text of the feature cannot be parsed.
    #[display("Failed to parse feature `{uri}`: {message}")]
    Parse {
        /// URI of the feature.
        uri: String,

        /// Parser diagnostics.
        message: String,
    },

    /// Feature resolved for a test case has a different URI.
    #[display("Scenario URI `{case}` does not match Feature URI `{feature}`")]
    UriMismatch {
        /// URI of the resolved feature.
        feature: String,

        /// URI reported by the test case.
        case: String,
    },

    /// No scenario or outline example row exists at the reported line.
    #[display("No scenario `{name}` found at `{uri}:{line}`")]
    UnknownScenario {
        /// URI of the feature.
        uri: String,

        /// Line reported by the test case.
        line: usize,

        /// Name reported by the test case.
        name: String,
    },

    /// Test case finished without ever being started.
    #[display("Scenario at `{uri}:{line}` was never started")]
    UnregisteredScenario {
        /// URI of the feature.
        uri: String,

        /// Line of the scenario.
        line: usize,
    },

    /// Step line is absent from both the scenario and its backgrounds.
    #[display(
        "Trying to get step for unknown line {step_line} in scenario \
         `{uri}:{line}`"
    )]
    UnknownStep {
        /// URI of the feature.
        uri: String,

        /// Line of the scenario.
        line: usize,

        /// Line reported by the step.
        step_line: usize,
    },

    /// Example row line is absent from its outline's examples.
    #[display("No outline iteration number found for scenario `{uri}:{line}`")]
    NoOutlineIteration {
        /// URI of the feature.
        uri: String,

        /// Line of the example row.
        line: usize,
    },

    /// Step or hook event arrived on a thread with no scenario bound.
    #[display("No scenario is running on the current thread")]
    NoActiveScenario,

    /// Remote id was assigned twice to an unfinished item.
    #[display("Attempting to re-set {item} ID for unfinished item `{name}`")]
    IdReassigned {
        /// Kind of the item (`feature` or `scenario`).
        item: &'static str,

        /// Name of the item.
        name: String,
    },
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
