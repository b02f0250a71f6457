// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level test run events.

use super::{StepResult, TestStep};

/// Top-level event of a test run.
#[derive(Clone, Debug)]
pub enum Cucumber {
    /// Test run being started. Always the first event.
    Started,

    /// Source text of a `.feature` file has been read.
    SourceRead {
        /// URI of the `.feature` file.
        uri: String,

        /// Raw source text.
        source: String,
    },

    /// [`TestCase`] execution being started.
    CaseStarted(TestCase),

    /// [`TestStep`] execution being started.
    ///
    /// Doesn't carry its [`TestCase`]: it belongs to the one currently
    /// running on the emitting thread.
    StepStarted(TestStep),

    /// [`TestStep`] execution being finished.
    StepFinished(TestStep, StepResult),

    /// [`TestCase`] execution being finished.
    CaseFinished(TestCase, StepResult),

    /// Binary data was attached by a hook or step body.
    Embed {
        /// Declared MIME type of the `data`.
        mime_type: String,

        /// Attached bytes.
        data: Vec<u8>,

        /// Optional name of the attachment.
        name: Option<String>,
    },

    /// Text was written by a hook or step body.
    Write(String),

    /// Test run being finished. Always the last event.
    Finished,
}

impl Cucumber {
    /// Constructs an event of a `.feature` source being read.
    #[must_use]
    pub fn source_read(
        uri: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self::SourceRead { uri: uri.into(), source: source.into() }
    }

    /// Constructs an event of a [`TestCase`] being started.
    #[must_use]
    pub const fn case_started(case: TestCase) -> Self {
        Self::CaseStarted(case)
    }

    /// Constructs an event of a [`TestCase`] being finished.
    #[must_use]
    pub const fn case_finished(case: TestCase, result: StepResult) -> Self {
        Self::CaseFinished(case, result)
    }

    /// Constructs an event of a [`TestStep`] being started.
    #[must_use]
    pub fn step_started(step: impl Into<TestStep>) -> Self {
        Self::StepStarted(step.into())
    }

    /// Constructs an event of a [`TestStep`] being finished.
    #[must_use]
    pub fn step_finished(
        step: impl Into<TestStep>,
        result: StepResult,
    ) -> Self {
        Self::StepFinished(step.into(), result)
    }

    /// Constructs an event of some `data` being embedded.
    #[must_use]
    pub fn embed(
        mime_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self::Embed {
            mime_type: mime_type.into(),
            data: data.into(),
            name: None,
        }
    }

    /// Constructs an event of some `text` being written.
    #[must_use]
    pub fn write(text: impl Into<String>) -> Self {
        Self::Write(text.into())
    }
}

/// Runtime view of a scenario, or of a single example row of a scenario
/// outline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestCase {
    /// URI of the `.feature` file declaring this [`TestCase`].
    pub uri: String,

    /// Line of the scenario declaration, or of the example row for outline
    /// iterations.
    pub line: usize,

    /// Name of the scenario, with outline placeholders substituted.
    pub name: String,

    /// Tags inherited by this [`TestCase`].
    pub tags: Vec<String>,
}

impl TestCase {
    /// Creates a new untagged [`TestCase`].
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        line: usize,
        name: impl Into<String>,
    ) -> Self {
        Self { uri: uri.into(), line, name: name.into(), tags: vec![] }
    }

    /// Adds the given `tags` to this [`TestCase`].
    #[must_use]
    pub fn with_tags<T: Into<String>>(
        mut self,
        tags: impl IntoIterator<Item = T>,
    ) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}
