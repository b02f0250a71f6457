// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level [`Reporter`] engine.

mod launch;
mod scenario;
mod step;

use std::{thread, time::SystemTime};

use derive_more::with_trait::Debug;

use self::launch::Launch;
use crate::{
    client::{Client, ItemId, LaunchId, LogLevel, LogRq},
    config::Config,
    context::ContextRegistry,
    error::Result,
    event::{Cucumber, Event},
    hierarchy::{Flat, Hierarchy, Node, Tree},
    origin::{CodeLocation, OriginResolver},
    source::SourceRegistry,
    status::StatusMapping,
};

/// Engine translating a stream of [`Cucumber`] events into launch, item and
/// log calls of a [`Client`].
///
/// Runner events carry no structural boundaries, so the [`Reporter`]
/// reconstructs them: features are started lazily by their first scenario
/// and finished only when the test run finishes, while steps and hooks are
/// attributed to the scenario currently running on the emitting thread.
///
/// The [`Reporter`] is [`Sync`], so a parallel runner may feed it from all
/// its worker threads at once, as long as the events of a single scenario
/// come from a single thread.
///
/// # Example
///
/// ```rust
/// # use cucumber_reportportal::{
/// #     event::{Cucumber, PickleStep, StepResult, TestCase},
/// #     Event, Recorder, Reporter,
/// # };
/// #
/// # fn main() -> cucumber_reportportal::Result<()> {
/// let reporter = Reporter::new(Recorder::default());
/// let case = TestCase::new("belly.feature", 2, "eating");
/// let step = PickleStep::new("I eat 3 cukes", 3);
///
/// for ev in [
///     Cucumber::Started,
///     Cucumber::source_read(
///         "belly.feature",
///         "Feature: Belly\n  Scenario: eating\n    Given I eat 3 cukes\n",
///     ),
///     Cucumber::case_started(case.clone()),
///     Cucumber::step_started(step.clone()),
///     Cucumber::step_finished(step, StepResult::passed()),
///     Cucumber::case_finished(case, StepResult::passed()),
///     Cucumber::Finished,
/// ] {
///     reporter.handle_event(Event::new(ev))?;
/// }
///
/// assert_eq!(reporter.client().calls().len(), 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reporter<C, H = Flat> {
    /// [`Client`] to issue calls to.
    client: C,

    /// [`Hierarchy`] to map Gherkin structure with.
    hierarchy: H,

    /// Launch parameters.
    config: Config,

    /// Resolver of step definitions' identities.
    #[debug(ignore)]
    origin: Box<dyn OriginResolver>,

    /// Sources of `.feature` files read so far.
    sources: SourceRegistry,

    /// Running features and scenarios.
    contexts: ContextRegistry,

    /// Mapping of runner statuses.
    statuses: StatusMapping,

    /// Launch of this run and its root item.
    launch: Launch,
}

impl<C: Client> Reporter<C> {
    /// Creates a new [`Reporter`] issuing calls to the given [`Client`],
    /// with the [`Flat`] hierarchy and the default [`Config`].
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            hierarchy: Flat,
            config: Config::default(),
            origin: Box::new(CodeLocation),
            sources: SourceRegistry::new(),
            contexts: ContextRegistry::new(),
            statuses: StatusMapping::new(),
            launch: Launch::default(),
        }
    }
}

impl<C: Client, H: Hierarchy> Reporter<C, H> {
    /// Replaces the [`Hierarchy`] of this [`Reporter`].
    #[must_use]
    pub fn with_hierarchy<Hr: Hierarchy>(
        self,
        hierarchy: Hr,
    ) -> Reporter<C, Hr> {
        let Self {
            client,
            hierarchy: _,
            config,
            origin,
            sources,
            contexts,
            statuses,
            launch,
        } = self;
        Reporter {
            client,
            hierarchy,
            config,
            origin,
            sources,
            contexts,
            statuses,
            launch,
        }
    }

    /// Replaces the [`Config`] of this [`Reporter`].
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the [`OriginResolver`] of this [`Reporter`].
    #[must_use]
    pub fn with_origin(
        mut self,
        origin: impl OriginResolver + 'static,
    ) -> Self {
        self.origin = Box::new(origin);
        self
    }

    /// Returns the [`Client`] of this [`Reporter`].
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Unwraps the [`Client`] of this [`Reporter`].
    #[must_use]
    pub fn into_client(self) -> C {
        self.client
    }

    /// Returns the [`Hierarchy`] of this [`Reporter`].
    #[must_use]
    pub const fn hierarchy(&self) -> &H {
        &self.hierarchy
    }

    /// Returns the [`Config`] of this [`Reporter`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the id of the started launch, if any.
    #[must_use]
    pub fn launch_id(&self) -> Option<&LaunchId> {
        self.launch.id()
    }

    /// Returns the registry of running features and scenarios.
    #[must_use]
    pub const fn contexts(&self) -> &ContextRegistry {
        &self.contexts
    }

    /// Handles a single [`Cucumber`] event.
    ///
    /// # Errors
    ///
    /// If the event can't be attributed to the parsed `.feature` sources or
    /// to a running scenario. Such faults mean that the runner and the
    /// sources disagree, so nothing is reported for the event.
    pub fn handle_event(&self, event: Event<Cucumber>) -> Result<()> {
        let (ev, meta) = event.split();
        let at = meta.at;

        match ev {
            Cucumber::Started => self.started(at),
            Cucumber::SourceRead { uri, source } => {
                self.sources.insert(uri, source);
            }
            Cucumber::CaseStarted(case) => self.case_started(&case, at)?,
            Cucumber::StepStarted(step) => self.step_started(&step, at)?,
            Cucumber::StepFinished(step, res) => {
                self.step_finished(&step, &res, at)?;
            }
            Cucumber::CaseFinished(case, res) => {
                self.case_finished(&case, &res, at)?;
            }
            Cucumber::Embed { mime_type, data, name } => {
                self.embed(&mime_type, data, name, at);
            }
            Cucumber::Write(text) => self.write(text, at),
            Cucumber::Finished => self.finished(at),
        }
        Ok(())
    }

    /// Handles a single [`Cucumber`] event happening now.
    ///
    /// # Errors
    ///
    /// See [`Reporter::handle_event()`].
    pub fn handle(&self, event: Cucumber) -> Result<()> {
        self.handle_event(Event::new(event))
    }

    /// Saves a log entry for the given `item`.
    fn log(
        &self,
        item: ItemId,
        message: impl Into<String>,
        level: LogLevel,
        at: SystemTime,
    ) {
        self.client.log(LogRq::new(item, message, level, at));
    }
}

impl<C: Client> Reporter<C, Tree> {
    /// Logs the `message` into a still open item, after the runner has
    /// moved on from it.
    ///
    /// The item is the step with the given `step_text` of the scenario at
    /// the given `uri` and `line`, or the scenario itself if no `step_text`
    /// is given.
    ///
    /// Returns whether the item has been found.
    pub fn log_late(
        &self,
        uri: &str,
        line: usize,
        step_text: Option<&str>,
        message: impl Into<String>,
        level: LogLevel,
    ) -> bool {
        let node = match step_text {
            Some(text) => Node::Step { uri, line, text },
            None => Node::Scenario { uri, line },
        };
        let Some(item) = self.hierarchy.items().find(node) else {
            tracing::warn!(
                ?node,
                "dropping late log entry: no such item is open"
            );
            return false;
        };

        self.log(item, message, level, SystemTime::now());
        true
    }
}

/// Returns the id of the thread emitting the currently handled event.
fn current_thread() -> thread::ThreadId {
    thread::current().id()
}
