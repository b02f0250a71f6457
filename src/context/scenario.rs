// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Running state of a single scenario or outline iteration.

use std::{
    collections::{HashMap, VecDeque},
    convert::identity,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use once_cell::sync::OnceCell;

use super::FeatureContext;
use crate::{
    client::{Attribute, ItemId},
    error::{Error, Result},
    event::{HookType, Status, TestCase},
    format,
};

/// Group of consecutive hooks of the same [`HookType`], reported as a single
/// item.
#[derive(Clone, Debug)]
pub struct HookGroup {
    /// [`HookType`] of every hook in this group.
    pub ty: HookType,

    /// Id of the report item, if the group is reported as one.
    pub item: Option<ItemId>,

    /// Aggregated [`Status`] of the hooks finished so far.
    pub status: Status,
}

impl HookGroup {
    /// Creates a new [`HookGroup`] with no hook finished yet.
    #[must_use]
    pub const fn new(ty: HookType, item: Option<ItemId>) -> Self {
        Self { ty, item, status: Status::Passed }
    }

    /// Records the [`Status`] of a finished hook.
    ///
    /// The first non-passing [`Status`] sticks, so a later passing hook
    /// can't mask a failed one.
    pub fn record(&mut self, status: Status) {
        if self.status.is_passed() {
            self.status = status;
        }
    }
}

/// Transient state of a scenario, changing as its steps run.
#[derive(Debug, Default)]
pub struct Running {
    /// Id of the currently running step item.
    pub step: Option<ItemId>,

    /// Currently open [`HookGroup`].
    pub hooks: Option<HookGroup>,
}

/// Scenario (or outline iteration) resolved against its parsed
/// [`gherkin::Scenario`], along with its report item.
#[derive(Debug)]
pub struct ScenarioContext {
    /// Feature this scenario belongs to.
    feature: Arc<FeatureContext>,

    /// Line identifying this scenario: the declaration line of a plain
    /// scenario or the example row line of an outline iteration.
    line: usize,

    /// Parsed scenario or outline.
    scenario: gherkin::Scenario,

    /// Runtime test case this context was created for.
    case: TestCase,

    /// 1-based number of the outline iteration.
    iteration: Option<usize>,

    /// Keywords of background steps not executed yet, one per step.
    background: Mutex<VecDeque<String>>,

    /// Steps of the scenario and its backgrounds, keyed by their lines.
    steps: HashMap<usize, gherkin::Step>,

    /// Id of the started report item, assigned once.
    item: OnceCell<ItemId>,

    /// Number of runtime test cases started and not finished yet.
    open: AtomicUsize,

    /// Transient state.
    running: Mutex<Running>,
}

impl ScenarioContext {
    /// Creates a new [`ScenarioContext`] without a report item yet.
    #[must_use]
    pub fn new(
        feature: Arc<FeatureContext>,
        line: usize,
        scenario: gherkin::Scenario,
        case: TestCase,
        iteration: Option<usize>,
        background: VecDeque<String>,
        steps: HashMap<usize, gherkin::Step>,
    ) -> Self {
        Self {
            feature,
            line,
            scenario,
            case,
            iteration,
            background: Mutex::new(background),
            steps,
            item: OnceCell::new(),
            open: AtomicUsize::new(0),
            running: Mutex::default(),
        }
    }

    /// [`FeatureContext`] this scenario belongs to.
    #[must_use]
    pub const fn feature(&self) -> &Arc<FeatureContext> {
        &self.feature
    }

    /// URI of the feature this scenario belongs to.
    #[must_use]
    pub fn uri(&self) -> &str {
        self.feature.uri()
    }

    /// Line identifying this scenario.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Parsed [`gherkin::Scenario`].
    #[must_use]
    pub const fn scenario(&self) -> &gherkin::Scenario {
        &self.scenario
    }

    /// Runtime [`TestCase`] this context was created for.
    #[must_use]
    pub const fn case(&self) -> &TestCase {
        &self.case
    }

    /// 1-based number of the outline iteration, if this is one.
    #[must_use]
    pub const fn outline_iteration(&self) -> Option<usize> {
        self.iteration
    }

    /// Name of the report item: `<keyword>: <name>`, followed by `[n]` for
    /// outline iterations.
    #[must_use]
    pub fn name(&self) -> String {
        format::node_name(
            &self.scenario.keyword,
            &self.scenario.name,
            self.iteration,
        )
    }

    /// Code reference of the scenario: `<uri>:<line>`.
    #[must_use]
    pub fn code_ref(&self) -> String {
        format::code_ref(self.uri(), self.line)
    }

    /// Attributes of the report item, from the test case's tags.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        format::tag_attributes(&self.case.tags)
    }

    /// Resolves the step declared at the given `line`, either in the
    /// scenario or in one of its backgrounds.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownStep`] if no step is declared at the `line`.
    pub fn step(&self, line: usize) -> Result<&gherkin::Step> {
        self.steps.get(&line).ok_or_else(|| Error::UnknownStep {
            uri: self.uri().to_owned(),
            line: self.line,
            step_line: line,
        })
    }

    /// Consumes the next background step, returning the keyword of its
    /// background, or [`None`] if all background steps are consumed.
    pub fn next_background(&self) -> Option<String> {
        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Indicates whether background steps are still being replayed.
    #[must_use]
    pub fn in_background(&self) -> bool {
        !self
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Id of the report item, if started.
    #[must_use]
    pub fn item(&self) -> Option<&ItemId> {
        self.item.get()
    }

    /// Assigns the id of the started report item.
    ///
    /// # Errors
    ///
    /// [`Error::IdReassigned`] if an id has been assigned already, meaning
    /// two test cases collide on the same URI and line.
    pub fn assign_item(&self, id: ItemId) -> Result<()> {
        self.item.set(id).map_err(|_| Error::IdReassigned {
            item: "scenario",
            name: self.name(),
        })
    }

    /// Marks one more runtime test case of this scenario as started.
    pub fn enter(&self) {
        _ = self.open.fetch_add(1, Ordering::AcqRel);
    }

    /// Marks one runtime test case of this scenario as finished, returning
    /// whether none is left running.
    pub fn leave(&self) -> bool {
        self.open
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or_else(identity)
            <= 1
    }

    /// Locks the [`Running`] state of this scenario.
    pub fn running(&self) -> MutexGuard<'_, Running> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the item to attach logs to: the running step, or the open
    /// hook group, or the scenario itself.
    #[must_use]
    pub fn current_item(&self) -> Option<ItemId> {
        let running = self.running();
        running
            .step
            .clone()
            .or_else(|| running.hooks.as_ref().and_then(|h| h.item.clone()))
            .or_else(|| self.item().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutlineIterations;

    const FEATURE: &str = "\
Feature: Background
  Background:
    Given a first
    And a second

  Scenario: using it
    When a step
";

    fn scenario() -> ScenarioContext {
        let feature =
            gherkin::Feature::parse(FEATURE, gherkin::GherkinEnv::default())
                .unwrap();
        let case = TestCase::new("bg.feature", 6, "using it")
            .with_tags(["@fast".to_owned()]);

        Arc::new(FeatureContext::new("bg.feature", FEATURE, feature))
            .scenario_context(&case, &OutlineIterations::new())
            .unwrap()
    }

    #[test]
    fn consumes_background_queue() {
        let sc = scenario();

        assert!(sc.in_background());
        assert_eq!(sc.next_background().as_deref(), Some("Background"));
        assert_eq!(sc.next_background().as_deref(), Some("Background"));
        assert!(!sc.in_background());
        assert_eq!(sc.next_background(), None);
    }

    #[test]
    fn describes_item() {
        let sc = scenario();

        assert_eq!(sc.name(), "Scenario: using it");
        assert_eq!(sc.code_ref(), "bg.feature:6");
        assert_eq!(sc.attributes(), vec![Attribute::tag("fast")]);
    }

    #[test]
    fn rejects_second_item() {
        let sc = scenario();

        sc.assign_item("item_1".into()).unwrap();
        assert!(matches!(
            sc.assign_item("item_2".into()),
            Err(Error::IdReassigned { item: "scenario", .. }),
        ));
    }

    #[test]
    fn routes_logs_to_innermost_item() {
        let sc = scenario();
        assert_eq!(sc.current_item(), None);

        sc.assign_item("scenario".into()).unwrap();
        assert_eq!(sc.current_item(), Some("scenario".into()));

        sc.running().hooks =
            Some(HookGroup::new(HookType::Before, Some("hooks".into())));
        assert_eq!(sc.current_item(), Some("hooks".into()));

        sc.running().step = Some("step".into());
        assert_eq!(sc.current_item(), Some("step".into()));
    }

    #[test]
    fn counts_open_cases() {
        let sc = scenario();

        sc.enter();
        sc.enter();
        assert!(!sc.leave());
        assert!(sc.leave());
        assert!(sc.leave());
    }

    #[test]
    fn first_failure_sticks_in_hook_group() {
        let mut group = HookGroup::new(HookType::Before, None);

        for status in [Status::Passed, Status::Failed, Status::Passed] {
            group.record(status);
        }

        assert_eq!(group.status, Status::Failed);
    }
}
