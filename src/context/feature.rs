// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Running state of a single feature.

use std::{collections::HashMap, sync::Arc};

use once_cell::sync::OnceCell;

use super::{OutlineIterations, ScenarioContext};
use crate::{
    client::{Attribute, ItemId},
    error::{Error, Result},
    event::TestCase,
    feature::{Ext as _, ScenarioExt as _},
    format,
};

/// Parsed [`gherkin::Feature`] along with its report item.
#[derive(Debug)]
pub struct FeatureContext {
    /// URI the feature was read from.
    uri: String,

    /// Raw text the feature was parsed from.
    source: Arc<str>,

    /// Parsed feature.
    feature: gherkin::Feature,

    /// Id of the started report item, assigned once.
    item: OnceCell<ItemId>,
}

impl FeatureContext {
    /// Creates a new [`FeatureContext`] without a report item yet.
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        source: impl Into<Arc<str>>,
        feature: gherkin::Feature,
    ) -> Self {
        Self {
            uri: uri.into(),
            source: source.into(),
            feature,
            item: OnceCell::new(),
        }
    }

    /// URI the feature was read from.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Parsed [`gherkin::Feature`].
    #[must_use]
    pub const fn feature(&self) -> &gherkin::Feature {
        &self.feature
    }

    /// Name of the report item: `<keyword>: <name>`.
    #[must_use]
    pub fn name(&self) -> String {
        format::node_name(&self.feature.keyword, &self.feature.name, None)
    }

    /// Attributes of the report item, from the feature's tags.
    #[must_use]
    pub fn attributes(&self) -> Vec<Attribute> {
        format::tag_attributes(&self.feature.tags)
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
    /// [`Error::IdReassigned`] if an id has been assigned already.
    pub fn assign_item(&self, id: ItemId) -> Result<()> {
        self.item.set(id).map_err(|_| Error::IdReassigned {
            item: "feature",
            name: self.name(),
        })
    }

    /// Builds a [`ScenarioContext`] for the given runtime `case`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownScenario`] if the `case` matches neither a plain
    ///   scenario nor an outline row;
    /// - [`Error::NoOutlineIteration`] if the outline row can't be numbered.
    pub fn scenario_context(
        self: &Arc<Self>,
        case: &TestCase,
        outlines: &OutlineIterations,
    ) -> Result<ScenarioContext> {
        let located = self
            .feature
            .find_scenario(&self.source, case.line, &case.name)
            .ok_or_else(|| Error::UnknownScenario {
                uri: self.uri.clone(),
                line: case.line,
                name: case.name.clone(),
            })?;
        let scenario = located.scenario;

        let (line, iteration) = if scenario.is_outline() {
            let n = outlines.iteration(
                &self.uri,
                &self.source,
                scenario,
                case.line,
            )?;
            (case.line, Some(n))
        } else {
            (scenario.position.line, None)
        };

        let backgrounds = self.feature.backgrounds(located.rule);
        let queue = backgrounds
            .iter()
            .flat_map(|bg| bg.steps.iter().map(|_| bg.keyword.clone()))
            .collect();
        let steps = backgrounds
            .iter()
            .flat_map(|bg| &bg.steps)
            .chain(&scenario.steps)
            .map(|s| (s.position.line, s.clone()))
            .collect::<HashMap<_, _>>();

        Ok(ScenarioContext::new(
            Arc::clone(self),
            line,
            scenario.clone(),
            case.clone(),
            iteration,
            queue,
            steps,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURE: &str = "\
@smoke
Feature: Belly
  Background:
    Given I have a belly

  Scenario: a few cukes
    Given I have 42 cukes in my belly
    Then my belly should growl

  Scenario Outline: eating
    Given there are <n> cucumbers

    Examples:
      | n  |
      | 12 |
      | 20 |
";

    fn context() -> Arc<FeatureContext> {
        let feature =
            gherkin::Feature::parse(FEATURE, gherkin::GherkinEnv::default())
                .unwrap();
        Arc::new(FeatureContext::new("belly.feature", FEATURE, feature))
    }

    #[test]
    fn names_and_tags() {
        let ctx = context();

        assert_eq!(ctx.name(), "Feature: Belly");
        assert_eq!(ctx.attributes(), vec![Attribute::tag("smoke")]);
    }

    #[test]
    fn assigns_item_once() {
        let ctx = context();

        ctx.assign_item("item_1".into()).unwrap();
        assert_eq!(
            ctx.assign_item("item_2".into()),
            Err(Error::IdReassigned { item: "feature", name: ctx.name() }),
        );
        assert_eq!(ctx.item().map(ItemId::as_str), Some("item_1"));
    }

    #[test]
    fn builds_plain_scenario_context() {
        let ctx = context();
        let case = TestCase::new("belly.feature", 6, "a few cukes");

        let sc =
            ctx.scenario_context(&case, &OutlineIterations::new()).unwrap();

        assert_eq!(sc.line(), 6);
        assert_eq!(sc.outline_iteration(), None);
        assert_eq!(sc.step(4).unwrap().value, "I have a belly");
        assert_eq!(sc.step(8).unwrap().value, "my belly should growl");
        assert!(sc.step(5).is_err());
    }

    #[test]
    fn builds_outline_iteration_context() {
        let ctx = context();
        let outlines = OutlineIterations::new();
        let case = TestCase::new("belly.feature", 16, "eating");

        let sc = ctx.scenario_context(&case, &outlines).unwrap();

        assert_eq!(sc.line(), 16);
        assert_eq!(sc.outline_iteration(), Some(2));
        assert_eq!(sc.name(), "Scenario Outline: eating [2]");
    }

    #[test]
    fn rejects_unknown_line() {
        let ctx = context();
        let case = TestCase::new("belly.feature", 7, "a few cukes");

        assert!(matches!(
            ctx.scenario_context(&case, &OutlineIterations::new()),
            Err(Error::UnknownScenario { line: 7, .. }),
        ));
    }
}
