// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`gherkin::Feature`] and [`gherkin::Scenario`] extensions.

use sealed::sealed;

/// [`gherkin::Scenario`] located inside a [`gherkin::Feature`].
#[derive(Clone, Copy, Debug)]
pub struct Located<'f> {
    /// Located [`gherkin::Scenario`].
    pub scenario: &'f gherkin::Scenario,

    /// [`gherkin::Rule`] the [`Located::scenario`] is nested in, if any.
    pub rule: Option<&'f gherkin::Rule>,
}

/// Helper methods to operate on [`gherkin::Feature`]s.
#[sealed]
pub trait Ext {
    /// Iterates over all the [`Scenario`]s of this [`Feature`], including
    /// ones nested in [`Rule`]s, in declaration order.
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Rule`]: gherkin::Rule
    /// [`Scenario`]: gherkin::Scenario
    fn located_scenarios(&self) -> impl Iterator<Item = Located<'_>>;

    /// Finds the [`Scenario`] a test case reported at the given `line` with
    /// the given `name` belongs to.
    ///
    /// A plain [`Scenario`] matches by its own line and name. A
    /// [`Scenario Outline`][1] matches by the line of any of its
    /// [`Examples`] rows, as runners report every row as a separate test
    /// case. The rows are located in the `source` text this [`Feature`] was
    /// parsed from.
    ///
    /// [`Examples`]: gherkin::Examples
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    /// [1]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    #[must_use]
    fn find_scenario(
        &self,
        source: &str,
        line: usize,
        name: &str,
    ) -> Option<Located<'_>>;

    /// Returns [`Background`]s applying to [`Scenario`]s of the given
    /// [`Rule`]: the [`Feature`]'s one first, then the [`Rule`]'s one.
    ///
    /// [`Background`]: gherkin::Background
    /// [`Feature`]: gherkin::Feature
    /// [`Rule`]: gherkin::Rule
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    fn backgrounds<'f>(
        &'f self,
        rule: Option<&'f gherkin::Rule>,
    ) -> Vec<&'f gherkin::Background>;
}

#[sealed]
impl Ext for gherkin::Feature {
    fn located_scenarios(&self) -> impl Iterator<Item = Located<'_>> {
        self.scenarios
            .iter()
            .map(|scenario| Located { scenario, rule: None })
            .chain(self.rules.iter().flat_map(|r| {
                r.scenarios
                    .iter()
                    .map(move |scenario| Located { scenario, rule: Some(r) })
            }))
    }

    fn find_scenario(
        &self,
        source: &str,
        line: usize,
        name: &str,
    ) -> Option<Located<'_>> {
        self.located_scenarios().find(|l| {
            (l.scenario.position.line == line && l.scenario.name == name)
                || l.scenario.example_rows(source).contains(&line)
        })
    }

    fn backgrounds<'f>(
        &'f self,
        rule: Option<&'f gherkin::Rule>,
    ) -> Vec<&'f gherkin::Background> {
        self.background
            .iter()
            .chain(rule.and_then(|r| r.background.as_ref()))
            .collect()
    }
}

/// Helper methods to operate on [`gherkin::Scenario`]s.
#[sealed]
pub trait ScenarioExt {
    /// Indicates whether this [`Scenario`] is a [`Scenario Outline`][1].
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [1]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    #[must_use]
    fn is_outline(&self) -> bool;

    /// Returns lines of all the [`Examples`] rows of this [`Scenario`],
    /// flattened across tables in declaration order. Header rows are not
    /// included.
    ///
    /// Lines are read from the `source` text this [`Scenario`] was parsed
    /// from, as [`gherkin::Table`] doesn't track positions of its rows.
    ///
    /// [`Examples`]: gherkin::Examples
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    fn example_rows(&self, source: &str) -> Vec<usize>;
}

#[sealed]
impl ScenarioExt for gherkin::Scenario {
    fn is_outline(&self) -> bool {
        !self.examples.is_empty()
    }

    fn example_rows(&self, source: &str) -> Vec<usize> {
        self.examples
            .iter()
            .filter_map(|ex| ex.table.as_ref())
            .flat_map(|table| {
                // Table starts at its header row. Blank lines and comments may
                // be interleaved with the rows.
                (1..)
                    .zip(source.lines())
                    .skip(table.position.line.saturating_sub(1))
                    .filter(|(_, l)| l.trim_start().starts_with('|'))
                    .map(|(n, _)| n)
                    .skip(1)
                    .take(table.rows.len().saturating_sub(1))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURE: &str = "\
Feature: Outlines
  Background:
    Given a shared step

  Scenario: plain
    Given a step

  Scenario Outline: eating
    Given there are <start> cucumbers

    Examples:
      | start |
      |    12 |
      |    20 |

    Examples:
      | start |
      |     1 |

  Rule: nested
    Background:
      Given a rule step

    Scenario: ruled
      Given a step
";

    const DESCRIBED: &str = "\
Feature: Described
  Scenario Outline: eating
    Given there are <start> cucumbers

    Examples: described
      Rows go below.

      | start |
      |    12 |

      # a comment
      |    20 |
";

    fn feature() -> gherkin::Feature {
        gherkin::Feature::parse(FEATURE, gherkin::GherkinEnv::default())
            .unwrap()
    }

    #[test]
    fn finds_plain_scenario_by_line_and_name() {
        let f = feature();

        let found = f.find_scenario(FEATURE, 5, "plain").unwrap();
        assert_eq!(found.scenario.name, "plain");
        assert!(found.rule.is_none());

        assert!(f.find_scenario(FEATURE, 5, "other").is_none());
    }

    #[test]
    fn finds_outline_by_example_row() {
        let f = feature();
        let outline = f.find_scenario(FEATURE, 8, "eating").unwrap().scenario;

        assert!(outline.is_outline());
        assert_eq!(outline.example_rows(FEATURE), vec![13, 14, 18]);
        for row in [13, 14, 18] {
            let found = f.find_scenario(FEATURE, row, "eating").unwrap();
            assert_eq!(found.scenario.position.line, 8);
        }
        assert!(f.find_scenario(FEATURE, 12, "eating").is_none());
    }

    #[test]
    fn locates_rows_after_description_and_blank_lines() {
        let f = gherkin::Feature::parse(
            DESCRIBED,
            gherkin::GherkinEnv::default(),
        )
        .unwrap();
        let outline = &f.scenarios[0];

        assert_eq!(outline.example_rows(DESCRIBED), vec![9, 12]);
        for row in [9, 12] {
            let found = f.find_scenario(DESCRIBED, row, "eating").unwrap();
            assert_eq!(found.scenario.position.line, 2);
        }
        for line in [5, 6, 8, 11] {
            assert!(f.find_scenario(DESCRIBED, line, "eating").is_none());
        }
    }

    #[test]
    fn finds_scenario_inside_rule() {
        let f = feature();

        let found = f.find_scenario(FEATURE, 24, "ruled").unwrap();
        let rule = found.rule.unwrap();
        assert_eq!(rule.name, "nested");

        let bgs = f.backgrounds(Some(rule));
        assert_eq!(bgs.len(), 2);
        assert_eq!(bgs[0].steps[0].value, "a shared step");
        assert_eq!(bgs[1].steps[0].value, "a rule step");
    }

    #[test]
    fn iterates_all_scenarios_in_order() {
        let names = feature()
            .located_scenarios()
            .map(|l| l.scenario.name.clone())
            .collect::<Vec<_>>();

        assert_eq!(names, ["plain", "eating", "ruled"]);
    }
}
