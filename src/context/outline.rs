// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Numbering of [`Scenario Outline`][1] iterations.
//!
//! [1]: https://cucumber.io/docs/gherkin/reference#scenario-outline

use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    error::{Error, Result},
    feature::ScenarioExt as _,
};

/// Memoized [`Examples`] row lines of every [`Scenario Outline`][1] seen so
/// far, keyed by the outline's feature URI and declaration line.
///
/// Rows are collected once per outline, no matter in which order or from
/// how many threads its iterations are queried.
///
/// [`Examples`]: gherkin::Examples
/// [1]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Debug, Default)]
pub struct OutlineIterations {
    /// Row lines in declaration order.
    rows: DashMap<(String, usize), Arc<[usize]>>,
}

impl OutlineIterations {
    /// Creates a new empty [`OutlineIterations`] cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the 1-based iteration number of the `outline` row declared at
    /// the given `line` of the `source` text.
    ///
    /// # Errors
    ///
    /// [`Error::NoOutlineIteration`] if the `outline` has no row at `line`.
    pub fn iteration(
        &self,
        uri: &str,
        source: &str,
        outline: &gherkin::Scenario,
        line: usize,
    ) -> Result<usize> {
        let rows = Arc::clone(
            &self
                .rows
                .entry((uri.to_owned(), outline.position.line))
                .or_insert_with(|| outline.example_rows(source).into()),
        );

        rows.iter()
            .position(|l| *l == line)
            .map(|idx| idx + 1)
            .ok_or_else(|| Error::NoOutlineIteration {
                uri: uri.to_owned(),
                line,
            })
    }

    /// Forgets the rows of all outlines of the feature at the given `uri`.
    pub fn forget(&self, uri: &str) {
        self.rows.retain(|(u, _), _| u != uri);
    }

    /// Number of outlines memoized.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Indicates whether no outline has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const FEATURE: &str = "\
Feature: Numbers
  Scenario Outline: counting
    Given <n>

    Examples:
      | n |
      | 1 |
      | 2 |
      | 3 |
";

    fn outline() -> gherkin::Scenario {
        gherkin::Feature::parse(FEATURE, gherkin::GherkinEnv::default())
            .unwrap()
            .scenarios
            .remove(0)
    }

    #[test]
    fn numbers_rows_in_declaration_order() {
        let iterations = OutlineIterations::new();
        let outline = outline();

        assert_eq!(iterations.iteration("f", FEATURE, &outline, 9).unwrap(), 3);
        assert_eq!(iterations.iteration("f", FEATURE, &outline, 7).unwrap(), 1);
        assert_eq!(iterations.iteration("f", FEATURE, &outline, 8).unwrap(), 2);
        assert_eq!(iterations.len(), 1);
    }

    #[test]
    fn errors_on_unknown_row() {
        let iterations = OutlineIterations::new();

        assert_eq!(
            iterations.iteration("f", FEATURE, &outline(), 6),
            Err(Error::NoOutlineIteration { uri: "f".into(), line: 6 }),
        );
    }

    #[test]
    fn computes_once_across_threads() {
        let iterations = OutlineIterations::new();
        let outline = outline();

        let mut numbers = thread::scope(|s| {
            [9, 7, 8, 7]
                .map(|line| {
                    let (iterations, outline) = (&iterations, &outline);
                    s.spawn(move || {
                        iterations.iteration("f", FEATURE, outline, line)
                    })
                })
                .map(|h| h.join().unwrap().unwrap())
        });
        numbers.sort_unstable();

        assert_eq!(numbers, [1, 1, 2, 3]);
        assert_eq!(iterations.len(), 1);

        iterations.forget("f");
        assert!(iterations.is_empty());
    }
}
