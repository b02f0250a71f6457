// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Policies mapping Gherkin structure onto report items.
//!
//! A [`Reporter`] runs the same state machine for every [`Hierarchy`]; the
//! policy only decides which item types features and scenarios become and
//! how steps and hooks are reported.
//!
//! [`Reporter`]: crate::Reporter

pub mod aggregated;
pub mod flat;
pub mod tree;

use crate::{
    client::{ItemId, ItemType},
    event::HookType,
};

#[doc(inline)]
pub use self::{aggregated::Aggregated, flat::Flat, tree::{ItemTree, Tree}};

/// Policy of mapping features, scenarios, steps and hooks onto report items.
pub trait Hierarchy: Send + Sync {
    /// [`ItemType`] of feature items.
    fn feature_type(&self) -> ItemType;

    /// [`ItemType`] of scenario items.
    fn scenario_type(&self) -> ItemType;

    /// Way of reporting steps and hooks.
    fn steps(&self) -> StepMode;

    /// Synthetic item to parent all the feature items with, started once per
    /// launch.
    fn root(&self) -> Option<RootSuite> {
        None
    }

    /// Notifies about an item being started for the given [`Node`].
    fn started(&self, node: Node<'_>, item: &ItemId) {
        _ = (node, item);
    }

    /// Notifies about the item of the given [`Node`] being finished.
    fn finished(&self, node: Node<'_>) {
        _ = node;
    }
}

/// Way of reporting steps and hooks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepMode {
    /// Steps and hook groups are child items of their scenario.
    Items {
        /// Whether the items count toward statistics.
        has_stats: bool,

        /// Whether a step's multiline argument is additionally logged.
        log_multiline: bool,
    },

    /// Steps and hooks are log entries of their scenario.
    Logs,
}

/// Synthetic root item of a launch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RootSuite {
    /// Name of the item.
    pub name: &'static str,

    /// [`ItemType`] of the item.
    pub ty: ItemType,
}

/// Gherkin node a report item is started for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Node<'a> {
    /// Feature.
    Feature {
        /// URI of the feature.
        uri: &'a str,
    },

    /// Scenario or outline iteration.
    Scenario {
        /// URI of the feature.
        uri: &'a str,

        /// Line identifying the scenario.
        line: usize,
    },

    /// Step of a scenario.
    Step {
        /// URI of the feature.
        uri: &'a str,

        /// Line identifying the scenario.
        line: usize,

        /// Runtime text of the step.
        text: &'a str,
    },
}

/// Returns the name and [`ItemType`] of an item grouping hooks of the given
/// [`HookType`].
#[must_use]
pub const fn hook_item(ty: HookType) -> (&'static str, ItemType) {
    match ty {
        HookType::Before => ("Before hooks", ItemType::BeforeTest),
        HookType::After => ("After hooks", ItemType::AfterTest),
        HookType::BeforeStep => ("Before step", ItemType::BeforeMethod),
        HookType::AfterStep => ("After step", ItemType::AfterMethod),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_items() {
        assert_eq!(
            hook_item(HookType::Before),
            ("Before hooks", ItemType::BeforeTest),
        );
        assert_eq!(
            hook_item(HookType::AfterStep),
            ("After step", ItemType::AfterMethod),
        );
    }
}
