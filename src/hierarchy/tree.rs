// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Steps reported as test methods, addressable by late callbacks.

use std::collections::HashMap;

use dashmap::DashMap;
use linked_hash_map::LinkedHashMap;

use super::{Flat, Hierarchy, Node, StepMode};
use crate::client::{ItemId, ItemType};

/// [`Hierarchy`] reporting items the same way as [`Flat`], while keeping
/// open feature, scenario and step items addressable in an [`ItemTree`].
/// Items grouping hooks are not tracked.
///
/// This allows asynchronous callback code to log into an item by its URI,
/// line and step text after the item has been left by the runner. See
/// [`Reporter::log_late()`].
///
/// [`Reporter::log_late()`]: crate::Reporter::log_late
#[derive(Debug, Default)]
pub struct Tree {
    /// Open items.
    items: ItemTree,
}

impl Tree {
    /// Creates a new [`Tree`] with no items.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`ItemTree`] of open items.
    #[must_use]
    pub const fn items(&self) -> &ItemTree {
        &self.items
    }
}

impl Hierarchy for Tree {
    fn feature_type(&self) -> ItemType {
        Flat.feature_type()
    }

    fn scenario_type(&self) -> ItemType {
        Flat.scenario_type()
    }

    fn steps(&self) -> StepMode {
        Flat.steps()
    }

    fn started(&self, node: Node<'_>, item: &ItemId) {
        self.items.insert(node, item.clone());
    }

    fn finished(&self, node: Node<'_>) {
        match node {
            // Step leaves stay until their scenario finishes.
            Node::Step { .. } => {}
            Node::Scenario { .. } | Node::Feature { .. } => {
                self.items.remove(node);
            }
        }
    }
}

/// Open feature item with its scenarios.
#[derive(Debug)]
struct FeatureNode {
    /// Id of the feature item.
    item: ItemId,

    /// Open scenarios keyed by their lines.
    scenarios: HashMap<usize, ScenarioNode>,
}

/// Open scenario item with its steps.
#[derive(Debug)]
struct ScenarioNode {
    /// Id of the scenario item.
    item: ItemId,

    /// Started steps keyed by their texts, in starting order.
    steps: LinkedHashMap<String, ItemId>,
}

/// Lookup tree of open report items, keyed by feature URI, then by scenario
/// line, then by step text.
#[derive(Debug, Default)]
pub struct ItemTree {
    /// Open features keyed by their URIs.
    features: DashMap<String, FeatureNode>,
}

impl ItemTree {
    /// Inserts an item for the given [`Node`].
    ///
    /// Scenarios of unknown features and steps of unknown scenarios are
    /// ignored.
    pub fn insert(&self, node: Node<'_>, item: ItemId) {
        match node {
            Node::Feature { uri } => {
                _ = self.features.insert(
                    uri.to_owned(),
                    FeatureNode { item, scenarios: HashMap::new() },
                );
            }
            Node::Scenario { uri, line } => {
                if let Some(mut f) = self.features.get_mut(uri) {
                    _ = f.scenarios.insert(
                        line,
                        ScenarioNode { item, steps: LinkedHashMap::new() },
                    );
                }
            }
            Node::Step { uri, line, text } => {
                if let Some(mut f) = self.features.get_mut(uri) {
                    if let Some(sc) = f.scenarios.get_mut(&line) {
                        _ = sc.steps.insert(text.to_owned(), item);
                    }
                }
            }
        }
    }

    /// Removes the item of the given [`Node`] along with all its children.
    pub fn remove(&self, node: Node<'_>) {
        match node {
            Node::Feature { uri } => {
                _ = self.features.remove(uri);
            }
            Node::Scenario { uri, line } => {
                if let Some(mut f) = self.features.get_mut(uri) {
                    _ = f.scenarios.remove(&line);
                }
            }
            Node::Step { uri, line, text } => {
                if let Some(mut f) = self.features.get_mut(uri) {
                    if let Some(sc) = f.scenarios.get_mut(&line) {
                        _ = sc.steps.remove(text);
                    }
                }
            }
        }
    }

    /// Finds the open item of the given [`Node`].
    #[must_use]
    pub fn find(&self, node: Node<'_>) -> Option<ItemId> {
        match node {
            Node::Feature { uri } => {
                self.features.get(uri).map(|f| f.item.clone())
            }
            Node::Scenario { uri, line } => self
                .features
                .get(uri)
                .and_then(|f| f.scenarios.get(&line).map(|s| s.item.clone())),
            Node::Step { uri, line, text } => {
                self.features.get(uri).and_then(|f| {
                    f.scenarios
                        .get(&line)
                        .and_then(|s| s.steps.get(text).cloned())
                })
            }
        }
    }

    /// Number of open features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Indicates whether no feature is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURE: Node<'static> = Node::Feature { uri: "t.feature" };
    const SCENARIO: Node<'static> =
        Node::Scenario { uri: "t.feature", line: 3 };
    const STEP: Node<'static> =
        Node::Step { uri: "t.feature", line: 3, text: "a step" };

    #[test]
    fn finds_open_items() {
        let tree = ItemTree::default();
        tree.insert(FEATURE, "f".into());
        tree.insert(SCENARIO, "s".into());
        tree.insert(STEP, "st".into());

        assert_eq!(tree.find(FEATURE), Some("f".into()));
        assert_eq!(tree.find(SCENARIO), Some("s".into()));
        assert_eq!(tree.find(STEP), Some("st".into()));
        assert_eq!(
            tree.find(Node::Step { uri: "t.feature", line: 3, text: "other" }),
            None,
        );
    }

    #[test]
    fn ignores_orphans() {
        let tree = ItemTree::default();
        tree.insert(SCENARIO, "s".into());
        tree.insert(STEP, "st".into());

        assert!(tree.is_empty());
        assert_eq!(tree.find(STEP), None);
    }

    #[test]
    fn keeps_steps_until_scenario_finishes() {
        let tree = Tree::new();
        tree.started(FEATURE, &"f".into());
        tree.started(SCENARIO, &"s".into());
        tree.started(STEP, &"st".into());

        tree.finished(STEP);
        assert_eq!(tree.items().find(STEP), Some("st".into()));

        tree.finished(SCENARIO);
        assert_eq!(tree.items().find(STEP), None);
        assert_eq!(tree.items().find(FEATURE), Some("f".into()));

        tree.finished(FEATURE);
        assert!(tree.items().is_empty());
    }
}
