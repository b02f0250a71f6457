// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scenarios reported as test methods.

use smart_default::SmartDefault;

use super::{Hierarchy, RootSuite, StepMode};
use crate::client::ItemType;

/// [`Hierarchy`] reporting every scenario as a test method.
///
/// | Gherkin  | Report item         |
/// |----------|---------------------|
/// | feature  | [`ItemType::Test`]  |
/// | scenario | [`ItemType::Step`]  |
/// | step     | see [`StepMode`]    |
///
/// Test items can't be immediate children of a launch, so every feature is
/// parented by a single [`RootSuite`] started once per launch.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Aggregated {
    /// Way of reporting steps and hooks.
    #[default(StepMode::Items { has_stats: false, log_multiline: true })]
    steps: StepMode,
}

impl Aggregated {
    /// Name of the synthetic root item.
    pub const ROOT_NAME: &'static str = "Root User Story";

    /// Reports steps and hook groups as nested items not counting toward
    /// statistics, additionally logging multiline step arguments.
    #[must_use]
    pub fn nested() -> Self {
        Self::default()
    }

    /// Reports steps and hooks as log entries of their scenario.
    #[must_use]
    pub const fn logs() -> Self {
        Self { steps: StepMode::Logs }
    }
}

impl Hierarchy for Aggregated {
    fn feature_type(&self) -> ItemType {
        ItemType::Test
    }

    fn scenario_type(&self) -> ItemType {
        ItemType::Step
    }

    fn steps(&self) -> StepMode {
        self.steps
    }

    fn root(&self) -> Option<RootSuite> {
        Some(RootSuite { name: Self::ROOT_NAME, ty: ItemType::Suite })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_by_default() {
        assert_eq!(
            Aggregated::default().steps(),
            StepMode::Items { has_stats: false, log_multiline: true },
        );
        assert_eq!(Aggregated::logs().steps(), StepMode::Logs);
    }

    #[test]
    fn has_root_suite() {
        let root = Aggregated::nested().root().unwrap();

        assert_eq!(root.name, "Root User Story");
        assert_eq!(root.ty, ItemType::Suite);
    }
}
