// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Steps reported as test methods.

use super::{Hierarchy, StepMode};
use crate::client::ItemType;

/// [`Hierarchy`] reporting every step as a test method.
///
/// | Gherkin    | Report item                         |
/// |------------|-------------------------------------|
/// | feature    | [`ItemType::Suite`]                 |
/// | scenario   | [`ItemType::Test`]                  |
/// | step       | [`ItemType::Step`]                  |
/// | hook group | `BEFORE_*`/`AFTER_*` [`ItemType`]s  |
///
/// Background steps are reported as part of every scenario, prefixed with
/// their keyword. Outline rows are reported as separate scenarios, suffixed
/// with their iteration number.
#[derive(Clone, Copy, Debug, Default)]
pub struct Flat;

impl Hierarchy for Flat {
    fn feature_type(&self) -> ItemType {
        ItemType::Suite
    }

    fn scenario_type(&self) -> ItemType {
        ItemType::Test
    }

    fn steps(&self) -> StepMode {
        StepMode::Items { has_stats: true, log_multiline: false }
    }
}
