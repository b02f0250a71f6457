// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Running state reconstructed from a stream of runner events.
//!
//! A [`FeatureContext`] lives from the first test case of its feature until
//! the run finishes, as runners never signal the end of a feature. A
//! [`ScenarioContext`] lives from its test case being started until it's
//! finished. Both are owned by a [`ContextRegistry`] of a single run.

pub mod feature;
pub mod outline;
pub mod registry;
pub mod scenario;

#[doc(inline)]
pub use self::{
    feature::FeatureContext,
    outline::OutlineIterations,
    registry::ContextRegistry,
    scenario::{HookGroup, Running, ScenarioContext},
};
