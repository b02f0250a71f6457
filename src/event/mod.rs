// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Key occurrences in a lifecycle of a [Cucumber] test run, as emitted by a
//! test runner.
//!
//! The top-level enum here is [`Cucumber`].
//!
//! Unlike a parsed `.feature` file, these events don't carry any structural
//! boundaries: there is no "feature started" or "feature finished" event,
//! and step events don't say which scenario they belong to. Reconstructing
//! that structure is the job of the [`Reporter`].
//!
//! [`Reporter`]: crate::Reporter
//! [Cucumber]: https://cucumber.io

pub mod cucumber_events;
pub mod event_struct;
pub mod hook_events;
pub mod result;
pub mod step_events;

pub use self::{
    cucumber_events::{Cucumber, TestCase},
    event_struct::{Event, Metadata},
    hook_events::{HookStep, HookType},
    result::{ParseStatusError, Status, StepResult},
    step_events::{Argument, PickleStep, StepArgument, TestStep},
};
