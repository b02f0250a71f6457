// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hook-related events and types.

use derive_more::with_trait::Display;

/// Type of a hook executed around a scenario or a step.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{self:?}")]
pub enum HookType {
    /// Executing on each scenario before running all its steps.
    Before,

    /// Executing on each scenario after running all its steps.
    After,

    /// Executing before each step.
    BeforeStep,

    /// Executing after each step.
    AfterStep,
}

impl HookType {
    /// Indicates whether this hook runs before its scenario or step.
    #[must_use]
    pub const fn is_before(self) -> bool {
        matches!(self, Self::Before | Self::BeforeStep)
    }
}

/// Hook invocation, as a [`TestStep`] of a test case.
///
/// [`TestStep`]: super::TestStep
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookStep {
    /// Type of this hook.
    pub ty: HookType,

    /// Source location of the hook's body, if known.
    pub code_location: Option<String>,
}

impl HookStep {
    /// Creates a new [`HookStep`] of the given type.
    #[must_use]
    pub const fn new(ty: HookType) -> Self {
        Self { ty, code_location: None }
    }

    /// Sets the source location of this hook's body.
    #[must_use]
    pub fn at(mut self, code_location: impl Into<String>) -> Self {
        self.code_location = Some(code_location.into());
        self
    }
}
