// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step-level events.

use derive_more::with_trait::From;

use super::HookStep;

/// Single unit of a test case execution: either a hook or a Gherkin step.
#[derive(Clone, Debug, Eq, From, PartialEq)]
pub enum TestStep {
    /// Hook invocation.
    Hook(HookStep),

    /// Gherkin step invocation.
    Pickle(PickleStep),
}

impl TestStep {
    /// Returns the [`HookStep`], if this [`TestStep`] is a hook.
    #[must_use]
    pub const fn as_hook(&self) -> Option<&HookStep> {
        match self {
            Self::Hook(h) => Some(h),
            Self::Pickle(_) => None,
        }
    }
}

/// Gherkin step as executed by a runner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PickleStep {
    /// Text of the step, with outline placeholders substituted.
    pub text: String,

    /// Declared source line of the step. For background steps this is the
    /// line inside the `Background:` block.
    pub line: usize,

    /// Arguments captured by the matched step definition.
    pub arguments: Vec<Argument>,

    /// Docstring or data table of the step, with outline placeholders
    /// substituted.
    pub argument: Option<StepArgument>,

    /// Source location of the matched step definition, if any.
    pub code_location: Option<String>,
}

impl PickleStep {
    /// Creates a new [`PickleStep`] without arguments.
    #[must_use]
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
            arguments: vec![],
            argument: None,
            code_location: None,
        }
    }

    /// Adds a captured [`Argument`].
    #[must_use]
    pub fn with_argument(mut self, arg: Argument) -> Self {
        self.arguments.push(arg);
        self
    }

    /// Sets the docstring or data table of this step.
    #[must_use]
    pub fn with_multiline(mut self, argument: StepArgument) -> Self {
        self.argument = Some(argument);
        self
    }

    /// Sets the source location of the matched step definition.
    #[must_use]
    pub fn at(mut self, code_location: impl Into<String>) -> Self {
        self.code_location = Some(code_location.into());
        self
    }
}

/// Value captured from a step's text by its step definition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Argument {
    /// Name of the parameter type, if the definition declares one.
    pub ty: Option<String>,

    /// Captured value.
    pub value: String,
}

impl Argument {
    /// Creates an untyped [`Argument`].
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self { ty: None, value: value.into() }
    }

    /// Creates an [`Argument`] of the given parameter type.
    #[must_use]
    pub fn typed(ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self { ty: Some(ty.into()), value: value.into() }
    }
}

/// Multiline argument of a step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepArgument {
    /// Docstring content.
    DocString(String),

    /// Data table rows.
    Table(Vec<Vec<String>>),
}
