// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolution of the code a step is implemented by.

use itertools::Itertools as _;

use crate::{client::Attribute, event::PickleStep};

/// Identity of a step definition implementing a step.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Origin {
    /// Stable reference to the step definition.
    pub code_ref: Option<String>,

    /// Attributes declared on the step definition.
    pub attributes: Vec<Attribute>,

    /// Identity of the step across launches.
    pub test_case_id: Option<String>,
}

/// Capability of resolving the [`Origin`] of an executed step.
///
/// Runners expose step definitions differently, so this is implemented per
/// runner. Any `Fn(&PickleStep) -> Origin` closure is an [`OriginResolver`]
/// too.
pub trait OriginResolver: Send + Sync {
    /// Resolves the [`Origin`] of the given `step`.
    fn resolve(&self, step: &PickleStep) -> Origin;
}

impl<F> OriginResolver for F
where
    F: Fn(&PickleStep) -> Origin + Send + Sync,
{
    fn resolve(&self, step: &PickleStep) -> Origin {
        self(step)
    }
}

/// [`OriginResolver`] using [`PickleStep::code_location`] as the code
/// reference.
///
/// Test case id is the code reference followed by the captured argument
/// values: `<code_ref>[<arg>,<arg>]`. Steps without a matched definition
/// have no [`Origin`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CodeLocation;

impl OriginResolver for CodeLocation {
    fn resolve(&self, step: &PickleStep) -> Origin {
        let Some(code_ref) = step.code_location.clone() else {
            return Origin::default();
        };
        let test_case_id = format!(
            "{code_ref}[{}]",
            step.arguments.iter().map(|a| a.value.as_str()).join(","),
        );

        Origin {
            code_ref: Some(code_ref),
            attributes: vec![],
            test_case_id: Some(test_case_id),
        }
    }
}
