// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Feature and scenario lifecycle.

use std::time::SystemTime;

use super::{current_thread, Reporter};
use crate::{
    client::{Client, FinishExecutionRq, LaunchId, StartItemRq},
    context::{FeatureContext, ScenarioContext},
    error::{Error, Result},
    event::{StepResult, TestCase},
    format,
    hierarchy::{Hierarchy, Node},
};

impl<C: Client, H: Hierarchy> Reporter<C, H> {
    /// Handles a [`TestCase`] being started: starts its feature on the first
    /// touch, starts its scenario unless already running, and binds the
    /// scenario to the current thread.
    pub(super) fn case_started(
        &self,
        case: &TestCase,
        at: SystemTime,
    ) -> Result<()> {
        let launch = self.launch(at);

        let feature = self.contexts.get_or_create_feature(&case.uri, || {
            self.start_feature(&case.uri, &launch, at)
        })?;
        if feature.uri() != case.uri {
            return Err(Error::UriMismatch {
                feature: feature.uri().to_owned(),
                case: case.uri.clone(),
            });
        }

        let (scenario, created) =
            self.contexts.get_or_create_scenario(&case.uri, case.line, || {
                let ctx =
                    feature.scenario_context(case, self.contexts.outlines())?;
                self.start_scenario(&ctx, &launch, at)?;
                Ok(ctx)
            })?;
        if !created {
            tracing::debug!(
                uri = %case.uri,
                line = case.line,
                "scenario is running already, reusing it"
            );
        }

        self.contexts.bind_current(current_thread(), scenario);
        Ok(())
    }

    /// Handles a [`TestCase`] being finished: closes its open hook group,
    /// finishes its scenario once no run of it is left, and records the
    /// completion time of its feature.
    pub(super) fn case_finished(
        &self,
        case: &TestCase,
        result: &StepResult,
        at: SystemTime,
    ) -> Result<()> {
        let left = self.contexts.leave_scenario(&case.uri, case.line);
        self.contexts.unbind_current(current_thread());
        let Some(ctx) = left? else {
            return Ok(());
        };

        self.close_hooks(&ctx, at);
        let status = self.statuses.item_status(result.status);
        match ctx.item() {
            Some(id) => self
                .client
                .finish_item(id, FinishExecutionRq::with_status(at, status)),
            None => tracing::error!(
                uri = %case.uri,
                line = case.line,
                "internal bug: finishing a scenario which was never started"
            ),
        }
        self.hierarchy
            .finished(Node::Scenario { uri: &case.uri, line: ctx.line() });
        self.contexts.record_feature_end(&case.uri, at);
        Ok(())
    }

    /// Parses the feature at the given `uri` and starts its item.
    fn start_feature(
        &self,
        uri: &str,
        launch: &LaunchId,
        at: SystemTime,
    ) -> Result<FeatureContext> {
        let (source, feature) = self.sources.parse(uri)?;
        let ctx = FeatureContext::new(uri, source, feature);
        let parent = self.root(launch, at);

        let rq = StartItemRq {
            description: Some(uri.to_owned()),
            code_ref: Some(format::code_ref(uri, 0)),
            attributes: ctx.attributes(),
            ..StartItemRq::new(
                launch.clone(),
                ctx.name(),
                self.hierarchy.feature_type(),
                at,
            )
        };
        let id = self.client.start_item(parent.as_ref(), rq);
        tracing::debug!(%uri, item = %id, "feature started");

        ctx.assign_item(id.clone())?;
        self.hierarchy.started(Node::Feature { uri }, &id);
        Ok(ctx)
    }

    /// Starts the item of the given scenario under its feature.
    fn start_scenario(
        &self,
        ctx: &ScenarioContext,
        launch: &LaunchId,
        at: SystemTime,
    ) -> Result<()> {
        let code_ref = ctx.code_ref();
        let rq = StartItemRq {
            description: Some(ctx.uri().to_owned()),
            code_ref: Some(code_ref.clone()),
            test_case_id: Some(code_ref),
            attributes: ctx.attributes(),
            ..StartItemRq::new(
                launch.clone(),
                ctx.name(),
                self.hierarchy.scenario_type(),
                at,
            )
        };
        let id = self.client.start_item(ctx.feature().item(), rq);
        tracing::debug!(
            uri = %ctx.uri(),
            line = ctx.line(),
            item = %id,
            "scenario started"
        );

        ctx.assign_item(id.clone())?;
        self.hierarchy
            .started(Node::Scenario { uri: ctx.uri(), line: ctx.line() }, &id);
        Ok(())
    }
}
