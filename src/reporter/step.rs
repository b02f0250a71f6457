// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step and hook lifecycle, along with the output of their bodies.

use std::time::SystemTime;

use super::{current_thread, Reporter};
use crate::{
    attachment,
    client::{
        Attachment, Client, FinishExecutionRq, ItemId, ItemType, LogLevel,
        LogRq, StartItemRq,
    },
    context::{HookGroup, ScenarioContext},
    error::Result,
    event::{HookStep, PickleStep, StepArgument, StepResult, TestStep},
    format,
    hierarchy::{hook_item, Hierarchy, Node, StepMode},
    status,
};

impl<C: Client, H: Hierarchy> Reporter<C, H> {
    /// Handles a [`TestStep`] of the scenario running on the current thread
    /// being started.
    pub(super) fn step_started(
        &self,
        step: &TestStep,
        at: SystemTime,
    ) -> Result<()> {
        let ctx = self.contexts.current(current_thread())?;
        match step {
            TestStep::Hook(hook) => {
                self.hook_started(&ctx, hook, at);
                Ok(())
            }
            TestStep::Pickle(step) => self.pickle_started(&ctx, step, at),
        }
    }

    /// Handles a [`TestStep`] of the scenario running on the current thread
    /// being finished.
    pub(super) fn step_finished(
        &self,
        step: &TestStep,
        result: &StepResult,
        at: SystemTime,
    ) -> Result<()> {
        let ctx = self.contexts.current(current_thread())?;
        match step {
            TestStep::Hook(hook) => self.hook_finished(&ctx, hook, result, at),
            TestStep::Pickle(step) => {
                self.pickle_finished(&ctx, step, result, at);
            }
        }
        Ok(())
    }

    /// Attaches the `data` to the innermost item running on the current
    /// thread.
    pub(super) fn embed(
        &self,
        declared: &str,
        data: Vec<u8>,
        name: Option<String>,
        at: SystemTime,
    ) {
        let Some(item) = self.current_item() else {
            tracing::warn!(
                mime = declared,
                "dropping attachment: no scenario is running on this thread"
            );
            return;
        };

        let mime = attachment::classify(declared, &data);
        self.client.log(LogRq {
            attachment: Some(Attachment {
                name,
                content_type: mime.to_string(),
                data,
            }),
            ..LogRq::new(
                item,
                attachment::message(&mime),
                LogLevel::Unknown,
                at,
            )
        });
    }

    /// Logs the `text` into the innermost item running on the current
    /// thread.
    pub(super) fn write(&self, text: String, at: SystemTime) {
        let Some(item) = self.current_item() else {
            tracing::warn!(
                "dropping written text: no scenario is running on this thread"
            );
            return;
        };
        self.log(item, text, LogLevel::Info, at);
    }

    /// Closes the open [`HookGroup`] of the given scenario, if any.
    pub(super) fn close_hooks(&self, ctx: &ScenarioContext, at: SystemTime) {
        let group = ctx.running().hooks.take();
        if let Some(group) = group {
            self.finish_hooks(group, at);
        }
    }

    /// Returns the innermost item of the scenario running on the current
    /// thread.
    fn current_item(&self) -> Option<ItemId> {
        self.contexts
            .current(current_thread())
            .ok()
            .and_then(|ctx| ctx.current_item())
    }

    /// Opens a new [`HookGroup`] unless the open one has the same type.
    fn hook_started(
        &self,
        ctx: &ScenarioContext,
        hook: &HookStep,
        at: SystemTime,
    ) {
        let mut running = ctx.running();
        if running.hooks.as_ref().is_some_and(|g| g.ty == hook.ty) {
            return;
        }
        if let Some(group) = running.hooks.take() {
            self.finish_hooks(group, at);
        }

        let item = match self.hierarchy.steps() {
            StepMode::Items { has_stats, .. } => {
                let (name, ty) = hook_item(hook.ty);
                let rq = StartItemRq {
                    has_stats,
                    ..StartItemRq::new(self.launch(at), name, ty, at)
                };
                Some(self.client.start_item(ctx.item(), rq))
            }
            StepMode::Logs => None,
        };
        running.hooks = Some(HookGroup::new(hook.ty, item));
    }

    /// Records the outcome of a hook into its [`HookGroup`] and logs it.
    fn hook_finished(
        &self,
        ctx: &ScenarioContext,
        hook: &HookStep,
        result: &StepResult,
        at: SystemTime,
    ) {
        let target = {
            let mut running = ctx.running();
            let Some(group) = running.hooks.as_mut() else {
                tracing::error!(
                    uri = %ctx.uri(),
                    line = ctx.line(),
                    ty = ?hook.ty,
                    "internal bug: finishing a hook which was never started"
                );
                return;
            };
            group.record(result.status);
            group.item.clone()
        };

        let message = format!(
            "{} hook: {}",
            if hook.ty.is_before() { "Before" } else { "After" },
            hook.code_location.as_deref().unwrap_or("unknown"),
        );
        self.log_result(
            target.or_else(|| ctx.item().cloned()),
            result,
            Some(message),
            at,
        );
    }

    /// Finishes the item of the given [`HookGroup`], if it has one.
    fn finish_hooks(&self, group: HookGroup, at: SystemTime) {
        if let Some(item) = group.item {
            let status = self.statuses.item_status(group.status);
            self.client
                .finish_item(&item, FinishExecutionRq::with_status(at, status));
        }
    }

    /// Reports a [`PickleStep`] being started, either as an item or as a log
    /// entry of its scenario.
    fn pickle_started(
        &self,
        ctx: &ScenarioContext,
        step: &PickleStep,
        at: SystemTime,
    ) -> Result<()> {
        self.close_hooks(ctx, at);

        let declared = ctx.step(step.line)?;
        let prefix =
            ctx.next_background().map(|kw| format::background_prefix(&kw));
        let name =
            format::step_name(prefix.as_deref(), &declared.keyword, &step.text);
        let description = step
            .argument
            .as_ref()
            .map(format::multiline_argument)
            .or_else(|| declared_argument(declared));

        match self.hierarchy.steps() {
            StepMode::Items { has_stats, log_multiline } => {
                let origin = self.origin.resolve(step);
                let rq = StartItemRq {
                    description: description.clone(),
                    code_ref: origin.code_ref,
                    test_case_id: origin.test_case_id,
                    attributes: origin.attributes,
                    parameters: format::parameters(&step.arguments),
                    has_stats,
                    ..StartItemRq::new(
                        self.launch(at),
                        name,
                        ItemType::Step,
                        at,
                    )
                };
                let id = self.client.start_item(ctx.item(), rq);
                let node = Node::Step {
                    uri: ctx.uri(),
                    line: ctx.line(),
                    text: &step.text,
                };
                self.hierarchy.started(node, &id);

                if log_multiline {
                    if let Some(arg) = description {
                        self.log(id.clone(), arg, LogLevel::Info, at);
                    }
                }

                ctx.running().step = Some(id);
            }
            StepMode::Logs => {
                let message = match description {
                    Some(arg) => format!("{name}\n{arg}"),
                    None => name,
                };
                match ctx.item() {
                    Some(item) => {
                        self.log(item.clone(), message, LogLevel::Info, at);
                    }
                    None => tracing::error!(
                        uri = %ctx.uri(),
                        line = ctx.line(),
                        "internal bug: logging a step of a scenario which \
                         was never started"
                    ),
                }
            }
        }
        Ok(())
    }

    /// Reports a [`PickleStep`] being finished, logging its error.
    fn pickle_finished(
        &self,
        ctx: &ScenarioContext,
        step: &PickleStep,
        result: &StepResult,
        at: SystemTime,
    ) {
        let item = ctx.running().step.take();
        self.log_result(
            item.clone().or_else(|| ctx.item().cloned()),
            result,
            None,
            at,
        );

        match (self.hierarchy.steps(), item) {
            (StepMode::Items { .. }, Some(id)) => {
                let status = self.statuses.item_status(result.status);
                let rq = FinishExecutionRq::with_status(at, status);
                self.client.finish_item(&id, rq);
                self.hierarchy.finished(Node::Step {
                    uri: ctx.uri(),
                    line: ctx.line(),
                    text: &step.text,
                });
            }
            (StepMode::Items { .. }, None) => tracing::error!(
                uri = %ctx.uri(),
                line = ctx.line(),
                step = %step.text,
                "internal bug: finishing a step which was never started"
            ),
            (StepMode::Logs, _) => {}
        }
    }

    /// Logs the error of the given [`StepResult`] and the `message` into the
    /// `target` item, at the level of the result's status.
    fn log_result(
        &self,
        target: Option<ItemId>,
        result: &StepResult,
        message: Option<String>,
        at: SystemTime,
    ) {
        if result.error.is_none() && message.is_none() {
            return;
        }
        let Some(item) = target else {
            tracing::error!(
                "internal bug: logging an outcome of an item which was never \
                 started"
            );
            return;
        };

        let level = status::log_level(result.status);
        if let Some(error) = &result.error {
            self.log(item.clone(), error.clone(), level, at);
        }
        if let Some(message) = message {
            self.log(item, message, level, at);
        }
    }
}

/// Renders the multiline argument of a step as declared in its `.feature`
/// file.
fn declared_argument(step: &gherkin::Step) -> Option<String> {
    step.docstring
        .clone()
        .map(StepArgument::DocString)
        .or_else(|| {
            step.table.as_ref().map(|t| StepArgument::Table(t.rows.clone()))
        })
        .as_ref()
        .map(format::multiline_argument)
}
