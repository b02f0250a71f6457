// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Launch lifecycle and run finalization.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::SystemTime,
};

use once_cell::sync::OnceCell;

use super::Reporter;
use crate::{
    client::{
        Attribute, Client, FinishExecutionRq, ItemId, LaunchId, StartItemRq,
        StartLaunchRq,
    },
    hierarchy::{Hierarchy, Node},
};

/// Launch of a single test run, started once and lazily.
#[derive(Debug, Default)]
pub(super) struct Launch {
    /// Time the test run has started at.
    started_at: OnceCell<SystemTime>,

    /// Id of the started launch.
    id: OnceCell<LaunchId>,

    /// Id of the synthetic root item, if the hierarchy has one.
    root: OnceCell<ItemId>,

    /// Whether the launch has been finished already.
    finished: AtomicBool,
}

impl Launch {
    /// Returns the id of the started launch, if any.
    pub(super) fn id(&self) -> Option<&LaunchId> {
        self.id.get()
    }
}

impl<C: Client, H: Hierarchy> Reporter<C, H> {
    /// Handles the test run being started.
    pub(super) fn started(&self, at: SystemTime) {
        _ = self.launch(at);
    }

    /// Returns the id of the launch, starting it if not started yet.
    pub(super) fn launch(&self, at: SystemTime) -> LaunchId {
        let start_time = *self.launch.started_at.get_or_init(|| at);
        self.launch
            .id
            .get_or_init(|| {
                let id = self.client.start_launch(self.launch_rq(start_time));
                tracing::debug!(launch = %id, "launch started");
                id
            })
            .clone()
    }

    /// Returns the id of the root item to parent features with, starting it
    /// if not started yet.
    pub(super) fn root(
        &self,
        launch: &LaunchId,
        at: SystemTime,
    ) -> Option<ItemId> {
        let root = self.hierarchy.root()?;
        Some(
            self.launch
                .root
                .get_or_init(|| {
                    let launch = launch.clone();
                    let rq = StartItemRq::new(launch, root.name, root.ty, at);
                    self.client.start_item(None, rq)
                })
                .clone(),
        )
    }

    /// Handles the test run being finished: finishes every feature, the root
    /// item and the launch.
    pub(super) fn finished(&self, at: SystemTime) {
        if self.launch.finished.swap(true, Ordering::AcqRel) {
            tracing::debug!("launch is finished already");
            return;
        }
        let launch = self.launch(at);

        for uri in self.contexts.feature_uris() {
            // Feature ends with its last scenario, falling back to the end of
            // the run if none of its scenarios has finished.
            let end = self.contexts.feature_end(&uri).unwrap_or(at);
            let Some(feature) = self.contexts.remove_feature(&uri) else {
                continue;
            };
            match feature.item() {
                Some(id) => {
                    self.client.finish_item(id, FinishExecutionRq::new(end));
                }
                None => tracing::error!(
                    %uri,
                    "internal bug: finishing a feature which was never \
                     started"
                ),
            }
            self.hierarchy.finished(Node::Feature { uri: &uri });
            self.sources.remove(&uri);
        }

        if let Some(root) = self.launch.root.get() {
            self.client.finish_item(root, FinishExecutionRq::new(at));
        }
        self.client.finish_launch(&launch, FinishExecutionRq::new(at));
        tracing::debug!(%launch, "launch finished");
    }

    /// Builds the request starting the launch.
    fn launch_rq(&self, start_time: SystemTime) -> StartLaunchRq {
        let config = &self.config;

        let mut attributes = config.attributes.clone().into_inner();
        attributes.push(Attribute::system(
            "agent",
            concat!(env!("CARGO_PKG_NAME"), "|", env!("CARGO_PKG_VERSION")),
        ));
        attributes.push(Attribute::system("os", std::env::consts::OS));
        if let Some(mark) = config.skipped_issue {
            attributes
                .push(Attribute::system("skippedIssue", mark.to_string()));
        }

        StartLaunchRq {
            name: config.launch.clone(),
            description: config
                .description
                .clone()
                .filter(|d| !d.trim().is_empty()),
            start_time,
            mode: config.mode,
            attributes,
            rerun: config.rerun,
            rerun_of: config.rerun_of.clone().filter(|id| !id.is_empty()),
        }
    }
}
