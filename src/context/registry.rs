// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of running features and scenarios.

use std::{sync::Arc, thread::ThreadId, time::SystemTime};

use dashmap::{mapref::entry::Entry, DashMap};

use super::{FeatureContext, OutlineIterations, ScenarioContext};
use crate::error::{Error, Result};

/// Concurrent registry of [`FeatureContext`]s and [`ScenarioContext`]s of a
/// single run.
///
/// Every mutation is an atomic get-or-create or remove, never a separate
/// read followed by a write. Creation callbacks run while the entry is
/// locked, so reporting an item inside them happens at most once per key.
/// Creation callbacks must not create or remove contexts themselves.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    /// Running features keyed by their URIs.
    features: DashMap<String, Arc<FeatureContext>>,

    /// Running scenarios keyed by their line and feature URI.
    scenarios: DashMap<(usize, String), Arc<ScenarioContext>>,

    /// Scenario currently being stepped through on each thread.
    current: DashMap<ThreadId, Arc<ScenarioContext>>,

    /// Latest time a scenario of each feature has finished at.
    feature_ends: DashMap<String, SystemTime>,

    /// Memoized outline iteration numbers.
    outlines: OutlineIterations,
}

impl ContextRegistry {
    /// Creates a new empty [`ContextRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`FeatureContext`] of the given `uri`, creating it with
    /// the `create` callback if there is none.
    ///
    /// # Errors
    ///
    /// If the `create` callback errors. Nothing is registered then.
    pub fn get_or_create_feature(
        &self,
        uri: &str,
        create: impl FnOnce() -> Result<FeatureContext>,
    ) -> Result<Arc<FeatureContext>> {
        if let Some(ctx) = self.features.get(uri) {
            return Ok(Arc::clone(&ctx));
        }
        Ok(match self.features.entry(uri.to_owned()) {
            Entry::Occupied(e) => Arc::clone(e.get()),
            Entry::Vacant(e) => {
                Arc::clone(e.insert(Arc::new(create()?)).value())
            }
        })
    }

    /// Returns the [`ScenarioContext`] at the given `uri` and `line`,
    /// creating it with the `create` callback if there is none, and
    /// [enters][ScenarioContext::enter] it.
    ///
    /// The returned flag indicates whether the context has been created by
    /// this call.
    ///
    /// # Errors
    ///
    /// If the `create` callback errors. Nothing is registered then.
    pub fn get_or_create_scenario(
        &self,
        uri: &str,
        line: usize,
        create: impl FnOnce() -> Result<ScenarioContext>,
    ) -> Result<(Arc<ScenarioContext>, bool)> {
        Ok(match self.scenarios.entry((line, uri.to_owned())) {
            Entry::Occupied(e) => {
                e.get().enter();
                (Arc::clone(e.get()), false)
            }
            Entry::Vacant(e) => {
                let ctx = Arc::new(create()?);
                ctx.enter();
                _ = e.insert(Arc::clone(&ctx));
                (ctx, true)
            }
        })
    }

    /// Returns the running [`ScenarioContext`] at the given `uri` and `line`.
    ///
    /// # Errors
    ///
    /// [`Error::UnregisteredScenario`] if no such scenario is running.
    pub fn scenario(
        &self,
        uri: &str,
        line: usize,
    ) -> Result<Arc<ScenarioContext>> {
        self.scenarios
            .get(&(line, uri.to_owned()))
            .map(|ctx| Arc::clone(&ctx))
            .ok_or_else(|| Error::UnregisteredScenario {
                uri: uri.to_owned(),
                line,
            })
    }

    /// [Leaves][ScenarioContext::leave] the running [`ScenarioContext`] at
    /// the given `uri` and `line`, removing and returning it if no runtime
    /// test case of it is left running.
    ///
    /// # Errors
    ///
    /// [`Error::UnregisteredScenario`] if no such scenario is running.
    pub fn leave_scenario(
        &self,
        uri: &str,
        line: usize,
    ) -> Result<Option<Arc<ScenarioContext>>> {
        let key = (line, uri.to_owned());
        if let Some((_, ctx)) = self.scenarios.remove_if(&key, |_, c| c.leave())
        {
            return Ok(Some(ctx));
        }
        if self.scenarios.contains_key(&key) {
            Ok(None)
        } else {
            Err(Error::UnregisteredScenario { uri: key.1, line })
        }
    }

    /// Binds the given [`ScenarioContext`] as the current one of the
    /// `thread`.
    pub fn bind_current(&self, thread: ThreadId, ctx: Arc<ScenarioContext>) {
        _ = self.current.insert(thread, ctx);
    }

    /// Returns the [`ScenarioContext`] currently bound to the `thread`.
    ///
    /// # Errors
    ///
    /// [`Error::NoActiveScenario`] if nothing is bound to the `thread`.
    pub fn current(&self, thread: ThreadId) -> Result<Arc<ScenarioContext>> {
        self.current
            .get(&thread)
            .map(|ctx| Arc::clone(&ctx))
            .ok_or(Error::NoActiveScenario)
    }

    /// Unbinds the current [`ScenarioContext`] of the `thread`, if any.
    pub fn unbind_current(&self, thread: ThreadId) {
        _ = self.current.remove(&thread);
    }

    /// Records that a scenario of the feature at the given `uri` has
    /// finished `at` the given time, keeping the latest one.
    pub fn record_feature_end(&self, uri: &str, at: SystemTime) {
        _ = self
            .feature_ends
            .entry(uri.to_owned())
            .and_modify(|end| *end = (*end).max(at))
            .or_insert(at);
    }

    /// Returns the latest time a scenario of the feature at the given `uri`
    /// has finished at, if any has.
    #[must_use]
    pub fn feature_end(&self, uri: &str) -> Option<SystemTime> {
        self.feature_ends.get(uri).map(|end| *end)
    }

    /// Removes the [`FeatureContext`] of the given `uri`, along with its
    /// bookkeeping.
    pub fn remove_feature(&self, uri: &str) -> Option<Arc<FeatureContext>> {
        _ = self.feature_ends.remove(uri);
        self.outlines.forget(uri);
        self.features.remove(uri).map(|(_, ctx)| ctx)
    }

    /// Returns URIs of all the registered features.
    #[must_use]
    pub fn feature_uris(&self) -> Vec<String> {
        self.features.iter().map(|e| e.key().clone()).collect()
    }

    /// Memoized outline iteration numbers.
    #[must_use]
    pub const fn outlines(&self) -> &OutlineIterations {
        &self.outlines
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    use super::*;
    use crate::event::TestCase;

    const FEATURE: &str = "\
Feature: Registry
  Scenario: one
    Given a step
";

    fn feature() -> FeatureContext {
        let f = gherkin::Feature::parse(FEATURE, gherkin::GherkinEnv::default())
            .unwrap();
        FeatureContext::new("r.feature", FEATURE, f)
    }

    #[test]
    fn creates_feature_once_under_race() {
        let registry = ContextRegistry::new();
        let created = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                _ = s.spawn(|| {
                    registry
                        .get_or_create_feature("r.feature", || {
                            _ = created.fetch_add(1, Ordering::SeqCst);
                            Ok(feature())
                        })
                        .unwrap()
                });
            }
        });

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(registry.feature_uris(), ["r.feature"]);
    }

    #[test]
    fn failed_creation_registers_nothing() {
        let registry = ContextRegistry::new();

        let res = registry.get_or_create_feature("r.feature", || {
            Err(Error::UnknownSource { uri: "r.feature".into() })
        });

        assert!(res.is_err());
        assert!(registry.feature_uris().is_empty());
    }

    #[test]
    fn reuses_open_scenario() {
        let registry = ContextRegistry::new();
        let feature = Arc::new(feature());
        let case = TestCase::new("r.feature", 2, "one");
        let create = || feature.scenario_context(&case, registry.outlines());

        let (first, created) =
            registry.get_or_create_scenario("r.feature", 2, create).unwrap();
        assert!(created);
        let (second, created) =
            registry.get_or_create_scenario("r.feature", 2, create).unwrap();
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));

        assert!(registry.scenario("r.feature", 2).is_ok());
        assert!(registry.leave_scenario("r.feature", 2).unwrap().is_none());
        assert!(registry.leave_scenario("r.feature", 2).unwrap().is_some());
        assert_eq!(
            registry.scenario("r.feature", 2).unwrap_err(),
            Error::UnregisteredScenario { uri: "r.feature".into(), line: 2 },
        );
        assert!(registry.leave_scenario("r.feature", 2).is_err());
    }

    #[test]
    fn binds_current_per_thread() {
        let registry = ContextRegistry::new();
        let feature = Arc::new(feature());
        let case = TestCase::new("r.feature", 2, "one");
        let ctx = Arc::new(
            feature.scenario_context(&case, registry.outlines()).unwrap(),
        );

        registry.bind_current(thread::current().id(), ctx);

        assert!(registry.current(thread::current().id()).is_ok());
        thread::scope(|s| {
            let other = s.spawn(|| registry.current(thread::current().id()));
            assert_eq!(
                other.join().unwrap().unwrap_err(),
                Error::NoActiveScenario,
            );
        });

        registry.unbind_current(thread::current().id());
        assert!(registry.current(thread::current().id()).is_err());
    }

    #[test]
    fn keeps_latest_feature_end() {
        let registry = ContextRegistry::new();
        let at = |s| SystemTime::UNIX_EPOCH + Duration::from_secs(s);

        registry.record_feature_end("r.feature", at(5));
        registry.record_feature_end("r.feature", at(9));
        registry.record_feature_end("r.feature", at(7));

        assert_eq!(registry.feature_end("r.feature"), Some(at(9)));
        assert_eq!(registry.feature_end("other.feature"), None);
    }
}
