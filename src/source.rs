// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of `.feature` sources read by a runner.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{Error, Result};

/// Raw `.feature` sources cached per URI, parsed into [`gherkin::Feature`]s
/// on demand.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    /// Raw texts keyed by the URI they were read from.
    sources: DashMap<String, Arc<str>>,
}

impl SourceRegistry {
    /// Creates a new empty [`SourceRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches the given `source` text for the `uri`, replacing the previous
    /// one, if any.
    pub fn insert(&self, uri: impl Into<String>, source: impl Into<Arc<str>>) {
        _ = self.sources.insert(uri.into(), source.into());
    }

    /// Indicates whether a source has been read for the given `uri`.
    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.sources.contains_key(uri)
    }

    /// Returns the raw source text read for the given `uri`, if any.
    #[must_use]
    pub fn get(&self, uri: &str) -> Option<Arc<str>> {
        self.sources.get(uri).map(|s| Arc::clone(&s))
    }

    /// Parses the source read for the given `uri`, returning it along with
    /// the raw text it was parsed from.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownSource`] if nothing has been read for the `uri`;
    /// - [`Error::Parse`] if the source is not a valid `.feature` file.
    pub fn parse(&self, uri: &str) -> Result<(Arc<str>, gherkin::Feature)> {
        let text = self
            .get(uri)
            .ok_or_else(|| Error::UnknownSource { uri: uri.to_owned() })?;

        let feature =
            gherkin::Feature::parse(&*text, gherkin::GherkinEnv::default())
                .map_err(|e| Error::Parse {
                    uri: uri.to_owned(),
                    message: e.to_string(),
                })?;
        Ok((text, feature))
    }

    /// Forgets the source read for the given `uri`.
    pub fn remove(&self, uri: &str) {
        _ = self.sources.remove(uri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURE: &str = "\
Feature: Basic
  Scenario: first
    Given a step
";

    #[test]
    fn parses_read_source() {
        let sources = SourceRegistry::new();
        sources.insert("a.feature", FEATURE);

        let (text, feature) = sources.parse("a.feature").unwrap();

        assert_eq!(&*text, FEATURE);
        assert_eq!(feature.name, "Basic");
        assert_eq!(feature.scenarios.len(), 1);
        assert_eq!(feature.scenarios[0].position.line, 2);
    }

    #[test]
    fn errors_on_unknown_uri() {
        let sources = SourceRegistry::new();

        assert_eq!(
            sources.parse("missing.feature").unwrap_err(),
            Error::UnknownSource { uri: "missing.feature".into() },
        );
    }

    #[test]
    fn errors_on_invalid_source() {
        let sources = SourceRegistry::new();
        sources.insert("bad.feature", "this is not gherkin");

        assert!(matches!(
            sources.parse("bad.feature"),
            Err(Error::Parse { uri, .. }) if uri == "bad.feature",
        ));
    }

    #[test]
    fn latest_source_wins() {
        let sources = SourceRegistry::new();
        sources.insert("a.feature", "Feature: Old\n");
        sources.insert("a.feature", FEATURE);

        assert_eq!(sources.parse("a.feature").unwrap().1.name, "Basic");

        sources.remove("a.feature");
        assert!(!sources.contains("a.feature"));
    }
}
