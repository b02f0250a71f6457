// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Mapping of runner [`Status`]es onto report statuses and log levels.

use dashmap::DashSet;

use crate::{
    client::{ItemStatus, LogLevel},
    event::Status,
};

/// Total mapping of runner [`Status`]es onto [`ItemStatus`]es.
///
/// [`Status::Pending`], [`Status::Ambiguous`] and [`Status::Undefined`] have
/// no report counterpart and degrade to [`ItemStatus::Skipped`], warning once
/// per [`Status`].
#[derive(Debug, Default)]
pub struct StatusMapping {
    /// Degraded [`Status`]es already warned about.
    warned: DashSet<Status>,
}

impl StatusMapping {
    /// Creates a new [`StatusMapping`] which hasn't warned yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the given runner [`Status`] onto an [`ItemStatus`].
    pub fn item_status(&self, status: Status) -> ItemStatus {
        match status {
            Status::Passed => ItemStatus::Passed,
            Status::Failed => ItemStatus::Failed,
            Status::Skipped => ItemStatus::Skipped,
            Status::Pending | Status::Ambiguous | Status::Undefined => {
                if self.warned.insert(status) {
                    tracing::warn!(
                        %status,
                        "runner status has no report counterpart, reporting \
                         it as `{}`",
                        ItemStatus::Skipped
                    );
                }
                ItemStatus::Skipped
            }
        }
    }
}

/// Returns the [`LogLevel`] to log an outcome of the given [`Status`] with.
#[must_use]
pub const fn log_level(status: Status) -> LogLevel {
    match status {
        Status::Passed => LogLevel::Info,
        Status::Failed => LogLevel::Error,
        Status::Skipped
        | Status::Pending
        | Status::Ambiguous
        | Status::Undefined => LogLevel::Warn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_status() {
        let mapping = StatusMapping::new();

        assert_eq!(mapping.item_status(Status::Passed), ItemStatus::Passed);
        assert_eq!(mapping.item_status(Status::Failed), ItemStatus::Failed);
        assert_eq!(mapping.item_status(Status::Skipped), ItemStatus::Skipped);
        for degraded in [Status::Pending, Status::Ambiguous, Status::Undefined]
        {
            assert_eq!(mapping.item_status(degraded), ItemStatus::Skipped);
        }
    }

    #[test]
    fn remembers_warned_statuses() {
        let mapping = StatusMapping::new();

        _ = mapping.item_status(Status::Undefined);
        _ = mapping.item_status(Status::Undefined);
        _ = mapping.item_status(Status::Passed);

        assert_eq!(mapping.warned.len(), 1);
        assert!(mapping.warned.contains(&Status::Undefined));
    }

    #[test]
    fn log_levels() {
        assert_eq!(log_level(Status::Passed), LogLevel::Info);
        assert_eq!(log_level(Status::Failed), LogLevel::Error);
        assert_eq!(log_level(Status::Ambiguous), LogLevel::Warn);
    }
}
