// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Outbound contract of a reporting service.
//!
//! A [`Client`] hands out ids synchronously, while the actual transport may
//! happen later: the [`Reporter`] never waits for the service. The only
//! ordering it relies on is that a child item is started after the call
//! starting its parent has been issued.
//!
//! Provided implementations:
//! - [`Recorder`]: keeps every [`Call`] in memory;
//! - [`Channel`]: queues every [`Call`] for an asynchronous consumer;
//! - [`JsonLines`]: writes every [`Call`] as a line of JSON (requires the
//!   `output-json` feature).
//!
//! [`Reporter`]: crate::Reporter

#[cfg(feature = "output-json")]
pub mod json;
pub mod local;
pub mod request;

use std::sync::Arc;

use derive_more::with_trait::{Display, From};

#[cfg(feature = "output-json")]
#[doc(inline)]
pub use self::json::JsonLines;
#[doc(inline)]
pub use self::{
    local::{Channel, Local, Memory, Recorder, Sink},
    request::{
        Attachment, Attribute, FinishExecutionRq, ItemStatus, ItemType,
        LaunchMode, LogLevel, LogRq, Parameter, StartItemRq, StartLaunchRq,
    },
};

/// Opaque id of a launch.
#[derive(Clone, Debug, Display, Eq, From, Hash, PartialEq)]
#[cfg_attr(
    feature = "output-json",
    derive(serde::Serialize),
    serde(transparent)
)]
pub struct LaunchId(Arc<str>);

/// Opaque id of a report item.
#[derive(Clone, Debug, Display, Eq, From, Hash, PartialEq)]
#[cfg_attr(
    feature = "output-json",
    derive(serde::Serialize),
    serde(transparent)
)]
pub struct ItemId(Arc<str>);

impl LaunchId {
    /// Returns this id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ItemId {
    /// Returns this id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LaunchId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for LaunchId {
    fn from(id: String) -> Self {
        Self(id.into())
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id.into())
    }
}

/// Reporting service accepting launches, items and logs.
pub trait Client: Send + Sync {
    /// Starts a new launch.
    fn start_launch(&self, rq: StartLaunchRq) -> LaunchId;

    /// Finishes the given launch.
    fn finish_launch(&self, launch: &LaunchId, rq: FinishExecutionRq);

    /// Starts a new item under the given `parent`, or at the top level of
    /// the launch.
    fn start_item(&self, parent: Option<&ItemId>, rq: StartItemRq) -> ItemId;

    /// Finishes the given item.
    fn finish_item(&self, item: &ItemId, rq: FinishExecutionRq);

    /// Saves a log entry.
    fn log(&self, rq: LogRq);
}

impl<C: Client + ?Sized> Client for &C {
    fn start_launch(&self, rq: StartLaunchRq) -> LaunchId {
        (**self).start_launch(rq)
    }

    fn finish_launch(&self, launch: &LaunchId, rq: FinishExecutionRq) {
        (**self).finish_launch(launch, rq);
    }

    fn start_item(&self, parent: Option<&ItemId>, rq: StartItemRq) -> ItemId {
        (**self).start_item(parent, rq)
    }

    fn finish_item(&self, item: &ItemId, rq: FinishExecutionRq) {
        (**self).finish_item(item, rq);
    }

    fn log(&self, rq: LogRq) {
        (**self).log(rq);
    }
}

impl<C: Client + ?Sized> Client for Arc<C> {
    fn start_launch(&self, rq: StartLaunchRq) -> LaunchId {
        (**self).start_launch(rq)
    }

    fn finish_launch(&self, launch: &LaunchId, rq: FinishExecutionRq) {
        (**self).finish_launch(launch, rq);
    }

    fn start_item(&self, parent: Option<&ItemId>, rq: StartItemRq) -> ItemId {
        (**self).start_item(parent, rq)
    }

    fn finish_item(&self, item: &ItemId, rq: FinishExecutionRq) {
        (**self).finish_item(item, rq);
    }

    fn log(&self, rq: LogRq) {
        (**self).log(rq);
    }
}

/// Single call issued to a [`Client`], with the id it was answered with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "output-json",
    derive(serde::Serialize),
    serde(tag = "call", rename_all = "snake_case")
)]
pub enum Call {
    /// [`Client::start_launch()`] call.
    StartLaunch {
        /// Allocated id.
        id: LaunchId,

        /// Request.
        rq: StartLaunchRq,
    },

    /// [`Client::finish_launch()`] call.
    FinishLaunch {
        /// Finished launch.
        id: LaunchId,

        /// Request.
        rq: FinishExecutionRq,
    },

    /// [`Client::start_item()`] call.
    StartItem {
        /// Allocated id.
        id: ItemId,

        /// Parent item, if any.
        parent: Option<ItemId>,

        /// Request.
        rq: StartItemRq,
    },

    /// [`Client::finish_item()`] call.
    FinishItem {
        /// Finished item.
        id: ItemId,

        /// Request.
        rq: FinishExecutionRq,
    },

    /// [`Client::log()`] call.
    Log {
        /// Request.
        rq: LogRq,
    },
}

impl Call {
    /// Returns the started item's request, if this is a
    /// [`Call::StartItem`].
    #[must_use]
    pub const fn as_start_item(&self) -> Option<&StartItemRq> {
        match self {
            Self::StartItem { rq, .. } => Some(rq),
            Self::StartLaunch { .. }
            | Self::FinishLaunch { .. }
            | Self::FinishItem { .. }
            | Self::Log { .. } => None,
        }
    }

    /// Returns the log request, if this is a [`Call::Log`].
    #[must_use]
    pub const fn as_log(&self) -> Option<&LogRq> {
        match self {
            Self::Log { rq } => Some(rq),
            Self::StartLaunch { .. }
            | Self::FinishLaunch { .. }
            | Self::StartItem { .. }
            | Self::FinishItem { .. } => None,
        }
    }
}
