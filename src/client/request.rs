// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Request types of the reporting service.

use std::time::SystemTime;

use derive_more::with_trait::Display;

use super::{ItemId, LaunchId};

#[cfg(feature = "output-json")]
use super::json::{base64_bytes, rfc3339};

/// Type of a report item.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "output-json",
    derive(serde::Serialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ItemType {
    /// Top-level grouping item.
    #[display("SUITE")]
    Suite,

    /// Test grouping item.
    #[display("TEST")]
    Test,

    /// Leaf test method.
    #[display("STEP")]
    Step,

    /// Hook running before a test.
    #[display("BEFORE_TEST")]
    BeforeTest,

    /// Hook running after a test.
    #[display("AFTER_TEST")]
    AfterTest,

    /// Hook running before a test method.
    #[display("BEFORE_METHOD")]
    BeforeMethod,

    /// Hook running after a test method.
    #[display("AFTER_METHOD")]
    AfterMethod,
}

/// Final status of a report item.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "output-json",
    derive(serde::Serialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ItemStatus {
    /// Item passed.
    #[display("PASSED")]
    Passed,

    /// Item failed.
    #[display("FAILED")]
    Failed,

    /// Item was skipped.
    #[display("SKIPPED")]
    Skipped,
}

/// Level of a log entry.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "output-json",
    derive(serde::Serialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum LogLevel {
    /// Error entry.
    #[display("ERROR")]
    Error,

    /// Warning entry.
    #[display("WARN")]
    Warn,

    /// Informational entry.
    #[display("INFO")]
    Info,

    /// Debugging entry.
    #[display("DEBUG")]
    Debug,

    /// Tracing entry.
    #[display("TRACE")]
    Trace,

    /// Entry of unknown severity, used for attachments.
    #[display("UNKNOWN")]
    Unknown,
}

/// Mode of a launch.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, clap::ValueEnum)]
#[cfg_attr(
    feature = "output-json",
    derive(serde::Serialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum LaunchMode {
    /// Launch is visible to everyone.
    #[default]
    #[display("DEFAULT")]
    Default,

    /// Launch is visible in debug mode only.
    #[display("DEBUG")]
    Debug,
}

/// Key-value attribute of a launch or an item.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "output-json", derive(serde::Serialize))]
pub struct Attribute {
    /// Optional key of this [`Attribute`].
    pub key: Option<String>,

    /// Value of this [`Attribute`].
    pub value: String,

    /// Indicates a system attribute, hidden from users.
    pub system: bool,
}

impl Attribute {
    /// Creates a keyless [`Attribute`], like a tag.
    #[must_use]
    pub fn tag(value: impl Into<String>) -> Self {
        Self { key: None, value: value.into(), system: false }
    }

    /// Creates a keyed [`Attribute`].
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: Some(key.into()), value: value.into(), system: false }
    }

    /// Creates a keyed system [`Attribute`].
    #[must_use]
    pub fn system(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { system: true, ..Self::new(key, value) }
    }
}

/// Named parameter of a parametrized item.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "output-json", derive(serde::Serialize))]
pub struct Parameter {
    /// Name or type of this [`Parameter`].
    pub key: String,

    /// Value of this [`Parameter`].
    pub value: String,
}

/// Binary file attached to a log entry.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "output-json", derive(serde::Serialize))]
pub struct Attachment {
    /// Optional file name.
    pub name: Option<String>,

    /// MIME type of the `data`.
    pub content_type: String,

    /// Raw bytes.
    #[cfg_attr(feature = "output-json", serde(serialize_with = "base64_bytes"))]
    pub data: Vec<u8>,
}

/// Request to start a launch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "output-json", derive(serde::Serialize))]
pub struct StartLaunchRq {
    /// Name of the launch.
    pub name: String,

    /// Description of the launch.
    pub description: Option<String>,

    /// Time the launch has started at.
    #[cfg_attr(feature = "output-json", serde(serialize_with = "rfc3339"))]
    pub start_time: SystemTime,

    /// Visibility mode of the launch.
    pub mode: LaunchMode,

    /// Attributes of the launch.
    pub attributes: Vec<Attribute>,

    /// Indicates a rerun of the last launch with the same name.
    pub rerun: bool,

    /// Id of the launch this one reruns.
    pub rerun_of: Option<String>,
}

/// Request to start a report item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "output-json", derive(serde::Serialize))]
pub struct StartItemRq {
    /// Launch the item belongs to.
    pub launch: LaunchId,

    /// Name of the item.
    pub name: String,

    /// Description of the item.
    pub description: Option<String>,

    /// Stable reference to the item's source.
    pub code_ref: Option<String>,

    /// Identity of the item across launches.
    pub test_case_id: Option<String>,

    /// Type of the item.
    #[cfg_attr(feature = "output-json", serde(rename = "type"))]
    pub ty: ItemType,

    /// Attributes of the item.
    pub attributes: Vec<Attribute>,

    /// Parameters of the item.
    pub parameters: Vec<Parameter>,

    /// Indicates whether the item counts toward statistics.
    pub has_stats: bool,

    /// Time the item has started at.
    #[cfg_attr(feature = "output-json", serde(serialize_with = "rfc3339"))]
    pub start_time: SystemTime,
}

impl StartItemRq {
    /// Creates a new [`StartItemRq`] counting toward statistics, with no
    /// optional fields set.
    #[must_use]
    pub fn new(
        launch: LaunchId,
        name: impl Into<String>,
        ty: ItemType,
        start_time: SystemTime,
    ) -> Self {
        Self {
            launch,
            name: name.into(),
            description: None,
            code_ref: None,
            test_case_id: None,
            ty,
            attributes: vec![],
            parameters: vec![],
            has_stats: true,
            start_time,
        }
    }
}

/// Request to finish a launch or a report item.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "output-json", derive(serde::Serialize))]
pub struct FinishExecutionRq {
    /// Time the execution has finished at.
    #[cfg_attr(feature = "output-json", serde(serialize_with = "rfc3339"))]
    pub end_time: SystemTime,

    /// Final status. If absent, the service derives it from children.
    pub status: Option<ItemStatus>,
}

impl FinishExecutionRq {
    /// Creates a new [`FinishExecutionRq`] leaving the status to the service.
    #[must_use]
    pub const fn new(end_time: SystemTime) -> Self {
        Self { end_time, status: None }
    }

    /// Creates a new [`FinishExecutionRq`] with the given `status`.
    #[must_use]
    pub const fn with_status(end_time: SystemTime, status: ItemStatus) -> Self {
        Self { end_time, status: Some(status) }
    }
}

/// Request to save a log entry.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "output-json", derive(serde::Serialize))]
pub struct LogRq {
    /// Item the entry belongs to.
    pub item: ItemId,

    /// Text of the entry.
    pub message: String,

    /// Severity of the entry.
    pub level: LogLevel,

    /// Time the entry was produced at.
    #[cfg_attr(feature = "output-json", serde(serialize_with = "rfc3339"))]
    pub time: SystemTime,

    /// Attached file, if any.
    pub attachment: Option<Attachment>,
}

impl LogRq {
    /// Creates a new textual [`LogRq`].
    #[must_use]
    pub fn new(
        item: ItemId,
        message: impl Into<String>,
        level: LogLevel,
        time: SystemTime,
    ) -> Self {
        Self { item, message: message.into(), level, time, attachment: None }
    }
}
