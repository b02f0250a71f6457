// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(missing_debug_implementations, missing_docs, unused_results)]

pub mod attachment;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod feature;
pub mod format;
pub mod hierarchy;
pub mod origin;
mod reporter;
pub mod source;
pub mod status;

pub use gherkin;

#[cfg(feature = "output-json")]
#[doc(inline)]
pub use self::client::JsonLines;
#[doc(inline)]
pub use self::{
    client::{Call, Channel, Client, ItemId, LaunchId, Recorder},
    config::Config,
    error::{Error, Result},
    event::{Cucumber, Event},
    hierarchy::{Aggregated, Flat, Hierarchy, Tree},
    origin::{CodeLocation, Origin, OriginResolver},
    reporter::Reporter,
};
