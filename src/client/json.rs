// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [JSON Lines][1] output of reporting [`Call`]s.
//!
//! [1]: https://jsonlines.org

use std::{
    io,
    sync::{Mutex, PoisonError},
    time::SystemTime,
};

use base64::Engine as _;
use serde::Serializer;

use super::{Call, Local, Sink};

/// [`Sink`] writing every [`Call`] as a single line of JSON into an
/// [`io::Write`] implementor.
#[derive(Debug)]
pub struct Lines<Out>(Mutex<Out>);

impl<Out: io::Write + Send> Sink for Lines<Out> {
    fn accept(&self, call: Call) {
        let mut out = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        let res = serde_json::to_writer(&mut *out, &call)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(e) = res {
            tracing::warn!(error = %e, "failed to write reporting call");
        }
    }
}

/// [`Client`] writing every [`Call`] as a line of JSON.
///
/// [`Client`]: super::Client
pub type JsonLines<Out> = Local<Lines<Out>>;

impl<Out: io::Write + Send> Local<Lines<Out>> {
    /// Creates a new [`JsonLines`] client writing into the given `output`.
    #[must_use]
    pub fn json_lines(output: Out) -> Self {
        Self::new(Lines(Mutex::new(output)))
    }

    /// Flushes and unwraps the output of this [`JsonLines`] client.
    ///
    /// # Errors
    ///
    /// If flushing the output fails.
    pub fn into_output(self) -> io::Result<Out> {
        let mut out = self
            .into_sink()
            .0
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        out.flush()?;
        Ok(out)
    }
}

/// Serializes a [`SystemTime`] as an [RFC 3339][1] timestamp with millisecond
/// precision.
///
/// [1]: https://www.rfc-editor.org/rfc/rfc3339
pub(crate) fn rfc3339<S: Serializer>(
    time: &SystemTime,
    ser: S,
) -> Result<S::Ok, S::Error> {
    ser.collect_str(&humantime::format_rfc3339_millis(*time))
}

/// Serializes raw bytes as a [`base64`] string.
pub(crate) fn base64_bytes<S: Serializer>(
    data: &[u8],
    ser: S,
) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}
