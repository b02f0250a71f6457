// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Best-effort [MIME] classification of embedded data.
//!
//! [MIME]: https://developer.mozilla.org/docs/Web/HTTP/Basics_of_HTTP/MIME_types

use mime::Mime;

/// Known signatures of binary formats.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
];

/// Classifies the given embedded `data`.
///
/// Recognized binary signatures take precedence over the `declared` type, as
/// runners often declare screenshots generically. Otherwise, the `declared`
/// type is used if valid. Unclassifiable data falls back to
/// [`mime::TEXT_PLAIN`] if it's valid UTF-8, or to
/// [`mime::APPLICATION_OCTET_STREAM`].
#[must_use]
pub fn classify(declared: &str, data: &[u8]) -> Mime {
    if let Some(sniffed) = sniff(data) {
        return sniffed;
    }
    if let Ok(m) = declared.trim().parse::<Mime>() {
        return m;
    }

    let fallback = if std::str::from_utf8(data).is_ok() {
        mime::TEXT_PLAIN
    } else {
        mime::APPLICATION_OCTET_STREAM
    };
    tracing::warn!(
        declared,
        fallback = %fallback,
        "MIME type of embedded data not found"
    );
    fallback
}

/// Returns the text of a log entry carrying an attachment of the given
/// [`Mime`]: its top-level type, like `image`.
#[must_use]
pub fn message(mime: &Mime) -> String {
    mime.type_().as_str().to_owned()
}

/// Detects [`Mime`] of the `data` by its leading bytes.
fn sniff(data: &[u8]) -> Option<Mime> {
    SIGNATURES
        .iter()
        .find(|(sig, _)| data.starts_with(sig))
        .and_then(|(_, m)| m.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_wins_over_declared() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

        assert_eq!(classify("application/octet-stream", png), mime::IMAGE_PNG);
        assert_eq!(message(&classify("text/plain", png)), "image");
    }

    #[test]
    fn uses_declared_when_unrecognized() {
        let m = classify("application/json", br#"{"a": 1}"#);

        assert_eq!(m, mime::APPLICATION_JSON);
        assert_eq!(message(&m), "application");
    }

    #[test]
    fn falls_back_on_invalid_declared() {
        assert_eq!(classify("not a mime", b"plain words"), mime::TEXT_PLAIN);
        assert_eq!(
            classify("", &[0xc3, 0x28, 0xa0]),
            mime::APPLICATION_OCTET_STREAM,
        );
    }
}
