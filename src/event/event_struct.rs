// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Timestamped event wrapper.

use std::time::SystemTime;

use derive_more::with_trait::{AsRef, Deref, DerefMut};

/// Arbitrary event paired with the time it has happened at.
///
/// All the report item times are taken from here rather than from the
/// moment an [`Event`] is handled, so events may be replayed.
#[derive(AsRef, Clone, Copy, Debug, Deref, DerefMut)]
#[non_exhaustive]
pub struct Event<T: ?Sized> {
    /// [`SystemTime`] when this [`Event`] has happened.
    pub at: SystemTime,

    /// Actual value of this [`Event`].
    #[as_ref]
    #[deref]
    #[deref_mut]
    pub value: T,
}

impl<T> Event<T> {
    /// Creates a new [`Event`] out of the given `value`, happened right now.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::new_at(SystemTime::now(), value)
    }

    /// Creates a new [`Event`] out of the given `value`, happened `at` the
    /// given time.
    #[must_use]
    pub const fn new_at(at: SystemTime, value: T) -> Self {
        Self { at, value }
    }

    /// Unwraps the inner [`Event::value`] loosing all the attached metadata.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Splits this [`Event`] to the inner [`Event::value`] and its detached
    /// metadata.
    #[must_use]
    pub fn split(self) -> (T, Metadata) {
        self.replace(())
    }

    /// Replaces the inner [`Event::value`] with the given one, dropping the old
    /// one in place.
    #[must_use]
    pub fn insert<V>(self, value: V) -> Event<V> {
        self.replace(value).1
    }

    /// Maps the inner [`Event::value`] with the given function.
    #[must_use]
    pub fn map<V>(self, f: impl FnOnce(T) -> V) -> Event<V> {
        let (val, meta) = self.split();
        meta.insert(f(val))
    }

    /// Replaces the inner [`Event::value`] with the given one, returning the
    /// old one along.
    #[must_use]
    pub fn replace<V>(self, value: V) -> (T, Event<V>) {
        let event = Event { at: self.at, value };
        (self.value, event)
    }
}

/// Shortcut for a detached metadata of an arbitrary [`Event`].
pub type Metadata = Event<()>;

impl Metadata {
    /// Wraps the given `value` with this [`Event`] metadata.
    #[must_use]
    pub fn wrap<V>(self, value: V) -> Event<V> {
        self.replace(value).1
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn split_keeps_timestamp() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
        let (value, meta) = Event::new_at(at, "write").split();

        assert_eq!(value, "write");
        assert_eq!(meta.at, at);
        assert_eq!(meta.wrap(7).at, at);
    }

    #[test]
    fn map_keeps_timestamp() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1);
        let ev = Event::new_at(at, 2).map(|v| v * 21);

        assert_eq!(*ev, 42);
        assert_eq!(ev.at, at);
    }
}
