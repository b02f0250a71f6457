// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Client`]s allocating ids locally and forwarding [`Call`]s to a [`Sink`].

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, PoisonError,
};

use futures::channel::mpsc;

use super::{
    Call, Client, FinishExecutionRq, ItemId, LaunchId, LogRq, StartItemRq,
    StartLaunchRq,
};

/// Destination of [`Call`]s issued to a [`Local`] client.
pub trait Sink: Send + Sync {
    /// Accepts the next [`Call`], in issuing order.
    fn accept(&self, call: Call);
}

/// [`Client`] allocating sequential ids by itself and forwarding every
/// [`Call`] to its [`Sink`].
#[derive(Debug, Default)]
pub struct Local<S> {
    /// Number of allocated [`LaunchId`]s.
    launches: AtomicUsize,

    /// Number of allocated [`ItemId`]s.
    items: AtomicUsize,

    /// Destination of [`Call`]s.
    sink: S,
}

impl<S> Local<S> {
    /// Creates a new [`Local`] client forwarding to the given [`Sink`].
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self { launches: AtomicUsize::new(0), items: AtomicUsize::new(0), sink }
    }

    /// Returns the [`Sink`] of this client.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Unwraps the [`Sink`] of this client.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: Sink> Client for Local<S> {
    fn start_launch(&self, rq: StartLaunchRq) -> LaunchId {
        let n = self.launches.fetch_add(1, Ordering::Relaxed) + 1;
        let id = LaunchId::from(format!("launch_{n}"));
        self.sink.accept(Call::StartLaunch { id: id.clone(), rq });
        id
    }

    fn finish_launch(&self, launch: &LaunchId, rq: FinishExecutionRq) {
        self.sink.accept(Call::FinishLaunch { id: launch.clone(), rq });
    }

    fn start_item(&self, parent: Option<&ItemId>, rq: StartItemRq) -> ItemId {
        let n = self.items.fetch_add(1, Ordering::Relaxed) + 1;
        let id = ItemId::from(format!("item_{n}"));
        self.sink.accept(Call::StartItem {
            id: id.clone(),
            parent: parent.cloned(),
            rq,
        });
        id
    }

    fn finish_item(&self, item: &ItemId, rq: FinishExecutionRq) {
        self.sink.accept(Call::FinishItem { id: item.clone(), rq });
    }

    fn log(&self, rq: LogRq) {
        self.sink.accept(Call::Log { rq });
    }
}

/// In-memory [`Sink`].
#[derive(Debug, Default)]
pub struct Memory(Mutex<Vec<Call>>);

impl Sink for Memory {
    fn accept(&self, call: Call) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }
}

/// [`Client`] recording every [`Call`] in memory.
pub type Recorder = Local<Memory>;

impl Local<Memory> {
    /// Returns all the [`Call`]s recorded so far, in issuing order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.sink.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Takes all the [`Call`]s recorded so far, leaving none.
    #[must_use]
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(
            &mut *self.sink.0.lock().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl Sink for mpsc::UnboundedSender<Call> {
    fn accept(&self, call: Call) {
        if let Err(e) = self.unbounded_send(call) {
            tracing::warn!(
                call = ?e.into_inner(),
                "reporting call dropped: receiver is gone"
            );
        }
    }
}

/// [`Client`] queueing every [`Call`] for an asynchronous consumer, which
/// performs the actual transport.
pub type Channel = Local<mpsc::UnboundedSender<Call>>;

impl Local<mpsc::UnboundedSender<Call>> {
    /// Creates a new [`Channel`] along with the receiving end of its queue.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Call>) {
        let (tx, rx) = mpsc::unbounded();
        (Self::new(tx), rx)
    }

    /// Closes the queue, so its consumer stream terminates once drained.
    pub fn close(&self) {
        self.sink.close_channel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use futures::StreamExt as _;

    use super::*;
    use crate::client::{ItemType, LaunchMode, LogLevel};

    fn launch_rq() -> StartLaunchRq {
        StartLaunchRq {
            name: "launch".into(),
            description: None,
            start_time: SystemTime::UNIX_EPOCH,
            mode: LaunchMode::Default,
            attributes: vec![],
            rerun: false,
            rerun_of: None,
        }
    }

    #[test]
    fn recorder_allocates_sequential_ids() {
        let client = Recorder::default();
        let launch = client.start_launch(launch_rq());
        let rq = StartItemRq::new(
            launch.clone(),
            "Feature: a",
            ItemType::Suite,
            SystemTime::UNIX_EPOCH,
        );
        let first = client.start_item(None, rq.clone());
        let second = client.start_item(Some(&first), rq);

        assert_eq!(launch.as_str(), "launch_1");
        assert_eq!(first.as_str(), "item_1");
        assert_eq!(second.as_str(), "item_2");

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(
            &calls[2],
            Call::StartItem { parent: Some(p), .. } if *p == first,
        ));
    }

    #[test]
    fn recorder_take_drains() {
        let client = Recorder::default();
        client.log(LogRq::new(
            "item_1".into(),
            "hello",
            LogLevel::Info,
            SystemTime::UNIX_EPOCH,
        ));

        assert_eq!(client.take().len(), 1);
        assert!(client.calls().is_empty());
    }

    #[test]
    fn channel_preserves_order() {
        let (client, rx) = Channel::channel();
        let launch = client.start_launch(launch_rq());
        let at = SystemTime::UNIX_EPOCH;
        let rq = StartItemRq::new(launch, "a", ItemType::Test, at);
        let item = client.start_item(None, rq);
        client.finish_item(&item, FinishExecutionRq::new(at));
        client.close();

        let calls = futures::executor::block_on(rx.collect::<Vec<_>>());
        assert!(matches!(calls[0], Call::StartLaunch { .. }));
        assert!(matches!(calls[1], Call::StartItem { .. }));
        assert!(matches!(calls[2], Call::FinishItem { .. }));
    }

    #[test]
    fn channel_tolerates_dropped_receiver() {
        let (client, rx) = Channel::channel();
        drop(rx);

        let id = client.start_launch(launch_rq());
        assert_eq!(id.as_str(), "launch_1");
    }
}
