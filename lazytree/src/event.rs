use flume::{
    Receiver, Sender, TryRecvError as FlumeTryRecvError, TrySendError,
};
use parking_lot::Mutex;

/// Notifications emitted while a tree session evolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeEvent<Id> {
    /// A new root sequence was installed and published.
    RootReplaced { revision: u64 },
    /// Children were attached under a known parent and published.
    ChildrenAttached { parent: Id, revision: u64 },
    /// Children arrived for an unknown parent and were parked.
    Orphaned { parent: Id },
    /// Parked batches were attached to parents that became known.
    Adopted { parents: Vec<Id> },
    /// The session was torn down; no further events follow.
    Closed,
}

/// Error returned when receiving from a channel fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChannelRecvError {
    #[error("event channel disconnected")]
    Disconnected,
}

/// Error returned when a non-blocking receive fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChannelTryRecvError {
    #[error("event channel empty")]
    Empty,
    #[error("event channel disconnected")]
    Disconnected,
}

pub type ChannelRecvResult<T> = std::result::Result<T, ChannelRecvError>;
pub type ChannelTryRecvResult<T> = std::result::Result<T, ChannelTryRecvError>;

/// Receiver for tree events with sync + async helpers.
///
/// Clones share one queue: each event is delivered to exactly one of them.
/// Receiving fails with `Disconnected` once the loader is dropped and the
/// queue is empty.
#[derive(Clone, Debug)]
pub struct TreeEvents<Id> {
    receiver: Receiver<TreeEvent<Id>>,
}

impl<Id> TreeEvents<Id> {
    /// Blocking receive.
    pub fn recv(&self) -> ChannelRecvResult<TreeEvent<Id>> {
        self.receiver
            .recv()
            .map_err(|_| ChannelRecvError::Disconnected)
    }

    /// Async receive.
    pub async fn recv_async(&self) -> ChannelRecvResult<TreeEvent<Id>> {
        self.receiver
            .recv_async()
            .await
            .map_err(|_| ChannelRecvError::Disconnected)
    }

    /// Non-blocking receive.
    pub fn try_recv(&self) -> ChannelTryRecvResult<TreeEvent<Id>> {
        self.receiver.try_recv().map_err(map_try_recv_error)
    }

    /// Drain every event currently queued.
    pub fn drain(&self) -> Vec<TreeEvent<Id>> {
        self.receiver.drain().collect()
    }
}

/// Sending half owned by the loader. Never blocks.
///
/// Every subscriber gets its own queue and sees only events emitted after
/// it subscribed. Queues whose receivers are gone are pruned on emit.
#[derive(Debug)]
pub(crate) struct EventSink<Id> {
    capacity: Option<usize>,
    subscribers: Mutex<Vec<Sender<TreeEvent<Id>>>>,
}

impl<Id: Clone + std::fmt::Debug> EventSink<Id> {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(&self) -> TreeEvents<Id> {
        let (sender, receiver) = match self.capacity {
            Some(cap) => flume::bounded(cap),
            None => flume::unbounded(),
        };
        self.subscribers.lock().push(sender);
        TreeEvents { receiver }
    }

    pub(crate) fn emit(&self, event: TreeEvent<Id>) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::trace!("subscriber queue full, dropping {event:?}");
                true
            },
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

fn map_try_recv_error(err: FlumeTryRecvError) -> ChannelTryRecvError {
    match err {
        FlumeTryRecvError::Empty => ChannelTryRecvError::Empty,
        FlumeTryRecvError::Disconnected => ChannelTryRecvError::Disconnected,
    }
}
