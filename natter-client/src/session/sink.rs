//! Event sink trait and utilities

use tokio::sync::mpsc;

use super::event::SessionEvent;

/// Receiver of every display event a session produces
///
/// Called from the owner's task and from the receive task, so
/// implementations must be thread-safe. `notify` must hand the event off
/// and return; the receive loop never waits on the display.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: SessionEvent);
}

/// Sink that posts events to an unbounded channel
///
/// This is the "post to owner's execution context" hand-off: the owner
/// drains the receiver wherever it renders.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn notify(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Event receiver dropped, discarding event");
        }
    }
}

/// Simple callback-based sink
pub struct CallbackSink<F>
where
    F: Fn(SessionEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: Fn(SessionEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> EventSink for CallbackSink<F>
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn notify(&self, event: SessionEvent) {
        (self.callback)(event);
    }
}
