//! Bounded tap queue.
//!
//! The input thread offers taps without blocking; once the queue is full,
//! further taps are silently dropped. The render thread polls at most one tap
//! per frame.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use crate::tracking::Tap;

/// Create a connected sender/receiver pair holding at most `capacity` taps.
pub fn tap_queue(capacity: usize) -> (TapSender, TapReceiver) {
    // A zero-capacity sync_channel is a rendezvous channel, which would drop
    // every tap offered while the render thread is busy.
    let (sender, receiver) = mpsc::sync_channel(capacity.max(1));
    (TapSender { sender }, TapReceiver { receiver })
}

/// Input-thread side. Cheap to clone.
#[derive(Clone)]
pub struct TapSender {
    sender: SyncSender<Tap>,
}

impl TapSender {
    /// Enqueue a tap. Returns `false` if it was dropped (queue full or the
    /// render side is gone).
    pub fn offer(&self, tap: Tap) -> bool {
        match self.sender.try_send(tap) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Render-thread side.
pub struct TapReceiver {
    receiver: Receiver<Tap>,
}

impl TapReceiver {
    /// Take the oldest pending tap, if any.
    pub fn poll(&self) -> Option<Tap> {
        match self.receiver.try_recv() {
            Ok(tap) => Some(tap),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
