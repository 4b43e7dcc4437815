//! Bounded MPMC queue of optional quotes, one per time bucket, built on
//! `crossbeam_channel::bounded` with this pipeline's sentinel convention: a
//! lone `None` marks end-of-stream, replacing any notion of closing the
//! channel.

use crate::types::Quote;
use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// One bucket's channel: a bounded queue of `Option<Quote>` shared by every
/// mapper that can route to it and the single reducer that drains it.
#[derive(Clone)]
pub struct QuoteChannel {
    tx: Sender<Option<Quote>>,
    rx: Receiver<Option<Quote>>,
}

impl QuoteChannel {
    /// A new channel with the given bounded capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        QuoteChannel { tx, rx }
    }

    /// Enqueue a quote, blocking while the channel is full.
    pub fn enqueue(&self, value: Option<Quote>) {
        // A closed receiver would mean every reducer has already exited,
        // which cannot happen before the sentinel is posted.
        let _ = self.tx.send(value);
    }

    /// Non-blocking dequeue: `None` if the channel is empty right now,
    /// `Some(None)` for the sentinel, `Some(Some(quote))` for a record.
    pub fn try_dequeue(&self) -> Option<Option<Quote>> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}
