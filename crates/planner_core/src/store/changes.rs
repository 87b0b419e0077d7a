//! Publish/subscribe feed of store mutations.
//!
//! # Invariants
//! - Every subscriber receives every change published after it subscribed.
//! - Subscribers whose receiver was dropped are pruned on the next publish.

use crate::model::category::CategoryId;
use crate::model::note::NoteId;
use std::cell::RefCell;
use std::sync::mpsc::{channel, Receiver, Sender};

/// One successful store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    NoteCreated(NoteId),
    NoteUpdated(NoteId),
    NoteDeleted(NoteId),
    CategoryCreated(CategoryId),
    CategoryUpdated(CategoryId),
    /// Category removed after `detached_notes` notes lost their reference.
    CategoryDeleted {
        id: CategoryId,
        detached_notes: usize,
    },
    SettingChanged,
}

/// Fan-out of [`StoreChange`] values to any number of receivers.
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: RefCell<Vec<Sender<StoreChange>>>,
}

impl ChangeFeed {
    pub fn subscribe(&self) -> Receiver<StoreChange> {
        let (tx, rx) = channel();
        self.subscribers.borrow_mut().push(tx);
        rx
    }

    pub fn publish(&self, change: StoreChange) {
        self.subscribers
            .borrow_mut()
            .retain(|subscriber| subscriber.send(change).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// Drains everything queued on `receiver`, returning whether anything arrived.
pub fn drain_pending(receiver: &Receiver<StoreChange>) -> bool {
    let mut any = false;
    while receiver.try_recv().is_ok() {
        any = true;
    }
    any
}
