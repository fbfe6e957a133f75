//! Ordered popup queue
//!
//! Index 0 is the shown popup whenever the queue is non-empty. No
//! deduplication: the same popup may be queued more than once.

use std::collections::VecDeque;

use crate::popup::PopupRef;

/// Queue of popups, front first
#[derive(Debug, Default)]
pub struct PopupQueue {
    popups: VecDeque<PopupRef>,
}

impl PopupQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            popups: VecDeque::new(),
        }
    }

    /// Append to the tail. Returns true if the popup is now the front.
    pub fn push(&mut self, popup: PopupRef) -> bool {
        self.popups.push_back(popup);
        self.popups.len() == 1
    }

    /// Insert at the front
    pub fn unshift(&mut self, popup: PopupRef) {
        self.popups.push_front(popup);
    }

    /// Replace the front in place, or append if empty. Returns the replaced popup.
    pub fn swap(&mut self, popup: PopupRef) -> Option<PopupRef> {
        match self.popups.front_mut() {
            Some(front) => Some(std::mem::replace(front, popup)),
            None => {
                self.popups.push_back(popup);
                None
            }
        }
    }

    /// Position of the first entry that is the same popup as `target`
    pub fn position(&self, target: &PopupRef) -> Option<usize> {
        self.popups.iter().position(|p| p.same(target))
    }

    pub fn remove(&mut self, index: usize) -> Option<PopupRef> {
        self.popups.remove(index)
    }

    /// Remove everything, returning how many popups were dropped
    pub fn clear(&mut self) -> usize {
        let removed = self.popups.len();
        self.popups.clear();
        removed
    }

    pub fn front(&self) -> Option<&PopupRef> {
        self.popups.front()
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PopupRef> {
        self.popups.iter()
    }
}
