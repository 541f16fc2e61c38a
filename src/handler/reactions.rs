use std::collections::{HashSet, VecDeque};

use crate::foundation::config::ReactionConfig;

/// Bounded set of message ids already replied to. The oldest id is
/// forgotten once `capacity` is reached.
#[derive(Clone, Debug)]
pub struct ReplyLedger {
    capacity: usize,
    order: VecDeque<u64>,
    seen: HashSet<u64>,
}

impl ReplyLedger {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Record `id`; returns false if it was already present.
    pub fn insert(&mut self, id: u64) -> bool {
        if !self.seen.insert(id) {
            return false;
        }
        if self.order.len() == self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.seen.remove(&oldest);
        }
        self.order.push_back(id);
        true
    }

    pub fn contains(&self, id: u64) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Fires once per message when a given emoji reaches a reaction count.
#[derive(Clone, Debug)]
pub struct ReactionTrigger {
    emoji: String,
    threshold: u32,
    ledger: ReplyLedger,
}

impl ReactionTrigger {
    pub fn new(cfg: &ReactionConfig) -> Self {
        Self {
            emoji: cfg.emoji.clone(),
            threshold: cfg.threshold.max(1),
            ledger: ReplyLedger::new(cfg.ledger_capacity),
        }
    }

    /// `count` is the current number of `emoji` reactions on `message_id`.
    pub fn observe(&mut self, message_id: u64, emoji: &str, count: u32) -> bool {
        if emoji != self.emoji || count < self.threshold {
            return false;
        }
        self.ledger.insert(message_id)
    }

    pub fn ledger(&self) -> &ReplyLedger {
        &self.ledger
    }
}

#[cfg(test)]
#[path = "../../tests/unit/handler/reactions.rs"]
mod tests;
