//! History Store: a bounded, append-only log per conversation key.

use std::collections::{HashMap, VecDeque};

use super::{conversation::ConversationKey, entity::ChatMessage};

/// Number of messages retained per conversation
pub const HISTORY_CAPACITY: usize = 100;

/// FIFO buffer that evicts the oldest message once full
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    buffers: HashMap<ConversationKey, HistoryBuffer>,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffers: HashMap::new(),
            capacity,
        }
    }

    /// Append to the stream of `key`, creating it on first use
    pub fn append(&mut self, key: ConversationKey, message: ChatMessage) {
        let capacity = self.capacity;
        self.buffers
            .entry(key)
            .or_insert_with(|| HistoryBuffer::with_capacity(capacity))
            .push(message);
    }

    /// Messages of `key` in insertion order; empty for an unseen key
    pub fn get(&self, key: &ConversationKey) -> Vec<ChatMessage> {
        self.buffers
            .get(key)
            .map(HistoryBuffer::to_vec)
            .unwrap_or_default()
    }

    /// Drop the stream of `key` entirely
    pub fn purge(&mut self, key: &ConversationKey) {
        self.buffers.remove(key);
    }
}
