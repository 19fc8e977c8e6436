//! # Rolling Sentence History
//!
//! Keeps the most recent sentences submitted to the server. The buffer is
//! shared by every request (there is no per-client scoping), so it lives inside
//! the server state and is guarded by a single mutex.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Number of sentences retained before the oldest one is evicted.
pub const HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Default)]
pub struct HistoryStore {
    sentences: Mutex<VecDeque<String>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            sentences: Mutex::new(VecDeque::with_capacity(HISTORY_CAPACITY + 1)),
        }
    }

    /// Appends `sentence`, evicting the oldest entry once the buffer is full.
    pub fn record(&self, sentence: impl Into<String>) {
        let mut sentences = self.lock();
        push_bounded(&mut sentences, sentence.into());
    }

    /// Returns the buffered sentences, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    /// Records `sentence` and returns the resulting snapshot under the same lock,
    /// so the caller sees exactly the buffer its own insertion produced.
    pub fn record_and_snapshot(&self, sentence: impl Into<String>) -> Vec<String> {
        let mut sentences = self.lock();
        push_bounded(&mut sentences, sentence.into());
        sentences.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Append and evict never panic halfway, so a poisoned buffer is still consistent.
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.sentences.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn push_bounded(sentences: &mut VecDeque<String>, sentence: String) {
    sentences.push_back(sentence);
    while sentences.len() > HISTORY_CAPACITY {
        sentences.pop_front();
    }
}
