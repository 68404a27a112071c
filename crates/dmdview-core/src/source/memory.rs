use std::collections::VecDeque;

use super::{MessageEvent, MessageSource, SourceError};

/// Messages held in memory, labelled `#1`, `#2`, ... in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pending: VecDeque<MessageEvent>,
    pushed: usize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: impl Into<Vec<u8>>) {
        self.pushed += 1;
        self.pending.push_back(MessageEvent {
            origin: format!("#{}", self.pushed),
            data: data.into(),
        });
    }
}

impl<T: Into<Vec<u8>>> FromIterator<T> for MemorySource {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut source = Self::new();
        for data in iter {
            source.push(data);
        }
        source
    }
}

impl MessageSource for MemorySource {
    fn next_message(&mut self) -> Result<Option<MessageEvent>, SourceError> {
        Ok(self.pending.pop_front())
    }
}
