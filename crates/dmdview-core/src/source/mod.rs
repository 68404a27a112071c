//! Message sources.
//!
//! A source yields raw dmdext messages one at a time. All file I/O for replay
//! lives here so decoding and compositing stay pure.

mod file;
mod memory;

pub use file::FileMessageSource;
pub use memory::MemorySource;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Where the message came from (file name, or a label for in-memory data).
    pub origin: String,
    pub data: Vec<u8>,
}

pub trait MessageSource {
    fn next_message(&mut self) -> Result<Option<MessageEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
