use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{MessageEvent, MessageSource, SourceError};

/// Replays one message per file, in the order given.
pub struct FileMessageSource {
    pending: VecDeque<PathBuf>,
}

impl FileMessageSource {
    /// Every path must exist and be a regular file; nothing is read yet.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self, SourceError> {
        let mut pending = VecDeque::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let metadata = fs::metadata(path).map_err(|source| SourceError::Read {
                path: path.display().to_string(),
                source,
            })?;
            if !metadata.is_file() {
                return Err(SourceError::Read {
                    path: path.display().to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "not a regular file",
                    ),
                });
            }
            pending.push_back(path.to_path_buf());
        }
        Ok(Self { pending })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl MessageSource for FileMessageSource {
    fn next_message(&mut self) -> Result<Option<MessageEvent>, SourceError> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        let data = fs::read(&path).map_err(|source| SourceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let origin = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(%origin, bytes = data.len(), "message read");
        Ok(Some(MessageEvent { origin, data }))
    }
}
