//! Incremental log tailer.
//!
//! Tracks a byte offset into the append-only client log and yields only
//! the lines appended since the previous poll, so each poll costs
//! O(new bytes) rather than O(file size).

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// The outcome of one poll.
#[derive(Debug, Default)]
pub struct TailChunk {
    /// Complete lines appended since the last poll, in file order.
    pub lines: Vec<String>,
    /// Set when the file shrank below the stored offset. The tailer has
    /// already rewound to the start; the caller must clear its
    /// aggregates before applying `lines`.
    pub truncated: bool,
}

/// Byte-offset tail state over a single log file.
#[derive(Debug)]
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
}

impl LogTailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The byte offset that the next poll will read from.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Rewind to the start of the file. The next poll re-reads everything.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Read from the stored offset to the current end of file.
    ///
    /// A missing file yields an empty chunk and leaves the offset
    /// untouched. Read failures degrade the same way: no new events this
    /// poll, prior state preserved. A file that shrank below the offset
    /// is treated as rotated; the offset rewinds to zero and the whole
    /// file is returned with `truncated` set.
    pub fn poll(&mut self) -> TailChunk {
        if !self.path.exists() {
            return TailChunk::default();
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!("failed to open {}: {}", self.path.display(), e);
                return TailChunk::default();
            }
        };

        let len = match file.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                warn!("failed to stat {}: {}", self.path.display(), e);
                return TailChunk::default();
            }
        };

        let mut truncated = false;
        if len < self.offset {
            debug!(
                "{} shrank from offset {} to {} bytes; rewinding",
                self.path.display(),
                self.offset,
                len
            );
            self.offset = 0;
            truncated = true;
        }

        let mut reader = BufReader::new(file);
        if let Err(e) = reader.seek(SeekFrom::Start(self.offset)) {
            warn!("failed to seek {}: {}", self.path.display(), e);
            return TailChunk { lines: Vec::new(), truncated };
        }

        let mut buf = String::new();
        if let Err(e) = reader.read_to_string(&mut buf) {
            warn!("failed to read {}: {}", self.path.display(), e);
            return TailChunk { lines: Vec::new(), truncated };
        }

        self.offset = len;

        let lines = buf.lines().map(str::to_string).collect();
        TailChunk { lines, truncated }
    }
}
