//! JSON-lines structure tape.
//!
//! One [`TapeFrame`] per line; blank lines and lines starting with `#` are
//! skipped. Lines are read lazily, one per `advance()`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{FeedError, FeedView, StructuralFeed, StructureState, TapeFrame};

pub struct TapeFeed<R> {
    name: String,
    reader: R,
    line: usize,
    buf: String,
    state: StructureState,
    is_open: bool,
}

impl TapeFeed<BufReader<File>> {
    /// Tape backed by a file on disk. The file is opened eagerly so that a
    /// missing tape surfaces before any step runs.
    pub fn from_path(path: &Path) -> Result<Self, FeedError> {
        let file = File::open(path)?;
        Ok(Self::new(path.display().to_string(), BufReader::new(file)))
    }
}

impl<R: BufRead> TapeFeed<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            line: 0,
            buf: String::new(),
            state: StructureState::new(),
            is_open: false,
        }
    }

    /// Read the next non-blank frame, or `None` at end of input.
    fn next_frame(&mut self) -> Result<Option<TapeFrame>, FeedError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return serde_json::from_str(text).map(Some).map_err(|e| {
                if e.is_eof() {
                    FeedError::Truncated { line: self.line }
                } else {
                    FeedError::MalformedFrame {
                        line: self.line,
                        reason: e.to_string(),
                    }
                }
            });
        }
    }
}

impl<R: BufRead> StructuralFeed for TapeFeed<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<(), FeedError> {
        self.is_open = true;
        Ok(())
    }

    fn advance(&mut self) -> Result<bool, FeedError> {
        if !self.is_open {
            return Err(FeedError::NotOpen {
                feed: self.name.clone(),
            });
        }
        match self.next_frame()? {
            Some(frame) => {
                self.state.apply(frame)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn view(&self) -> FeedView<'_> {
        self.state.view()
    }

    fn close(&mut self) {
        self.is_open = false;
    }
}
