//! Golden fixture loading.
//!
//! A golden fixture is a gzip-compressed UTF-8 text file: one JSON value per
//! physical line, one line per logical row, in file order.  The stream is
//! lazy and forward-only; reopening the file yields a fresh, independent
//! stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use colcheck_error::Result;
use flate2::read::GzDecoder;
use tracing::debug;

/// Lazy line stream over a gzip golden fixture.
pub struct GoldenReader {
    reader: BufReader<GzDecoder<BufReader<File>>>,
    lines_read: u64,
}

impl GoldenReader {
    /// Open a golden fixture for reading.
    ///
    /// A missing file fails here; a file that is not valid gzip fails on the
    /// first read, since decompression is streamed.
    ///
    /// # Errors
    ///
    /// [`colcheck_error::CheckError::Io`] on open failure.
    pub fn open(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let decoder = GzDecoder::new(file);
        debug!(path = %path.display(), "golden fixture opened");
        Ok(Self {
            reader: BufReader::new(decoder),
            lines_read: 0,
        })
    }

    /// Next logical row line, or `None` once the stream is exhausted.
    /// Whitespace-only lines (a trailing newline, typically) are not rows.
    ///
    /// # Errors
    ///
    /// [`colcheck_error::CheckError::Io`] on read or decompression failure.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            let line = buf.trim_end_matches(['\n', '\r']);
            if !line.trim().is_empty() {
                self.lines_read += 1;
                return Ok(Some(line.to_owned()));
            }
        }
    }

    /// Number of row lines handed out so far.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Consume the rest of the stream, returning how many row lines were
    /// left unread.  Used to detect trailing golden rows the reader under
    /// test never produced.
    ///
    /// # Errors
    ///
    /// [`colcheck_error::CheckError::Io`] on read or decompression failure.
    pub fn drain(&mut self) -> Result<u64> {
        let mut remaining = 0u64;
        while self.next_line()?.is_some() {
            remaining += 1;
        }
        Ok(remaining)
    }
}
