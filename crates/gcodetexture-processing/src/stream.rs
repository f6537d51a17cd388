//! Streaming driver
//!
//! Reads G-code line by line, hands each line to a [`TextureEngine`] and
//! writes the result in input order. Line terminators (`\n` or `\r\n`) are
//! kept per line, and a final line without a terminator stays without one.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use gcodetexture_core::{GcodeError, Result};

use crate::engine::{LineOutput, TextureEngine};

/// Buffer size for file reads and writes (256KB)
const IO_BUFFER_SIZE: usize = 256 * 1024;

/// Counters for one processed stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    /// Lines read from the input
    pub lines_read: u64,
    /// Lines written to the output
    pub lines_written: u64,
    /// Lines written with rewritten content
    pub lines_modified: u64,
    /// Lines left out of the output
    pub lines_dropped: u64,
    /// Lines the machine model rejected
    pub invalid_state_lines: u64,
    /// Lines whose Z was rewritten or appended
    pub z_changes: u64,
}

/// Drives a [`TextureEngine`] over a reader and a writer
#[derive(Debug)]
pub struct TextureStream {
    engine: TextureEngine,
}

impl TextureStream {
    /// Wrap an engine
    pub fn new(engine: TextureEngine) -> Self {
        Self { engine }
    }

    /// The wrapped engine
    pub fn engine(&self) -> &TextureEngine {
        &self.engine
    }

    /// Process every line of `reader` into `writer`
    ///
    /// Output already written stays written when an error stops processing.
    ///
    /// # Errors
    /// Returns the first malformed line, an invalid-state line under the
    /// abort policy, or an I/O error.
    pub fn process<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<StreamStats> {
        let started = Instant::now();
        let mut stats = StreamStats::default();
        let invalid_before = self.engine.invalid_state_lines();
        let z_before = self.engine.z_changes();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines_read += 1;
            let line_number = u32::try_from(stats.lines_read).unwrap_or(u32::MAX);

            let text = std::str::from_utf8(&buf).map_err(|e| GcodeError::ParseMalformed {
                line_number,
                reason: format!("invalid UTF-8: {}", e),
            })?;
            let (content, terminator) = split_terminator(text);

            match self.engine.process_line(line_number, content)? {
                LineOutput::Unchanged => {
                    writer.write_all(text.as_bytes())?;
                    stats.lines_written += 1;
                }
                LineOutput::Rewritten(rewritten) => {
                    writer.write_all(rewritten.as_bytes())?;
                    writer.write_all(terminator.as_bytes())?;
                    stats.lines_written += 1;
                    stats.lines_modified += 1;
                }
                LineOutput::Dropped => {
                    stats.lines_dropped += 1;
                }
            }
        }

        writer.flush()?;
        stats.invalid_state_lines = self.engine.invalid_state_lines() - invalid_before;
        stats.z_changes = self.engine.z_changes() - z_before;

        tracing::info!(
            "Processed {} lines in {}ms: {} modified, {} dropped, {} Z changes, {} invalid",
            stats.lines_read,
            started.elapsed().as_millis(),
            stats.lines_modified,
            stats.lines_dropped,
            stats.z_changes,
            stats.invalid_state_lines
        );
        Ok(stats)
    }
}

fn split_terminator(text: &str) -> (&str, &str) {
    if let Some(content) = text.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = text.strip_suffix('\n') {
        (content, "\n")
    } else {
        (text, "")
    }
}

/// Process a file into another file with a fresh engine
///
/// # Errors
/// Returns an error if either file cannot be opened or processing fails.
pub fn process_file(input: &Path, output: &Path, engine: TextureEngine) -> Result<StreamStats> {
    tracing::info!("Texturing {} -> {}", input.display(), output.display());
    let reader = BufReader::with_capacity(IO_BUFFER_SIZE, File::open(input)?);
    let writer = BufWriter::with_capacity(IO_BUFFER_SIZE, File::create(output)?);
    TextureStream::new(engine).process(reader, writer)
}
