//! Report rendering and the shared output sink.
//!
//! Every check's block is rendered to a string first and then written to
//! the sink under its lock in one go, so concurrent checks never
//! interleave lines.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use colored::Colorize;

use crate::result::{Finding, ResultSet};

/// Glyph printed before a passing finding.
pub const PASS_GLYPH: &str = "✓";

/// Glyph printed before a failing finding.
pub const FAIL_GLYPH: &str = "✗";

/// Presentation options for text output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    /// Colour glyphs green/red.
    pub color: bool,
}

impl Style {
    #[must_use]
    pub fn plain() -> Self {
        Self { color: false }
    }

    #[must_use]
    pub fn colored() -> Self {
        Self { color: true }
    }

    fn glyph(self, passed: bool) -> String {
        match (passed, self.color) {
            (true, true) => PASS_GLYPH.green().bold().to_string(),
            (false, true) => FAIL_GLYPH.red().bold().to_string(),
            (true, false) => PASS_GLYPH.to_string(),
            (false, false) => FAIL_GLYPH.to_string(),
        }
    }
}

/// Render one check's section.
///
/// ```text
///
/// [kubernetes version compatibility]
/// ----------------------------------
/// ✓ kubernetes version v1.31.2 is compatible
/// ```
#[must_use]
pub fn render_block(label: &str, results: &ResultSet, style: Style) -> String {
    let mut block = String::new();
    let _ = write!(
        block,
        "\n[{label}]\n{}\n",
        "-".repeat(label.chars().count() + 2)
    );
    for Finding {
        description,
        passed,
    } in results
    {
        let _ = writeln!(block, "{} {description}", style.glyph(*passed));
    }
    block
}

/// Injected, shared destination for report output.
///
/// Cloning is cheap; all clones write to the same underlying writer.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Sink writing to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Write a check's complete block while holding the sink exclusively.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write_block(&self, label: &str, results: &ResultSet, style: Style) -> io::Result<()> {
        let block = render_block(label, results, style);
        self.write_str(&block)
    }

    /// Write arbitrary text atomically with respect to other writers.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

/// In-memory writer whose contents can be read back after a run.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
