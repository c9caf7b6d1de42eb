use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

mod writing;

/// Shared, line-oriented destination for rendered log lines.
///
/// The sink owns a boxed [`Write`] implementor behind a [`Mutex`]. Writes take
/// `&self`, so one sink can be shared by every thread that logs. Each call to
/// [`write_line`](Self::write_line) holds the lock for exactly one
/// `write_all` of the assembled line.
///
/// # Examples
///
/// ```
/// use logging_sink::LineSink;
///
/// let sink = LineSink::new(Vec::new());
/// sink.write_line("INFO     : first")?;
/// sink.write_line("INFO     : second\n")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct LineSink {
    writer: Mutex<Box<dyn Write + Send>>,
    label: &'static str,
}

impl LineSink {
    /// Creates a sink around `writer`.
    #[must_use]
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::labelled(Box::new(writer), "writer")
    }

    /// Creates a sink writing to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::labelled(Box::new(io::stdout()), "stdout")
    }

    /// Creates a sink writing to the process's standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::labelled(Box::new(io::stderr()), "stderr")
    }

    /// Opens `path` for appending, creating it when missing.
    ///
    /// The file is opened in append mode so several processes logging to the
    /// same file never overwrite each other's lines.
    pub fn append_file(path: &Path) -> io::Result<Self> {
        let file: File = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::labelled(Box::new(file), "file"))
    }

    fn labelled(writer: Box<dyn Write + Send>, label: &'static str) -> Self {
        Self {
            writer: Mutex::new(writer),
            label,
        }
    }
}

impl fmt::Debug for LineSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSink")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
