use std::io::{self, Write};
use std::sync::PoisonError;

use super::LineSink;

impl LineSink {
    /// Writes one rendered line followed by exactly one newline.
    ///
    /// A line that already ends in `\n` is written unchanged. The line and its
    /// terminator are joined before the lock is taken so the writer receives a
    /// single `write_all` call per line.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buffer = String::with_capacity(line.len() + 1);
        buffer.push_str(line);
        if !line.ends_with('\n') {
            buffer.push('\n');
        }

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(buffer.as_bytes())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use crate::LineSink;
    use std::sync::Arc;
    use std::thread;
    use test_support::SharedBuffer;

    #[test]
    fn write_line_terminates_with_one_newline() {
        let buffer = SharedBuffer::new();
        let sink = LineSink::new(buffer.clone());

        sink.write_line("WARN     : vanished").expect("write succeeds");
        sink.write_line("ERROR    : partial\n").expect("write succeeds");

        assert_eq!(
            buffer.contents(),
            "WARN     : vanished\nERROR    : partial\n"
        );
    }

    #[test]
    fn concurrent_writers_never_interleave_lines() {
        let buffer = SharedBuffer::new();
        let sink = Arc::new(LineSink::new(buffer.clone()));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for n in 0..50 {
                        sink.write_line(&format!("worker {worker} line {n}"))
                            .expect("write succeeds");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        let output = buffer.contents();
        assert_eq!(output.lines().count(), 400);
        assert!(output.lines().all(|line| line.starts_with("worker ")));
    }

    #[test]
    fn append_file_keeps_existing_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.log");
        std::fs::write(&path, "existing\n").expect("seed file");

        let sink = LineSink::append_file(&path).expect("open log file");
        sink.write_line("appended").expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "existing\nappended\n");
        assert!(format!("{sink:?}").contains("\"file\""));
    }

    #[test]
    fn append_file_reports_unopenable_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("app.log");
        assert!(LineSink::append_file(&path).is_err());
    }
}
