//! Destinations for captured command output.
//!
//! A sink hands out one stdout stream and one stderr stream per attempt.
//! Requesting a stream discards whatever the same sink captured before, so a
//! failed attempt's partial output never leaks into the next attempt's
//! capture. [`MemorySink`] buffers in memory for short diagnostic commands;
//! [`FileSink`] streams to disk so long-running commands cannot grow memory
//! unboundedly.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Supplies fresh stdout/stderr byte streams, one of each per attempt.
pub trait OutputSink: Send {
    /// Fresh stream for standard output. Discards previously captured stdout.
    fn output_stream(&mut self) -> io::Result<Box<dyn Write + Send>>;

    /// Fresh stream for standard error. Discards previously captured stderr.
    fn error_stream(&mut self) -> io::Result<Box<dyn Write + Send>>;
}

/// Shared append buffer handed out as a stream.
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("sink buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory capture with readback helpers.
#[derive(Default)]
pub struct MemorySink {
    stdout: Arc<Mutex<Vec<u8>>>,
    stderr: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured stdout so far, lossily decoded.
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.stdout.lock().expect("sink buffer poisoned")).into_owned()
    }

    /// Captured stderr so far, lossily decoded.
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.stderr.lock().expect("sink buffer poisoned")).into_owned()
    }
}

impl OutputSink for MemorySink {
    fn output_stream(&mut self) -> io::Result<Box<dyn Write + Send>> {
        self.stdout.lock().expect("sink buffer poisoned").clear();
        Ok(Box::new(BufferWriter(Arc::clone(&self.stdout))))
    }

    fn error_stream(&mut self) -> io::Result<Box<dyn Write + Send>> {
        self.stderr.lock().expect("sink buffer poisoned").clear();
        Ok(Box::new(BufferWriter(Arc::clone(&self.stderr))))
    }
}

/// File-backed capture. Each stream request truncates its file, which keeps
/// the per-attempt reset semantics without tracking state.
pub struct FileSink {
    stdout_path: PathBuf,
    stderr_path: PathBuf,
}

impl FileSink {
    pub fn new(stdout_path: impl Into<PathBuf>, stderr_path: impl Into<PathBuf>) -> Self {
        Self {
            stdout_path: stdout_path.into(),
            stderr_path: stderr_path.into(),
        }
    }

    pub fn stdout_path(&self) -> &Path {
        &self.stdout_path
    }

    pub fn stderr_path(&self) -> &Path {
        &self.stderr_path
    }
}

impl OutputSink for FileSink {
    fn output_stream(&mut self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(File::create(&self.stdout_path)?))
    }

    fn error_stream(&mut self) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(File::create(&self.stderr_path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_captures_and_reads_back() {
        let mut sink = MemorySink::new();
        let mut out = sink.output_stream().unwrap();
        out.write_all(b"hello\n").unwrap();
        drop(out);
        assert_eq!(sink.stdout(), "hello\n");
        assert_eq!(sink.stderr(), "");
    }

    #[test]
    fn memory_sink_resets_between_attempts() {
        let mut sink = MemorySink::new();
        let mut out = sink.output_stream().unwrap();
        out.write_all(b"abc").unwrap();
        drop(out);
        assert_eq!(sink.stdout(), "abc");

        // Second attempt requests a fresh stream and writes nothing.
        let _out = sink.output_stream().unwrap();
        assert_eq!(sink.stdout(), "", "prior attempt's output leaked");
    }

    #[test]
    fn memory_sink_streams_are_independent() {
        let mut sink = MemorySink::new();
        let mut out = sink.output_stream().unwrap();
        let mut err = sink.error_stream().unwrap();
        out.write_all(b"to stdout").unwrap();
        err.write_all(b"to stderr").unwrap();
        drop((out, err));
        assert_eq!(sink.stdout(), "to stdout");
        assert_eq!(sink.stderr(), "to stderr");
    }

    #[test]
    fn file_sink_truncates_on_each_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("out.log"), dir.path().join("err.log"));

        let mut out = sink.output_stream().unwrap();
        out.write_all(b"first attempt output").unwrap();
        drop(out);

        let out = sink.output_stream().unwrap();
        drop(out);
        let contents = std::fs::read_to_string(sink.stdout_path()).unwrap();
        assert_eq!(contents, "", "truncation on re-request failed");
    }

    #[test]
    fn file_sink_creation_failure_is_an_error() {
        let mut sink = FileSink::new("/nonexistent-dir/out.log", "/nonexistent-dir/err.log");
        assert!(sink.output_stream().is_err());
    }
}
