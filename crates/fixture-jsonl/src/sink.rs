//! JSONL sink for inserted records.

use crate::error::SinkError;
use fixture_core::json::record_to_json;
use fixture_core::Record;
use fixture_factory::BuildContext;
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for JSONL writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from a sink's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SinkMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Bytes written, newlines included.
    pub bytes_written: u64,
    /// Time since the sink was opened.
    pub total_duration: Duration,
    /// Time spent serializing and writing.
    pub write_duration: Duration,
}

impl SinkMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.bytes_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Writes records as JSON Lines.
///
/// Writes go through `&self` so one sink can be shared (via `Rc`) between
/// the insert hook and the code that later reads its metrics.
pub struct JsonlSink {
    path: PathBuf,
    writer: RefCell<BufWriter<File>>,
    metrics: RefCell<SinkMetrics>,
    started: Instant,
}

impl JsonlSink {
    /// Create (or truncate) `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref();
        info!("Writing JSONL records to '{}'", path.display());
        Ok(Self::with_file(path, File::create(path)?))
    }

    /// Open `path` for appending, creating it if missing.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref();
        info!("Appending JSONL records to '{}'", path.display());
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_file(path, file))
    }

    fn with_file(path: &Path, file: File) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: RefCell::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file)),
            metrics: RefCell::new(SinkMetrics::default()),
            started: Instant::now(),
        }
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a JSON line.
    pub fn write_record<R: Record>(&self, record: &R) -> Result<(), SinkError> {
        let write_start = Instant::now();
        let mut line = serde_json::to_vec(&record_to_json(record))?;
        line.push(b'\n');
        self.writer.borrow_mut().write_all(&line)?;

        let mut metrics = self.metrics.borrow_mut();
        metrics.rows_written += 1;
        metrics.bytes_written += line.len() as u64;
        metrics.write_duration += write_start.elapsed();

        if metrics.rows_written % 10000 == 0 {
            debug!("Written {} rows", metrics.rows_written);
        }
        Ok(())
    }

    /// Insert hook writing every inserted record to this sink.
    pub fn insert_hook<R: Record + 'static>(
        self: &Rc<Self>,
    ) -> impl Fn(&BuildContext, &mut R) -> anyhow::Result<()> + 'static {
        let sink = Rc::clone(self);
        move |_, record: &mut R| {
            sink.write_record(record)?;
            Ok(())
        }
    }

    /// Flush buffered output.
    pub fn flush(&self) -> Result<(), SinkError> {
        self.writer.borrow_mut().flush()?;
        Ok(())
    }

    /// Metrics so far.
    pub fn metrics(&self) -> SinkMetrics {
        let mut metrics = self.metrics.borrow().clone();
        metrics.total_duration = self.started.elapsed();
        metrics
    }

    /// Flush and report final metrics.
    pub fn finish(&self) -> Result<SinkMetrics, SinkError> {
        self.flush()?;
        let metrics = self.metrics();
        info!(
            "JSONL output complete: {} rows, {} bytes in {:?} ({:.2} rows/sec)",
            metrics.rows_written,
            metrics.bytes_written,
            metrics.total_duration,
            metrics.rows_per_second()
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_core::impl_record;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default)]
    struct Event {
        id: i64,
        kind: String,
        payload: Vec<u8>,
    }

    impl_record!(Event { id, kind, payload });

    #[test]
    fn test_metrics() {
        let metrics = SinkMetrics {
            rows_written: 1000,
            bytes_written: 100000,
            total_duration: Duration::from_secs(10),
            write_duration: Duration::from_secs(8),
        };

        assert_eq!(metrics.rows_per_second(), 100.0);
        assert_eq!(metrics.bytes_per_second(), 10000.0);
        assert_eq!(SinkMetrics::default().rows_per_second(), 0.0);
    }

    #[test]
    fn test_write_record() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("events.jsonl");
        let sink = JsonlSink::create(&output_path).unwrap();

        sink.write_record(&Event {
            id: 1,
            kind: "click".to_string(),
            payload: vec![0xDE, 0xAD],
        })
        .unwrap();
        sink.write_record(&Event::default()).unwrap();
        let metrics = sink.finish().unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(metrics.rows_written, 2);
        assert_eq!(metrics.bytes_written, content.len() as u64);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], 1);
        assert_eq!(first["kind"], "click");
        assert_eq!(first["payload"], "3q0=");
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("events.jsonl");

        let sink = JsonlSink::create(&output_path).unwrap();
        sink.write_record(&Event::default()).unwrap();
        sink.finish().unwrap();
        drop(sink);

        let sink = JsonlSink::append(&output_path).unwrap();
        sink.write_record(&Event::default()).unwrap();
        assert_eq!(sink.finish().unwrap().rows_written, 1);

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
