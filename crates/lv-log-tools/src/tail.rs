//! Seek-based tail reading for large append-only files.
//!
//! The reader never loads the whole file: it estimates a byte window from an
//! average line length, seeks to `size - window`, and reassembles complete
//! lines from that window only.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

use crate::error::{LogError, LogResult};
use crate::normalize::split_output;

/// Default cap on a single read window (8 MiB).
pub const DEFAULT_MAX_WINDOW_BYTES: u64 = 8 * 1024 * 1024;

/// Sizing of the read window for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailWindow {
    /// Estimated bytes per line, calibrated per source.
    pub avg_bytes_per_line: u64,
    /// Hard cap on bytes read per request.
    pub max_window_bytes: u64,
}

impl TailWindow {
    pub fn new(avg_bytes_per_line: u64) -> Self {
        Self {
            avg_bytes_per_line,
            max_window_bytes: DEFAULT_MAX_WINDOW_BYTES,
        }
    }

    /// Bytes to read for `count` lines from a file of `file_size` bytes.
    pub fn window_for(&self, count: usize, file_size: u64) -> u64 {
        self.avg_bytes_per_line
            .saturating_mul(count as u64)
            .min(self.max_window_bytes)
            .min(file_size)
    }
}

/// Lines read from the end of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailRead {
    /// Complete lines, oldest first, at most the requested count.
    pub lines: Vec<String>,
    /// The window held fewer complete lines than requested while the file
    /// had more content before it.
    pub truncated: bool,
    /// Size of the window that was read.
    pub window: u64,
}

/// Read the last `count` complete lines of `path`.
///
/// A missing or unreadable file, an empty file, and a window that holds no
/// complete line are all errors; callers treat them as "source unavailable".
pub async fn tail_file(path: &Path, count: usize, window: &TailWindow) -> LogResult<TailRead> {
    let shown = path.display().to_string();
    if count == 0 {
        return Ok(TailRead {
            lines: Vec::new(),
            truncated: false,
            window: 0,
        });
    }

    let mut file = File::open(path)
        .await
        .map_err(|e| LogError::from_io(&shown, e))?;
    let file_size = file
        .metadata()
        .await
        .map_err(|e| LogError::from_io(&shown, e))?
        .len();
    if file_size == 0 {
        return Err(LogError::Empty(shown));
    }

    let window_len = window.window_for(count, file_size);
    let start = file_size - window_len;
    // Read one byte before the window: if it is '\n', the first fragment of
    // the window is already a whole line.
    let read_from = start.saturating_sub(1);
    let read_len = file_size - read_from;

    file.seek(SeekFrom::Start(read_from))
        .await
        .map_err(|e| LogError::from_io(&shown, e))?;
    let mut buf = Vec::with_capacity(read_len as usize);
    (&mut file)
        .take(read_len)
        .read_to_end(&mut buf)
        .await
        .map_err(|e| LogError::from_io(&shown, e))?;

    let body: &[u8] = if start == 0 {
        &buf
    } else {
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) => &buf[i + 1..],
            None => &[],
        }
    };

    let mut lines = split_output(&String::from_utf8_lossy(body));
    if lines.is_empty() {
        return Err(if start > 0 {
            LogError::InsufficientWindow { window: window_len }
        } else {
            LogError::Empty(shown)
        });
    }

    let truncated = start > 0 && lines.len() < count;
    if lines.len() > count {
        lines.drain(..lines.len() - count);
    }

    tracing::debug!(
        path = %shown,
        file_size,
        window = window_len,
        offset = start,
        lines = lines.len(),
        truncated,
        "tail read complete"
    );

    Ok(TailRead {
        lines,
        truncated,
        window: window_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i:04}\n")).collect()
    }

    #[tokio::test]
    async fn returns_exactly_n_newest_last() {
        let f = file_with(&numbered(100));
        let read = tail_file(f.path(), 5, &TailWindow::new(500)).await.unwrap();
        assert_eq!(
            read.lines,
            vec!["line 0096", "line 0097", "line 0098", "line 0099", "line 0100"]
        );
        assert!(!read.truncated);
    }

    #[tokio::test]
    async fn small_file_is_read_whole() {
        let f = file_with("alpha\nbeta\ngamma\n");
        let read = tail_file(f.path(), 10, &TailWindow::new(500)).await.unwrap();
        assert_eq!(read.lines, vec!["alpha", "beta", "gamma"]);
        assert!(!read.truncated);
        assert_eq!(read.window, 17);
    }

    #[tokio::test]
    async fn missing_final_newline_keeps_last_line() {
        let f = file_with("alpha\nbeta");
        let read = tail_file(f.path(), 1, &TailWindow::new(500)).await.unwrap();
        assert_eq!(read.lines, vec!["beta"]);
    }

    #[tokio::test]
    async fn window_on_line_boundary_keeps_first_line() {
        // Each line is exactly 10 bytes; a 20-byte window starts on a boundary.
        let f = file_with(&numbered(10));
        let read = tail_file(f.path(), 2, &TailWindow::new(10)).await.unwrap();
        assert_eq!(read.lines, vec!["line 0009", "line 0010"]);
        assert!(!read.truncated);
    }

    #[tokio::test]
    async fn partial_first_fragment_is_discarded() {
        let f = file_with(&numbered(10));
        // 15-byte window starts mid-way through "line 0009".
        let read = tail_file(f.path(), 3, &TailWindow::new(5)).await.unwrap();
        assert_eq!(read.lines, vec!["line 0010"]);
        assert!(read.truncated);
    }

    #[tokio::test]
    async fn very_long_lines_exhaust_the_window() {
        let long = "x".repeat(4_000);
        let f = file_with(&format!("{long}\n{long}\n"));
        let err = tail_file(f.path(), 1, &TailWindow::new(500))
            .await
            .unwrap_err();
        assert!(matches!(err, LogError::InsufficientWindow { window: 500 }));
    }

    #[tokio::test]
    async fn very_short_lines_return_exact_count() {
        let short: String = (0..5_000).map(|i| format!("{}\n", i % 10)).collect();
        let f = file_with(&short);
        let read = tail_file(f.path(), 50, &TailWindow::new(500)).await.unwrap();
        assert_eq!(read.lines.len(), 50);
        assert_eq!(read.lines.last().unwrap(), "9");
        assert!(!read.truncated);
    }

    #[tokio::test]
    async fn max_window_caps_the_read() {
        let f = file_with(&numbered(1_000));
        let window = TailWindow {
            avg_bytes_per_line: 500,
            max_window_bytes: 100,
        };
        let read = tail_file(f.path(), 50, &window).await.unwrap();
        assert_eq!(read.window, 100);
        assert_eq!(read.lines.len(), 10);
        assert!(read.truncated);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = tail_file(Path::new("/nonexistent/lv/current"), 5, &TailWindow::new(500))
            .await
            .unwrap_err();
        assert!(matches!(err, LogError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_file_is_empty() {
        let f = file_with("");
        let err = tail_file(f.path(), 5, &TailWindow::new(500)).await.unwrap_err();
        assert!(matches!(err, LogError::Empty(_)));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let f = file_with("one\n\n   \ntwo\n");
        let read = tail_file(f.path(), 5, &TailWindow::new(500)).await.unwrap();
        assert_eq!(read.lines, vec!["one", "two"]);
    }

    #[test]
    fn window_estimate() {
        let w = TailWindow::new(500);
        assert_eq!(w.window_for(10, 1_000_000), 5_000);
        assert_eq!(w.window_for(10, 1_000), 1_000);
        assert_eq!(w.window_for(100_000, u64::MAX), DEFAULT_MAX_WINDOW_BYTES);
    }
}
