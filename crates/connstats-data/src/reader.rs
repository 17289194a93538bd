//! Log file discovery and line reading.
//!
//! Input files may be plain text or gzip-compressed (`.gz`) and are
//! decoded per the configured text encoding. The reader yields decoded
//! lines lazily; it knows nothing about the teardown grammar.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use connstats_core::error::{ConnstatsError, Result};
use flate2::read::GzDecoder;
use tracing::warn;

// ── TextEncoding ──────────────────────────────────────────────────────────────

/// Text encoding of the input byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// ISO-8859-1; every byte maps to the code point of the same value.
    #[default]
    Latin1,
    /// UTF-8, decoded lossily so undecodable bytes become `U+FFFD`
    /// instead of dropping the line.
    Utf8,
}

impl TextEncoding {
    /// Map the CLI encoding name to a [`TextEncoding`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "latin-1" => Some(Self::Latin1),
            "utf-8" => Some(Self::Utf8),
            _ => None,
        }
    }

    fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

// ── File discovery ────────────────────────────────────────────────────────────

/// Find all regular files under `data_path` recursively, sorted by path.
pub fn find_log_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Input path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── LineReader ────────────────────────────────────────────────────────────────

/// Lazily yields decoded text lines from one log file.
///
/// Line terminators (`\n`, `\r\n`) are stripped. I/O errors surface as
/// `Err` items; the caller decides how far to read past them.
pub struct LineReader {
    inner: Box<dyn BufRead + Send>,
    encoding: TextEncoding,
}

impl LineReader {
    /// Wrap an already-opened byte stream.
    pub fn new(stream: Box<dyn BufRead + Send>, encoding: TextEncoding) -> Self {
        Self {
            inner: stream,
            encoding,
        }
    }
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl Iterator for LineReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.inner.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
                Some(Ok(self.encoding.decode(&buf)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Open `path` as a decoded line stream, transparently decompressing
/// files that end in `.gz`.
pub fn open_lines(path: &Path, encoding: TextEncoding) -> Result<LineReader> {
    let file = File::open(path).map_err(|source| ConnstatsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let stream: Box<dyn Read + Send> = if path.extension().map(|ext| ext == "gz").unwrap_or(false) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    Ok(LineReader::new(Box::new(BufReader::new(stream)), encoding))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
