//! Raw source bytes cached by file path.
//!
//! The classifier recovers callee and argument text of constructor calls
//! verbatim from byte ranges, so the bytes a tree was parsed from must be
//! the bytes that are sliced. The cache is owned by one classifier and lives
//! for the analysis of a single package.

use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::{EnumscanError, EnumscanResult, IoResultExt};

/// Lazily loaded file contents keyed by path.
#[derive(Debug, Default)]
pub struct SourceTextCache {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl SourceTextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes of `path`, reading the file on first access.
    pub fn load(&mut self, path: &Path) -> EnumscanResult<&[u8]> {
        if !self.files.contains_key(path) {
            let bytes = fs::read(path).with_path(path)?;
            self.files.insert(path.to_path_buf(), bytes);
        }
        self.files
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| EnumscanError::internal(format!("{} vanished from cache", path.display())))
    }

    /// Returns the exact source text of `range` within `path`.
    pub fn slice(&mut self, path: &Path, range: Range<usize>) -> EnumscanResult<String> {
        let bytes = self.load(path)?;
        let slice = bytes.get(range.clone()).ok_or_else(|| {
            EnumscanError::internal(format!(
                "byte range {}..{} out of bounds for {} ({} bytes)",
                range.start,
                range.end,
                path.display(),
                bytes.len()
            ))
        })?;
        Ok(String::from_utf8_lossy(slice).into_owned())
    }
}
