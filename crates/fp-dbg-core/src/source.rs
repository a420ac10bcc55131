use std::path::{Path, PathBuf};

/// A source file split into lines on demand.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    source: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_path_buf(), source))
    }

    pub fn new(path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            path,
            source,
            line_starts,
        }
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        let idx = line - 1;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.source.len());
        self.source
            .get(start..end)
            .map(|s| s.trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Lines `lo..=hi`, or `None` when any of them is missing.
    pub fn lines_between(&self, lo: usize, hi: usize) -> Option<Vec<&str>> {
        (lo..=hi).map(|line| self.line_text(line)).collect()
    }
}

fn compute_line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, ch) in source.char_indices() {
        if ch == '\n' && idx + 1 < source.len() {
            starts.push(idx + 1);
        }
    }
    starts
}
