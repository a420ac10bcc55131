//! Recovery of the original text of a multi-line pipeline.
//!
//! Re-rendering a tree loses the author's layout. When an expression spans several lines
//! and is piped into the instrumentation call on the line right after it, the source
//! lines are read back and re-indented instead.

use crate::ast::Node;
use crate::locate::{source_range, SourceRange};
use crate::source::SourceFile;
use std::path::PathBuf;
use thiserror::Error;

/// Continuation token of a Rust method chain.
pub const RUST_PIPE_TOKEN: &str = ".";

/// Indent put in front of every reconstructed line.
pub const INDENT: &str = "  ";

/// Where the instrumentation call itself appears.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// `None` for sources without a file on disk.
    pub file: Option<PathBuf>,
    pub line: usize,
}

impl CallSite {
    pub fn new(file: Option<PathBuf>, line: usize) -> Self {
        Self { file, line }
    }
}

/// Why the original text could not be used.
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("call site has no source file")]
    NoSourceFile,
    #[error("expression carries no line information")]
    NoLineInfo,
    #[error("expression fits on line {0}")]
    SingleLine(usize),
    #[error("expression ends on line {line_max}, which is not above the call on line {call_line}")]
    NotAboveCall { line_max: usize, call_line: usize },
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lines {line_min}..={line_max} are not all present in {}", path.display())]
    OutOfRange {
        path: PathBuf,
        line_min: usize,
        line_max: usize,
    },
    #[error("call line does not start with `{0}`")]
    NotPiped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstructor {
    pipe_token: String,
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new(RUST_PIPE_TOKEN)
    }
}

impl Reconstructor {
    pub fn new(pipe_token: impl Into<String>) -> Self {
        Self {
            pipe_token: pipe_token.into(),
        }
    }

    pub fn reconstruct(&self, site: &CallSite, node: &Node) -> Result<String, Unavailable> {
        self.reconstruct_range(site, source_range(node))
    }

    pub fn reconstruct_range(
        &self,
        site: &CallSite,
        range: SourceRange,
    ) -> Result<String, Unavailable> {
        let path = site.file.as_ref().ok_or(Unavailable::NoSourceFile)?;
        let (line_min, line_max) = range.lines().ok_or(Unavailable::NoLineInfo)?;
        if line_min >= line_max {
            return Err(Unavailable::SingleLine(line_min));
        }
        if line_max >= site.line {
            return Err(Unavailable::NotAboveCall {
                line_max,
                call_line: site.line,
            });
        }
        let file = SourceFile::read(path).map_err(|source| Unavailable::Unreadable {
            path: path.clone(),
            source,
        })?;
        let out_of_range = || Unavailable::OutOfRange {
            path: path.clone(),
            line_min,
            line_max,
        };
        let call_line = file.line_text(site.line).ok_or_else(out_of_range)?;
        if !call_line.trim().starts_with(&self.pipe_token) {
            return Err(Unavailable::NotPiped(self.pipe_token.clone()));
        }
        let lines = file.lines_between(line_min, line_max).ok_or_else(out_of_range)?;
        Ok(reindent(&lines, range.column))
    }
}

/// Strips the common leading whitespace and prefixes every line with [`INDENT`].
///
/// When the expression starts mid-line (`let total = list`), the head line is cut at
/// `column` and the continuation lines are indented one step under it.
pub fn reindent(lines: &[&str], column: Option<usize>) -> String {
    let Some((head, rest)) = lines.split_first() else {
        return String::new();
    };
    match column.filter(|&column| column > leading_width(head)) {
        Some(column) => {
            let head: String = head.chars().skip(column).collect();
            std::iter::once(format!("{INDENT}{head}"))
                .chain(dedent(rest).map(|line| format!("{INDENT}{INDENT}{line}")))
                .collect::<Vec<_>>()
                .join("\n")
        }
        None => dedent(lines)
            .map(|line| format!("{INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn dedent<'a>(lines: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    let width = lines.iter().map(|line| leading_width(line)).min().unwrap_or(0);
    lines.iter().map(move |line| line.chars().skip(width).collect())
}

fn leading_width(line: &str) -> usize {
    line.chars().take_while(|ch| ch.is_whitespace()).count()
}
