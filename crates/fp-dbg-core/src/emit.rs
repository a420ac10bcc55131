//! Run-time side: formatting a trace record and writing it to the sink.
//!
//! A record is assembled into one string and written with a single `write_all` while the
//! sink is locked, so traces from different threads never interleave.

use crate::config::ColorChoice;
use crate::reconstruct::INDENT;
use std::cell::RefCell;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

const HIGHLIGHT: &str = "\x1b[1;36m";
const RESET: &str = "\x1b[0m";
const CLEAR_LINE: &str = "\x1b[K";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

/// A variable and its value, captured before the expression ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: &'static str,
    pub value: String,
}

impl Binding {
    pub fn new(name: &'static str, value: String) -> Self {
        Self { name, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord<'a> {
    pub location: Location,
    pub text: &'a str,
    pub bindings: Vec<Binding>,
    pub result: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub color: bool,
}

impl<'a> TraceRecord<'a> {
    pub fn format(&self, style: Style) -> String {
        let mut out = String::new();
        let header = format!("{}:{}", short_path(self.location.file), self.location.line);
        if style.color {
            out.push_str(&format!("{HIGHLIGHT}{header}{RESET}{CLEAR_LINE}"));
        } else {
            out.push_str(&header);
        }
        out.push('\n');
        for binding in &self.bindings {
            push_entry(&mut out, &format!("{INDENT}{} = ", binding.name), &binding.value);
        }
        push_entry(&mut out, &format!("{} #=> ", self.text), &self.result);
        out
    }
}

/// Appends `head` followed by `value`; continuation lines of the value stay under the body.
fn push_entry(out: &mut String, head: &str, value: &str) {
    out.push_str(head);
    for (idx, line) in value.lines().enumerate() {
        if idx > 0 {
            out.push('\n');
            out.push_str(INDENT);
        }
        out.push_str(line);
    }
    out.push('\n');
}

/// `file` relative to the working directory as `./..`; other paths are returned as is.
pub fn short_path(file: &str) -> String {
    let path = Path::new(file);
    if path.is_absolute() {
        if let Ok(cwd) = std::env::current_dir() {
            if let Ok(rest) = path.strip_prefix(&cwd) {
                return format!("./{}", rest.display());
            }
        }
    }
    file.to_string()
}

thread_local! {
    static CAPTURE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static SINK: Mutex<Option<Box<dyn Write + Send>>> = Mutex::new(None);

/// Runs `f`, collecting the traces it emits on this thread instead of writing them out.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    struct Restore(Option<Option<String>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            if let Some(previous) = self.0.take() {
                CAPTURE.with(|slot| *slot.borrow_mut() = previous);
            }
        }
    }

    let mut restore = Restore(Some(CAPTURE.with(|slot| slot.replace(Some(String::new())))));
    let value = f();
    let previous = restore.0.take().unwrap_or_default();
    let captured = CAPTURE.with(|slot| slot.replace(previous)).unwrap_or_default();
    (value, captured)
}

/// Sends traces of every thread to `sink` until [`reset_sink`].
pub fn set_sink(sink: impl Write + Send + 'static) {
    *SINK.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(sink));
}

pub fn reset_sink() {
    *SINK.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

pub fn emit(record: &TraceRecord<'_>) -> io::Result<()> {
    let captured = CAPTURE.with(|slot| match slot.borrow_mut().as_mut() {
        Some(buffer) => {
            buffer.push_str(&record.format(Style::default()));
            true
        }
        None => false,
    });
    if captured {
        return Ok(());
    }

    let choice = ColorChoice::global();
    let mut sink = SINK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(sink) = sink.as_mut() {
        let text = record.format(Style {
            color: choice.enabled(false),
        });
        sink.write_all(text.as_bytes())?;
        return sink.flush();
    }
    drop(sink);

    let stderr = io::stderr();
    let text = record.format(Style {
        color: choice.enabled(stderr.is_terminal()),
    });
    let mut lock = stderr.lock();
    lock.write_all(text.as_bytes())?;
    lock.flush()
}

/// Entry point of generated code. Panics when the sink fails, like `eprintln!`.
pub fn trace(location: Location, text: &str, bindings: Vec<Binding>, result: String) {
    let record = TraceRecord {
        location,
        text,
        bindings,
        result,
    };
    if let Err(err) = emit(&record) {
        panic!("failed printing trace to sink: {err}");
    }
}
