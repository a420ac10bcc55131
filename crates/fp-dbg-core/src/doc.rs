/// A small Wadler-style layout document.
///
/// `Group` renders flat when its content fits the remaining width, otherwise its
/// line breaks are taken. `Soft` is a space when flat, `Break` is nothing when flat.
#[derive(Clone)]
pub enum Doc {
    Nil,
    Text(String),
    Line(LineKind),
    Concat(Vec<Doc>),
    Indent(usize, Box<Doc>),
    Group(Box<Doc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Hard,
    Soft,
    Break,
}

impl Doc {
    pub fn nil() -> Self {
        Doc::Nil
    }

    pub fn text<T: Into<String>>(text: T) -> Self {
        Doc::Text(text.into())
    }

    pub fn hardline() -> Self {
        Doc::Line(LineKind::Hard)
    }

    pub fn softline() -> Self {
        Doc::Line(LineKind::Soft)
    }

    pub fn line_break() -> Self {
        Doc::Line(LineKind::Break)
    }

    pub fn concat(items: Vec<Doc>) -> Self {
        let mut out = Vec::new();
        for item in items {
            match item {
                Doc::Nil => {}
                Doc::Concat(inner) => out.extend(inner),
                other => out.push(other),
            }
        }
        match out.len() {
            0 => Doc::Nil,
            1 => out.pop().unwrap_or(Doc::Nil),
            _ => Doc::Concat(out),
        }
    }

    /// `items` separated by `sep`.
    pub fn join(items: Vec<Doc>, sep: impl Fn() -> Doc) -> Self {
        let mut out = Vec::with_capacity(items.len() * 2);
        for (idx, item) in items.into_iter().enumerate() {
            if idx > 0 {
                out.push(sep());
            }
            out.push(item);
        }
        Doc::concat(out)
    }

    pub fn indent(self, spaces: usize) -> Self {
        if spaces == 0 {
            self
        } else {
            Doc::Indent(spaces, Box::new(self))
        }
    }

    pub fn group(self) -> Self {
        Doc::Group(Box::new(self))
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Flat,
    Break,
}

/// Lays `doc` out within `max_width` columns.
pub fn render(doc: Doc, max_width: usize) -> String {
    let mut out = String::new();

    // Work stack: (indent, mode, doc)
    let mut stack: Vec<(usize, Mode, Doc)> = vec![(0, Mode::Break, doc)];
    let mut col = 0usize;

    while let Some((indent, mode, doc)) = stack.pop() {
        match doc {
            Doc::Nil => {}
            Doc::Text(s) => {
                col += s.chars().count();
                out.push_str(&s);
            }
            Doc::Line(kind) => match (kind, mode) {
                (LineKind::Soft, Mode::Flat) => {
                    out.push(' ');
                    col += 1;
                }
                (LineKind::Break, Mode::Flat) => {}
                _ => {
                    newline(&mut out, indent);
                    col = indent;
                }
            },
            Doc::Concat(items) => {
                for item in items.into_iter().rev() {
                    stack.push((indent, mode, item));
                }
            }
            Doc::Indent(extra, doc) => {
                stack.push((indent + extra, mode, *doc));
            }
            Doc::Group(doc) => {
                let doc = *doc;
                let fits_flat = fits(max_width.saturating_sub(col), indent, &doc, &stack);
                stack.push((indent, if fits_flat { Mode::Flat } else { Mode::Break }, doc));
            }
        }
    }

    out
}

fn newline(out: &mut String, indent: usize) {
    // Drop trailing spaces left by a broken soft line.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(indent));
}

fn fits(remaining: usize, indent: usize, doc: &Doc, rest: &[(usize, Mode, Doc)]) -> bool {
    let mut remaining = remaining as isize;
    let mut stack: Vec<(usize, Mode, &Doc)> = Vec::new();
    for (i, m, d) in rest.iter() {
        stack.push((*i, *m, d));
    }
    stack.push((indent, Mode::Flat, doc));

    while remaining >= 0 {
        let Some((indent, mode, doc)) = stack.pop() else {
            return true;
        };
        match doc {
            Doc::Nil => {}
            Doc::Text(s) => {
                remaining -= s.chars().count() as isize;
            }
            Doc::Line(kind) => match (kind, mode) {
                (LineKind::Soft, Mode::Flat) => remaining -= 1,
                (LineKind::Break, Mode::Flat) => {}
                _ => return true,
            },
            Doc::Concat(items) => {
                for item in items.iter().rev() {
                    stack.push((indent, mode, item));
                }
            }
            Doc::Indent(extra, doc) => stack.push((indent + extra, mode, doc)),
            Doc::Group(doc) => stack.push((indent, Mode::Flat, doc)),
        }
    }

    false
}
