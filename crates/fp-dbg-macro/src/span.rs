use fp_dbg_core::ast::{Pos, SourceSpan};
use fp_dbg_core::reconstruct::CallSite;
use proc_macro2::{Span, TokenStream, TokenTree};

/// Start of `span`, or `None` when the compiler gives no line information.
pub fn start(span: Span) -> Option<Pos> {
    let start = span.start();
    (start.line > 0).then(|| Pos::new(start.line, start.column))
}

pub fn end(span: Span) -> Option<Pos> {
    let end = span.end();
    (end.line > 0).then(|| Pos::new(end.line, end.column))
}

/// Position of the first and last token of `tokens`.
pub fn tokens_span(tokens: TokenStream) -> Option<SourceSpan> {
    let mut iter = tokens.into_iter();
    let first = iter.next()?;
    let last = iter.last().unwrap_or_else(|| first.clone());
    let lo = start(open_span(&first))?;
    let hi = end(close_span(&last))?;
    Some(SourceSpan { lo, hi })
}

pub fn between(lo: Span, hi: Span) -> Option<SourceSpan> {
    Some(SourceSpan {
        lo: start(lo)?,
        hi: end(hi)?,
    })
}

fn open_span(token: &TokenTree) -> Span {
    match token {
        TokenTree::Group(group) => group.span_open(),
        other => other.span(),
    }
}

fn close_span(token: &TokenTree) -> Span {
    match token {
        TokenTree::Group(group) => group.span_close(),
        other => other.span(),
    }
}

/// File and line of an instrumentation call.
pub fn call_site(span: Span) -> CallSite {
    CallSite::new(span.local_file(), span.start().line)
}
