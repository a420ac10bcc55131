//! Expansion-time decision for one instrumented call site.

use crate::ast::{Name, Node};
use crate::config::{Config, Options};
use crate::extract::variables;
use crate::reconstruct::{CallSite, Reconstructor, INDENT};
use crate::render::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    /// Original source lines, re-indented.
    Reconstructed,
    /// Canonical rendering of the tree.
    Rendered,
}

/// Everything the generated code needs, computed once at expansion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracePlan<'a> {
    pub expr: &'a Node,
    pub call_site: CallSite,
    /// Expression text with every line already indented under the location header.
    pub text: String,
    pub source: TextSource,
    /// Variables to report, empty unless `show_vars` was requested.
    pub vars: Vec<Name>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instrumentation<'a> {
    /// Production build: the expression is emitted as is.
    Bypass(&'a Node),
    Trace(TracePlan<'a>),
}

impl<'a> Instrumentation<'a> {
    pub fn plan(&self) -> Option<&TracePlan<'a>> {
        match self {
            Instrumentation::Bypass(_) => None,
            Instrumentation::Trace(plan) => Some(plan),
        }
    }
}

pub fn instrument<'a>(
    node: &'a Node,
    call_site: &CallSite,
    options: Options,
    config: &Config,
) -> Instrumentation<'a> {
    if config.mode.is_production() {
        return Instrumentation::Bypass(node);
    }

    let reconstructor = Reconstructor::new(config.pipe_token.as_str());
    let (text, source) = match reconstructor.reconstruct(call_site, node) {
        Ok(text) => (text, TextSource::Reconstructed),
        Err(reason) => {
            debug!(line = call_site.line, %reason, "original text unavailable, rendering");
            (indent_body(&render(node, config.width)), TextSource::Rendered)
        }
    };
    let vars = if options.show_vars {
        variables(node)
    } else {
        Vec::new()
    };
    trace!(line = call_site.line, ?source, vars = vars.len(), "planned trace");

    Instrumentation::Trace(TracePlan {
        expr: node,
        call_site: call_site.clone(),
        text,
        source,
        vars,
    })
}

/// Prefixes every line with the body indent.
pub fn indent_body(text: &str) -> String {
    text.lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
