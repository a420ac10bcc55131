//! `#[instrument]`: rewriting of postfix `.dbg(..)` calls.

use crate::args::parse_options;
use crate::expand::expand_with;
use fp_dbg_core::Config;
use quote::ToTokens;
use syn::visit_mut::{self, VisitMut};

pub const METHOD: &str = "dbg";

pub struct DbgRewriter<'a> {
    config: &'a Config,
    errors: Vec<syn::Error>,
    rewritten: usize,
}

impl<'a> DbgRewriter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            errors: Vec::new(),
            rewritten: 0,
        }
    }

    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    /// All errors met while rewriting, combined into one.
    pub fn into_error(self) -> Option<syn::Error> {
        self.errors.into_iter().reduce(|mut all, err| {
            all.combine(err);
            all
        })
    }
}

impl VisitMut for DbgRewriter<'_> {
    fn visit_expr_mut(&mut self, expr: &mut syn::Expr) {
        let syn::Expr::MethodCall(call) = expr else {
            return visit_mut::visit_expr_mut(self, expr);
        };
        if call.method != METHOD || call.turbofish.is_some() {
            return visit_mut::visit_expr_mut(self, expr);
        }
        let options = match parse_options(&call.args) {
            Ok(options) => options,
            Err(err) => {
                self.errors.push(err);
                return visit_mut::visit_expr_mut(self, expr);
            }
        };

        // The trace text comes from the receiver as written, nested calls included.
        let original = call.receiver.as_ref().clone();
        let mut receiver = original.clone();
        self.visit_expr_mut(&mut receiver);

        let span = call.method.span();
        let tokens = expand_with(
            &original,
            receiver.to_token_stream(),
            options,
            span,
            self.config,
        );
        tracing::trace!(line = span.start().line, "rewrote .{}() call", METHOD);
        self.rewritten += 1;
        *expr = syn::Expr::Verbatim(tokens);
    }
}

/// Rewrites every `.dbg(..)` call in `item`.
pub fn rewrite_item(item: &mut syn::Item, config: &Config) -> syn::Result<usize> {
    let mut rewriter = DbgRewriter::new(config);
    rewriter.visit_item_mut(item);
    let rewritten = rewriter.rewritten();
    match rewriter.into_error() {
        Some(err) => Err(err),
        None => Ok(rewritten),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_dbg_core::BuildMode;
    use pretty_assertions::assert_eq;

    fn item(source: &str) -> eyre::Result<syn::Item> {
        Ok(syn::parse_str(source)?)
    }

    #[test]
    fn calls_are_replaced_by_traces() -> eyre::Result<()> {
        let mut func = item("fn count(list: Vec<i32>) -> usize { list.iter().count().dbg() }")?;
        let rewritten = rewrite_item(&mut func, &Config::default())?;
        assert_eq!(rewritten, 1);
        let out = func.to_token_stream().to_string();
        assert!(out.contains("__private :: trace"), "{out}");
        assert!(out.contains("\"  list.iter().count()\""), "{out}");
        assert!(!out.contains(". dbg ()"), "{out}");
        Ok(())
    }

    #[test]
    fn nested_calls_are_rewritten_inside_the_outer_trace() -> eyre::Result<()> {
        let mut func = item("fn f(x: i32) -> i32 { (x.dbg() + 1).dbg(show_vars) }")?;
        assert_eq!(rewrite_item(&mut func, &Config::default())?, 2);
        let out = func.to_token_stream().to_string();
        assert_eq!(out.matches("__private :: trace").count(), 2, "{out}");
        assert!(out.contains("\"  (x.dbg() + 1)\""), "{out}");
        Ok(())
    }

    #[test]
    fn production_removes_the_calls() -> eyre::Result<()> {
        let config = Config::default().with_mode(BuildMode::Production);
        let mut func = item("fn f(x: i32) -> i32 { (x + 1).dbg(show_vars) * 2 }")?;
        rewrite_item(&mut func, &config)?;
        let expected = item("fn f(x: i32) -> i32 { (x + 1) * 2 }")?;
        assert_eq!(
            func.to_token_stream().to_string(),
            expected.to_token_stream().to_string()
        );
        Ok(())
    }

    #[test]
    fn other_methods_are_untouched() -> eyre::Result<()> {
        let source = "fn f(x: Vec<u8>) -> usize { x.len().dbg::<u8>() + x.debug() }";
        let mut func = item(source)?;
        assert_eq!(rewrite_item(&mut func, &Config::default())?, 0);
        assert_eq!(
            func.to_token_stream().to_string(),
            item(source)?.to_token_stream().to_string()
        );
        Ok(())
    }

    #[test]
    fn bad_options_are_reported() -> eyre::Result<()> {
        let mut func = item("fn f(x: i32) -> i32 { x.dbg(loud) + x.dbg(1) }")?;
        let err = rewrite_item(&mut func, &Config::default()).unwrap_err();
        assert_eq!(err.into_iter().count(), 2);
        Ok(())
    }
}
