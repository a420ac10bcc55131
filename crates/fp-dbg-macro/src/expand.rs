//! Code generation for one instrumented call site.

use crate::config;
use crate::lower::Lowerer;
use crate::span;
use fp_dbg_core::instrument::{instrument, Instrumentation, TracePlan};
use fp_dbg_core::{Config, Options};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote_spanned;

/// Instruments `original`, emitting `body` as the code that evaluates it.
///
/// `body` differs from `original` only when nested call sites inside it were already
/// rewritten.
pub fn expand(
    original: &syn::Expr,
    body: TokenStream,
    options: Options,
    call_span: Span,
) -> syn::Result<TokenStream> {
    let config = config::global().map_err(|err| syn::Error::new(call_span, err))?;
    Ok(expand_with(original, body, options, call_span, config))
}

pub fn expand_with(
    original: &syn::Expr,
    body: TokenStream,
    options: Options,
    call_span: Span,
    config: &Config,
) -> TokenStream {
    let node = Lowerer::new().lower_expr(original);
    let site = span::call_site(call_span);
    match instrument(&node, &site, options, config) {
        Instrumentation::Bypass(_) => body,
        Instrumentation::Trace(plan) => traced(&plan, body, call_span),
    }
}

fn traced(plan: &TracePlan<'_>, body: TokenStream, call_span: Span) -> TokenStream {
    let private = quote_spanned!(call_span=> ::fp_dbg::__private);
    let bindings_ident = Ident::new("__fp_dbg_bindings", Span::mixed_site());
    let result_ident = Ident::new("__fp_dbg_result", Span::mixed_site());
    let names = plan.vars.iter().map(|name| name.as_str());
    let idents = plan.vars.iter().map(|name| binding_ident(name.as_str(), call_span));
    let text = &plan.text;

    quote_spanned! {call_span=>
        ::core::convert::identity({
            #[allow(unused_imports)]
            use #private::{RenderDebug as _, RenderOpaque as _};
            let #bindings_ident: ::std::vec::Vec<#private::Binding> = ::std::vec![
                #(#private::Binding::new(#names, (&&#private::Probe(&#idents)).render_value())),*
            ];
            match ::core::convert::identity(#body) {
                #result_ident => {
                    #private::trace(
                        #private::Location::new(::core::file!(), ::core::line!()),
                        #text,
                        #bindings_ident,
                        (&&#private::Probe(&#result_ident)).render_value(),
                    );
                    #result_ident
                }
            }
        })
    }
}

fn binding_ident(name: &str, span: Span) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, span),
        None => Ident::new(name, span),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fp_dbg_core::BuildMode;
    use quote::{quote, ToTokens};

    fn expand_str(source: &str, options: Options, config: &Config) -> eyre::Result<String> {
        let expr: syn::Expr = syn::parse_str(source)?;
        let body = expr.to_token_stream();
        Ok(expand_with(&expr, body, options, Span::call_site(), config).to_string())
    }

    #[test]
    fn production_emits_the_expression_alone() -> eyre::Result<()> {
        let config = Config::default().with_mode(BuildMode::Production);
        let out = expand_str("x + y", Options::show_vars(), &config)?;
        assert_eq!(out, quote!(x + y).to_string());
        Ok(())
    }

    #[test]
    fn development_traces_the_expression() -> eyre::Result<()> {
        let out = expand_str("x + y", Options::default(), &Config::default())?;
        assert!(out.contains("__private :: trace"), "{out}");
        assert!(out.contains("\"  x + y\""), "{out}");
        assert!(out.contains("identity (x + y)"), "{out}");
        assert!(!out.contains("Binding :: new"), "{out}");
        Ok(())
    }

    #[test]
    fn show_vars_snapshots_each_variable() -> eyre::Result<()> {
        let out = expand_str("x + y * x", Options::show_vars(), &Config::default())?;
        assert_eq!(out.matches("Binding :: new").count(), 2, "{out}");
        assert!(out.contains("Binding :: new (\"x\""), "{out}");
        assert!(out.contains("Binding :: new (\"y\""), "{out}");
        Ok(())
    }

    #[test]
    fn raw_identifiers_stay_raw() {
        assert_eq!(binding_ident("r#type", Span::call_site()).to_string(), "r#type");
        assert_eq!(binding_ident("total", Span::call_site()).to_string(), "total");
    }
}
