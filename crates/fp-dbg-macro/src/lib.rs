//! Procedural macros behind `fp_dbg`.
//!
//! Both macros follow the `FP_DBG_ENV` of the build: production builds get the expression
//! back untouched, every other build gets the tracing code.

mod args;
mod config;
mod expand;
mod lower;
mod rewrite;
mod span;
mod verbatim;

use args::DbgInput;
use proc_macro::TokenStream;
use quote::{quote, ToTokens};
use syn::parse_macro_input;

/// Traces an expression and returns its value.
///
/// ```ignore
/// let total = fp_dbg::dbg!(price * quantity, show_vars);
/// ```
#[proc_macro]
pub fn dbg(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DbgInput);
    let body = input.expr.to_token_stream();
    expand::expand(
        &input.expr,
        body,
        input.options,
        proc_macro2::Span::call_site(),
    )
    .unwrap_or_else(syn::Error::into_compile_error)
    .into()
}

/// Turns every postfix `.dbg()` / `.dbg(show_vars)` call in the item into a trace of
/// its receiver.
///
/// ```ignore
/// #[fp_dbg::instrument]
/// fn total(list: &[i32]) -> i32 {
///     list.iter()
///         .map(|x| x * 2)
///         .sum::<i32>()
///         .dbg()
/// }
/// ```
#[proc_macro_attribute]
pub fn instrument(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = proc_macro2::TokenStream::from(attr);
    if !attr.is_empty() {
        return syn::Error::new_spanned(attr, "`instrument` takes no arguments")
            .into_compile_error()
            .into();
    }
    let mut item = parse_macro_input!(item as syn::Item);
    let config = match config::global() {
        Ok(config) => config,
        Err(err) => {
            return syn::Error::new(proc_macro2::Span::call_site(), err)
                .into_compile_error()
                .into()
        }
    };
    let errors = match rewrite::rewrite_item(&mut item, config) {
        Ok(_) => proc_macro2::TokenStream::new(),
        Err(err) => err.into_compile_error(),
    };
    quote!(#item #errors).into()
}
