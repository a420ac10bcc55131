use fp_dbg_core::Options;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::Token;

/// `dbg!(expr)`, `dbg!(expr, show_vars)` or `dbg!(expr, show_vars = true)`.
pub struct DbgInput {
    pub expr: syn::Expr,
    pub options: Options,
}

impl Parse for DbgInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let expr: syn::Expr = input.parse()?;
        let options = if input.is_empty() {
            Options::default()
        } else {
            input.parse::<Token![,]>()?;
            let args = Punctuated::<syn::Expr, Token![,]>::parse_terminated(input)?;
            parse_options(&args)?
        };
        Ok(Self { expr, options })
    }
}

/// Options given as `show_vars` or `show_vars = <bool>` expressions.
pub fn parse_options(args: &Punctuated<syn::Expr, Token![,]>) -> syn::Result<Options> {
    let mut options = Options::default();
    for arg in args {
        let (key, value) = match arg {
            syn::Expr::Path(path) => (option_key(path)?, true),
            syn::Expr::Assign(assign) => {
                let syn::Expr::Path(path) = assign.left.as_ref() else {
                    return Err(expected(arg));
                };
                let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(value),
                    ..
                }) = assign.right.as_ref()
                else {
                    return Err(syn::Error::new(
                        assign.right.span(),
                        "expected `true` or `false`",
                    ));
                };
                (option_key(path)?, value.value)
            }
            other => return Err(expected(other)),
        };
        options
            .set(&key.to_string(), value)
            .map_err(|err| syn::Error::new(key.span(), err))?;
    }
    Ok(options)
}

fn option_key(path: &syn::ExprPath) -> syn::Result<&syn::Ident> {
    path.path
        .get_ident()
        .filter(|_| path.qself.is_none())
        .ok_or_else(|| expected(path))
}

fn expected(tokens: impl Spanned) -> syn::Error {
    syn::Error::new(tokens.span(), "expected `show_vars` or `show_vars = <bool>`")
}
