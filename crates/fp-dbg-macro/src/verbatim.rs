//! Canonical text of syntax the lowering keeps unstructured.
//!
//! Fragments are wrapped in a throwaway item, printed with `prettyplease` and cut back
//! out of the printed item.

use itertools::Itertools;

fn unparse(item: syn::Item) -> String {
    prettyplease::unparse(&syn::File {
        shebang: None,
        attrs: Vec::new(),
        items: vec![item],
    })
}

fn cut(printed: &str, prefix: &str, suffix: &str) -> String {
    let body = printed.trim_end();
    let body = body.strip_prefix(prefix).unwrap_or(body).trim_start();
    body.strip_suffix(suffix).unwrap_or(body).to_string()
}

pub fn expr_text(expr: &syn::Expr) -> String {
    let item: syn::Item = syn::parse_quote!(const _: () = #expr;);
    cut(&unparse(item), "const _: () =", ";")
}

pub fn type_text(ty: &syn::Type) -> String {
    let item: syn::Item = syn::parse_quote!(type __FpDbg = #ty;);
    cut(&unparse(item), "type __FpDbg =", ";")
}

pub fn path_text(path: &syn::Path) -> String {
    expr_text(&syn::Expr::Path(syn::ExprPath {
        attrs: Vec::new(),
        qself: None,
        path: path.clone(),
    }))
}

/// `::<T, U>` of a method call.
pub fn turbofish_text(turbofish: &syn::AngleBracketedGenericArguments) -> String {
    let path: syn::Path = syn::parse_quote!(__fp_dbg #turbofish);
    path_text(&path)
        .strip_prefix("__fp_dbg")
        .map(str::to_string)
        .unwrap_or_default()
}

/// A statement as it would appear inside a function body, dedented.
pub fn stmt_text(stmt: &syn::Stmt) -> String {
    let item: syn::Item = syn::parse_quote!(fn __fp_dbg() { #stmt });
    let printed = unparse(item);
    let lines: Vec<&str> = printed.lines().collect();
    match lines.as_slice() {
        [_, body @ .., _] => body
            .iter()
            .map(|line| line.strip_prefix("    ").unwrap_or(line))
            .join("\n"),
        _ => printed,
    }
}

pub fn pat_text(pat: &syn::Pat) -> String {
    if let syn::Pat::Or(or) = pat {
        return or.cases.iter().map(pat_text).join(" | ");
    }
    let stmt: syn::Stmt = syn::parse_quote!(let #pat;);
    cut(&stmt_text(&stmt), "let", ";")
}

pub fn macro_text(mac: &syn::Macro) -> String {
    let expr = syn::Expr::Macro(syn::ExprMacro {
        attrs: Vec::new(),
        mac: mac.clone(),
    });
    expr_text(&expr)
}

pub fn item_text(item: &syn::Item) -> String {
    unparse(item.clone()).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expressions_print_canonically() -> eyre::Result<()> {
        let expr: syn::Expr = syn::parse_str("|x|x*factor")?;
        assert_eq!(expr_text(&expr), "|x| x * factor");
        Ok(())
    }

    #[test]
    fn multi_line_expressions_keep_relative_indent() -> eyre::Result<()> {
        let expr: syn::Expr = syn::parse_str("match value { Some(v) => v, None => 0 }")?;
        assert_eq!(
            expr_text(&expr),
            "match value {\n    Some(v) => v,\n    None => 0,\n}"
        );
        Ok(())
    }

    #[test]
    fn types_patterns_and_turbofish() -> eyre::Result<()> {
        let ty: syn::Type = syn::parse_str("BTreeMap<_,_>")?;
        assert_eq!(type_text(&ty), "BTreeMap<_, _>");

        let pat = syn::parse::Parser::parse_str(syn::Pat::parse_single, "(mut a,b)")?;
        assert_eq!(pat_text(&pat), "(mut a, b)");
        let pat = syn::parse::Parser::parse_str(syn::Pat::parse_multi, "Some(0)|None")?;
        assert_eq!(pat_text(&pat), "Some(0) | None");

        let call: syn::ExprMethodCall = syn::parse_str("it.collect::<Vec<u8>>()")?;
        let turbofish = call.turbofish.expect("turbofish");
        assert_eq!(turbofish_text(&turbofish), "::<Vec<u8>>");
        Ok(())
    }
}
