/*
 * emit.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Back-end: turns an expansion into output tokens, or its diagnostics into
//! compile errors.

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::LitStr;
use tracing::debug;

use gsb_engine::{Diagnostic, Diagnostics, TopLevel};

use crate::parser::Template;
use crate::source::SourceMap;

/// Expand a top-level macro body and emit it in the macro's output mode.
pub fn expand_tokens(top_level: TopLevel, tokens: TokenStream) -> syn::Result<TokenStream> {
    let template = Template::parse(tokens);
    let text = template
        .expand()
        .map_err(|diagnostics| to_syn_error(&diagnostics, template.source_map()))?;
    debug!(
        mode = top_level.macro_name(),
        len = text.len(),
        "expanded template"
    );
    emit(top_level, &text)
}

/// Re-interpret expanded text in the given output mode.
pub fn emit(top_level: TopLevel, text: &str) -> syn::Result<TokenStream> {
    match top_level {
        TopLevel::Decl => lex(text),
        TopLevel::Expr => {
            let body = lex(text)?;
            Ok(quote! { { #body } })
        }
        TopLevel::Str => Ok(LitStr::new(text, Span::call_site()).into_token_stream()),
    }
}

fn lex(text: &str) -> syn::Result<TokenStream> {
    text.parse::<TokenStream>().map_err(|err| {
        syn::Error::new(
            Span::call_site(),
            format!("expanded template is not valid Rust: {err}"),
        )
    })
}

/// One compile error per diagnostic, spanning the offending node.
pub fn to_syn_error(diagnostics: &Diagnostics, source_map: &SourceMap) -> syn::Error {
    let mut errors = diagnostics
        .iter()
        .map(|diagnostic| diagnostic_error(diagnostic, source_map));
    let mut combined = errors
        .next()
        .unwrap_or_else(|| syn::Error::new(Span::call_site(), "template expansion failed"));
    for error in errors {
        combined.combine(error);
    }
    combined
}

fn diagnostic_error(diagnostic: &Diagnostic, source_map: &SourceMap) -> syn::Error {
    let message = match &diagnostic.fix_it {
        Some(fix_it) => format!(
            "{} [{}]\nhelp: {}",
            diagnostic.kind,
            diagnostic.kind.code(),
            fix_it.message()
        ),
        None => format!("{} [{}]", diagnostic.kind, diagnostic.kind.code()),
    };
    match source_map.tokens(diagnostic.node) {
        Some(tokens) => syn::Error::new_spanned(tokens, message),
        None => syn::Error::new(Span::call_site(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> TokenStream {
        source.parse().unwrap()
    }

    #[test]
    fn test_emit_decl() {
        let output = emit(TopLevel::Decl, "fn a() {}\nfn b() {}").unwrap();
        assert_eq!(output.to_string(), tokens("fn a() {} fn b() {}").to_string());
    }

    #[test]
    fn test_emit_expr_wraps_in_block() {
        let output = emit(TopLevel::Expr, "let x = 1;\nx + 1").unwrap();
        let block: syn::ExprBlock = syn::parse2(output).unwrap();
        assert_eq!(block.block.stmts.len(), 2);
    }

    #[test]
    fn test_emit_str() {
        let output = emit(TopLevel::Str, "line one\nline \"two\"").unwrap();
        let literal: LitStr = syn::parse2(output).unwrap();
        assert_eq!(literal.value(), "line one\nline \"two\"");
    }

    #[test]
    fn test_emit_rejects_unbalanced_output() {
        assert!(emit(TopLevel::Decl, "fn a() {").is_err());
        assert!(emit(TopLevel::Expr, "(").is_err());
        // Any text is a valid string literal.
        assert!(emit(TopLevel::Str, "fn a() {").is_ok());
    }

    #[test]
    fn test_expand_tokens_for_each() {
        let output = expand_tokens(
            TopLevel::Decl,
            tokens(r#"gsb_for_each!(["a", "b"]) |n| { r"fn \(n)() {}" }"#),
        )
        .unwrap();
        assert_eq!(output.to_string(), tokens("fn a() {} fn b() {}").to_string());
    }

    #[test]
    fn test_diagnostics_become_one_error_each() {
        let err = expand_tokens(TopLevel::Decl, tokens(r#"a; "ok"; b"#)).unwrap_err();
        let messages: Vec<String> = err.into_iter().map(|e| e.to_string()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("[GSB-4]"));
    }

    #[test]
    fn test_fix_it_rendered_as_help() {
        let err = expand_tokens(
            TopLevel::Decl,
            tokens(r#"gsb_for_each!([("a", "b")]) { "x" }"#),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "the body block must declare 2 parameter name(s) in a `|...|` clause, found 0 [GSB-2]\n\
             help: insert the parameter clause `|name0, name1|`"
        );
    }
}
