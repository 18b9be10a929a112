/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Procedural macros for GSB compile-time code-generation templates.
//!
//! Each macro takes a template body (string literals interleaved with
//! `gsb_for_each!`, `gsb_if!` and `gsb_let!`), expands it at compile time and
//! re-interprets the result:
//!
//! - `gsb_decl!` - as items or statements
//! - `gsb_expr!` - as a block expression
//! - `gsb_string!` - as a string literal
//!
//! Placeholders (`\(name)`) must be written inside raw strings, since `\(` is
//! not a valid escape in a plain string literal.
//!
//! # Example
//!
//! ```ignore
//! gsb_decl! {
//!     gsb_for_each!(["i8", "i16", "i32"]) |int| {
//!         r"fn zero_\(int)() -> \(int) { 0 }"
//!     }
//! }
//! ```

use gsb_engine::TopLevel;
use proc_macro::TokenStream;

/// Expand a template into declarations or statements.
#[proc_macro]
pub fn gsb_decl(input: TokenStream) -> TokenStream {
    expand(TopLevel::Decl, input)
}

/// Expand a template into a block expression `{ ... }`.
#[proc_macro]
pub fn gsb_expr(input: TokenStream) -> TokenStream {
    expand(TopLevel::Expr, input)
}

/// Expand a template into a string literal.
#[proc_macro]
pub fn gsb_string(input: TokenStream) -> TokenStream {
    expand(TopLevel::Str, input)
}

fn expand(top_level: TopLevel, input: TokenStream) -> TokenStream {
    gsb_syntax::expand_tokens(top_level, input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
