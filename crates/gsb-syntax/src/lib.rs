/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rust token front-end and back-end for GSB templates.
//!
//! The front-end ([`Template::parse`]) reads the body of a top-level macro
//! and builds the engine's builder tree, registering every node in a
//! [`SourceMap`]. The back-end ([`emit`]) turns the expanded text into
//! declarations, a block expression, or a string literal, and
//! [`to_syn_error`] turns diagnostics into spanned compile errors.
//!
//! # Example
//!
//! ```ignore
//! use gsb_engine::TopLevel;
//!
//! let tokens = r#"gsb_let!("i32") |t| { r"fn zero() -> \(t) { 0 }" }"#.parse()?;
//! let output = gsb_syntax::expand_tokens(TopLevel::Decl, tokens)?;
//! assert_eq!(output.to_string(), "fn zero () -> i32 { 0 }");
//! ```

pub mod emit;
pub mod parser;
pub mod source;

// Re-export main types at crate root
pub use emit::{emit, expand_tokens, to_syn_error};
pub use parser::{Template, split_string_literal};
pub use source::{Location, Range, SourceMap, line_col_to_offset};
