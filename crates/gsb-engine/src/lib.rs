/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Expansion engine for GSB compile-time code-generation templates.
//!
//! A template body is a [`BuilderTree`]: string literals interleaved with
//! control-flow invocations. Expansion turns it into a single string:
//!
//! - Literals are emitted as written (plain literals are unescaped).
//! - `ForEach` repeats its body once per row of string values, binding each
//!   column to a parameter name.
//! - `If` emits its body only when a string comparison holds.
//! - `Let` binds one name for its body.
//! - Inside a body, the placeholder `\(name)` is replaced by the bound value.
//!
//! Element texts are joined with `"\n"`; elements that expand to nothing are
//! dropped. Every malformed construct is reported as a [`Diagnostic`] that
//! names the offending node, optionally with a [`FixIt`].
//!
//! # Architecture
//!
//! The engine is independent of any host syntax. Front-ends build the tree
//! and hand out [`NodeRef`]s; the engine only ever reports them back.
//!
//! # Example
//!
//! ```
//! use gsb_engine::{BuilderElement, Invocation, expand};
//!
//! let tree = vec![BuilderElement::from(Invocation::for_each(
//!     &[&["Int"], &["Double"]],
//!     &["t"],
//!     vec![BuilderElement::text(r"func zero() -> \(t) { 0 }")],
//! ))];
//!
//! assert_eq!(
//!     expand(&tree).unwrap(),
//!     "func zero() -> Int { 0 }\nfunc zero() -> Double { 0 }"
//! );
//! ```

pub mod ast;
pub mod control_flow;
pub mod error;
pub mod expand;
pub mod literal;
pub mod registry;
pub mod substitute;

// Re-export main types at crate root
pub use ast::{ArgValue, Argument, Block, Body, BuilderElement, BuilderTree, Invocation, NodeRef};
pub use control_flow::{Condition, ControlFlowOp, Predicate};
pub use error::{Diagnostic, Diagnostics, ErrorKind, FixIt, GsbResult};
pub use expand::expand;
pub use literal::{Literal, LiteralStyle};
pub use registry::{ControlFlowKind, GsbMacro, TopLevel};
pub use substitute::{Binding, substitute};
