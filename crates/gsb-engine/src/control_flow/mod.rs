/*
 * control_flow/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Control-flow resolvers.
//!
//! Resolving an [`Invocation`] validates its arguments and body form and
//! produces a typed [`ControlFlowOp`]. All validation for a construct happens
//! before any of its text is produced. Expanding the op yields its text.

mod conditional;
mod for_each;
mod let_binding;

pub use conditional::{Condition, If, Predicate};
pub use for_each::{ForEach, MAX_ARITY};
pub use let_binding::Let;

use tracing::debug;

use crate::ast::{Block, Body, BuilderTree, Invocation, NodeRef};
use crate::error::{Diagnostic, Diagnostics, GsbResult};
use crate::registry::ControlFlowKind;
use crate::substitute::{Binding, substitute_tree};

/// A validated control-flow construct, borrowing its body from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlFlowOp<'a> {
    ForEach(ForEach<'a>),
    If(If<'a>),
    Let(Let<'a>),
}

impl<'a> ControlFlowOp<'a> {
    /// Validate `invocation` without expanding it.
    pub fn resolve(invocation: &'a Invocation) -> GsbResult<Self> {
        debug!(
            construct = invocation.kind.macro_name(),
            node = invocation.node.0,
            "resolving invocation"
        );
        Ok(match invocation.kind {
            ControlFlowKind::ForEach => ControlFlowOp::ForEach(for_each::resolve(invocation)?),
            ControlFlowKind::If => ControlFlowOp::If(conditional::resolve(invocation)?),
            ControlFlowKind::Let => ControlFlowOp::Let(let_binding::resolve(invocation)?),
        })
    }

    pub fn expand(&self) -> GsbResult<String> {
        match self {
            ControlFlowOp::ForEach(op) => op.expand(),
            ControlFlowOp::If(op) => op.expand(),
            ControlFlowOp::Let(op) => op.expand(),
        }
    }
}

/// Resolve and expand a single invocation.
pub fn expand_invocation(invocation: &Invocation) -> GsbResult<String> {
    ControlFlowOp::resolve(invocation)?.expand()
}

// ============================================================================
// Shared validation helpers
// ============================================================================

/// The trailing block of `invocation`.
fn require_block(invocation: &Invocation) -> GsbResult<&Block> {
    match &invocation.body {
        Body::Block(block) => Ok(block),
        Body::InArguments(block) => Err(Diagnostic::must_use_body_block_form(
            invocation.node,
            Some(block.node),
        )
        .into()),
        Body::Missing => Err(Diagnostic::must_use_body_block_form(invocation.node, None).into()),
    }
}

/// The block's parameter names, which must number exactly `expected`.
fn require_params(block: &Block, expected: usize) -> GsbResult<&[String]> {
    match &block.params {
        Some(params) if params.len() == expected => Ok(params),
        Some(params) => {
            Err(Diagnostic::missing_parameter_clause(block.node, expected, params.len()).into())
        }
        None => Err(Diagnostic::missing_parameter_clause(block.node, expected, 0).into()),
    }
}

/// An invocation whose argument list has a shape the construct never takes.
fn unrecognized_form(invocation: &Invocation) -> Diagnostics {
    Diagnostic::invalid_builder_element(invocation.node).into()
}

/// Substitute `bindings` into the body, reporting a broken literal at `origin`,
/// the construct that introduced the bindings.
fn substituted_body(block: &Block, bindings: &[Binding], origin: NodeRef) -> GsbResult<BuilderTree> {
    substitute_tree(&block.elements, bindings).map_err(|broken| {
        debug!(
            origin = origin.0,
            literal = broken.node.0,
            "substitution produced an invalid literal"
        );
        Diagnostic::invalid_syntax_after_substitution(origin).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArgValue, Argument, BuilderElement};
    use crate::error::ErrorKind;

    #[test]
    fn test_resolve_dispatches_on_kind() {
        let invocation = Invocation::let_("Int", "t", vec![]);
        let op = ControlFlowOp::resolve(&invocation).unwrap();
        assert!(matches!(op, ControlFlowOp::Let(_)));

        let invocation = Invocation::for_each(&[&["a"]], &["x"], vec![]);
        let op = ControlFlowOp::resolve(&invocation).unwrap();
        assert!(matches!(op, ControlFlowOp::ForEach(_)));
    }

    #[test]
    fn test_missing_body_is_reported_at_invocation() {
        let invocation = Invocation::new(
            ControlFlowKind::Let,
            vec![Argument::new(ArgValue::str("Int"))],
            Body::Missing,
        )
        .with_node(NodeRef(5));
        let err = expand_invocation(&invocation).unwrap_err();
        let diagnostic = err.first().unwrap();
        assert_eq!(diagnostic.kind, ErrorKind::MustUseBodyBlockForm);
        assert_eq!(diagnostic.node, NodeRef(5));
    }

    #[test]
    fn test_body_form_checked_before_arguments() {
        let invocation = Invocation::new(
            ControlFlowKind::ForEach,
            vec![Argument::new(ArgValue::Expr)],
            Body::InArguments(Block::with_params(&["x"], vec![BuilderElement::text("x")])),
        );
        let err = expand_invocation(&invocation).unwrap_err();
        assert_eq!(err.first().unwrap().kind, ErrorKind::MustUseBodyBlockForm);
    }
}
