/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Diagnostics produced while expanding a template.
//!
//! Each [`Diagnostic`] names one [`ErrorKind`] from a closed taxonomy, the
//! node it concerns, and optionally a [`FixIt`] describing the mechanical
//! rewrite that resolves it. Expansion stops at the first failing construct,
//! except that every unrecognized element of a body is reported together.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::ast::NodeRef;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// The body was missing or passed as an argument instead of a trailing block.
    #[error("the body must be written as a trailing block")]
    MustUseBodyBlockForm,

    /// The body's parameter clause is absent or declares the wrong number of names.
    #[error(
        "the body block must declare {expected} parameter name(s) in a `|...|` clause, found {found}"
    )]
    MissingParameterClause { expected: usize, found: usize },

    /// An argument is not a string literal or a structure of string literals.
    #[error("arguments must be string literals or arrays/tuples of string literals")]
    InvalidArgumentKind,

    /// A body element is neither a literal nor a control-flow invocation.
    #[error("only string literals and gsb control-flow macros are allowed here")]
    InvalidBuilderElement,

    /// Substituting a placeholder broke the enclosing literal's syntax.
    #[error("substituted text is no longer a valid string literal")]
    InvalidSyntaxAfterSubstitution,
}

impl ErrorKind {
    /// Stable identifier, used as the diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MustUseBodyBlockForm => "GSB-1",
            ErrorKind::MissingParameterClause { .. } => "GSB-2",
            ErrorKind::InvalidArgumentKind => "GSB-3",
            ErrorKind::InvalidBuilderElement => "GSB-4",
            ErrorKind::InvalidSyntaxAfterSubstitution => "GSB-5",
        }
    }
}

/// A suggested mechanical rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fix", rename_all = "snake_case")]
pub enum FixIt {
    /// Move the closure out of the argument list into a trailing block.
    UseBodyBlock { invocation: NodeRef, body: NodeRef },
    /// Write (or replace) the block's parameter clause with `names`.
    InsertParameterClause { block: NodeRef, names: Vec<String> },
}

impl FixIt {
    /// A parameter clause with `count` placeholder names: `name0, name1, ...`.
    pub fn parameter_clause(block: NodeRef, count: usize) -> Self {
        FixIt::InsertParameterClause {
            block,
            names: (0..count).map(|i| format!("name{i}")).collect(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            FixIt::UseBodyBlock { .. } => {
                "move the closure out of the argument list into a trailing block".to_string()
            }
            FixIt::InsertParameterClause { names, .. } => {
                format!("insert the parameter clause `|{}|`", names.join(", "))
            }
        }
    }
}

/// A single diagnostic: what went wrong, where, and how to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}")]
pub struct Diagnostic {
    #[serde(flatten)]
    pub kind: ErrorKind,
    pub node: NodeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_it: Option<FixIt>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, node: NodeRef) -> Self {
        Diagnostic {
            kind,
            node,
            fix_it: None,
        }
    }

    pub fn with_fix_it(mut self, fix_it: FixIt) -> Self {
        self.fix_it = Some(fix_it);
        self
    }

    /// Reported at the closure when there is one, otherwise at the invocation.
    pub fn must_use_body_block_form(invocation: NodeRef, closure: Option<NodeRef>) -> Self {
        match closure {
            Some(body) => Diagnostic::new(ErrorKind::MustUseBodyBlockForm, body)
                .with_fix_it(FixIt::UseBodyBlock { invocation, body }),
            None => Diagnostic::new(ErrorKind::MustUseBodyBlockForm, invocation),
        }
    }

    pub fn missing_parameter_clause(block: NodeRef, expected: usize, found: usize) -> Self {
        Diagnostic::new(ErrorKind::MissingParameterClause { expected, found }, block)
            .with_fix_it(FixIt::parameter_clause(block, expected))
    }

    pub fn invalid_argument_kind(node: NodeRef) -> Self {
        Diagnostic::new(ErrorKind::InvalidArgumentKind, node)
    }

    pub fn invalid_builder_element(node: NodeRef) -> Self {
        Diagnostic::new(ErrorKind::InvalidBuilderElement, node)
    }

    pub fn invalid_syntax_after_substitution(node: NodeRef) -> Self {
        Diagnostic::new(ErrorKind::InvalidSyntaxAfterSubstitution, node)
    }
}

/// The diagnostics of one failed expansion. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics(Vec::new())
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Diagnostic> {
        self.0.first()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> GsbResult<()> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {}", diagnostic.kind.code(), diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Diagnostics(vec![diagnostic])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result type for expansion operations.
pub type GsbResult<T> = Result<T, Diagnostics>;
