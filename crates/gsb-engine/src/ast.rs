/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Builder tree types.
//!
//! A template body is an ordered sequence of [`BuilderElement`]s. Literals are
//! emitted as text; [`Invocation`]s are control-flow nodes resolved during
//! expansion. Every node carries a [`NodeRef`] handed out by the front-end, so
//! diagnostics can point back at the syntax that produced them.

use serde::{Deserialize, Serialize};

use crate::control_flow::Condition;
use crate::literal::Literal;
use crate::registry::ControlFlowKind;

/// Opaque handle to a syntax node, owned by whichever front-end built the tree.
///
/// Trees built programmatically use the default handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeRef(pub usize);

/// A template body.
pub type BuilderTree = Vec<BuilderElement>;

/// One element of a template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderElement {
    /// Text emitted verbatim.
    Literal(Literal),
    /// A control-flow construct.
    Invocation(Invocation),
    /// Anything else. Rejected during expansion.
    Unrecognized(NodeRef),
}

impl BuilderElement {
    /// Shorthand for a raw literal element.
    pub fn text(text: impl Into<String>) -> Self {
        BuilderElement::Literal(Literal::raw(text))
    }

    pub fn node(&self) -> NodeRef {
        match self {
            BuilderElement::Literal(literal) => literal.node,
            BuilderElement::Invocation(invocation) => invocation.node,
            BuilderElement::Unrecognized(node) => *node,
        }
    }
}

impl From<Literal> for BuilderElement {
    fn from(literal: Literal) -> Self {
        BuilderElement::Literal(literal)
    }
}

impl From<Invocation> for BuilderElement {
    fn from(invocation: Invocation) -> Self {
        BuilderElement::Invocation(invocation)
    }
}

/// A control-flow invocation as written, before its arguments are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: ControlFlowKind,
    pub args: Vec<Argument>,
    pub body: Body,
    pub node: NodeRef,
}

/// A single argument of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub label: Option<String>,
    pub value: ArgValue,
    pub node: NodeRef,
}

/// The shape of an argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(Literal),
    Array(Vec<ArgValue>),
    Tuple(Vec<ArgValue>),
    /// Any other expression (identifiers, calls, numbers, ...).
    Expr,
}

/// Where the body block of an invocation was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Trailing block: `gsb_let!("x") |v| { ... }`.
    Block(Block),
    /// Closure passed as the last argument: `gsb_let!("x", |v| { ... })`.
    InArguments(Block),
    Missing,
}

/// A body block with its optional parameter clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// `None` when no clause was written; `Some(vec![])` for `||`.
    pub params: Option<Vec<String>>,
    pub elements: BuilderTree,
    pub node: NodeRef,
}

impl Block {
    pub fn new(params: Option<Vec<String>>, elements: BuilderTree) -> Self {
        Block {
            params,
            elements,
            node: NodeRef::default(),
        }
    }

    pub fn with_params(params: &[&str], elements: BuilderTree) -> Self {
        Block::new(
            Some(params.iter().map(|p| p.to_string()).collect()),
            elements,
        )
    }
}

impl Argument {
    pub fn new(value: ArgValue) -> Self {
        Argument {
            label: None,
            value,
            node: NodeRef::default(),
        }
    }

    pub fn labeled(label: impl Into<String>, value: ArgValue) -> Self {
        Argument {
            label: Some(label.into()),
            ..Argument::new(value)
        }
    }

    pub fn with_node(mut self, node: NodeRef) -> Self {
        self.node = node;
        self
    }
}

impl ArgValue {
    pub fn str(text: impl Into<String>) -> Self {
        ArgValue::Str(Literal::plain(text))
    }

    pub fn str_array(items: &[&str]) -> Self {
        ArgValue::Array(items.iter().map(|item| ArgValue::str(*item)).collect())
    }

    pub fn as_str(&self) -> Option<&Literal> {
        match self {
            ArgValue::Str(literal) => Some(literal),
            _ => None,
        }
    }

    /// Elements of an array whose items are all string literals.
    pub fn as_str_array(&self) -> Option<Vec<&Literal>> {
        match self {
            ArgValue::Array(items) => items.iter().map(ArgValue::as_str).collect(),
            _ => None,
        }
    }

    /// Elements of a tuple whose items are all string literals.
    pub fn as_str_tuple(&self) -> Option<Vec<&Literal>> {
        match self {
            ArgValue::Tuple(items) => items.iter().map(ArgValue::as_str).collect(),
            _ => None,
        }
    }
}

impl Invocation {
    pub fn new(kind: ControlFlowKind, args: Vec<Argument>, body: Body) -> Self {
        Invocation {
            kind,
            args,
            body,
            node: NodeRef::default(),
        }
    }

    /// A `ForEach` with a trailing block. Single-column rows are written as a
    /// string array, wider rows as an array of tuples.
    pub fn for_each(rows: &[&[&str]], params: &[&str], elements: BuilderTree) -> Self {
        let single_column = rows.iter().all(|row| row.len() == 1);
        let rows = if single_column {
            ArgValue::Array(rows.iter().map(|row| ArgValue::str(row[0])).collect())
        } else {
            ArgValue::Array(
                rows.iter()
                    .map(|row| ArgValue::Tuple(row.iter().map(|v| ArgValue::str(*v)).collect()))
                    .collect(),
            )
        };
        Invocation::new(
            ControlFlowKind::ForEach,
            vec![Argument::new(rows)],
            Body::Block(Block::with_params(params, elements)),
        )
    }

    /// An `If` with a trailing block.
    pub fn if_(subject: &str, condition: Condition, elements: BuilderTree) -> Self {
        let label = condition.predicate().label();
        let operand = match condition {
            Condition::EqualTo(value) | Condition::NotEqualTo(value) => ArgValue::str(value),
            Condition::In(values) | Condition::NotIn(values) => {
                ArgValue::Array(values.into_iter().map(ArgValue::str).collect())
            }
        };
        Invocation::new(
            ControlFlowKind::If,
            vec![
                Argument::new(ArgValue::str(subject)),
                Argument::labeled(label, operand),
            ],
            Body::Block(Block::new(None, elements)),
        )
    }

    /// A `Let` with a trailing block.
    pub fn let_(value: &str, param: &str, elements: BuilderTree) -> Self {
        Invocation::new(
            ControlFlowKind::Let,
            vec![Argument::new(ArgValue::str(value))],
            Body::Block(Block::with_params(&[param], elements)),
        )
    }

    pub fn with_node(mut self, node: NodeRef) -> Self {
        self.node = node;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_each_single_column_uses_string_array() {
        let invocation = Invocation::for_each(&[&["Int"], &["Double"]], &["t"], vec![]);
        assert_eq!(invocation.args.len(), 1);
        let items = invocation.args[0].value.as_str_array().unwrap();
        assert_eq!(items[1].text, "Double");
    }

    #[test]
    fn test_for_each_wide_rows_use_tuples() {
        let invocation = Invocation::for_each(&[&["a", "0"], &["b", "1"]], &["k", "v"], vec![]);
        let ArgValue::Array(rows) = &invocation.args[0].value else {
            panic!("expected array");
        };
        let row = rows[1].as_str_tuple().unwrap();
        assert_eq!(row[0].text, "b");
        assert_eq!(row[1].text, "1");
    }

    #[test]
    fn test_if_builder_uses_predicate_label() {
        let invocation = Invocation::if_("Int", Condition::NotIn(vec!["Bool".into()]), vec![]);
        assert_eq!(invocation.args[1].label.as_deref(), Some("not_in"));
        assert!(invocation.args[1].value.as_str_array().is_some());
    }

    #[test]
    fn test_mixed_array_is_not_a_string_array() {
        let value = ArgValue::Array(vec![ArgValue::str("a"), ArgValue::Expr]);
        assert!(value.as_str_array().is_none());
    }

    #[test]
    fn test_element_node() {
        let element = BuilderElement::Unrecognized(NodeRef(7));
        assert_eq!(element.node(), NodeRef(7));
    }
}
