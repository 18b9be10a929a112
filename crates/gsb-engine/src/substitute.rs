/*
 * substitute.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Placeholder substitution.
//!
//! A placeholder is the exact text `\(name)`. Substitution is purely textual
//! on the source form of string literals: no escaping is applied to the
//! value, and a placeholder whose name is not bound is left as written.
//!
//! Substitution over a tree walks every literal reachable from a body,
//! including the arguments and bodies of nested invocations. A nested block
//! that declares a parameter with the same name as an outer binding shadows
//! it: the outer value is not substituted inside that block.

use std::borrow::Cow;

use tracing::trace;

use crate::ast::{ArgValue, Argument, Block, Body, BuilderElement, BuilderTree, Invocation, NodeRef};
use crate::literal::Literal;
use crate::registry::ControlFlowKind;

/// A name bound to a string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Binding {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The placeholder text this binding replaces.
    pub fn placeholder(&self) -> String {
        format!("\\({})", self.name)
    }
}

/// Replace every occurrence of `binding`'s placeholder in `text`.
pub fn substitute(text: &str, binding: &Binding) -> String {
    text.replace(&binding.placeholder(), &binding.value)
}

/// Replace the placeholders of all `bindings` in a single left-to-right pass.
///
/// Substituted values are never rescanned, so a value that itself looks like
/// a placeholder is emitted as-is. When a name is bound twice the first
/// binding wins.
pub fn substitute_all<'a>(text: &'a str, bindings: &[Binding]) -> Cow<'a, str> {
    if bindings.is_empty() || !text.contains("\\(") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut changed = false;
    while let Some(start) = rest.find("\\(") {
        let after = &rest[start + 2..];
        let bound = after.find(')').and_then(|close| {
            let name = &after[..close];
            bindings
                .iter()
                .find(|binding| binding.name == name)
                .map(|binding| (binding, close))
        });
        match bound {
            Some((binding, close)) => {
                out.push_str(&rest[..start]);
                out.push_str(&binding.value);
                rest = &after[close + 1..];
                changed = true;
            }
            None => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }

    if !changed {
        return Cow::Borrowed(text);
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// A literal that no longer lexes after substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenLiteral {
    pub node: NodeRef,
}

/// Substitute `bindings` throughout a body.
pub fn substitute_tree(
    elements: &[BuilderElement],
    bindings: &[Binding],
) -> Result<BuilderTree, BrokenLiteral> {
    elements
        .iter()
        .map(|element| substitute_element(element, bindings))
        .collect()
}

fn substitute_element(
    element: &BuilderElement,
    bindings: &[Binding],
) -> Result<BuilderElement, BrokenLiteral> {
    Ok(match element {
        BuilderElement::Literal(literal) => {
            BuilderElement::Literal(substitute_literal(literal, bindings)?)
        }
        BuilderElement::Invocation(invocation) => {
            BuilderElement::Invocation(substitute_invocation(invocation, bindings)?)
        }
        BuilderElement::Unrecognized(node) => BuilderElement::Unrecognized(*node),
    })
}

fn substitute_literal(literal: &Literal, bindings: &[Binding]) -> Result<Literal, BrokenLiteral> {
    match substitute_all(&literal.text, bindings) {
        Cow::Borrowed(_) => Ok(literal.clone()),
        Cow::Owned(text) => {
            if !literal.style.accepts(&text) {
                trace!(node = literal.node.0, %text, "substitution broke literal");
                return Err(BrokenLiteral { node: literal.node });
            }
            Ok(Literal {
                text,
                style: literal.style,
                node: literal.node,
            })
        }
    }
}

fn substitute_invocation(
    invocation: &Invocation,
    bindings: &[Binding],
) -> Result<Invocation, BrokenLiteral> {
    let args = invocation
        .args
        .iter()
        .map(|arg| {
            Ok(Argument {
                label: arg.label.clone(),
                value: substitute_value(&arg.value, bindings)?,
                node: arg.node,
            })
        })
        .collect::<Result<_, _>>()?;

    // `If` declares no names, so its clause (if any) shadows nothing.
    let binds_names = invocation.kind != ControlFlowKind::If;
    let body = match &invocation.body {
        Body::Block(block) => Body::Block(substitute_block(block, bindings, binds_names)?),
        Body::InArguments(block) => {
            Body::InArguments(substitute_block(block, bindings, binds_names)?)
        }
        Body::Missing => Body::Missing,
    };

    Ok(Invocation {
        kind: invocation.kind,
        args,
        body,
        node: invocation.node,
    })
}

fn substitute_block(
    block: &Block,
    bindings: &[Binding],
    binds_names: bool,
) -> Result<Block, BrokenLiteral> {
    let visible: Cow<'_, [Binding]> = match &block.params {
        Some(params) if binds_names => Cow::Owned(
            bindings
                .iter()
                .filter(|binding| !params.contains(&binding.name))
                .cloned()
                .collect(),
        ),
        _ => Cow::Borrowed(bindings),
    };
    Ok(Block {
        params: block.params.clone(),
        elements: substitute_tree(&block.elements, &visible)?,
        node: block.node,
    })
}

fn substitute_value(value: &ArgValue, bindings: &[Binding]) -> Result<ArgValue, BrokenLiteral> {
    Ok(match value {
        ArgValue::Str(literal) => ArgValue::Str(substitute_literal(literal, bindings)?),
        ArgValue::Array(items) => ArgValue::Array(substitute_values(items, bindings)?),
        ArgValue::Tuple(items) => ArgValue::Tuple(substitute_values(items, bindings)?),
        ArgValue::Expr => ArgValue::Expr,
    })
}

fn substitute_values(items: &[ArgValue], bindings: &[Binding]) -> Result<Vec<ArgValue>, BrokenLiteral> {
    items
        .iter()
        .map(|item| substitute_value(item, bindings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::LiteralStyle;

    fn bindings(pairs: &[(&str, &str)]) -> Vec<Binding> {
        pairs.iter().map(|(n, v)| Binding::new(*n, *v)).collect()
    }

    // ========================================================================
    // Text substitution
    // ========================================================================

    #[test]
    fn test_substitute_replaces_every_occurrence() {
        let binding = Binding::new("t", "Int");
        assert_eq!(substitute(r"\(t) + \(t)", &binding), "Int + Int");
    }

    #[test]
    fn test_substitute_without_placeholder_is_identity() {
        let binding = Binding::new("t", "Int");
        assert_eq!(substitute("no placeholders", &binding), "no placeholders");
    }

    #[test]
    fn test_substitute_is_idempotent() {
        let binding = Binding::new("t", "Int");
        let once = substitute(r"let x: \(t)", &binding);
        assert_eq!(substitute(&once, &binding), once);
    }

    #[test]
    fn test_substitute_all_leaves_unbound_names() {
        let text = r"\(key) = \(other)";
        let result = substitute_all(text, &bindings(&[("key", "flag")]));
        assert_eq!(result, r"flag = \(other)");
    }

    #[test]
    fn test_substitute_all_borrows_when_unchanged() {
        let text = r"\(other)";
        let result = substitute_all(text, &bindings(&[("key", "flag")]));
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_substitute_all_does_not_rescan_values() {
        let result = substitute_all(r"\(a)", &bindings(&[("a", r"\(b)"), ("b", "x")]));
        assert_eq!(result, r"\(b)");
    }

    #[test]
    fn test_substitute_all_nested_opening() {
        let result = substitute_all(r"\(\(a))", &bindings(&[("a", "x")]));
        assert_eq!(result, r"\(x)");
    }

    #[test]
    fn test_substitute_all_unterminated() {
        let result = substitute_all(r"\(a", &bindings(&[("a", "x")]));
        assert_eq!(result, r"\(a");
    }

    // ========================================================================
    // Tree substitution
    // ========================================================================

    #[test]
    fn test_tree_substitution_reaches_nested_arguments() {
        let tree = vec![BuilderElement::Invocation(Invocation::if_(
            r"\(t)",
            crate::control_flow::Condition::EqualTo("Int".into()),
            vec![BuilderElement::text(r"\(t)")],
        ))];
        let result = substitute_tree(&tree, &bindings(&[("t", "Bool")])).unwrap();
        let BuilderElement::Invocation(invocation) = &result[0] else {
            panic!("expected invocation");
        };
        assert_eq!(invocation.args[0].value.as_str().unwrap().text, "Bool");
        let Body::Block(block) = &invocation.body else {
            panic!("expected block");
        };
        assert_eq!(block.elements[0], BuilderElement::text("Bool"));
    }

    #[test]
    fn test_tree_substitution_respects_shadowing() {
        let tree = vec![BuilderElement::Invocation(Invocation::let_(
            "inner",
            "t",
            vec![BuilderElement::text(r"\(t)")],
        ))];
        let result = substitute_tree(&tree, &bindings(&[("t", "outer")])).unwrap();
        assert_eq!(result, tree);
    }

    #[test]
    fn test_tree_substitution_rejects_broken_literal() {
        let literal = Literal::plain(r"x = \(v)").with_node(NodeRef(9));
        let tree = vec![BuilderElement::Literal(literal)];
        let err = substitute_tree(&tree, &bindings(&[("v", r#""}()"#)])).unwrap_err();
        assert_eq!(err, BrokenLiteral { node: NodeRef(9) });
    }

    #[test]
    fn test_tree_substitution_raw_literal_accepts_quotes() {
        let literal = Literal::new(r"x = \(v)", LiteralStyle::Raw { hashes: 1 });
        let tree = vec![BuilderElement::Literal(literal)];
        let result = substitute_tree(&tree, &bindings(&[("v", r#""hi""#)])).unwrap();
        assert_eq!(result[0], BuilderElement::text(r#"x = "hi""#));
    }
}
