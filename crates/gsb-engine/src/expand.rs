/*
 * expand.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The expansion driver.
//!
//! A body expands to the newline-joined texts of its elements, with elements
//! that expand to the empty string dropped entirely (they leave no blank
//! line). Literals contribute their decoded value; invocations are resolved
//! and expanded recursively.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::ast::BuilderElement;
use crate::control_flow::expand_invocation;
use crate::error::{Diagnostic, Diagnostics, GsbResult};

/// Expand a body to text.
///
/// Unrecognized elements are all reported together before anything else in
/// the body is expanded. Otherwise expansion stops at the first failing
/// construct.
pub fn expand(elements: &[BuilderElement]) -> GsbResult<String> {
    reject_unrecognized(elements)?;

    let mut pieces: Vec<Cow<'_, str>> = Vec::with_capacity(elements.len());
    for element in elements {
        let piece = expand_element(element)?;
        if piece.is_empty() {
            trace!(node = element.node().0, "dropping empty element");
            continue;
        }
        pieces.push(piece);
    }
    Ok(pieces.join("\n"))
}

fn reject_unrecognized(elements: &[BuilderElement]) -> GsbResult<()> {
    let mut diagnostics = Diagnostics::new();
    for element in elements {
        if let BuilderElement::Unrecognized(node) = element {
            debug!(node = node.0, "unrecognized builder element");
            diagnostics.push(Diagnostic::invalid_builder_element(*node));
        }
    }
    diagnostics.into_result()
}

fn expand_element(element: &BuilderElement) -> GsbResult<Cow<'_, str>> {
    match element {
        BuilderElement::Literal(literal) => Ok(literal.value()),
        BuilderElement::Invocation(invocation) => expand_invocation(invocation).map(Cow::Owned),
        BuilderElement::Unrecognized(node) => Err(Diagnostic::invalid_builder_element(*node).into()),
    }
}
