/*
 * control_flow/for_each.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `gsb_for_each!(rows) |names...| { body }`
//!
//! Rows are either an array of string literals (one value per row) or an
//! array of tuples of string literals, all of the same width. The body is
//! expanded once per row with each name bound to the matching column, and the
//! non-empty results are joined with newlines in row order.

use tracing::trace;

use super::{require_block, require_params, substituted_body, unrecognized_form};
use crate::ast::{ArgValue, Block, Invocation, NodeRef};
use crate::error::{Diagnostic, GsbResult};
use crate::expand::expand;
use crate::substitute::Binding;

/// Widest row a `ForEach` accepts.
pub const MAX_ARITY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForEach<'a> {
    pub rows: Vec<Vec<String>>,
    pub param_names: Vec<String>,
    pub body: &'a Block,
    pub node: NodeRef,
}

pub(super) fn resolve(invocation: &Invocation) -> GsbResult<ForEach<'_>> {
    let body = require_block(invocation)?;

    let argument = match invocation.args.as_slice() {
        [] => return Err(Diagnostic::invalid_argument_kind(invocation.node).into()),
        [argument] if argument.label.is_none() => argument,
        _ => return Err(unrecognized_form(invocation)),
    };
    let rows = rows_of(&argument.value)
        .ok_or_else(|| Diagnostic::invalid_argument_kind(argument.node))?;

    // With no rows there is nothing to infer a width from; one name is expected.
    let arity = rows.first().map_or(1, Vec::len);
    let param_names = require_params(body, arity)?.to_vec();

    Ok(ForEach {
        rows,
        param_names,
        body,
        node: invocation.node,
    })
}

/// Rows of a string array or a uniform array of string tuples.
fn rows_of(value: &ArgValue) -> Option<Vec<Vec<String>>> {
    if let Some(values) = value.as_str_array() {
        return Some(values.into_iter().map(|v| vec![v.text.clone()]).collect());
    }

    let ArgValue::Array(items) = value else {
        return None;
    };
    let tuples = items
        .iter()
        .map(ArgValue::as_str_tuple)
        .collect::<Option<Vec<_>>>()?;
    let arity = tuples.first().map_or(1, Vec::len);
    if !(1..=MAX_ARITY).contains(&arity) || tuples.iter().any(|t| t.len() != arity) {
        return None;
    }
    Some(
        tuples
            .into_iter()
            .map(|tuple| tuple.into_iter().map(|v| v.text.clone()).collect())
            .collect(),
    )
}

impl ForEach<'_> {
    pub fn expand(&self) -> GsbResult<String> {
        let mut expanded = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let bindings: Vec<Binding> = self
                .param_names
                .iter()
                .zip(row)
                .map(|(name, value)| Binding::new(name.as_str(), value.as_str()))
                .collect();
            let elements = substituted_body(self.body, &bindings, self.node)?;
            let text = expand(&elements)?;
            trace!(row = ?row, len = text.len(), "expanded row");
            if !text.is_empty() {
                expanded.push(text);
            }
        }
        Ok(expanded.join("\n"))
    }
}
