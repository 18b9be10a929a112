/*
 * control_flow/let_binding.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `gsb_let!(value) |name| { body }` binds one name for the body.

use super::{require_block, require_params, substituted_body, unrecognized_form};
use crate::ast::{Block, Invocation, NodeRef};
use crate::error::{Diagnostic, GsbResult};
use crate::expand::expand;
use crate::substitute::Binding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Let<'a> {
    pub value: String,
    pub param_name: String,
    pub body: &'a Block,
    pub node: NodeRef,
}

pub(super) fn resolve(invocation: &Invocation) -> GsbResult<Let<'_>> {
    let body = require_block(invocation)?;

    let value = match invocation.args.as_slice() {
        [] => return Err(Diagnostic::invalid_argument_kind(invocation.node).into()),
        [argument] if argument.label.is_none() => argument
            .value
            .as_str()
            .map(|literal| literal.text.clone())
            .ok_or_else(|| Diagnostic::invalid_argument_kind(argument.node))?,
        _ => return Err(unrecognized_form(invocation)),
    };
    let param_name = require_params(body, 1)?[0].clone();

    Ok(Let {
        value,
        param_name,
        body,
        node: invocation.node,
    })
}

impl Let<'_> {
    pub fn expand(&self) -> GsbResult<String> {
        let binding = Binding::new(self.param_name.as_str(), self.value.as_str());
        let elements = substituted_body(self.body, &[binding], self.node)?;
        expand(&elements)
    }
}
