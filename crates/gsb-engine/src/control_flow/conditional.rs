/*
 * control_flow/conditional.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! `gsb_if!(subject, predicate: operand) { body }`
//!
//! The subject is compared by exact string equality (after any enclosing
//! substitution) against a single value or a list of values. The body is
//! expanded when the predicate holds and contributes nothing otherwise. The
//! body form is validated either way.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{require_block, unrecognized_form};
use crate::ast::{Argument, Block, Invocation, NodeRef};
use crate::error::{Diagnostic, GsbResult};
use crate::expand::expand;

/// The four comparisons `If` supports, named by their argument labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    EqualTo,
    NotEqualTo,
    In,
    NotIn,
}

impl Predicate {
    pub const ALL: [Predicate; 4] = [
        Predicate::EqualTo,
        Predicate::NotEqualTo,
        Predicate::In,
        Predicate::NotIn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Predicate::EqualTo => "equals_to",
            Predicate::NotEqualTo => "not_equals_to",
            Predicate::In => "in",
            Predicate::NotIn => "not_in",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Predicate::ALL.into_iter().find(|p| p.label() == label)
    }

    /// Whether the operand is a list of values rather than a single value.
    pub fn takes_list(self) -> bool {
        matches!(self, Predicate::In | Predicate::NotIn)
    }
}

/// A predicate together with its operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    EqualTo(String),
    NotEqualTo(String),
    In(Vec<String>),
    NotIn(Vec<String>),
}

impl Condition {
    pub fn predicate(&self) -> Predicate {
        match self {
            Condition::EqualTo(_) => Predicate::EqualTo,
            Condition::NotEqualTo(_) => Predicate::NotEqualTo,
            Condition::In(_) => Predicate::In,
            Condition::NotIn(_) => Predicate::NotIn,
        }
    }

    pub fn holds(&self, subject: &str) -> bool {
        match self {
            Condition::EqualTo(value) => subject == value,
            Condition::NotEqualTo(value) => subject != value,
            Condition::In(values) => values.iter().any(|v| v == subject),
            Condition::NotIn(values) => !values.iter().any(|v| v == subject),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If<'a> {
    pub subject: String,
    pub condition: Condition,
    pub body: &'a Block,
    pub node: NodeRef,
}

pub(super) fn resolve(invocation: &Invocation) -> GsbResult<If<'_>> {
    let (subject_arg, operand_arg) = match invocation.args.as_slice() {
        [] => return Err(Diagnostic::invalid_argument_kind(invocation.node).into()),
        [subject, operand] if subject.label.is_none() => (subject, operand),
        _ => return Err(unrecognized_form(invocation)),
    };
    let predicate = operand_arg
        .label
        .as_deref()
        .and_then(Predicate::from_label)
        .ok_or_else(|| unrecognized_form(invocation))?;

    let subject = string_value(subject_arg)?;
    let condition = match predicate {
        Predicate::EqualTo => Condition::EqualTo(string_value(operand_arg)?),
        Predicate::NotEqualTo => Condition::NotEqualTo(string_value(operand_arg)?),
        Predicate::In => Condition::In(string_list(operand_arg)?),
        Predicate::NotIn => Condition::NotIn(string_list(operand_arg)?),
    };
    let body = require_block(invocation)?;

    Ok(If {
        subject,
        condition,
        body,
        node: invocation.node,
    })
}

fn string_value(argument: &Argument) -> GsbResult<String> {
    argument
        .value
        .as_str()
        .map(|literal| literal.text.clone())
        .ok_or_else(|| Diagnostic::invalid_argument_kind(argument.node).into())
}

fn string_list(argument: &Argument) -> GsbResult<Vec<String>> {
    argument
        .value
        .as_str_array()
        .map(|values| values.into_iter().map(|v| v.text.clone()).collect())
        .ok_or_else(|| Diagnostic::invalid_argument_kind(argument.node).into())
}

impl If<'_> {
    pub fn expand(&self) -> GsbResult<String> {
        if !self.condition.holds(&self.subject) {
            trace!(subject = %self.subject, predicate = self.condition.predicate().label(), "condition false");
            return Ok(String::new());
        }
        expand(&self.body.elements)
    }
}
