/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The macro names GSB recognizes.
//!
//! The table is static and built once on first use. Front-ends consult it to
//! decide whether a `name!(...)` invocation inside a template body is a
//! control-flow construct or an unrecognized element.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The control-flow constructs that may appear inside a template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlFlowKind {
    ForEach,
    If,
    Let,
}

/// The top-level entry points, one per output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopLevel {
    /// Declarations or statements.
    Decl,
    /// A single block expression.
    Expr,
    /// A string literal.
    Str,
}

/// Any macro GSB defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GsbMacro {
    TopLevel(TopLevel),
    ControlFlow(ControlFlowKind),
}

impl ControlFlowKind {
    pub const ALL: [ControlFlowKind; 3] = [
        ControlFlowKind::ForEach,
        ControlFlowKind::If,
        ControlFlowKind::Let,
    ];

    pub fn macro_name(self) -> &'static str {
        match self {
            ControlFlowKind::ForEach => "gsb_for_each",
            ControlFlowKind::If => "gsb_if",
            ControlFlowKind::Let => "gsb_let",
        }
    }
}

impl TopLevel {
    pub const ALL: [TopLevel; 3] = [TopLevel::Decl, TopLevel::Expr, TopLevel::Str];

    pub fn macro_name(self) -> &'static str {
        match self {
            TopLevel::Decl => "gsb_decl",
            TopLevel::Expr => "gsb_expr",
            TopLevel::Str => "gsb_string",
        }
    }
}

impl GsbMacro {
    pub fn name(self) -> &'static str {
        match self {
            GsbMacro::TopLevel(top_level) => top_level.macro_name(),
            GsbMacro::ControlFlow(kind) => kind.macro_name(),
        }
    }

    pub fn all() -> impl Iterator<Item = GsbMacro> {
        TopLevel::ALL
            .into_iter()
            .map(GsbMacro::TopLevel)
            .chain(ControlFlowKind::ALL.into_iter().map(GsbMacro::ControlFlow))
    }
}

/// Name -> macro table.
pub static MACRO_TABLE: Lazy<HashMap<&'static str, GsbMacro>> =
    Lazy::new(|| GsbMacro::all().map(|m| (m.name(), m)).collect());

/// Look up a macro by its invocation name.
pub fn lookup(name: &str) -> Option<GsbMacro> {
    MACRO_TABLE.get(name).copied()
}

/// Look up a control-flow construct by its invocation name.
pub fn control_flow(name: &str) -> Option<ControlFlowKind> {
    match lookup(name)? {
        GsbMacro::ControlFlow(kind) => Some(kind),
        GsbMacro::TopLevel(_) => None,
    }
}
