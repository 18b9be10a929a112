/*
 * source.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mapping from [`NodeRef`]s back to the tokens (and source text) they came from.

use proc_macro2::{LineColumn, Span, TokenStream, TokenTree};
use serde::{Deserialize, Serialize};

use gsb_engine::NodeRef;

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

/// A range in source text from start to end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Range {
    pub fn offsets(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }
}

/// The tokens behind every node handed to the engine.
///
/// Node handles are indices into this map, allocated in parse order.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    nodes: Vec<TokenStream>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tokens: &[TokenTree]) -> NodeRef {
        let node = NodeRef(self.nodes.len());
        self.nodes.push(tokens.iter().cloned().collect());
        node
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tokens(&self, node: NodeRef) -> Option<&TokenStream> {
        self.nodes.get(node.0)
    }

    /// Span of the node's first token, or the call site for unknown nodes.
    pub fn span(&self, node: NodeRef) -> Span {
        self.tokens(node)
            .and_then(|tokens| tokens.clone().into_iter().next())
            .map_or_else(Span::call_site, |token| token.span())
    }

    /// The node's extent within `source`, the text its tokens were lexed from.
    pub fn range(&self, node: NodeRef, source: &str) -> Option<Range> {
        let mut tokens = self.tokens(node)?.clone().into_iter();
        let first = tokens.next()?;
        let last = tokens.last().unwrap_or_else(|| first.clone());
        Some(Range {
            start: location(source, first.span().start())?,
            end: location(source, last.span().end())?,
        })
    }
}

fn location(source: &str, position: LineColumn) -> Option<Location> {
    // Token positions count lines from 1.
    let row = position.line.checked_sub(1)?;
    let offset = line_col_to_offset(source, row, position.column)?;
    Some(Location {
        offset,
        row,
        column: position.column,
    })
}

/// Convert line and column numbers to a byte offset
///
/// Line and column are 0-indexed. Returns None if out of bounds.
pub fn line_col_to_offset(source: &str, line: usize, col: usize) -> Option<usize> {
    let mut current_line = 0;
    let mut current_col = 0;
    let mut offset = 0;

    for ch in source.chars() {
        if current_line == line && current_col == col {
            return Some(offset);
        }

        if ch == '\n' {
            current_line += 1;
            current_col = 0;
        } else {
            current_col += 1;
        }

        offset += ch.len_utf8();
    }

    // Check if we're at the end position
    if current_line == line && current_col == col {
        return Some(offset);
    }

    None
}
