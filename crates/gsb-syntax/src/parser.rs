/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Front-end: builds a [`BuilderTree`] from Rust tokens.
//!
//! The accepted surface syntax is
//!
//! ```text
//! element    := string-literal | invocation | <anything else, up to `;`>
//! invocation := name ! ( arguments ) [ |params| ] { element* }
//! argument   := [label :] value
//! value      := string-literal | [ value, ... ] | ( value, ... ) | <expression>
//! ```
//!
//! Parsing never fails. Anything that does not fit the grammar becomes an
//! unrecognized element or an opaque expression argument, and the engine
//! reports it with the node's tokens as location.

use proc_macro2::{Delimiter, Group, Ident, LexError, Spacing, TokenStream, TokenTree};
use tracing::{debug, trace};

use gsb_engine::registry;
use gsb_engine::{
    ArgValue, Argument, Block, Body, BuilderElement, BuilderTree, Diagnostics, Invocation,
    Literal, LiteralStyle,
};

use crate::source::SourceMap;

/// A parsed template body, ready to expand.
#[derive(Debug, Clone)]
pub struct Template {
    elements: BuilderTree,
    source_map: SourceMap,
}

impl Template {
    /// Parse the body of a top-level macro.
    pub fn parse(tokens: TokenStream) -> Self {
        let mut parser = Parser {
            source_map: SourceMap::new(),
        };
        let elements = parser.parse_elements(tokens);
        debug!(
            elements = elements.len(),
            nodes = parser.source_map.len(),
            "parsed template"
        );
        Template {
            elements,
            source_map: parser.source_map,
        }
    }

    /// Lex and parse template source text.
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        Ok(Template::parse(source.parse()?))
    }

    pub fn elements(&self) -> &[BuilderElement] {
        &self.elements
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn expand(&self) -> Result<String, Diagnostics> {
        gsb_engine::expand(&self.elements)
    }
}

struct Parser {
    source_map: SourceMap,
}

/// An argument, plus its body block when the argument is a closure.
struct ParsedArgument {
    argument: Argument,
    closure: Option<Block>,
}

impl Parser {
    fn parse_elements(&mut self, tokens: TokenStream) -> BuilderTree {
        let tokens: Vec<TokenTree> = tokens.into_iter().collect();
        let mut elements = Vec::new();
        let mut pos = 0;
        while pos < tokens.len() {
            if is_punct(&tokens[pos], ';') {
                pos += 1;
                continue;
            }
            let (element, next) = self.parse_element(&tokens, pos);
            elements.push(element);
            pos = next;
        }
        elements
    }

    fn parse_element(&mut self, tokens: &[TokenTree], start: usize) -> (BuilderElement, usize) {
        if let Some(literal) = self.string_literal(&tokens[start]) {
            return (BuilderElement::Literal(literal), start + 1);
        }
        if let Some((invocation, next)) = self.parse_invocation(tokens, start) {
            return (BuilderElement::Invocation(invocation), next);
        }

        let end = unrecognized_end(tokens, start);
        trace!(tokens = end - start, "unrecognized element");
        let node = self.source_map.register(&tokens[start..end]);
        (BuilderElement::Unrecognized(node), end)
    }

    fn parse_invocation(
        &mut self,
        tokens: &[TokenTree],
        start: usize,
    ) -> Option<(Invocation, usize)> {
        let (name, group) = macro_call(tokens, start)?;
        let kind = registry::control_flow(&name.to_string())?;

        let mut arguments = self.parse_arguments(group.stream());
        let mut next = start + 3;
        let body = if let Some((block, after)) = self.parse_block(tokens, next) {
            next = after;
            Body::Block(block)
        } else if let Some(closure) = arguments.last_mut().and_then(|last| last.closure.take()) {
            arguments.pop();
            Body::InArguments(closure)
        } else {
            Body::Missing
        };

        let node = self.source_map.register(&tokens[start..next]);
        let invocation = Invocation {
            kind,
            args: arguments.into_iter().map(|parsed| parsed.argument).collect(),
            body,
            node,
        };
        Some((invocation, next))
    }

    /// `[|params|] { elements }` starting at `start`.
    fn parse_block(&mut self, tokens: &[TokenTree], start: usize) -> Option<(Block, usize)> {
        let (params, brace) = parse_params(tokens, start)?;
        let TokenTree::Group(group) = tokens.get(brace)? else {
            return None;
        };
        if group.delimiter() != Delimiter::Brace {
            return None;
        }

        let elements = self.parse_elements(group.stream());
        let node = self.source_map.register(&tokens[start..=brace]);
        Some((
            Block {
                params,
                elements,
                node,
            },
            brace + 1,
        ))
    }

    fn parse_arguments(&mut self, stream: TokenStream) -> Vec<ParsedArgument> {
        let tokens: Vec<TokenTree> = stream.into_iter().collect();
        split_arguments(&tokens)
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .map(|segment| self.parse_argument(segment))
            .collect()
    }

    fn parse_argument(&mut self, tokens: &[TokenTree]) -> ParsedArgument {
        let (label, value) = match tokens {
            [TokenTree::Ident(label), colon, rest @ ..] if is_label_colon(colon) => {
                (Some(label_name(label)), rest)
            }
            _ => (None, tokens),
        };

        let closure = self
            .parse_block(value, 0)
            .filter(|(_, end)| *end == value.len())
            .map(|(block, _)| block);
        let value = self.classify(value);
        let node = self.source_map.register(tokens);

        ParsedArgument {
            argument: Argument { label, value, node },
            closure,
        }
    }

    fn classify(&mut self, tokens: &[TokenTree]) -> ArgValue {
        let [token] = tokens else {
            return ArgValue::Expr;
        };
        match token {
            TokenTree::Literal(_) => self.string_literal(token).map_or(ArgValue::Expr, ArgValue::Str),
            TokenTree::Group(group) => self.classify_group(group),
            _ => ArgValue::Expr,
        }
    }

    fn classify_group(&mut self, group: &Group) -> ArgValue {
        let inner: Vec<TokenTree> = group.stream().into_iter().collect();
        let items = split_arguments(&inner);
        match group.delimiter() {
            Delimiter::Bracket => ArgValue::Array(self.classify_items(&items)),
            // `(x)` is just a parenthesized `x`; a tuple needs a comma or no items.
            Delimiter::Parenthesis if items.len() == 1 && !inner.is_empty() => self.classify(&inner),
            Delimiter::Parenthesis => ArgValue::Tuple(self.classify_items(&items)),
            Delimiter::None => self.classify(&inner),
            Delimiter::Brace => ArgValue::Expr,
        }
    }

    fn classify_items(&mut self, items: &[&[TokenTree]]) -> Vec<ArgValue> {
        items
            .iter()
            .filter(|item| !item.is_empty())
            .map(|item| self.classify(item))
            .collect()
    }

    fn string_literal(&mut self, token: &TokenTree) -> Option<Literal> {
        let TokenTree::Literal(literal) = token else {
            return None;
        };
        let (text, style) = split_string_literal(&literal.to_string())?;
        let node = self.source_map.register(std::slice::from_ref(token));
        Some(Literal::new(text, style).with_node(node))
    }
}

/// Split a string literal's source form into its contents and delimiter style.
///
/// Byte strings, C strings and suffixed literals are not template text.
pub fn split_string_literal(repr: &str) -> Option<(String, LiteralStyle)> {
    if let Some(rest) = repr.strip_prefix('r') {
        let hashes = rest.len() - rest.trim_start_matches('#').len();
        let pounds = "#".repeat(hashes);
        let text = rest[hashes..]
            .strip_prefix('"')?
            .strip_suffix(pounds.as_str())?
            .strip_suffix('"')?;
        return Some((text.to_string(), LiteralStyle::Raw { hashes }));
    }
    let text = repr.strip_prefix('"')?.strip_suffix('"')?;
    Some((text.to_string(), LiteralStyle::Plain))
}

fn macro_call(tokens: &[TokenTree], start: usize) -> Option<(&Ident, &Group)> {
    match tokens.get(start..start + 3)? {
        [TokenTree::Ident(name), TokenTree::Punct(bang), TokenTree::Group(args)]
            if bang.as_char() == '!' =>
        {
            Some((name, args))
        }
        _ => None,
    }
}

/// End of an unrecognized element: a whole foreign macro call, or everything
/// up to the next `;`.
fn unrecognized_end(tokens: &[TokenTree], start: usize) -> usize {
    if macro_call(tokens, start).is_some() {
        return start + 3;
    }
    tokens[start..]
        .iter()
        .position(|token| is_punct(token, ';'))
        .map_or(tokens.len(), |offset| start + offset)
}

/// `|a, b|`, `||` or nothing at `start`. Returns the names and the index after
/// the clause; `None` when a clause is opened but malformed.
fn parse_params(tokens: &[TokenTree], start: usize) -> Option<(Option<Vec<String>>, usize)> {
    if !tokens.get(start).is_some_and(|token| is_punct(token, '|')) {
        return Some((None, start));
    }
    let close = start + 1 + tokens[start + 1..].iter().position(|token| is_punct(token, '|'))?;
    let names = split_arguments(&tokens[start + 1..close])
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .map(param_name)
        .collect::<Option<Vec<_>>>()?;
    Some((Some(names), close + 1))
}

/// The bound name of `name`, `mut name` or `name: Type`.
fn param_name(segment: &[TokenTree]) -> Option<String> {
    segment.iter().find_map(|token| match token {
        TokenTree::Ident(ident) if ident != "mut" => Some(ident.to_string()),
        _ => None,
    })
}

/// Split on top-level commas, keeping the commas of a closure's parameter
/// clause inside its argument.
fn split_arguments(tokens: &[TokenTree]) -> Vec<&[TokenTree]> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_params = false;
    for (pos, token) in tokens.iter().enumerate() {
        if is_punct(token, '|') && (in_params || closure_may_start(&tokens[start..pos])) {
            in_params = !in_params;
        } else if !in_params && is_punct(token, ',') {
            segments.push(&tokens[start..pos]);
            start = pos + 1;
        }
    }
    segments.push(&tokens[start..]);
    segments
}

fn closure_may_start(prefix: &[TokenTree]) -> bool {
    match prefix {
        [] => true,
        [TokenTree::Ident(_), colon] => is_label_colon(colon),
        _ => false,
    }
}

fn label_name(label: &Ident) -> String {
    let name = label.to_string();
    match name.strip_prefix("r#") {
        Some(raw) => raw.to_string(),
        None => name,
    }
}

fn is_label_colon(token: &TokenTree) -> bool {
    matches!(token, TokenTree::Punct(p) if p.as_char() == ':' && p.spacing() == Spacing::Alone)
}

fn is_punct(token: &TokenTree, c: char) -> bool {
    matches!(token, TokenTree::Punct(p) if p.as_char() == c)
}
