/*
 * literal.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! String literal segments of a builder tree.
//!
//! A [`Literal`] keeps its *source form*: the characters between the opening
//! and closing delimiters, exactly as written. Placeholders are substituted on
//! that form, so escapes written by the template author survive substitution
//! untouched. The decoded value is only produced when the literal is emitted.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::ast::NodeRef;

/// Delimiter style of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum LiteralStyle {
    /// `"..."`, with backslash escapes.
    Plain,
    /// `r"..."`, `r#"..."#`, ... with `hashes` pound signs.
    Raw { hashes: usize },
}

impl LiteralStyle {
    /// Whether `source` can sit between this style's delimiters and still
    /// lex as a single string literal.
    pub fn accepts(&self, source: &str) -> bool {
        match *self {
            LiteralStyle::Plain => {
                let mut chars = source.chars();
                while let Some(c) = chars.next() {
                    match c {
                        '"' => return false,
                        // A trailing backslash would escape the closing quote.
                        '\\' if chars.next().is_none() => return false,
                        _ => {}
                    }
                }
                true
            }
            LiteralStyle::Raw { hashes } => {
                let terminator = format!("\"{}", "#".repeat(hashes));
                !source.contains(&terminator)
            }
        }
    }

    /// Opening and closing delimiters, e.g. `r#"` and `"#`.
    pub fn delimiters(&self) -> (String, String) {
        match *self {
            LiteralStyle::Plain => ("\"".to_string(), "\"".to_string()),
            LiteralStyle::Raw { hashes } => {
                let pounds = "#".repeat(hashes);
                (format!("r{pounds}\""), format!("\"{pounds}"))
            }
        }
    }
}

/// A literal string segment, emitted verbatim (after decoding) into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// Source form, without delimiters.
    pub text: String,
    pub style: LiteralStyle,
    pub node: NodeRef,
}

impl Literal {
    pub fn new(text: impl Into<String>, style: LiteralStyle) -> Self {
        Literal {
            text: text.into(),
            style,
            node: NodeRef::default(),
        }
    }

    /// A `"..."` literal.
    pub fn plain(text: impl Into<String>) -> Self {
        Literal::new(text, LiteralStyle::Plain)
    }

    /// A `r#"..."#` literal. Template bodies are usually written this way so
    /// that generated code can contain quotes.
    pub fn raw(text: impl Into<String>) -> Self {
        Literal::new(text, LiteralStyle::Raw { hashes: 1 })
    }

    pub fn with_node(mut self, node: NodeRef) -> Self {
        self.node = node;
        self
    }

    /// The string value this literal denotes.
    pub fn value(&self) -> Cow<'_, str> {
        match self.style {
            LiteralStyle::Plain if self.text.contains('\\') => Cow::Owned(unescape(&self.text)),
            _ => Cow::Borrowed(&self.text),
        }
    }

    /// The literal as it would be written in source, delimiters included.
    pub fn to_source(&self) -> String {
        let (open, close) = self.style.delimiters();
        format!("{open}{}{close}", self.text)
    }
}

enum Escape {
    Char(char),
    /// Line continuation: the newline and leading whitespace are dropped.
    Skip,
    /// Not a known escape; the characters are kept as written.
    Verbatim,
}

/// Decode the backslash escapes of a plain literal's source form.
fn unescape(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let escape = &rest[pos..];
        let (decoded, len) = decode_escape(escape);
        match decoded {
            Escape::Char(c) => out.push(c),
            Escape::Skip => {}
            Escape::Verbatim => out.push_str(&escape[..len]),
        }
        rest = &escape[len..];
    }
    out.push_str(rest);
    out
}

/// Decode the escape at the start of `s` (which begins with a backslash),
/// returning how many bytes it spans.
fn decode_escape(s: &str) -> (Escape, usize) {
    let Some(c) = s[1..].chars().next() else {
        return (Escape::Verbatim, 1);
    };
    let simple = match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    };
    if let Some(ch) = simple {
        return (Escape::Char(ch), 2);
    }
    match c {
        'x' => {
            let value = s
                .get(2..4)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .filter(|value| *value <= 0x7f);
            if let Some(value) = value {
                return (Escape::Char(char::from(value)), 4);
            }
        }
        'u' => {
            if let Some(close) = s[2..].strip_prefix('{').and_then(|inner| inner.find('}')) {
                let digits: String = s[3..3 + close].chars().filter(|c| *c != '_').collect();
                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32);
                if let Some(ch) = decoded {
                    return (Escape::Char(ch), 3 + close + 1);
                }
            }
        }
        '\n' => {
            let after = &s[2..];
            let skipped = after.len() - after.trim_start().len();
            return (Escape::Skip, 2 + skipped);
        }
        _ => {}
    }
    (Escape::Verbatim, 1 + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Lexical acceptance
    // ========================================================================

    #[test]
    fn test_plain_rejects_bare_quote() {
        assert!(LiteralStyle::Plain.accepts("let x = 1;"));
        assert!(LiteralStyle::Plain.accepts(r#"say \"hi\""#));
        assert!(!LiteralStyle::Plain.accepts(r#"say "hi""#));
    }

    #[test]
    fn test_plain_rejects_trailing_backslash() {
        assert!(!LiteralStyle::Plain.accepts(r"ends with \"));
        assert!(LiteralStyle::Plain.accepts(r"ends with \\"));
    }

    #[test]
    fn test_raw_rejects_its_terminator() {
        let zero = LiteralStyle::Raw { hashes: 0 };
        let one = LiteralStyle::Raw { hashes: 1 };
        assert!(!zero.accepts(r#"a "quote""#));
        assert!(one.accepts(r#"a "quote""#));
        assert!(!one.accepts(r##"broken "# here"##));
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(Literal::plain("a").to_source(), r#""a""#);
        assert_eq!(
            Literal::new("a", LiteralStyle::Raw { hashes: 2 }).to_source(),
            r###"r##"a"##"###
        );
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    #[test]
    fn test_raw_value_is_verbatim() {
        let lit = Literal::raw(r"a\nb");
        assert_eq!(lit.value(), r"a\nb");
    }

    #[test]
    fn test_plain_value_decodes_escapes() {
        let lit = Literal::plain(r#"a\nb\t\"c\"\\"#);
        assert_eq!(lit.value(), "a\nb\t\"c\"\\");
    }

    #[test]
    fn test_plain_value_hex_and_unicode() {
        assert_eq!(Literal::plain(r"\x41\u{1F600}").value(), "A\u{1F600}");
        assert_eq!(Literal::plain(r"\u{1_0}").value(), "\u{10}");
    }

    #[test]
    fn test_plain_value_line_continuation() {
        assert_eq!(Literal::plain("one \\\n    two").value(), "one two");
    }

    #[test]
    fn test_unknown_escape_kept_verbatim() {
        // Placeholders that were never bound stay readable in the output.
        assert_eq!(Literal::plain(r"\(name)").value(), r"\(name)");
        assert_eq!(Literal::plain(r"\xZZ").value(), r"\xZZ");
    }
}
