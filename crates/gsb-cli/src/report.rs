/*
 * report.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering of expansion diagnostics for the terminal or as JSON.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::Result;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use clap::ValueEnum;
use gsb_engine::{Diagnostic, Diagnostics};
use gsb_syntax::{Range, SourceMap};
use serde_json::json;

/// Diagnostic output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Annotated source snippets on stderr
    Text,
    /// A JSON array on stdout
    Json,
}

/// Print diagnostics in the requested format.
pub fn report(
    format: Format,
    path: &Path,
    source: &str,
    source_map: &SourceMap,
    diagnostics: &Diagnostics,
) -> Result<()> {
    match format {
        Format::Text => {
            let mut stderr = io::stderr().lock();
            for diagnostic in diagnostics {
                let range = source_map.range(diagnostic.node, source);
                stderr.write_all(render_text(path, source, range.as_ref(), diagnostic).as_bytes())?;
            }
        }
        Format::Json => {
            let entries: Vec<serde_json::Value> = diagnostics
                .iter()
                .map(|diagnostic| {
                    let range = source_map.range(diagnostic.node, source);
                    to_json(path, range.as_ref(), diagnostic)
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

/// Render one diagnostic with ariadne, falling back to a single line when
/// the node has no position in the file.
pub fn render_text(path: &Path, source: &str, range: Option<&Range>, diagnostic: &Diagnostic) -> String {
    let code = diagnostic.kind.code();
    let Some(range) = range else {
        let mut line = format!("error[{code}]: {} ({})\n", diagnostic.kind, path.display());
        if let Some(fix_it) = &diagnostic.fix_it {
            line.push_str(&format!("  help: {}\n", fix_it.message()));
        }
        return line;
    };

    let file = path.display().to_string();
    // ariadne counts characters, not bytes.
    let start = source[..range.start.offset].chars().count();
    let end = start + source[range.offsets()].chars().count();

    let mut report = Report::build(ReportKind::Error, file.clone(), start)
        .with_code(code)
        .with_message(diagnostic.kind.to_string())
        .with_config(Config::default().with_color(io::stderr().is_terminal()))
        .with_label(
            Label::new((file.clone(), start..end))
                .with_message(label_message(diagnostic))
                .with_color(Color::Red),
        );
    if let Some(fix_it) = &diagnostic.fix_it {
        report = report.with_help(fix_it.message());
    }

    let mut output = Vec::new();
    if report
        .finish()
        .write((file, Source::from(source)), &mut output)
        .is_err()
    {
        return format!("error[{code}]: {}\n", diagnostic.kind);
    }
    String::from_utf8_lossy(&output).into_owned()
}

fn label_message(diagnostic: &Diagnostic) -> &'static str {
    use gsb_engine::ErrorKind::*;
    match diagnostic.kind {
        MustUseBodyBlockForm => "body passed as an argument",
        MissingParameterClause { .. } => "parameter clause missing or wrong size",
        InvalidArgumentKind => "not a string literal",
        InvalidBuilderElement => "not allowed in a template body",
        InvalidSyntaxAfterSubstitution => "substitution breaks a literal in here",
    }
}

/// JSON form of a diagnostic; `range` is null when the node has no position.
pub fn to_json(path: &Path, range: Option<&Range>, diagnostic: &Diagnostic) -> serde_json::Value {
    json!({
        "code": diagnostic.kind.code(),
        "message": diagnostic.kind.to_string(),
        "file": path.display().to_string(),
        "range": range,
        "diagnostic": diagnostic,
        "help": diagnostic.fix_it.as_ref().map(|fix_it| fix_it.message()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsb_syntax::Template;
    use pretty_assertions::assert_eq;

    fn first_diagnostic(source: &str) -> (Template, Diagnostic) {
        let template = Template::from_source(source).unwrap();
        let diagnostics = template.expand().unwrap_err();
        let diagnostic = diagnostics.first().unwrap().clone();
        (template, diagnostic)
    }

    #[test]
    fn test_json_entry() {
        let source = r#""a" value"#;
        let (template, diagnostic) = first_diagnostic(source);
        let range = template.source_map().range(diagnostic.node, source);
        let entry = to_json(Path::new("t.gsb"), range.as_ref(), &diagnostic);

        assert_eq!(entry["code"], "GSB-4");
        assert_eq!(entry["file"], "t.gsb");
        assert_eq!(entry["range"]["start"]["offset"], 4);
        assert_eq!(entry["range"]["end"]["offset"], 9);
        assert_eq!(entry["diagnostic"]["kind"], "invalid_builder_element");
        assert!(entry["help"].is_null());
    }

    #[test]
    fn test_json_entry_with_fix_it() {
        let source = r#"gsb_for_each!(["a"]) { "x" }"#;
        let (template, diagnostic) = first_diagnostic(source);
        let range = template.source_map().range(diagnostic.node, source);
        let entry = to_json(Path::new("t.gsb"), range.as_ref(), &diagnostic);

        assert_eq!(entry["code"], "GSB-2");
        assert_eq!(entry["diagnostic"]["expected"], 1);
        assert_eq!(entry["help"], "insert the parameter clause `|name0|`");
    }

    #[test]
    fn test_text_mentions_code_and_help() {
        let source = "gsb_let!(\"Int\", |t| { \"x\" })\n";
        let (template, diagnostic) = first_diagnostic(source);
        let range = template.source_map().range(diagnostic.node, source);
        let text = render_text(Path::new("t.gsb"), source, range.as_ref(), &diagnostic);

        assert!(text.contains("GSB-1"));
        assert!(text.contains("trailing block"));
        assert!(text.contains("move the closure out of the argument list"));
    }

    #[test]
    fn test_text_without_range() {
        let (_, diagnostic) = first_diagnostic("value");
        let text = render_text(Path::new("t.gsb"), "value", None, &diagnostic);
        assert_eq!(
            text,
            "error[GSB-4]: only string literals and gsb control-flow macros are allowed here (t.gsb)\n"
        );
    }
}
