//! Expand command - print what a template expands to

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use gsb_engine::TopLevel;
use tracing::info;

use crate::report::{self, Format};

/// Arguments for the expand command
#[derive(Debug)]
pub struct ExpandArgs {
    pub file: PathBuf,
    pub mode: TopLevel,
    pub format: Format,
    pub output: Option<PathBuf>,
}

/// Execute the expand command. Returns `false` when diagnostics were reported.
pub fn execute(args: ExpandArgs) -> Result<bool> {
    let (source, template) = super::load_template(&args.file)?;

    let text = match template.expand() {
        Ok(text) => text,
        Err(diagnostics) => {
            report::report(
                args.format,
                &args.file,
                &source,
                template.source_map(),
                &diagnostics,
            )?;
            return Ok(false);
        }
    };

    let tokens = match gsb_syntax::emit(args.mode, &text) {
        Ok(tokens) => tokens,
        Err(err) => bail!("{}: {}", args.file.display(), err),
    };
    let rendered = render(args.mode, &text, &tokens.to_string());

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(
                "Expanded {} into {}",
                args.file.display(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }
    Ok(true)
}

/// The text a macro invocation in `mode` would be replaced with.
fn render(mode: TopLevel, text: &str, tokens: &str) -> String {
    let mut rendered = match mode {
        TopLevel::Decl => text.to_string(),
        TopLevel::Expr if text.is_empty() => "{}".to_string(),
        TopLevel::Expr => format!("{{\n{text}\n}}"),
        TopLevel::Str => tokens.to_string(),
    };
    if !rendered.is_empty() {
        rendered.push('\n');
    }
    rendered
}
