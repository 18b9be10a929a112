//! Check command - validate a template without printing its expansion

use std::path::PathBuf;

use anyhow::{Result, bail};
use gsb_engine::TopLevel;
use tracing::info;

use crate::report::{self, Format};

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub file: PathBuf,
    pub mode: TopLevel,
    pub format: Format,
}

/// Execute the check command. Returns `false` when diagnostics were reported.
pub fn execute(args: CheckArgs) -> Result<bool> {
    let (source, template) = super::load_template(&args.file)?;

    match template.expand() {
        Ok(text) => {
            if let Err(err) = gsb_syntax::emit(args.mode, &text) {
                bail!("{}: {}", args.file.display(), err);
            }
            match args.format {
                Format::Text => println!("{}: ok", args.file.display()),
                Format::Json => println!("[]"),
            }
            info!(mode = args.mode.macro_name(), "Checked {}", args.file.display());
            Ok(true)
        }
        Err(diagnostics) => {
            report::report(
                args.format,
                &args.file,
                &source,
                template.source_map(),
                &diagnostics,
            )?;
            Ok(false)
        }
    }
}
