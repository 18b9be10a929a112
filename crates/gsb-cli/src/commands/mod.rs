//! Command implementations for the GSB CLI
//!
//! Each command reads a template file, expands it through the engine and
//! reports diagnostics. Commands return `Ok(false)` when the template has
//! diagnostics, so the process can exit with a failure status.

pub mod check;
pub mod expand;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gsb_syntax::Template;
use tracing::debug;

/// Read and parse a template file, returning its source alongside.
pub fn load_template(path: &Path) -> Result<(String, Template)> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template: {}", path.display()))?;
    let template = Template::from_source(&source)
        .map_err(|e| anyhow::anyhow!("Failed to tokenize {}: {}", path.display(), e))?;
    debug!(
        path = %path.display(),
        elements = template.elements().len(),
        "loaded template"
    );
    Ok((source, template))
}
