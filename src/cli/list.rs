//! `list`: print every asset with the URLs it is reachable at.

use crate::{asset::Asset, pipeline::Pipeline};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Write;

/// Print `name` followed by one indented URL per output.
///
/// Template formulas are only known after a dump has scanned the templates,
/// so a non-writing dump runs first.
pub fn list(pipeline: &mut Pipeline, out: &mut impl Write) -> Result<()> {
    pipeline
        .dump(false, &mut |_: &Asset| {})
        .context("Failed to load assets")?;

    let names = pipeline.manager().names();
    if names.is_empty() {
        writeln!(out, "No assets configured.")?;
        return Ok(());
    }

    for name in names {
        let urls = pipeline
            .urls(&name)
            .with_context(|| format!("Failed to resolve asset '{name}'"))?;
        writeln!(out, "{}", name.green())?;
        for url in urls {
            writeln!(out, "  {url}")?;
        }
    }
    Ok(())
}
