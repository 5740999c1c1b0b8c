//! `dump`: write every asset under the output directory.

use crate::{
    asset::Asset,
    debug,
    logger::clock,
    pipeline::Pipeline,
    utils::{lock::ProcessLock, path::normalize_path},
};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::{io::Write, path::PathBuf};

/// Printed when another dump holds the lock.
pub const LOCKED_MESSAGE: &str = "The command is already running in another process.";

#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Force production mode for this run.
    pub no_debug: bool,
    /// Also print the source of every leaf.
    pub verbose: bool,
    /// Lock file; derived from the output directory when unset.
    pub lock_path: Option<PathBuf>,
}

/// Dump all assets, printing progress to `out`.
///
/// A dump already running against the same output directory is not an
/// error: the message is printed and the command succeeds.
pub fn dump(pipeline: &mut Pipeline, options: &DumpOptions, out: &mut impl Write) -> Result<()> {
    let dir = normalize_path(pipeline.output_dir());
    let lock_path = options
        .lock_path
        .clone()
        .unwrap_or_else(|| ProcessLock::path_for("dump", &dir));

    debug!("dump"; "lock {}", lock_path.display());
    let Some(_lock) = ProcessLock::try_acquire(&lock_path)
        .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?
    else {
        writeln!(out, "{}", LOCKED_MESSAGE.red())?;
        return Ok(());
    };

    if options.no_debug {
        pipeline.set_debug(false);
    }

    writeln!(out, "Dumping all assets to {}.", dir.display().yellow())?;
    writeln!(
        out,
        "Debug mode is {}.",
        if pipeline.is_debug() { "on" } else { "off" }.yellow()
    )?;
    writeln!(out)?;

    let mut write_error = None;
    pipeline.dump(true, &mut |asset: &Asset| {
        if write_error.is_none()
            && let Err(e) = print_asset(asset, options.verbose, out)
        {
            write_error = Some(e);
        }
    })?;
    match write_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn print_asset(asset: &Asset, verbose: bool, out: &mut impl Write) -> std::io::Result<()> {
    let path = asset.resolved_target_path().unwrap_or_default();
    writeln!(out, "{} {} {}", clock().yellow(), "[file+]".green(), path)?;

    if verbose {
        for leaf in asset.leaves() {
            let root = leaf
                .source_root()
                .map(|r| r.display().to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "[unknown root]".to_string());
            let source = leaf
                .source_path()
                .filter(|p| !p.is_empty())
                .unwrap_or("[unknown path]");
            writeln!(out, "{}", format!("{root}/{source}").cyan())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::test_parse_config, utils::mime::MimeTable};
    use std::{fs, sync::Arc};
    use tempfile::TempDir;

    struct Fixture {
        src: TempDir,
        out: TempDir,
        lock: TempDir,
        pipeline: Pipeline,
    }

    fn fixture(extra: &str) -> Fixture {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let lock = TempDir::new().unwrap();
        fs::write(src.path().join("a.js"), "a").unwrap();
        fs::write(src.path().join("b.js"), "b").unwrap();

        let mut config = test_parse_config(&format!(
            "prefix = \"/static/\"\n{extra}\n[assets.app]\ninputs = [\"a.js\", \"b.js\"]\n"
        ));
        config.input_dir = src.path().to_path_buf();
        config.output_dir = out.path().to_path_buf();
        config.finalize(src.path());
        let pipeline = Pipeline::new(&config, Arc::new(MimeTable::new())).unwrap();
        Fixture { src, out, lock, pipeline }
    }

    fn options(fx: &Fixture, no_debug: bool, verbose: bool) -> DumpOptions {
        DumpOptions {
            no_debug,
            verbose,
            lock_path: Some(fx.lock.path().join("dump.lock")),
        }
    }

    #[test]
    fn test_dump_prints_progress() {
        let mut fx = fixture("");
        let opts = options(&fx, false, false);
        let mut out = Vec::new();
        dump(&mut fx.pipeline, &opts, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("Dumping all assets to "));
        assert!(lines[1].contains("Debug mode is "));
        assert!(lines[1].contains("off"));
        assert_eq!(lines[2], "");
        assert_eq!(lines.len(), 4);
        assert!(lines[3].contains("[file+]"));
        assert!(lines[3].ends_with("static/app.js"));
        assert!(fx.out.path().join("static/app.js").is_file());
    }

    #[test]
    fn test_verbose_lists_leaves() {
        let mut fx = fixture("");
        let opts = options(&fx, false, true);
        let mut out = Vec::new();
        dump(&mut fx.pipeline, &opts, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let root = fx.src.path().display().to_string();
        assert!(text.contains(&format!("{root}/a.js")));
        assert!(text.contains(&format!("{root}/b.js")));
    }

    #[test]
    fn test_no_debug_forces_production() {
        let mut fx = fixture("debug = true");
        let opts = options(&fx, true, false);
        let mut out = Vec::new();
        dump(&mut fx.pipeline, &opts, &mut out).unwrap();

        assert!(!fx.pipeline.is_debug());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("[file+]").count(), 1);
    }

    #[test]
    fn test_contended_lock_succeeds() {
        let mut fx = fixture("");
        let opts = options(&fx, false, false);
        let _held = ProcessLock::try_acquire(opts.lock_path.as_ref().unwrap())
            .unwrap()
            .unwrap();

        let mut out = Vec::new();
        dump(&mut fx.pipeline, &opts, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(LOCKED_MESSAGE));
        assert!(!text.contains("Dumping all assets"));
        assert!(!fx.out.path().join("static").exists());
    }
}
