//! Batch driver shared by `adjust` and `clean`.
//!
//! A run discovers every matching file under the source root, then takes each
//! one to completion (read, map, transform, write) before starting the next.
//! The first failure ends the run; files written before it stay on disk.

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use log::{debug, warn};
use recast_fmt::SourceFormatter;
use recast_rules::RuleEngine;
use recast_ui::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::file_walker::{self, FileFilter};
use crate::path_map;

pub const DEFAULT_SOURCE_ROOT: &str = "translated";
pub const DEFAULT_DEST_ROOT: &str = "formatted";
pub const DEFAULT_EXTENSION: &str = "ts";

/// Where a run reads from and writes to.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub filter: FileFilter,
    /// Include hidden files and directories.
    pub hidden: bool,
}

impl RunConfig {
    /// Rewrite files where they are.
    pub fn in_place(root: impl Into<PathBuf>, filter: FileFilter) -> Self {
        let root = root.into();
        Self {
            source_root: root.clone(),
            dest_root: root,
            filter,
            hidden: false,
        }
    }

    /// Write results into `dest_root`, mirroring the layout of `source_root`.
    pub fn mirrored(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        filter: FileFilter,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            filter,
            hidden: false,
        }
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn is_in_place(&self) -> bool {
        path_map::normalize(&self.source_root) == path_map::normalize(&self.dest_root)
    }

    /// The destination root, normalized, when it lies strictly inside the
    /// source root.
    fn nested_dest_root(&self) -> Option<PathBuf> {
        if self.is_in_place() {
            return None;
        }
        let dest = path_map::normalize(&self.dest_root);
        dest.starts_with(path_map::normalize(&self.source_root))
            .then_some(dest)
    }
}

/// What a run does to each file.
#[derive(Clone, Copy)]
pub enum Stage<'a> {
    Adjust(&'a RuleEngine),
    Clean(&'a dyn SourceFormatter),
}

impl Stage<'_> {
    fn verb(&self) -> &'static str {
        match self {
            Stage::Adjust(_) => "Adjusting",
            Stage::Clean(_) => "Formatting",
        }
    }
}

/// A discovered file, read once.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub relative_path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub destination: PathBuf,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    /// Destinations written, in processing order.
    pub written: Vec<PathBuf>,
}

/// Matching files under the source root, relative to it, sorted.
///
/// When the destination root lies inside the source root its contents are
/// left out, so output from an earlier run is never picked up as input.
pub fn discover(config: &RunConfig) -> Result<Vec<PathBuf>> {
    let files = file_walker::collect_files(&config.source_root, &config.filter, config.hidden)
        .with_context(|| {
            format!(
                "Failed to discover files in {}",
                config.source_root.display()
            )
        })?;
    select_inputs(config, files)
}

/// Turn walked paths into inputs relative to the source root, leaving out
/// anything under a nested destination root.
fn select_inputs(config: &RunConfig, files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let nested = config.nested_dest_root();

    let mut relative = Vec::with_capacity(files.len());
    for path in files {
        if let Some(dest) = &nested
            && path_map::normalize(&path).starts_with(dest)
        {
            debug!("Skipping {} (inside destination root)", path.display());
            continue;
        }
        relative.push(path_map::relative_to(&config.source_root, &path)?);
    }
    Ok(relative)
}

pub fn read_source(config: &RunConfig, relative: &Path) -> Result<SourceFile> {
    let path = config.source_root.join(relative);
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(SourceFile {
        relative_path: relative.to_path_buf(),
        content,
    })
}

/// Produce the output for one file. Only the clean stage can fail here.
pub fn transform(
    config: &RunConfig,
    stage: Stage<'_>,
    source: &SourceFile,
) -> Result<TransformResult, recast_fmt::FormatError> {
    let destination = path_map::map(&config.source_root, &config.dest_root, &source.relative_path);
    debug!(
        "{} -> {}",
        source.relative_path.display(),
        destination.display()
    );

    let content = match stage {
        Stage::Adjust(engine) => {
            let report = engine.apply_with_report(&source.content);
            debug!(
                "{}: applied [{}]",
                source.relative_path.display(),
                report.applied.join(", ")
            );
            if !report.was_applied("wrapper-open") {
                warn!(
                    "{}: no wrapper block found; adjusting already adjusted files is not supported",
                    source.relative_path.display()
                );
            }
            report.output
        }
        Stage::Clean(formatter) => {
            formatter.format_source(&source.relative_path, &source.content)?
        }
    };

    Ok(TransformResult {
        destination,
        content,
    })
}

/// Write the whole result at once, creating parent directories as needed.
pub fn write_result(result: &TransformResult) -> Result<()> {
    if let Some(parent) = result.destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    AtomicFile::new(&result.destination, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(result.content.as_bytes()))
        .with_context(|| format!("Failed to write {}", result.destination.display()))?;

    debug!("Wrote {}", result.destination.display());
    Ok(())
}

/// Run `stage` over every file `config` selects, one file at a time.
pub fn run(config: &RunConfig, stage: Stage<'_>) -> Result<RunSummary> {
    let files = discover(config)?;
    debug!(
        "Found {} {} files in {}",
        files.len(),
        config.filter,
        config.source_root.display()
    );

    let mut summary = RunSummary::default();

    for relative in files {
        let display = relative.display().to_string();
        let source = read_source(config, &relative)?;

        let spinner = Spinner::builder(format!("{display}: {}", stage.verb())).start();

        let result = match transform(config, stage, &source) {
            Ok(result) => result,
            Err(e) => {
                spinner.error(format!("{display}: {e}"));
                return Err(e).with_context(|| format!("Failed to format {display}"));
            }
        };

        if let Err(e) = write_result(&result) {
            spinner.finish();
            return Err(e);
        }

        spinner.success(display.with_style(Style::Green).bold().to_string());
        summary.written.push(result.destination);
    }

    Ok(summary)
}
