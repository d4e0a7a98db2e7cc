use anyhow::Result;
use clap::Args;
use log::debug;
use recast_rules::RuleEngine;
use recast_ui::prelude::*;
use std::path::PathBuf;

use crate::file_walker::FileFilter;
use crate::pipeline::{self, DEFAULT_EXTENSION, DEFAULT_SOURCE_ROOT, RunConfig, Stage};

/// Arguments for the `adjust` command
#[derive(Args, Debug, Clone)]
#[command(about = "Rewrite translated sources in place into the lean dialect")]
pub struct AdjustArgs {
    /// Directory whose files are rewritten in place.
    #[arg(value_name = "ROOT", default_value = DEFAULT_SOURCE_ROOT, value_hint = clap::ValueHint::DirPath)]
    pub root: PathBuf,

    /// Extension of the files to rewrite
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub ext: String,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,
}

/// Execute the `adjust` command
///
/// Files are overwritten with their rewritten text. Running this again over
/// its own output is not supported: the visibility and wrapper rules are not
/// idempotent.
pub fn execute(args: AdjustArgs) -> Result<()> {
    let engine = RuleEngine::default();
    debug!("Adjust rules: {}", engine.rule_names().join(", "));

    let filter = FileFilter::extension(&args.ext);
    let config = RunConfig::in_place(&args.root, filter.clone()).with_hidden(args.hidden);
    let summary = pipeline::run(&config, Stage::Adjust(&engine))?;

    if summary.written.is_empty() {
        anyhow::bail!("No {} files found in {}", filter, args.root.display());
    }

    eprintln!(
        "\n{} Adjusted {} files in {}",
        recast_ui::icons::success(),
        summary.written.len(),
        args.root.display().to_string().with_style(Style::Blue).bold()
    );

    Ok(())
}
