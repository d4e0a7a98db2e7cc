use anyhow::{Context, Result};
use clap::Args;
use recast_fmt::{FormatConfig, PrettierFormatter, SourceFormatter};
use recast_ui::prelude::*;
use std::path::PathBuf;

use crate::file_walker::FileFilter;
use crate::pipeline::{
    self, DEFAULT_DEST_ROOT, DEFAULT_EXTENSION, DEFAULT_SOURCE_ROOT, RunConfig, Stage,
};

/// Arguments for the `clean` command
#[derive(Args, Debug, Clone)]
#[command(about = "Format adjusted sources into a mirrored output tree")]
pub struct CleanArgs {
    /// Directory holding the adjusted sources.
    #[arg(value_name = "SOURCE", default_value = DEFAULT_SOURCE_ROOT, value_hint = clap::ValueHint::DirPath)]
    pub source: PathBuf,

    /// Directory that receives the formatted files.
    #[arg(value_name = "DEST", default_value = DEFAULT_DEST_ROOT, value_hint = clap::ValueHint::DirPath)]
    pub dest: PathBuf,

    /// Extension of the files to format
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub ext: String,

    /// Check if files are formatted correctly without writing anything.
    /// Exit with non-zero code if any file needs formatting.
    #[arg(long, conflicts_with = "diff")]
    pub check: bool,

    /// Show diffs instead of writing files
    #[arg(long)]
    pub diff: bool,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,
}

/// Execute the `clean` command
pub fn execute(args: CleanArgs) -> Result<()> {
    let formatter = PrettierFormatter::new(FormatConfig::default())
        .context("Cannot run the clean stage")?;

    let filter = FileFilter::extension(&args.ext);
    let config = RunConfig::mirrored(&args.source, &args.dest, filter.clone())
        .with_hidden(args.hidden);

    if args.check || args.diff {
        return inspect(&formatter, &config, &args);
    }

    let summary = pipeline::run(&config, Stage::Clean(&formatter))?;

    if summary.written.is_empty() {
        anyhow::bail!("No {} files found in {}", filter, args.source.display());
    }

    eprintln!(
        "\n{} Formatted {} files into {}",
        recast_ui::icons::success(),
        summary.written.len(),
        args.dest.display().to_string().with_style(Style::Blue).bold()
    );

    Ok(())
}

/// `--check` / `--diff`: format every file in memory and report, writing
/// nothing. A file the formatter rejects still aborts the run.
fn inspect(formatter: &dyn SourceFormatter, config: &RunConfig, args: &CleanArgs) -> Result<()> {
    let files = pipeline::discover(config)?;
    if files.is_empty() {
        anyhow::bail!(
            "No {} files found in {}",
            config.filter,
            config.source_root.display()
        );
    }

    let mut files_needing_format = Vec::new();

    for relative in files {
        let display = relative.display().to_string();
        let source = pipeline::read_source(config, &relative)?;

        let spinner = if args.check {
            Spinner::builder(format!("{display}: Checking format")).start()
        } else {
            Spinner::builder(format!("{display}: Checking diff")).start()
        };

        let outcome = if args.check {
            formatter
                .needs_formatting(&relative, &source.content)
                .map(|needs| (needs, None))
        } else {
            formatter
                .diff(&relative, &source.content)
                .map(|diff| (!diff.is_empty(), Some(diff)))
        };

        let (needs_format, diff) = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                spinner.error(format!("{display}: {e}"));
                return Err(e).with_context(|| format!("Failed to format {display}"));
            }
        };
        spinner.finish();

        if let Some(diff) = diff {
            print!("{diff}");
        }

        if needs_format {
            println!(
                "{} {} (needs formatting)",
                recast_ui::icons::warning(),
                display.with_style(Style::Yellow).bold()
            );
            files_needing_format.push(relative);
        } else {
            println!(
                "{} {}",
                recast_ui::icons::success(),
                display.with_style(Style::Green).bold()
            );
        }
    }

    if args.check && !files_needing_format.is_empty() {
        eprintln!("\n{} files need formatting.", files_needing_format.len());
        anyhow::bail!("Some files are not formatted correctly");
    }

    Ok(())
}
