use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod adjust;
mod clean;
mod file_walker;
mod path_map;
mod pipeline;

#[derive(Parser)]
#[command(name = "recast")]
#[command(about = "Migrate translated sources to the lean dialect", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip visibility keywords, decorators, imports and wrapper blocks in place
    #[command(alias = "a")]
    Adjust(adjust::AdjustArgs),

    /// Format adjusted sources into the output tree
    #[command(alias = "c")]
    Clean(clean::CleanArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger with default level depending on --debug (overridden by RUST_LOG)
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Adjust(args) => adjust::execute(args),
        Commands::Clean(args) => clean::execute(args),
    }
}
