mod commands;
mod input;
mod render;
mod writer;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{
    dump::DumpArgs,
    schema::SchemaArgs,
    tag::{TagArgs, UntagArgs},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rbcat", about = "Inspect RowBinary files and binary type tags")]
struct Cli {
    /// Reader options file (TOML); command-line flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode rows and print them as text or JSON lines
    Dump(DumpArgs),
    /// Print the column names and types of a file header
    Schema(SchemaArgs),
    /// Encode a type name as a binary type tag (hex)
    Tag(TagArgs),
    /// Decode a binary type tag (hex) into a type name
    Untag(UntagArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Dump(args) => args.run(config),
        Commands::Schema(args) => args.run(config),
        Commands::Tag(args) => args.run(),
        Commands::Untag(args) => args.run(),
    }
}
