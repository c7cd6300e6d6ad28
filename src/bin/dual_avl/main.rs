//! Command-line driver that replays a range-command script against a `DualAvlTree<i32>` and
//! prints the resulting node census.
#![forbid(unsafe_code)]

mod script;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use dual_avl::DualAvlTree;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::script::ScriptError;

#[derive(Parser, Debug)]
#[command(
    name = "dual-avl",
    version,
    about = "Replay insert/delete range commands against a dual-capacity balanced tree"
)]
struct Cli {
    #[arg(
        value_name = "FILE",
        env = "DUAL_AVL_SCRIPT",
        help = "Command script to replay (reads standard input when omitted)"
    )]
    script: Option<PathBuf>,

    #[arg(
        long,
        env = "DUAL_AVL_PRINT_TREE",
        help = "Print the tree layout after the statistics line"
    )]
    print_tree: bool,

    #[arg(
        long,
        value_name = "DIRECTIVE",
        env = "DUAL_AVL_LOG",
        default_value = "warn",
        help = "Log filter used when RUST_LOG is not set"
    )]
    log: String,
}

/// Error type for the driver.
#[derive(Error, Debug)]
enum CliError {
    /// Reading the script or writing the report failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The script is malformed.
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// The `--log` directive does not parse.
    #[error("invalid log filter: {0}")]
    Log(#[from] tracing_subscriber::filter::ParseError),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    let input = match &cli.script {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let commands = script::parse(&input)?;
    let mut tree = DualAvlTree::new();
    script::replay(&commands, &mut tree);

    let stats = tree.statistics();
    info!(
        commands = commands.len(),
        keys = tree.len(),
        height = tree.height(),
        %stats,
        "replay finished"
    );

    let mut out = io::stdout().lock();
    writeln!(out, "{stats}")?;
    if cli.print_tree && !tree.is_empty() {
        writeln!(out, "{}", tree.layout())?;
    }
    out.flush()?;
    Ok(())
}

fn init_tracing(fallback: &str) -> Result<(), CliError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
