//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, ValueHint};

/// Course catalog backed by an AVL tree: bulk load, lookup, delete, ordered listings
#[derive(Parser, Debug)]
#[command(name = "coursecat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog source file (overrides configured source_path)
    #[arg(value_hint = ValueHint::FilePath)]
    pub source: Option<PathBuf>,

    /// Course to look up right after loading the source
    pub lookup: Option<String>,

    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Start with tree diagnostics enabled
    #[arg(long)]
    pub trace: bool,

    /// Field delimiter of the catalog source
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Config file (default: ./.coursecat.toml if present)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print effective settings as TOML and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print shell completion script and exit
    #[arg(long, value_enum)]
    pub completions: Option<clap_complete::Shell>,
}
