use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rsidx",
    version,
    about = "rs2 workspace symbol index",
    long_about = "Builds a symbol index over an rs2 script workspace and its config files."
)]
pub struct RsidxCli {
    #[command(subcommand)]
    pub command: Commands,
}

impl RsidxCli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a workspace and report timing statistics
    Index {
        /// Workspace root to scan
        #[arg(default_value = ".")]
        workspace_path: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Index a workspace and dump the symbol cache as JSON
    Dump {
        /// Workspace root to scan
        #[arg(default_value = ".")]
        workspace_path: PathBuf,

        /// Write the dump to a file instead of STDOUT
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Index a workspace and list every cache key
    Keys {
        /// Workspace root to scan
        #[arg(default_value = ".")]
        workspace_path: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Look up one identifier by name and kind tag (e.g. `helper PROC`)
    Lookup {
        /// Identifier name
        name: String,

        /// Kind tag, case-insensitive (PROC, OBJ, DBCOLUMN, ...)
        kind: String,

        /// Workspace root to scan
        #[arg(long, default_value = ".")]
        workspace_path: PathBuf,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}
