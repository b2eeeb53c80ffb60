use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "doctree")]
#[command(author, version, about = "Register project directories for documentation auto-indexing")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug output on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a directory for auto-indexing
    #[command(after_help = "Examples:\n\n  Register current directory for auto-indexing:\n\n    $ doctree add .")]
    Add {
        /// Directory to register
        path: PathBuf,

        #[command(flatten)]
        data: DataDirArgs,

        /// Name of the project (defaults to the current directory name)
        #[arg(long)]
        project: Option<String>,
    },

    /// List registered projects
    List {
        #[command(flatten)]
        data: DataDirArgs,
    },

    /// Print the fingerprint of a directory
    Fingerprint {
        /// Directory to fingerprint
        path: PathBuf,

        /// Include modification times in the fingerprint
        #[arg(long)]
        include_mtime: bool,

        #[command(flatten)]
        data: DataDirArgs,
    },
}

/// Location of the catalog and config.
#[derive(Args, Debug, Clone, Default)]
pub struct DataDirArgs {
    /// Where doctree stores its data
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

impl Commands {
    /// Data directory override of the selected subcommand.
    pub fn data_dir(&self) -> Option<&std::path::Path> {
        match self {
            Commands::Add { data, .. }
            | Commands::List { data }
            | Commands::Fingerprint { data, .. } => data.data_dir.as_deref(),
        }
    }
}
