use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pshield")]
#[command(about = "Reversible redaction of personal data in text", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, env = "PSHIELD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replace personal data with placeholders
    Protect(ProtectArgs),

    /// Put original values back using a saved mapping
    Reveal(RevealArgs),

    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// List the active rules
    Rules {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show config path and effective config
    Config,

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

/// Where the text comes from; stdin when neither is given
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Text given inline
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ProtectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the placeholder mapping for a later `reveal`
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Keep placeholder labels in English
    #[arg(long)]
    pub no_translate: bool,

    /// Language of placeholder labels (default: detect)
    #[arg(long)]
    pub lang: Option<String>,

    /// Number placeholders in the order values appear
    #[arg(long)]
    pub text_order: bool,

    /// Print result, mapping and per-type counts as JSON
    #[arg(long)]
    pub json: bool,

    /// Also copy the result to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(Args)]
pub struct RevealArgs {
    /// Mapping file written by `protect --mapping`
    #[arg(long)]
    pub mapping: PathBuf,

    #[command(flatten)]
    pub input: InputArgs,

    /// Reveal only these placeholder occurrences (1-based); repeatable
    #[arg(long = "occurrence", short = 'n')]
    pub occurrences: Vec<usize>,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
