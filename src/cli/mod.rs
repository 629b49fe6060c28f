//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::{annotation, remap, Verbosity};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function.
/// ```rust
/// use clap::Parser;
/// use reannotate::{cli::Command, Cli, Verbosity};
///
/// let input = ["reannotate", "remap", "--input", "in.json", "--indent", "2", "-v", "debug"];
/// let args = Cli::parse_from(input);
/// assert_eq!(args.verbosity, Verbosity::Debug);
/// match args.command {
///     Command::Remap(args) => {
///         assert_eq!(args.input.to_str(), Some("in.json"));
///         assert_eq!(args.output.to_str(), Some("./datasets/entropy2023/ncov_new.json"));
///         assert_eq!(args.indent, 2);
///     }
///     Command::Annotations(_) => unreachable!(),
/// }
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "reannotate", author, version)]
#[clap(about = "reannotate remaps the ORF1a/ORF1b mutations of an Auspice tree into ORF1ab and its regions.")]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to [remap::run].
    #[clap(about = "Remap tree mutations and replace the genome annotations.")]
    Remap(remap::Args),

    /// Pass CLI arguments to [annotation::export].
    #[clap(about = "Write the built-in genome annotations.")]
    Annotations(annotation::Args),
}
