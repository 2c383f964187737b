//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Syntactic paraphrases of parse trees by reordering coordinated noun phrases
#[derive(Parser, Debug)]
#[command(name = "npshuffle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the tree text comes from: argument, file, or stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct TreeInput {
    /// Bracketed tree text; read from stdin when neither this nor --file is given
    #[arg(conflicts_with = "file")]
    pub tree: Option<String>,

    /// Read the tree from a file ("-" for stdin)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate paraphrases of one tree as JSON
    Paraphrase {
        #[command(flatten)]
        input: TreeInput,

        /// Maximum number of paraphrases
        #[arg(short, long)]
        limit: Option<usize>,

        /// Seed for sampling
        #[arg(short, long)]
        seed: Option<u64>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Paraphrase one tree per line, in parallel, as JSON lines
    Batch {
        /// File with one tree per line ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Maximum number of paraphrases per tree
        #[arg(short, long)]
        limit: Option<usize>,

        /// Base seed; line i uses seed + i
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List coordination spans of a tree
    Spans {
        #[command(flatten)]
        input: TreeInput,
    },

    /// Show a tree as an indented outline
    Show {
        #[command(flatten)]
        input: TreeInput,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Show global config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_paraphrase_args() {
        let cli = Cli::try_parse_from([
            "npshuffle",
            "-dd",
            "paraphrase",
            "(NP (NP A) (CC and) (NP B))",
            "--limit",
            "3",
            "--seed",
            "9",
        ])
        .unwrap();
        assert_eq!(cli.debug, 2);
        match cli.command {
            Some(Commands::Paraphrase {
                input, limit, seed, compact,
            }) => {
                assert_eq!(input.tree.as_deref(), Some("(NP (NP A) (CC and) (NP B))"));
                assert_eq!(limit, Some(3));
                assert_eq!(seed, Some(9));
                assert!(!compact);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_tree_and_file_conflict() {
        let result = Cli::try_parse_from(["npshuffle", "show", "(S (NN x))", "--file", "t.txt"]);
        assert!(result.is_err());
    }
}
