//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Step-through segment tree: range sums, point and range updates, tagged traversals
#[derive(Parser, Debug)]
#[command(name = "segviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Array values, overriding configured data (e.g. --values 2,1,3)
    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub values: Option<Vec<i64>>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the tree with node intervals and sums
    Tree,

    /// Print the current array (leaf values, left to right)
    Leaves,

    /// Sum over [L, R] (bounds may be given in any order)
    Query {
        l: usize,
        r: usize,
    },

    /// Set element INDEX to VALUE
    Update {
        index: usize,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// Add DELTA to every element in [L, R]
    Range {
        l: usize,
        r: usize,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Print node and array cell positions
    Layout,

    /// Step through the configured script
    Demo {
        /// Stop after this many steps
        #[arg(short, long)]
        steps: Option<usize>,
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
    /// Print the global config path
    Path,
    /// Write a commented template to the global config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_negative_delta_when_parsing_then_accepted() {
        let cli = Cli::try_parse_from(["segviz", "range", "1", "4", "-3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Range { l: 1, r: 4, delta: -3 })
        ));
    }

    #[test]
    fn given_values_list_when_parsing_then_split_on_comma() {
        let cli = Cli::try_parse_from(["segviz", "--values", "3,-1,4", "leaves"]).unwrap();
        assert_eq!(cli.values, Some(vec![3, -1, 4]));
    }

    #[test]
    fn given_repeated_debug_flag_then_counts() {
        let cli = Cli::try_parse_from(["segviz", "-dd", "tree"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}
