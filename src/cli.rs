use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// More output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer every block of queries in a file
    Batch {
        /// File of problem blocks (`-` for stdin)
        #[arg(default_value = "input_cfg.txt")]
        input: PathBuf,

        /// Where to write the verdicts (`-` for stdout)
        #[arg(default_value = "output_cfg.txt")]
        output: PathBuf,

        /// Give up on a query after this many expansions
        #[arg(long, value_name = "COUNT")]
        max_expansions: Option<usize>
    },

    /// Decide whether each string is in the language
    Check {
        #[command(flatten)]
        source: GrammarSource,

        /// Give up on a string after this many expansions
        #[arg(long, value_name = "COUNT")]
        max_expansions: Option<usize>,

        /// Strings to check (`ε` or "" for the empty string)
        #[arg(required = true)]
        strings: Vec<String>
    },

    /// Print random strings from the language
    Generate {
        #[command(flatten)]
        source: GrammarSource,

        /// Amount to generate
        #[arg(short = 'n', long, value_name = "AMOUNT", default_value_t = 1)]
        amount: u32,

        /// Start symbol (default: the grammar's)
        #[arg(short, long, value_name = "SYMBOL")]
        start: Option<char>,

        /// Nesting depth after which the quickest alternatives are preferred
        #[arg(long, value_name = "DEPTH", default_value_t = 16)]
        max_depth: usize
    },

    /// Print a grammar in the grammar file format
    Show {
        #[command(flatten)]
        source: GrammarSource
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct GrammarSource {
    /// Built-in problem number
    #[arg(short, long, value_name = "ID")]
    pub problem: Option<u32>,

    /// File containing the grammar
    #[arg(short, long, value_name = "FILE")]
    pub grammar: Option<PathBuf>
}
