mod batch;
mod cli;
mod derivation;
mod error_handling;
mod generator;
mod grammar;
mod logging;
mod membership;
mod parser;

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use rand::thread_rng;

use batch::Driver;
use cli::{Cli, Command, GrammarSource};
use derivation::Budget;
use grammar::catalogue::Catalogue;
use grammar::{Grammar, EPSILON};

fn load_grammar<'c>(source: &GrammarSource, catalogue: &'c Catalogue) -> Result<Cow<'c, Grammar>, String> {
    match (source.problem, &source.grammar) {
        (Some(id), _) => catalogue
            .get(id)
            .map(Cow::Borrowed)
            .ok_or_else(|| format!("{} {} (expected one of {})", batch::INVALID_PROBLEM, id, catalogue.problems().join(", "))),
        (None, Some(path)) => parser::parse_file(path)
            .map(Cow::Owned)
            .map_err(|errors| errors.iter().join("\n")),
        // clap requires one of the two
        (None, None) => Err("No grammar given".to_string())
    }
}

fn budget(max_expansions: Option<usize>) -> Budget {
    max_expansions.map_or(Budget::unbounded(), Budget::expansions)
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, String> {
    if path == Path::new("-") {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path).map_err(|e| format!("Could not open {}: {}", path.display(), e))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path) -> Result<Box<dyn Write>, String> {
    if path == Path::new("-") {
        return Ok(Box::new(std::io::stdout().lock()));
    }
    let file = File::create(path).map_err(|e| format!("Could not create {}: {}", path.display(), e))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run_batch(input: &PathBuf, output: &PathBuf, max_expansions: Option<usize>, catalogue: &Catalogue) -> Result<(), String> {
    let reader = open_input(input)?;
    let writer = open_output(output)?;

    Driver::new(catalogue, budget(max_expansions))
        .run(reader, writer, input)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn run(cli: Cli) -> Result<(), String> {
    let catalogue = Catalogue::builtin().map_err(|e| format!("Built-in grammar is invalid: {}", e))?;

    match cli.command {
        Command::Batch { input, output, max_expansions } => {
            run_batch(&input, &output, max_expansions, &catalogue)
        }
        Command::Check { source, max_expansions, strings } => {
            let grammar = load_grammar(&source, &catalogue)?;
            for string in strings {
                let verdict = match max_expansions {
                    Some(max) => membership::classify_within(&grammar, &string, Budget::expansions(max)),
                    None => membership::classify(&grammar, &string)
                };
                println!("{}: {}", string, verdict);
            }
            Ok(())
        }
        Command::Generate { source, amount, start, max_depth } => {
            let grammar = load_grammar(&source, &catalogue)?;
            let mut rng = thread_rng();
            for _ in 0..amount {
                let generated = match start {
                    Some(symbol) => generator::generate_with_override(&grammar, symbol, &mut rng, max_depth),
                    None => generator::generate(&grammar, &mut rng, max_depth)
                }.map_err(|e| e.to_string())?;
                if generated.is_empty() {
                    println!("{}", EPSILON);
                } else {
                    println!("{}", generated);
                }
            }
            Ok(())
        }
        Command::Show { source } => {
            let grammar = load_grammar(&source, &catalogue)?;
            println!("; terminals: {}", grammar.terminals().join(" "));
            println!("; nonterminals: {}", grammar.nonterminals().join(" "));
            print!("{}", grammar);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
