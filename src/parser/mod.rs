/*
    This module parses grammar files
*/

mod lexer;
mod verifier;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use log::debug;
use thiserror::Error;
use verifier::verify_rules;

#[derive(Debug, Error)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    #[error("Expected `=` after nonterminal")]
    MissingEquals,
    // A rule has multiple equals signs
    #[error("Unexpected `=` encountered")]
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    #[error("Tried to define something other than a nonterminal")]
    MissingNonterminal,
    // There is an unclosed quote
    #[error("Unmatched quotes")]
    UnmatchedQuote,
    // A nonterminal was used but never given a rule
    #[error("Could not find definition for `{0}`")]
    UndefinedNonterminal(char),
    // The file has no rules, so there is no start symbol
    #[error("No rules found")]
    EmptyGrammar,
    // The rules do not form a valid grammar
    #[error("Invalid grammar: {0}")]
    Invalid(ValidationError),
    // Somehow a full rewrite was parsed as a base alternative
    // This is a problem with cfg-oracle, not the grammar
    #[error("Rewrite was not fully split (this is a problem with cfg-oracle, not the grammar)")]
    UnsplitRewrite,
    // A blank line got too deep into the parser
    // This is a problem with cfg-oracle, not the grammar
    #[error("Blank line encountered in rule parser (this is a problem with cfg-oracle, not the grammar)")]
    UnexpectedBlankLine,
    // There was an issue with reading a file
    #[error("File error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::UndefinedNonterminal(a), CompileErrorType::UndefinedNonterminal(b)) => a == b,
            (CompileErrorType::Invalid(a), CompileErrorType::Invalid(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> CompileError {
    CompileError {
        location: Location::file(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: char,
    rewrite: Rewrite,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    tokens.iter().filter_map(|t| match t {
        Token::Equals => Some(Err(CompileErrorType::UnexpectedEquals)),
        Token::Or => Some(Err(CompileErrorType::UnsplitRewrite)),
        Token::Epsilon => None,
        Token::Nonterminal(c) => Some(Ok(Symbol::Nonterminal(*c))),
        Token::Terminal(c) => Some(Ok(Symbol::Terminal(*c)))
    }).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Rewrite> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    // Try to get the symbol the rule is for. The match returns a result which
    // is then unwrapped with the ? operator
    let symbol = match tokens.get(0) {
        Some(Token::Nonterminal(c)) => Ok(*c),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    return Ok(Rule {
        symbol,
        rewrite,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

// Blank lines and lines holding only a comment carry no rule
fn is_rule_line(line: &String) -> bool {
    let trimmed = line.trim_start();
    !trimmed.is_empty() && !trimmed.starts_with(COMMENT)
}

// Returns an iterator over the lines of a reader, with the io errors wrapped
// in CompileError and enumerated
fn reader_line_nums<'a>(reader: impl BufRead + 'a, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    reader
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path)))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn grammar_from_rules(rule_list: Vec<Rule>, path: &Path) -> FileResult<Grammar> {
    let start_symbol = match rule_list.first() {
        Some(rule) => rule.symbol,
        None => return Err(vec![CompileError {
            location: Location::file(path),
            error: CompileErrorType::EmptyGrammar
        }])
    };

    verify_rules(&rule_list)?;

    let nonterminals: BTreeSet<char> = rule_list.iter().map(|rule| rule.symbol).collect();
    let terminals: BTreeSet<char> = rule_list
        .iter()
        .flat_map(|rule| rule.rewrite.iter().flatten())
        .filter_map(|symbol| match symbol {
            Symbol::Terminal(c) => Some(*c),
            _ => None
        })
        .collect();
    let productions = rule_list.into_iter().map(|rule| (rule.symbol, rule.rewrite)).collect();

    Grammar::from_rewrites(terminals, nonterminals, start_symbol, productions)
        .map_err(|error| vec![CompileError {
            location: Location::file(path),
            error: CompileErrorType::Invalid(error)
        }])
}

pub fn parse_reader(reader: impl BufRead, path: &Path) -> FileResult<Grammar> {
    let lines = reader_line_nums(reader, path);

    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: path.to_path_buf(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition(LineResult::is_ok);
    if errors.len() > 0 {
        return Err(errors.into_iter().filter_map(LineResult::err).collect_vec());
    }
    let rules_unwrapped = rules.into_iter().filter_map(LineResult::ok).collect_vec();
    debug!("read {} rules from {}", rules_unwrapped.len(), path.display());

    return grammar_from_rules(rules_unwrapped, path);
}

pub fn parse_file(path: &PathBuf) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path)])?;
    parse_reader(std::io::BufReader::new(file), path)
}
