use std::collections::HashSet;

use crate::grammar::Symbol::Nonterminal;
use super::CompileErrorType::UndefinedNonterminal;
use super::{Alternative, CompileError, CompileErrors, FileResult, Location, Rewrite, Rule};

// Every nonterminal that has at least one rule
pub type DefinedSymbols = HashSet<char>;

fn get_alternative_undefined_symbols(alternative: &Alternative, location: &Location, defined: &DefinedSymbols) -> CompileErrors {
    // Filter out everything but nonterminals and unwrap the character from the
    // nonterminals. Then filter out all the defined nonterminals.
    alternative.iter()
        .filter_map(|symbol| match symbol {
            Nonterminal(symbol) => Some(*symbol),
            _ => None
        })
        .filter(|symbol| !defined.contains(symbol))
        .map(|symbol| CompileError {
            location: location.to_owned(),
            error: UndefinedNonterminal(symbol)
        })
        .collect()
}

fn get_rewrite_undefined_symbols(rewrite: &Rewrite, location: &Location, defined: &DefinedSymbols) -> CompileErrors {
    // Get the undefined nonterminals in each alternative, while flattening
    // into all the undefined nonterminals in the rewrite
    rewrite.iter()
        .flat_map(|alternative| get_alternative_undefined_symbols(alternative, location, defined))
        .collect()
}

fn get_undefined_symbols(rules: &[Rule]) -> CompileErrors {
    let defined: DefinedSymbols = rules.iter().map(|rule| rule.symbol).collect();

    // Get the undefined nonterminals in each rewrite, in file order
    rules.iter()
        .flat_map(|rule| get_rewrite_undefined_symbols(&rule.rewrite, &rule.location, &defined))
        .collect()
}

pub(super) fn verify_rules(rules: &[Rule]) -> FileResult<()> {
    let mut errors = Vec::new();

    errors.extend(get_undefined_symbols(rules).into_iter());

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}
