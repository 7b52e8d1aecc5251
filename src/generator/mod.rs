/*
    This module generates random strings in a grammar's language
*/

use std::collections::HashMap;

use rand::prelude::*;
use thiserror::Error;

use crate::grammar::*;

#[derive(Debug, PartialEq, Error)]
pub enum GenerateErrorType {
    // A nonterminal with no alternatives was reached
    #[error("No definition for nonterminal `{0}`")]
    UndefinedNonterminal(char),
    // Even the shortest alternatives kept nesting
    #[error("Gave up after nesting {0} expansions deep")]
    DepthExceeded(usize),
}

pub type GenResult = Result<String, GenerateErrorType>;

// How many nested expansions each nonterminal needs, at least, to reach a
// string of terminals. Nonterminals that can never finish are left out.
fn minimum_heights(grammar: &Grammar) -> HashMap<char, usize> {
    let mut heights = HashMap::new();

    loop {
        let mut changed = false;
        for nonterminal in grammar.nonterminals() {
            let best = grammar
                .productions_for(nonterminal)
                .iter()
                .filter_map(|alternative| alternative_height(alternative, &heights))
                .min();
            if let Some(best) = best {
                if heights.get(&nonterminal).map_or(true, |&h| best < h) {
                    heights.insert(nonterminal, best);
                    changed = true;
                }
            }
        }
        if !changed {
            return heights;
        }
    }
}

fn alternative_height(alternative: &Alternative, heights: &HashMap<char, usize>) -> Option<usize> {
    alternative
        .iter()
        .filter_map(|symbol| match symbol {
            Symbol::Nonterminal(c) => Some(heights.get(c).copied()),
            Symbol::Terminal(_) => None,
        })
        .try_fold(0, |deepest, height| height.map(|h| deepest.max(h)))
        .map(|deepest| deepest + 1)
}

// Past `max_depth` only the alternatives that finish soonest are picked, and
// past twice that generation gives up
struct Plan {
    max_depth: usize,
    heights: HashMap<char, usize>,
}

pub fn generate(grammar: &Grammar, rng: &mut impl Rng, max_depth: usize) -> GenResult {
    generate_with_override(grammar, grammar.start_symbol(), rng, max_depth)
}

// Generates a string in the given grammar starting with the given symbol
pub fn generate_with_override(grammar: &Grammar, start: char, rng: &mut impl Rng, max_depth: usize) -> GenResult {
    let plan = Plan {
        max_depth,
        heights: minimum_heights(grammar),
    };
    generate_nonterminal(start, grammar, rng, 0, &plan)
}

fn generate_nonterminal(nonterminal: char, grammar: &Grammar, rng: &mut impl Rng, depth: usize, plan: &Plan) -> GenResult {
    if depth > 2 * plan.max_depth {
        return Err(GenerateErrorType::DepthExceeded(depth));
    }

    let rewrite = grammar.productions_for(nonterminal);
    if rewrite.is_empty() {
        return Err(GenerateErrorType::UndefinedNonterminal(nonterminal));
    }

    return generate_rewrite(rewrite, grammar, rng, depth, plan);
}

fn generate_rewrite(rewrite: &[Alternative], grammar: &Grammar, rng: &mut impl Rng, depth: usize, plan: &Plan) -> GenResult {
    let alternative = if depth < plan.max_depth {
        rewrite.choose(rng)
    } else {
        let soonest = rewrite.iter().filter_map(|a| alternative_height(a, &plan.heights)).min();
        let candidates: Vec<&Alternative> = match soonest {
            Some(height) => rewrite
                .iter()
                .filter(|a| alternative_height(a, &plan.heights) == Some(height))
                .collect(),
            // Nothing here ever finishes, keep going until the hard limit
            None => rewrite.iter().collect(),
        };
        candidates.choose(rng).copied()
    };

    let mut result = String::new();
    for symbol in alternative.into_iter().flatten() {
        result.push_str(&generate_symbol(symbol, grammar, rng, depth, plan)?);
    }

    return Ok(result);
}

fn generate_symbol(symbol: &Symbol, grammar: &Grammar, rng: &mut impl Rng, depth: usize, plan: &Plan) -> GenResult {
    match symbol {
        Symbol::Nonterminal(c) => generate_nonterminal(*c, grammar, rng, depth + 1, plan),
        Symbol::Terminal(c) => Ok(c.to_string()),
    }
}
