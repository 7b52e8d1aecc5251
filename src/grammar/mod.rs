/*
    This module is for storing and querying context-free grammars
*/

pub mod catalogue;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Display;

use itertools::Itertools;
use log::warn;
use thiserror::Error;

// Written inside a replacement (or a query) to mean "no symbols at all"
pub const EPSILON: char = 'ε';

// The base unit in a grammar rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
}

impl Symbol {
    pub fn as_char(&self) -> char {
        match self {
            Symbol::Terminal(c) | Symbol::Nonterminal(c) => *c,
        }
    }
}

// The symbols in a single alternative. An empty alternative is an epsilon replacement.
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule, in the order successors are generated
pub type Rewrite = Vec<Alternative>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is declared as both a terminal and a nonterminal")]
    Overlap(char),
    #[error("the start symbol '{0}' is not a nonterminal")]
    StartNotNonterminal(char),
    #[error("'{0}' has productions but is not a nonterminal")]
    ProductionsNotNonterminal(char),
    #[error("'{symbol}' appears in a production of '{nonterminal}' but is not a declared symbol")]
    UnknownSymbol { nonterminal: char, symbol: char },
    #[error("'{0}' is reserved for the empty replacement")]
    ReservedSymbol(char),
    #[error("'{0}' is given an empty list of alternatives")]
    EmptyProduction(char),
}

/// An immutable context-free grammar over single-character symbols.
///
/// Construction checks that the two alphabets are disjoint, that the start
/// symbol is a nonterminal and that every production only mentions declared
/// symbols. Nothing can change afterwards, so one grammar can be shared by any
/// number of concurrent queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    terminals: BTreeSet<char>,
    nonterminals: BTreeSet<char>,
    start_symbol: char,
    rules: HashMap<char, Rewrite>,
    // Nonterminals in the order their productions were first given
    declared: Vec<char>,
}

impl Grammar {
    /// Builds a grammar from replacement strings, e.g. `('S', vec!["aSb", "ε"])`.
    ///
    /// Every character of a replacement is looked up in the two alphabets;
    /// `ε` contributes no symbols.
    pub fn new<'a>(
        terminals: impl IntoIterator<Item = char>,
        nonterminals: impl IntoIterator<Item = char>,
        start_symbol: char,
        productions: impl IntoIterator<Item = (char, Vec<&'a str>)>,
    ) -> Result<Grammar, ValidationError> {
        let terminals: BTreeSet<char> = terminals.into_iter().collect();
        let nonterminals: BTreeSet<char> = nonterminals.into_iter().collect();

        let rewrites = productions
            .into_iter()
            .map(|(symbol, replacements)| {
                let rewrite = replacements
                    .into_iter()
                    .map(|replacement| {
                        replacement
                            .chars()
                            .filter(|&c| c != EPSILON)
                            .map(|c| {
                                if terminals.contains(&c) {
                                    Ok(Symbol::Terminal(c))
                                } else if nonterminals.contains(&c) {
                                    Ok(Symbol::Nonterminal(c))
                                } else {
                                    Err(ValidationError::UnknownSymbol { nonterminal: symbol, symbol: c })
                                }
                            })
                            .collect::<Result<Alternative, _>>()
                    })
                    .collect::<Result<Rewrite, _>>()?;
                Ok::<_, ValidationError>((symbol, rewrite))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Grammar::from_rewrites(terminals, nonterminals, start_symbol, rewrites)
    }

    /// Builds a grammar from already tagged symbols. Repeated left-hand sides
    /// have their alternatives appended in order.
    pub fn from_rewrites(
        terminals: BTreeSet<char>,
        nonterminals: BTreeSet<char>,
        start_symbol: char,
        productions: Vec<(char, Rewrite)>,
    ) -> Result<Grammar, ValidationError> {
        if terminals.contains(&EPSILON) || nonterminals.contains(&EPSILON) {
            return Err(ValidationError::ReservedSymbol(EPSILON));
        }
        if let Some(&both) = terminals.intersection(&nonterminals).next() {
            return Err(ValidationError::Overlap(both));
        }
        if !nonterminals.contains(&start_symbol) {
            return Err(ValidationError::StartNotNonterminal(start_symbol));
        }

        let mut rules: HashMap<char, Rewrite> = HashMap::new();
        let mut declared = Vec::new();
        for (symbol, rewrite) in productions {
            if !nonterminals.contains(&symbol) {
                return Err(ValidationError::ProductionsNotNonterminal(symbol));
            }
            if rewrite.is_empty() {
                return Err(ValidationError::EmptyProduction(symbol));
            }
            for s in rewrite.iter().flatten() {
                let known = match s {
                    Symbol::Terminal(c) => terminals.contains(c),
                    Symbol::Nonterminal(c) => nonterminals.contains(c),
                };
                if !known {
                    return Err(ValidationError::UnknownSymbol { nonterminal: symbol, symbol: s.as_char() });
                }
            }
            if !rules.contains_key(&symbol) {
                declared.push(symbol);
            }
            rules.entry(symbol).or_default().extend(rewrite);
        }

        let grammar = Grammar {
            terminals,
            nonterminals,
            start_symbol,
            rules,
            declared,
        };

        for symbol in grammar.reachable_without_productions() {
            warn!("nonterminal '{}' is reachable from '{}' but has no productions", symbol, start_symbol);
        }

        Ok(grammar)
    }

    pub fn start_symbol(&self) -> char {
        self.start_symbol
    }

    pub fn terminals(&self) -> impl Iterator<Item = char> + '_ {
        self.terminals.iter().copied()
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = char> + '_ {
        self.nonterminals.iter().copied()
    }

    pub fn is_terminal(&self, symbol: char) -> bool {
        self.terminals.contains(&symbol)
    }

    pub fn is_nonterminal(&self, symbol: char) -> bool {
        self.nonterminals.contains(&symbol)
    }

    /// The alternatives for `nonterminal`, empty if it has none.
    pub fn productions_for(&self, nonterminal: char) -> &[Alternative] {
        self.rules.get(&nonterminal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The longest leading run of terminals in a sentential form.
    pub fn terminal_prefix<'s>(&self, form: &'s str) -> &'s str {
        let end = form
            .char_indices()
            .find(|&(_, c)| !self.is_terminal(c))
            .map_or(form.len(), |(i, _)| i);
        &form[..end]
    }

    // Nonterminals that can show up in a derivation from the start symbol
    // but have nothing to be rewritten to
    pub fn reachable_without_productions(&self) -> Vec<char> {
        let mut seen = HashSet::from([self.start_symbol]);
        let mut pending = vec![self.start_symbol];
        let mut missing = Vec::new();

        while let Some(symbol) = pending.pop() {
            let rewrite = self.productions_for(symbol);
            if rewrite.is_empty() {
                missing.push(symbol);
            }
            for s in rewrite.iter().flatten() {
                if let Symbol::Nonterminal(c) = s {
                    if seen.insert(*c) {
                        pending.push(*c);
                    }
                }
            }
        }

        missing.sort_unstable();
        missing
    }
}

fn render_symbol(symbol: &Symbol) -> String {
    match symbol {
        Symbol::Terminal(c) if c.is_ascii_uppercase() || c.is_whitespace() || "=|;".contains(*c) => format!("\"{}\"", c),
        _ => symbol.as_char().to_string(),
    }
}

fn render_alternative(alternative: &Alternative) -> String {
    if alternative.is_empty() {
        EPSILON.to_string()
    } else {
        alternative.iter().map(render_symbol).collect()
    }
}

// Renders in the grammar file format, start symbol first
impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let order = std::iter::once(self.start_symbol)
            .chain(self.declared.iter().copied().filter(|&s| s != self.start_symbol));

        for symbol in order {
            let rewrite = self.productions_for(symbol);
            if rewrite.is_empty() {
                continue;
            }
            writeln!(f, "{} = {}", symbol, rewrite.iter().map(render_alternative).join(" | "))?;
        }

        Ok(())
    }
}
