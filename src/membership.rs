use std::fmt::Display;

use crate::derivation::{derive, derive_within, Budget, SearchOutcome};
use crate::grammar::{Grammar, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    NotAccepted,
    // Only produced when a budget is given and it runs out
    SearchExhausted,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::NotAccepted => write!(f, "not accepted"),
            Verdict::SearchExhausted => write!(f, "search exhausted"),
        }
    }
}

// Drops every epsilon marker, so "ε" asks about the empty string
pub fn normalize(input: &str) -> String {
    input.chars().filter(|&c| c != EPSILON).collect()
}

pub fn classify(grammar: &Grammar, input: &str) -> Verdict {
    if derive(grammar, &normalize(input)) {
        Verdict::Accepted
    } else {
        Verdict::NotAccepted
    }
}

pub fn classify_within(grammar: &Grammar, input: &str, budget: Budget) -> Verdict {
    match derive_within(grammar, &normalize(input), budget).outcome {
        SearchOutcome::Found => Verdict::Accepted,
        SearchOutcome::Exhausted => Verdict::NotAccepted,
        SearchOutcome::OutOfBudget => Verdict::SearchExhausted,
    }
}
