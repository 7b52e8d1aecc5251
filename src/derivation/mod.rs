/*
    This module searches for leftmost derivations of a target string
*/

use std::collections::{HashSet, VecDeque};

use log::{debug, trace, warn};

use crate::grammar::{Grammar, Symbol};

// Caps how much work a single search may do. The default is unbounded, which
// means a search over a grammar that keeps producing new forms matching the
// target's prefix never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Budget {
    pub max_expansions: Option<usize>,
}

impl Budget {
    pub fn unbounded() -> Self {
        Budget { max_expansions: None }
    }

    pub fn expansions(max_expansions: usize) -> Self {
        Budget { max_expansions: Some(max_expansions) }
    }

    fn allows(&self, expanded: usize) -> bool {
        self.max_expansions.map_or(true, |max| expanded < max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    // The target was reached
    Found,
    // Every reachable form was tried
    Exhausted,
    // The budget ran out before a decision
    OutOfBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub dequeued: usize,
    pub expanded: usize,
    pub enqueued: usize,
    pub pruned: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// Every form reachable from `form` by rewriting its leftmost nonterminal once,
/// in the order the alternatives are listed. Empty when `form` is all terminals.
pub fn successors(grammar: &Grammar, form: &str) -> Vec<String> {
    let Some((position, nonterminal)) = form.char_indices().find(|&(_, c)| grammar.is_nonterminal(c)) else {
        return Vec::new();
    };
    let (head, tail) = (&form[..position], &form[position + nonterminal.len_utf8()..]);

    grammar
        .productions_for(nonterminal)
        .iter()
        .map(|alternative| {
            let mut successor = String::with_capacity(head.len() + alternative.len() + tail.len());
            successor.push_str(head);
            successor.extend(alternative.iter().map(Symbol::as_char));
            successor.push_str(tail);
            successor
        })
        .collect()
}

/// Whether `target` can be derived from the grammar's start symbol.
pub fn derive(grammar: &Grammar, target: &str) -> bool {
    derive_within(grammar, target, Budget::unbounded()).outcome == SearchOutcome::Found
}

pub fn derive_within(grammar: &Grammar, target: &str, budget: Budget) -> SearchReport {
    search(grammar, target, budget, |_| {})
}

// Breadth-first search over sentential forms. `on_enqueue` sees each form the
// first (and only) time it is queued.
pub(crate) fn search(grammar: &Grammar, target: &str, budget: Budget, mut on_enqueue: impl FnMut(&str)) -> SearchReport {
    let mut stats = SearchStats::default();
    let start = grammar.start_symbol().to_string();

    let mut visited = HashSet::from([start.clone()]);
    let mut frontier = VecDeque::from([start]);

    let finish = |outcome: SearchOutcome, stats: SearchStats| {
        debug!(
            "search for {:?}: {:?} after {} dequeued, {} expanded, {} enqueued, {} pruned",
            target, outcome, stats.dequeued, stats.expanded, stats.enqueued, stats.pruned
        );
        SearchReport { outcome, stats }
    };

    while let Some(current) = frontier.pop_front() {
        stats.dequeued += 1;
        trace!("dequeued {:?}", current);

        let prefix = grammar.terminal_prefix(&current);
        if prefix.len() == current.len() && current == target {
            return finish(SearchOutcome::Found, stats);
        }

        // The terminal prefix only ever grows, so a mismatch here is final
        if !target.starts_with(prefix) {
            stats.pruned += 1;
            continue;
        }

        if prefix.len() == current.len() {
            continue;
        }

        if !budget.allows(stats.expanded) {
            warn!("search for {:?} stopped after {} expansions", target, stats.expanded);
            return finish(SearchOutcome::OutOfBudget, stats);
        }
        stats.expanded += 1;

        for successor in successors(grammar, &current) {
            if !target.starts_with(grammar.terminal_prefix(&successor)) {
                stats.pruned += 1;
                continue;
            }
            if visited.insert(successor.clone()) {
                on_enqueue(&successor);
                stats.enqueued += 1;
                frontier.push_back(successor);
            }
        }
    }

    finish(SearchOutcome::Exhausted, stats)
}
