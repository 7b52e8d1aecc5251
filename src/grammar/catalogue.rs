use std::collections::BTreeMap;

use super::{Grammar, ValidationError};

// The preset grammars, keyed by problem number. Built once at startup and
// only read afterwards.
#[derive(Debug)]
pub struct Catalogue {
    grammars: BTreeMap<u32, Grammar>,
}

impl Catalogue {
    pub fn builtin() -> Result<Catalogue, ValidationError> {
        let mut grammars = BTreeMap::new();

        // Equal numbers of a and b
        grammars.insert(1, Grammar::new(['a', 'b'], ['S'], 'S', [
            ('S', vec!["aSbS", "bSaS", "ε"])
        ])?);

        grammars.insert(2, Grammar::new(['a', 'b'], ['S'], 'S', [
            ('S', vec!["ε", "aSbbS", "bbSaS", "aSbb", "abSb", "bSab", "baSb", "bSba", "bbSa"])
        ])?);

        // Strings that are not palindromes
        grammars.insert(3, Grammar::new(['a', 'b'], ['S', 'A'], 'S', [
            ('S', vec!["aAb", "bAa", "aSb", "bSa", "aSa", "bSb"]),
            ('A', vec!["aA", "bA", "ε"])
        ])?);

        // a^(3+2k) b^k
        grammars.insert(4, Grammar::new(['a', 'b'], ['S', 'B'], 'S', [
            ('S', vec!["aaaB"]),
            ('B', vec!["aaBb", "ε"])
        ])?);

        // a^n b^m with n > m
        grammars.insert(5, Grammar::new(['a', 'b'], ['S'], 'S', [
            ('S', vec!["aS", "aSb", "a"])
        ])?);

        Ok(Catalogue { grammars })
    }

    pub fn get(&self, problem: u32) -> Option<&Grammar> {
        self.grammars.get(&problem)
    }

    pub fn problems(&self) -> impl Iterator<Item = u32> + '_ {
        self.grammars.keys().copied()
    }
}
