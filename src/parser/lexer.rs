use itertools::{Itertools, PeekingNext};

use crate::grammar::EPSILON;
use super::{CompileErrorType, Result};

pub const COMMENT: char = ';';

#[derive(PartialEq, Debug)]
pub enum Token {
    Equals,
    Or,
    Epsilon,
    Nonterminal(char),
    Terminal(char)
}

// Quoted text is all terminals, which is how `=`, `|`, `;`, spaces and
// capital letters get into the terminal alphabet
pub fn lex_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Vec<Token>> {
    line.next(); // Consume open quote
    let tokens = line.peeking_take_while(|&c| c != '\"').map(Token::Terminal).collect();

    // Check if there is a close quote and consume it if there is
    if line.next() != Some('\"') {
        return Err(CompileErrorType::UnmatchedQuote);
    }

    Ok(tokens)
}

pub fn lex_symbol(c: char) -> Token {
    if c == EPSILON {
        Token::Epsilon
    } else if c.is_ascii_uppercase() {
        Token::Nonterminal(c)
    } else {
        Token::Terminal(c)
    }
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == COMMENT {
            break;
        } else if *c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if *c == '\"' {
            tokens.extend(lex_terminal(&mut line_chars)?);
        } else if !c.is_whitespace() {
            tokens.push(lex_symbol(*c));
            line_chars.next();
        } else {
            line_chars.next();
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn lex_normal_terminal() {
        let lines = vec![
            "\"ab\" S",
            "\"=\"",
            "\"A\"\"|\"b"
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (vec![Token::Terminal('a'), Token::Terminal('b')], " S"),
            (vec![Token::Terminal('=')], ""),
            (vec![Token::Terminal('A')], "\"|\"b")
        ];

        for (line, (answer_tokens, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_terminal(&mut chars).unwrap(), answer_tokens);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_mismatched_terminal() {
        let lines = vec![
            "\"welcome",
            "\"a b c"
        ];

        for line in lines {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_terminal(&mut chars).unwrap_err(), CompileErrorType::UnmatchedQuote);
        }
    }

    #[test]
    fn lex_symbols() {
        let chars = vec!['S', 'a', 'ε', '0', 'Z'];
        let answers = vec![
            Token::Nonterminal('S'),
            Token::Terminal('a'),
            Token::Epsilon,
            Token::Terminal('0'),
            Token::Nonterminal('Z')
        ];

        for (c, answer) in zip(chars, answers) {
            assert_eq!(lex_symbol(c), answer);
        }
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S = aSb | ε",
            "B=aa B b|\" \" ; trailing comment"
        ];
        let answers = vec![
            vec![
                Token::Nonterminal('S'),
                Token::Equals,
                Token::Terminal('a'),
                Token::Nonterminal('S'),
                Token::Terminal('b'),
                Token::Or,
                Token::Epsilon
            ],
            vec![
                Token::Nonterminal('B'),
                Token::Equals,
                Token::Terminal('a'),
                Token::Terminal('a'),
                Token::Nonterminal('B'),
                Token::Terminal('b'),
                Token::Or,
                Token::Terminal(' ')
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line).unwrap(), answer)
        }
    }
}
