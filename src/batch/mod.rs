/*
    This module runs blocks of membership queries read from a file
*/

use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use crate::derivation::Budget;
use crate::error_handling::*;
use crate::grammar::catalogue::Catalogue;
use crate::membership::{classify_within, Verdict};

pub const END_OF_BLOCK: &str = "end";
pub const BLOCK_TERMINATOR: &str = "x";
pub const INVALID_PROBLEM: &str = "Invalid problem number";

#[derive(Debug, Error)]
pub enum BatchErrorType {
    #[error("Could not read input: {0}")]
    Read(std::io::Error),
    #[error("Could not write output: {0}")]
    Write(std::io::Error),
}

impl ErrorType for BatchErrorType {}

impl PartialEq for BatchErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BatchErrorType::Read(a), BatchErrorType::Read(b)) => a.kind() == b.kind(),
            (BatchErrorType::Write(a), BatchErrorType::Write(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

pub type BatchError = Error<BatchErrorType>;

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub blocks: usize,
    pub invalid_blocks: usize,
    pub queries: usize,
    pub accepted: usize,
    pub exhausted: usize,
}

// One problem id and the queries that follow it
#[derive(Debug, PartialEq)]
struct Block {
    header: String,
    queries: Vec<String>,
}

pub struct Driver<'c> {
    catalogue: &'c Catalogue,
    budget: Budget,
}

impl<'c> Driver<'c> {
    pub fn new(catalogue: &'c Catalogue, budget: Budget) -> Self {
        Driver { catalogue, budget }
    }

    pub fn run(&self, input: impl BufRead, mut output: impl Write, source: &Path) -> Result<Summary, BatchError> {
        let mut summary = Summary::default();
        let mut lines = input.lines().enumerate().map(|(num, line)| {
            line.map_err(|e| BatchError {
                location: Location { file: source.to_path_buf(), line: num + 1 },
                error: BatchErrorType::Read(e),
            })
        });

        while let Some(block) = read_block(&mut lines)? {
            self.answer(&block, &mut output, &mut summary)
                .map_err(|e| BatchError { location: Location::file(source), error: BatchErrorType::Write(e) })?;
        }

        output
            .flush()
            .map_err(|e| BatchError { location: Location::file(source), error: BatchErrorType::Write(e) })?;
        info!(
            "{} blocks ({} invalid), {} queries, {} accepted",
            summary.blocks, summary.invalid_blocks, summary.queries, summary.accepted
        );
        Ok(summary)
    }

    fn answer(&self, block: &Block, output: &mut impl Write, summary: &mut Summary) -> std::io::Result<()> {
        summary.blocks += 1;
        let problem = block.header.parse::<u32>().ok();

        // Numbers are echoed the way they parse, anything else as written
        match problem {
            Some(id) => writeln!(output, "{}", id)?,
            None => writeln!(output, "{}", block.header)?,
        }

        match problem.and_then(|id| self.catalogue.get(id)) {
            Some(grammar) => {
                info!("problem {}: {} queries", block.header, block.queries.len());
                for query in &block.queries {
                    let verdict = classify_within(grammar, query, self.budget);
                    debug!("problem {}: {:?} {}", block.header, query, verdict);
                    summary.queries += 1;
                    match verdict {
                        Verdict::Accepted => summary.accepted += 1,
                        Verdict::SearchExhausted => summary.exhausted += 1,
                        Verdict::NotAccepted => {}
                    }
                    writeln!(output, "{}", verdict)?;
                }
            }
            None => {
                warn!("invalid problem number {:?}, skipping {} queries", block.header, block.queries.len());
                summary.invalid_blocks += 1;
                writeln!(output, "{}", INVALID_PROBLEM)?;
            }
        }

        writeln!(output, "{}", BLOCK_TERMINATOR)
    }
}

// Skips blank lines up to the next header, then takes query lines up to `end`
// or the end of input
fn read_block(lines: &mut impl Iterator<Item = Result<String, BatchError>>) -> Result<Option<Block>, BatchError> {
    let header = loop {
        match lines.next() {
            None => return Ok(None),
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line.trim().to_string();
                }
            }
        }
    };

    let mut queries = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim() == END_OF_BLOCK {
            break;
        }
        queries.push(line.trim().to_string());
    }

    Ok(Some(Block { header, queries }))
}

#[cfg(test)]
mod tests {
    use std::iter::zip;
    use std::path::PathBuf;

    use super::*;

    fn run(input: &str, budget: Budget) -> (String, Summary) {
        let catalogue = Catalogue::builtin().unwrap();
        let mut output = Vec::new();
        let summary = Driver::new(&catalogue, budget)
            .run(input.as_bytes(), &mut output, Path::new("input_cfg.txt"))
            .unwrap();
        (String::from_utf8(output).unwrap(), summary)
    }

    fn blocks(input: &str) -> Vec<Block> {
        let mut lines = input.lines().map(|l| Ok(l.to_string()));
        let mut blocks = Vec::new();
        while let Some(block) = read_block(&mut lines).unwrap() {
            blocks.push(block);
        }
        blocks
    }

    #[test]
    fn read_blocks() {
        let inputs = vec![
            "1\nab\n a \nend\n",
            "\n\n4\n\nend\n5\naab",
            ""
        ];
        let answers = vec![
            vec![Block { header: "1".to_string(), queries: vec!["ab".to_string(), "a".to_string()] }],
            vec![
                Block { header: "4".to_string(), queries: vec!["".to_string()] },
                Block { header: "5".to_string(), queries: vec!["aab".to_string()] }
            ],
            vec![]
        ];

        for (input, answer) in zip(inputs, answers) {
            assert_eq!(blocks(input), answer);
        }
    }

    #[test]
    fn answer_blocks() {
        let (output, summary) = run("1\n\nab\na\nend\n4\naaa\naaaaab\naaaab\naab\nend\n", Budget::unbounded());

        assert_eq!(output, "1\naccepted\naccepted\nnot accepted\nx\n4\naccepted\naccepted\nnot accepted\nnot accepted\nx\n");
        assert_eq!(summary, Summary { blocks: 2, invalid_blocks: 0, queries: 7, accepted: 4, exhausted: 0 });
    }

    #[test]
    fn invalid_problems_do_not_stop_the_batch() {
        let (output, summary) = run("6\nab\nend\nseven\nend\n5\nε\naab\nend\n", Budget::unbounded());

        assert_eq!(output, "6\nInvalid problem number\nx\nseven\nInvalid problem number\nx\n5\nnot accepted\naccepted\nx\n");
        assert_eq!(summary.invalid_blocks, 2);
        assert_eq!(summary.queries, 2);
    }

    #[test]
    fn headers_echo_as_numbers() {
        let (output, _) = run(" 03 \nend\n", Budget::unbounded());
        assert_eq!(output, "3\nx\n");
    }

    #[test]
    fn budget_shows_up_in_verdicts() {
        let (output, summary) = run("1\nabab\nend\n", Budget::expansions(1));
        assert_eq!(output, "1\nsearch exhausted\nx\n");
        assert_eq!(summary.exhausted, 1);
    }

    #[test]
    fn example_file() {
        let catalogue = Catalogue::builtin().unwrap();
        let path = PathBuf::from("example_data/input_cfg.txt");
        let input = std::io::BufReader::new(std::fs::File::open(&path).unwrap());
        let mut output = Vec::new();

        Driver::new(&catalogue, Budget::unbounded()).run(input, &mut output, &path).unwrap();

        let expected = std::fs::read_to_string("example_data/output_cfg.txt").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn write_failures_are_reported() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let catalogue = Catalogue::builtin().unwrap();
        let error = Driver::new(&catalogue, Budget::unbounded())
            .run("1\nab\nend\n".as_bytes(), Broken, Path::new("input_cfg.txt"))
            .unwrap_err();

        assert_eq!(error.error, BatchErrorType::Write(std::io::ErrorKind::BrokenPipe.into()));
    }
}
