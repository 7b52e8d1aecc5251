use std::path::PathBuf;
use std::fmt::Display;

pub trait ErrorType: Display + PartialEq {}

// Position of an error inside an input file. Line 0 refers to the whole file.
#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Location {
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Location {
            file: file.into(),
            line: 0
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Oops;

    impl Display for Oops {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "oops")
        }
    }

    impl ErrorType for Oops {}

    #[test]
    fn location_display() {
        assert_eq!(Location::file("input_cfg.txt").to_string(), "input_cfg.txt");
        assert_eq!(Location { file: PathBuf::from("input_cfg.txt"), line: 4 }.to_string(), "input_cfg.txt:4");
    }

    #[test]
    fn error_display_contains_location_and_message() {
        let error = Error { location: Location { file: PathBuf::from("g.cfg"), line: 2 }, error: Oops };
        let rendered = error.to_string();
        assert!(rendered.contains("[g.cfg:2]"));
        assert!(rendered.contains("oops"));
    }
}
