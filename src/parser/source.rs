//! Source normalization
//!
//! Raw text is split on line breaks, every line is trimmed, and blank lines are
//! dropped. The 1-based position of a surviving line is its line number for the rest
//! of the pipeline, so numbers refer to the filtered sequence and not the original
//! file.

use serde::{Deserialize, Serialize};

/// The ordered, non-blank, trimmed lines of a program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    pub fn normalize(source: &str) -> Self {
        let lines = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        SourceLines { lines }
    }

    /// Look up a line by its 1-based number
    pub fn get(&self, line_number: usize) -> Option<&str> {
        line_number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate as `(line_number, text)` pairs
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (i + 1, line.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_dropped_and_trimmed() {
        let lines = SourceLines::normalize("  x = 1  \n\n\t\ny = 2\r\n   \nconsole.log(y)");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.get(1), Some("x = 1"));
        assert_eq!(lines.get(2), Some("y = 2"));
        assert_eq!(lines.get(3), Some("console.log(y)"));
        assert_eq!(lines.get(0), None);
        assert_eq!(lines.get(4), None);
    }

    #[test]
    fn test_empty_source() {
        assert!(SourceLines::normalize("").is_empty());
        assert!(SourceLines::normalize(" \n \n").is_empty());
    }
}
