//! Line-oriented corpus ingestion.
//!
//! Readers that fill a [`Dictionary`] or a [`DidYouMean`] from text
//! input: one term per line, or `term<separator>weight` pairs. A
//! malformed line surfaces as [`CorrigoError::FileFormat`] with its
//! 1-based line number and the offending text, distinct from
//! [`CorrigoError::Io`]; both are recoverable at the call site.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::debug;

use crate::error::{CorrigoError, Result};
use crate::index::Dictionary;
use crate::suggest::DidYouMean;

/// Read one term per line from `input` into `dict`.
///
/// Lines are trimmed; empty lines are skipped. Returns the number of
/// terms added.
pub fn read_terms<R: Read, D: Dictionary<String>>(input: R, dict: &mut D) -> Result<usize> {
    let mut count = 0;
    for line in BufReader::new(input).lines() {
        let line = line?;
        let term = line.trim();
        if term.is_empty() {
            continue;
        }
        dict.add(term.to_string());
        count += 1;
    }
    debug!("ingested {} terms", count);
    Ok(count)
}

/// Read `term<separator>weight` pairs from `input` into `dym`.
///
/// Lines are trimmed; empty lines are skipped. Stops at the first
/// malformed line with [`CorrigoError::FileFormat`]; callers that prefer
/// to skip bad lines can drive [`parse_weighted_line`] themselves.
/// Returns the number of pairs added.
pub fn read_weighted<R: Read, D: Dictionary<String>>(
    input: R,
    separator: char,
    dym: &mut DidYouMean<D>,
) -> Result<usize> {
    let mut count = 0;
    for (idx, line) in BufReader::new(input).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (term, weight) = parse_weighted_line(&line, separator, idx + 1)?;
        dym.add(&term, weight);
        count += 1;
    }
    debug!("ingested {} weighted terms", count);
    Ok(count)
}

/// Parse a single `term<separator>weight` line.
///
/// `line_no` is the 1-based line number reported on error. The line must
/// contain exactly two non-empty fields, the second an unsigned integer.
pub fn parse_weighted_line(line: &str, separator: char, line_no: usize) -> Result<(String, u64)> {
    let trimmed = line.trim();
    let expected = format!("expected `term{separator}weight`");
    let mut fields = trimmed.split(separator);
    let (Some(term), Some(weight), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(CorrigoError::file_format(line_no, expected, trimmed));
    };
    if term.is_empty() || weight.is_empty() {
        return Err(CorrigoError::file_format(line_no, expected, trimmed));
    }
    let weight: u64 = weight
        .parse()
        .map_err(|_| CorrigoError::file_format(line_no, expected, trimmed))?;
    Ok((term.to_string(), weight))
}

/// Open `path` and read plain terms from it; see [`read_terms`].
pub fn read_terms_file<P: AsRef<Path>, D: Dictionary<String>>(
    path: P,
    dict: &mut D,
) -> Result<usize> {
    read_terms(File::open(path)?, dict)
}

/// Open `path` and read weighted terms from it; see [`read_weighted`].
pub fn read_weighted_file<P: AsRef<Path>, D: Dictionary<String>>(
    path: P,
    separator: char,
    dym: &mut DidYouMean<D>,
) -> Result<usize> {
    read_weighted(File::open(path)?, separator, dym)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::BkTree;
    use crate::metric::Levenshtein;

    fn empty_dym() -> DidYouMean<BkTree<String, Levenshtein>> {
        DidYouMean::with_bk_tree(Levenshtein::new())
    }

    #[test]
    fn test_read_terms_trims_and_skips_blank_lines() {
        let input = "  wetter  \n\nvetter\n   \nkette\n";
        let mut tree = BkTree::new(Levenshtein::new());
        let count = read_terms(input.as_bytes(), &mut tree).unwrap();
        assert_eq!(count, 3);
        let result = tree.lookup(&"wetter".to_string(), 0);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_read_weighted_accumulates() {
        let input = "wetter:3\nvetter:1\nwetter:4\n";
        let mut dym = empty_dym();
        let count = read_weighted(input.as_bytes(), ':', &mut dym).unwrap();
        assert_eq!(count, 3);
        assert_eq!(dym.weight("wetter"), Some(7));
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let input = "wetter:3\nkaputt\nvetter:1\n";
        let mut dym = empty_dym();
        let err = read_weighted(input.as_bytes(), ':', &mut dym).unwrap_err();
        match err {
            CorrigoError::FileFormat { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "kaputt");
            }
            other => panic!("expected FileFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_weight_must_be_unsigned() {
        assert!(parse_weighted_line("wort:viele", ':', 1).is_err());
        assert!(parse_weighted_line("wort:-3", ':', 1).is_err());
        assert!(parse_weighted_line("wort:3:extra", ':', 1).is_err());
        assert!(parse_weighted_line(":3", ':', 1).is_err());
        assert_eq!(
            parse_weighted_line(" wort:3 ", ':', 1).unwrap(),
            ("wort".to_string(), 3)
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut dym = empty_dym();
        let err = read_weighted_file("/nonexistent/terms.txt", ':', &mut dym).unwrap_err();
        assert!(matches!(err, CorrigoError::Io(_)));
    }
}
