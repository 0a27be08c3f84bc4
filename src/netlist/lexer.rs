//! Circuit block extraction and line tokenizer.

use tracing::debug;

use crate::error::{Result, SpiceError};

/// Keyword opening the circuit block.
pub const CIRCUIT_START: &str = ".circuit";

/// Keyword closing the circuit block.
pub const CIRCUIT_END: &str = ".end";

/// A non-empty line from inside the circuit block, split on whitespace.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine<'a> {
    /// Line number (1-indexed)
    pub number: usize,
    /// Whitespace-separated tokens
    pub tokens: Vec<&'a str>,
}

/// Locate the `.circuit` / `.end` marker lines.
///
/// Returns the zero-based indices `(start, end)`. Every line is scanned and
/// the last match of each marker wins, so a repeated `.circuit` line moves
/// the start of the block forward.
pub fn find_circuit_block(lines: &[&str]) -> Result<(usize, usize)> {
    let mut start = None;
    let mut end = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with(CIRCUIT_START) {
            start = Some(i);
        }
        if trimmed.ends_with(CIRCUIT_END) {
            end = Some(i);
        }
    }

    match (start, end) {
        (None, _) => Err(SpiceError::malformed(0, "missing '.circuit' line")),
        (_, None) => Err(SpiceError::malformed(0, "missing '.end' line")),
        (Some(s), Some(e)) if s >= e => Err(SpiceError::malformed(
            e + 1,
            format!("'.end' (line {}) does not follow '.circuit' (line {})", e + 1, s + 1),
        )),
        (Some(s), Some(e)) => {
            debug!(start = s + 1, end = e + 1, "found circuit block");
            Ok((s, e))
        }
    }
}

/// Tokenize the lines strictly between the circuit block markers.
///
/// Blank lines are dropped; everything outside the block is ignored.
pub fn tokenize(input: &str) -> Result<Vec<SourceLine<'_>>> {
    let lines: Vec<&str> = input.lines().collect();
    let (start, end) = find_circuit_block(&lines)?;

    Ok(lines[start + 1..end]
        .iter()
        .copied()
        .enumerate()
        .filter_map(|(offset, line)| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                None
            } else {
                Some(SourceLine {
                    number: start + 2 + offset,
                    tokens,
                })
            }
        })
        .collect())
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (num_str, multiplier) = match text.chars().last() {
        Some(last) => {
            let mult = match last {
                'p' => 1e-12,
                'n' => 1e-9,
                'u' | 'µ' => 1e-6,
                'm' => 1e-3,
                'k' | 'K' => 1e3,
                'M' => 1e6,
                'G' => 1e9,
                _ => 1.0,
            };
            if mult != 1.0 {
                (&text[..text.len() - last.len_utf8()], mult)
            } else {
                (text, 1.0)
            }
        }
        None => (text, 1.0),
    };

    num_str.parse::<f64>().ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => (x - y).abs() < x.abs() * 1e-10 + 1e-15,
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_parse_value() {
        assert!(approx_eq(parse_value("10k"), Some(10_000.0)));
        assert!(approx_eq(parse_value("100n"), Some(100e-9)));
        assert!(approx_eq(parse_value("4.7u"), Some(4.7e-6)));
        assert!(approx_eq(parse_value("1M"), Some(1_000_000.0)));
        assert!(approx_eq(parse_value("2.2"), Some(2.2)));
        assert!(approx_eq(parse_value("-5"), Some(-5.0)));
        assert!(approx_eq(parse_value("1e-9"), Some(1e-9)));
        assert!(approx_eq(parse_value("1e3"), Some(1e3)));
        assert!(approx_eq(parse_value("dc"), None));
        assert!(approx_eq(parse_value("k"), None));
    }

    #[test]
    fn test_find_block() {
        let lines = ["* header", ".circuit", "R1 a GND 1", ".end"];
        assert_eq!(find_circuit_block(&lines).unwrap(), (1, 3));
    }

    #[test]
    fn test_find_block_last_marker_wins() {
        let lines = [".circuit", "R1 a GND 1", ".circuit", "R2 a GND 1", ".end"];
        assert_eq!(find_circuit_block(&lines).unwrap(), (2, 4));
    }

    #[test]
    fn test_find_block_missing_markers() {
        let no_start = ["R1 a GND 1", ".end"];
        assert!(matches!(
            find_circuit_block(&no_start),
            Err(SpiceError::MalformedInput { .. })
        ));

        let no_end = [".circuit", "R1 a GND 1"];
        assert!(matches!(
            find_circuit_block(&no_end),
            Err(SpiceError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_find_block_out_of_order() {
        let lines = [".end", "R1 a GND 1", ".circuit"];
        assert!(matches!(
            find_circuit_block(&lines),
            Err(SpiceError::MalformedInput { line: 1, .. })
        ));
    }

    #[test]
    fn test_tokenize_skips_blank_lines() {
        let input = "title\n.circuit\n\nR1  n1\tGND  10\n   \nV1 n1 GND dc 5\n.end\ntrailing junk";
        let lines = tokenize(input).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 4);
        assert_eq!(lines[0].tokens, vec!["R1", "n1", "GND", "10"]);
        assert_eq!(lines[1].number, 6);
        assert_eq!(lines[1].tokens.len(), 5);
    }

    #[test]
    fn test_tokenize_end_suffix() {
        // Any line ending in ".end" closes the block.
        let input = ".circuit\nR1 a GND 1\ncircuit.end\n";
        let lines = tokenize(input).unwrap();
        assert_eq!(lines.len(), 1);
    }
}
