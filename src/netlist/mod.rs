//! Netlist parser for `.circuit` blocks.
//!
//! The netlist is line-oriented. Only the lines strictly between the
//! `.circuit` and `.end` markers are read; anything outside the block is
//! ignored.
//!
//! # Grammar Overview
//!
//! ```text
//! file        = { line } circuit_start { component | empty } circuit_end { line }
//! circuit_start = '.circuit' { any_char }
//! circuit_end = { any_char } '.end'
//! component   = resistor | source
//! resistor    = 'R' name node node value
//! source      = ('V' | 'I') name node node param value
//!
//! value       = number [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! The `param` slot of a source (conventionally `dc`) is kept for format
//! compatibility and otherwise ignored.
//!
//! # Example
//!
//! ```text
//! .circuit
//! V1   in   GND  dc 10
//! R1   in   out  1k
//! R2   out  GND  1k
//! .end
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{find_circuit_block, parse_value, tokenize, SourceLine, CIRCUIT_END, CIRCUIT_START};
pub use parser::{ParseOptions, Parser};

use std::path::Path;

use crate::error::{Result, SpiceError};

/// Parse netlist text with default options.
pub fn parse(input: &str) -> Result<Netlist> {
    parse_with(input, &ParseOptions::default())
}

/// Parse netlist text with the given options.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Netlist> {
    let lines = tokenize(input)?;
    Parser::new(options).parse(&lines)
}

/// Read a netlist file into memory.
///
/// An empty path is rejected before touching the filesystem.
pub fn read_file(path: &Path) -> Result<String> {
    if path.as_os_str().is_empty() {
        return Err(SpiceError::MissingInput);
    }
    std::fs::read_to_string(path).map_err(|e| SpiceError::NotFound {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse a netlist file.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<Netlist> {
    let content = read_file(path)?;
    parse_with(&content, options)
}
