//! Parsers for the multiplier-instance CNF format and its companion
//! solution files. An instance is plain clause text (one clause per line,
//! whitespace-separated signed integers terminated by `0`) plus three
//! required comment annotations naming the variable ids (most significant
//! first) of the product bits and of the two factor bit vectors.
//!
//! The crate is deliberately decoupled from the solver core: clauses are
//! exchanged as raw [`NonZeroI32`] codes and bit positions as plain ids.

use std::{
    io::Read,
    num::NonZeroI32,
};

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CnfParseError {
    #[error("failed to read source")]
    Io(#[from] std::io::Error),

    #[error("'{0}' is not a valid literal")]
    InvalidLiteral(String),

    #[error("clause line '{0}' is not terminated with '0'")]
    UnterminatedClause(String),

    #[error("clause line '{0}' continues past its terminating '0'")]
    TrailingTokens(String),

    #[error("missing '{0}' bit annotation")]
    MissingAnnotation(&'static str),

    #[error("'{0}' is not a valid bit position list")]
    InvalidBitList(String),
}

/// A parsed multiplier instance: the raw clauses and the three annotated bit
/// vectors, each ordered most-significant first.
#[derive(Debug)]
pub struct Instance {
    pub clauses: Vec<Vec<NonZeroI32>>,
    pub output_bits: Vec<u32>,
    pub first_input_bits: Vec<u32>,
    pub second_input_bits: Vec<u32>,
}

pub fn parse_instance(mut source: impl Read) -> Result<Instance, CnfParseError> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;

    let mut clauses = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        // Comments carry the annotations and are matched against the whole
        // text below; a DIMACS problem header is tolerated and ignored.
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }
        clauses.push(parse_clause_line(line)?);
    }

    Ok(Instance {
        clauses,
        output_bits: bit_annotation(&text, "output")?,
        first_input_bits: bit_annotation(&text, "first input")?,
        second_input_bits: bit_annotation(&text, "second input")?,
    })
}

fn parse_clause_line(line: &str) -> Result<Vec<NonZeroI32>, CnfParseError> {
    let mut lits = Vec::new();
    let mut terminated = false;

    for token in line.split_whitespace() {
        if terminated {
            return Err(CnfParseError::TrailingTokens(line.to_string()));
        }

        let code = token
            .parse::<i32>()
            .map_err(|_| CnfParseError::InvalidLiteral(token.to_string()))?;

        match NonZeroI32::new(code) {
            Some(lit) => lits.push(lit),
            // Only the exact token `0` terminates a clause; spellings like
            // `-0` or `00` also parse to zero but are malformed literals.
            None if token == "0" => terminated = true,
            None => return Err(CnfParseError::InvalidLiteral(token.to_string())),
        }
    }

    if !terminated {
        return Err(CnfParseError::UnterminatedClause(line.to_string()));
    }

    Ok(lits)
}

/// Extract one required annotation of the form
/// `c <words> <tag><no colon>: [n, n, ...]` from the instance text.
fn bit_annotation(text: &str, tag: &'static str) -> Result<Vec<u32>, CnfParseError> {
    let pattern = format!(r"(?m)^c\s+[a-zA-Z ]+{tag}[^:\r\n]*:\s*\[([0-9, ]+)\]\s*$");
    let re = Regex::new(&pattern).expect("annotation pattern is valid");

    let captures = re
        .captures(text)
        .ok_or(CnfParseError::MissingAnnotation(tag))?;
    let list = &captures[1];

    list.split(',')
        .map(|id| {
            id.trim()
                .parse::<u32>()
                .map_err(|_| CnfParseError::InvalidBitList(list.to_string()))
        })
        .collect()
}

/// Read a recorded solution. A file starting with the token `SAT` yields the
/// assignment asserted by its signed literals; any other content means no
/// solution was recorded.
pub fn parse_solution(mut source: impl Read) -> Result<Option<Vec<(u32, bool)>>, CnfParseError> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;

    let Some(rest) = text.strip_prefix("SAT") else {
        return Ok(None);
    };

    let re = Regex::new(r"-?[1-9][0-9]*").expect("literal pattern is valid");

    let mut assignment = Vec::new();
    for token in re.find_iter(rest) {
        let code = token
            .as_str()
            .parse::<i32>()
            .map_err(|_| CnfParseError::InvalidLiteral(token.as_str().to_string()))?;
        assignment.push((code.unsigned_abs(), code > 0));
    }

    Ok(Some(assignment))
}

/// Persist a verdict in the format [`parse_solution`] reads back: `SAT` and
/// a zero-terminated literal line, or `UNSAT`.
pub fn write_solution(
    writer: &mut impl std::io::Write,
    assignment: Option<&[(u32, bool)]>,
) -> std::io::Result<()> {
    match assignment {
        Some(assignment) => {
            writeln!(writer, "SAT")?;
            let line = assignment
                .iter()
                .map(|&(var, value)| {
                    if value {
                        var.to_string()
                    } else {
                        format!("-{var}")
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{line} 0")
        }
        None => writeln!(writer, "UNSAT"),
    }
}
