//! Classification of the tokens following the compose subcommand
//!
//! Splits the raw token list into pass-through command options and the
//! skiff-specific directives (`--include`, `--exclude`, `--port`). Directive
//! tokens may be interleaved with pass-through options in any order;
//! pass-through options keep their original relative order.

use crate::error::{Result, SkiffError};
use crate::ports::PortOverride;

const INCLUDE_FLAG: &str = "--include";
const EXCLUDE_FLAG: &str = "--exclude";
const PORT_FLAG: &str = "--port";

/// Classified view of the tokens after the compose subcommand
#[derive(Debug, Default)]
pub struct Directives {
    /// Options forwarded verbatim to the compose binary
    pub cmd_options: Vec<String>,
    /// Service names given with --include
    pub include: Vec<String>,
    /// Service names given with --exclude
    pub exclude: Vec<String>,
    /// Successfully parsed --port overrides, in token order
    pub overrides: Vec<PortOverride>,
    /// Malformed --port tokens, skipped with a reason
    pub skipped: Vec<SkippedPortToken>,
}

/// A --port token that failed to parse and was dropped from the run
#[derive(Debug)]
pub struct SkippedPortToken {
    pub token: String,
    pub reason: String,
}

impl Directives {
    /// Whether any directive was present, well-formed or not
    ///
    /// A malformed --port token still counts: it must not be forwarded to
    /// the compose binary, so the run cannot take the pass-through path.
    pub fn any(&self) -> bool {
        !self.include.is_empty()
            || !self.exclude.is_empty()
            || !self.overrides.is_empty()
            || !self.skipped.is_empty()
    }
}

/// Classify the tokens following the compose subcommand
///
/// Each directive flag consumes the next token as its value; a directive at
/// the end of the list with no value is an error (the intent is ambiguous).
/// Malformed --port values are collected as skipped, not fatal.
pub fn classify(tokens: &[String]) -> Result<Directives> {
    let mut directives = Directives::default();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        match token.as_str() {
            INCLUDE_FLAG => {
                directives.include.push(directive_value(&mut iter, INCLUDE_FLAG)?);
            }
            EXCLUDE_FLAG => {
                directives.exclude.push(directive_value(&mut iter, EXCLUDE_FLAG)?);
            }
            PORT_FLAG => {
                let value = directive_value(&mut iter, PORT_FLAG)?;
                match PortOverride::parse(&value) {
                    Ok(override_) => directives.overrides.push(override_),
                    Err(err) => directives.skipped.push(SkippedPortToken {
                        token: value,
                        reason: reason_of(&err),
                    }),
                }
            }
            _ => directives.cmd_options.push(token.clone()),
        }
    }

    Ok(directives)
}

fn directive_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<String> {
    iter.next().cloned().ok_or_else(|| SkiffError::DirectiveMissingValue {
        flag: flag.to_string(),
    })
}

fn reason_of(err: &SkiffError) -> String {
    match err {
        SkiffError::InvalidPortMapping { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
