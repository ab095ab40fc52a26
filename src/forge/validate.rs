//! Operation validation: per-kind required-field checks with aggregated
//! reporting.
//!
//! Validation is total: it either succeeds or returns one
//! [`ValidationError`] listing **every** problem found, never just the
//! first. The textual form joins the problems with `": "`; the individual
//! problems stay available on the error for callers that want structure
//! instead of a string.
//!
//! The checks, in order for each kind:
//!
//! 1. The value's kind matches the validator being run.
//! 2. The kind-specific fields are present (and non-negative where numeric).
//! 3. The common header is complete: fee, gas limit, counter, storage
//!    limit, source (numeric fields must also be non-negative).
//!
//! Negative integers are rejected here so they can never reach the Zarith
//! encoder, which operates on magnitudes.

use std::fmt;

use thiserror::Error;

use crate::model::{BigInt, Contents, OperationHeader, OperationKind};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// One defect found while validating a `Contents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Problem {
    /// A required field is absent.
    #[error("missing {0}")]
    Missing(&'static str),
    /// The value's kind does not match the validator that ran.
    #[error("wrong kind for {0}")]
    WrongKind(&'static str),
    /// A numeric field is negative.
    #[error("negative {0}")]
    Negative(&'static str),
}

/// The aggregate of every problem a validation pass found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The individual problems, in check order.
    pub problems: Vec<Problem>,
}

impl ValidationError {
    pub(crate) fn single(problem: Problem) -> Self {
        Self {
            problems: vec![problem],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for problem in &self.problems {
            if !first {
                write!(f, ": ")?;
            }
            write!(f, "{}", problem)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validates a `Contents` against the rules of its own kind.
pub fn validate(contents: &Contents) -> Result<(), ValidationError> {
    match contents.kind() {
        OperationKind::Transaction => validate_transaction(contents),
        OperationKind::Reveal => validate_reveal(contents),
        OperationKind::Origination => validate_origination(contents),
        OperationKind::Delegation => validate_delegation(contents),
    }
}

/// Validates a `Contents` as a transaction.
pub fn validate_transaction(contents: &Contents) -> Result<(), ValidationError> {
    let mut problems = Vec::new();
    match contents {
        Contents::Transaction(tx) => {
            check_int(&tx.amount, "amount", &mut problems);
            check_present(tx.destination.as_deref(), "destination", &mut problems);
        }
        _ => {
            problems.push(Problem::WrongKind("transaction"));
            problems.push(Problem::Missing("amount"));
            problems.push(Problem::Missing("destination"));
        }
    }
    finish(contents.header(), problems)
}

/// Validates a `Contents` as a reveal.
pub fn validate_reveal(contents: &Contents) -> Result<(), ValidationError> {
    let mut problems = Vec::new();
    match contents {
        Contents::Reveal(reveal) => {
            check_present(reveal.phk.as_deref(), "phk", &mut problems);
        }
        _ => {
            problems.push(Problem::WrongKind("reveal"));
            problems.push(Problem::Missing("phk"));
        }
    }
    finish(contents.header(), problems)
}

/// Validates a `Contents` as an origination.
pub fn validate_origination(contents: &Contents) -> Result<(), ValidationError> {
    let mut problems = Vec::new();
    match contents {
        Contents::Origination(origination) => {
            check_int(&origination.balance, "balance", &mut problems);
            check_present(origination.delegate.as_deref(), "delegate", &mut problems);
        }
        _ => {
            problems.push(Problem::WrongKind("origination"));
            problems.push(Problem::Missing("balance"));
            problems.push(Problem::Missing("delegate"));
        }
    }
    finish(contents.header(), problems)
}

/// Validates a `Contents` as a delegation.
pub fn validate_delegation(contents: &Contents) -> Result<(), ValidationError> {
    let mut problems = Vec::new();
    match contents {
        Contents::Delegation(delegation) => {
            check_present(delegation.delegate.as_deref(), "delegate", &mut problems);
        }
        _ => {
            problems.push(Problem::WrongKind("delegation"));
            problems.push(Problem::Missing("delegate"));
        }
    }
    finish(contents.header(), problems)
}

fn finish(header: &OperationHeader, mut problems: Vec<Problem>) -> Result<(), ValidationError> {
    problems.extend(common_problems(header));
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { problems })
    }
}

/// Checks the header fields every kind requires.
fn common_problems(header: &OperationHeader) -> Vec<Problem> {
    let mut problems = Vec::new();
    check_int(&header.fee, "fee", &mut problems);
    check_int(&header.gas_limit, "gas limit", &mut problems);
    check_int(&header.counter, "counter", &mut problems);
    check_int(&header.storage_limit, "storage limit", &mut problems);
    check_present(header.source.as_deref(), "source", &mut problems);
    problems
}

fn check_int(value: &Option<BigInt>, name: &'static str, problems: &mut Vec<Problem>) {
    match value {
        None => problems.push(Problem::Missing(name)),
        Some(v) if v.is_negative() => problems.push(Problem::Negative(name)),
        Some(_) => {}
    }
}

fn check_present(value: Option<&str>, name: &'static str, problems: &mut Vec<Problem>) {
    if value.map_or(true, str::is_empty) {
        problems.push(Problem::Missing(name));
    }
}
