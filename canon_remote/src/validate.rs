//! Classifies observed transfer sizes against the command table.
//!
//! Validation never fails a transfer on its own. It reports what it saw and
//! the caller picks the policy.

use std::fmt;
use std::num::NonZeroU32;

use crate::command::{CommandDescriptor, CommandId};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Actual length equals the captured length.
    Exact,
    /// No length has been captured for this command, nothing was checked.
    Unvalidated,
    Mismatch { expected: usize, actual: usize },
}

impl Outcome {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Outcome::Mismatch { .. })
    }

    /// Turns a `Mismatch` into [`Error::LengthMismatch`], passes everything else through.
    pub fn into_result(self, id: CommandId, direction: Direction) -> Result<Outcome, Error> {
        match self {
            Outcome::Mismatch { expected, actual } => Err(Error::LengthMismatch {
                id,
                direction,
                expected,
                actual,
            }),
            outcome => Ok(outcome),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Reply,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Request => f.write_str("request"),
            Direction::Reply => f.write_str("reply"),
        }
    }
}

pub fn validate_request(descriptor: &CommandDescriptor, actual_request_length: usize) -> Outcome {
    classify(descriptor.request_contract(), actual_request_length)
}

pub fn validate_reply(descriptor: &CommandDescriptor, actual_reply_length: usize) -> Outcome {
    classify(descriptor.reply_contract(), actual_reply_length)
}

fn classify(expected: Option<NonZeroU32>, actual: usize) -> Outcome {
    match expected {
        None => Outcome::Unvalidated,
        Some(expected) => {
            let expected = expected.get() as usize;
            if expected == actual {
                Outcome::Exact
            } else {
                Outcome::Mismatch { expected, actual }
            }
        }
    }
}
