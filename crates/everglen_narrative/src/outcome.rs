//! Results of two sequential completion calls.

use everglen_error::{EverglenError, EverglenResult};

/// Outcome of an operation made of two dependent completion calls.
///
/// The second call only runs when the first succeeded, so a failure is
/// attributed to exactly one step and any completed first result is kept.
#[derive(Debug)]
pub enum SequentialOutcome<A, B> {
    /// Both steps succeeded
    Complete {
        /// First step result
        first: A,
        /// Second step result
        second: B,
    },
    /// The first step failed; the second never ran
    FirstFailed {
        /// Name of the failed step
        step: &'static str,
        /// Why it failed
        error: EverglenError,
    },
    /// The first step succeeded and the second failed
    SecondFailed {
        /// First step result
        first: A,
        /// Name of the failed step
        step: &'static str,
        /// Why it failed
        error: EverglenError,
    },
}

impl<A, B> SequentialOutcome<A, B> {
    /// Whether both steps succeeded.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// First step result, if it was produced.
    pub fn first(&self) -> Option<&A> {
        match self {
            Self::Complete { first, .. } | Self::SecondFailed { first, .. } => Some(first),
            Self::FirstFailed { .. } => None,
        }
    }

    /// Second step result, if it was produced.
    pub fn second(&self) -> Option<&B> {
        match self {
            Self::Complete { second, .. } => Some(second),
            _ => None,
        }
    }

    /// Name of the failed step.
    pub fn failed_step(&self) -> Option<&'static str> {
        match self {
            Self::Complete { .. } => None,
            Self::FirstFailed { step, .. } | Self::SecondFailed { step, .. } => Some(step),
        }
    }

    /// Error of the failed step.
    pub fn error(&self) -> Option<&EverglenError> {
        match self {
            Self::Complete { .. } => None,
            Self::FirstFailed { error, .. } | Self::SecondFailed { error, .. } => Some(error),
        }
    }

    /// Both results, or the failing step's error.
    ///
    /// Partial results are discarded.
    pub fn into_complete(self) -> EverglenResult<(A, B)> {
        match self {
            Self::Complete { first, second } => Ok((first, second)),
            Self::FirstFailed { error, .. } | Self::SecondFailed { error, .. } => Err(error),
        }
    }
}
