//! Error type shared by oracles, the subsolver and every optimizer.
//!
//! - `Construction`: dimension mismatch while building an oracle or problem.
//! - `Subproblem`: the projection subsolver could not produce a point.
//! - `Configuration`: an option value the algorithms cannot run with.
//!
//! Running out of iterations is not an error; see `algorithms::Status`.

use std::fmt;

/// Why a constrained projection failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubproblemFailure {
    Infeasible,
    Unbounded,
    Numerical,
}

impl fmt::Display for SubproblemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::Numerical => write!(f, "numerical failure"),
        }
    }
}

#[derive(Debug)]
pub enum ProjectionError {
    Construction {
        reason: String,
    },
    Subproblem {
        failure: SubproblemFailure,
        reason: String,
    },
    Configuration {
        reason: String,
    },
}

impl ProjectionError {
    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }

    pub(crate) fn subproblem(failure: SubproblemFailure, reason: impl Into<String>) -> Self {
        Self::Subproblem {
            failure,
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Subproblem failure kind, if this is a subproblem error.
    pub fn subproblem_failure(&self) -> Option<SubproblemFailure> {
        match self {
            Self::Subproblem { failure, .. } => Some(*failure),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Construction { reason } => write!(f, "invalid construction: {reason}"),
            Self::Subproblem { failure, reason } => {
                write!(f, "projection subproblem {failure}: {reason}")
            }
            Self::Configuration { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ProjectionError {}

pub type Result<T> = std::result::Result<T, ProjectionError>;
