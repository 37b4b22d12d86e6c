//! Constrained-projection subsolver.
//!
//! Purpose
//! - Return `argmin_x ‖x − r‖₂` subject to a finite collection of hyperplanes
//!   and halfspaces. The numerical work belongs to an external convex solver
//!   behind `ProjectionBackend`; this module assembles the objective and the
//!   constraint rows and maps solver failures onto `ProjectionError`.
//!
//! Assembly rules (shared by every backend through `assemble_rows`)
//! - Rows are scaled to unit normals.
//! - Vacuous rows (normal below `NORMAL_EPS`) are dropped; a vacuous equality
//!   with a nonzero right-hand side is reported infeasible immediately.
//! - With no remaining rows, or when `r` already satisfies every row within
//!   `FEAS_EPS`, the answer is `r` itself and no solver is called.

mod clarabel;

pub use self::clarabel::{BackendSettings, ClarabelBackend};

use crate::cfg::{FEAS_EPS, NORMAL_EPS};
use crate::error::SubproblemFailure;
use crate::geometry::Constraint;
use crate::{Point, ProjectionError, Result};

pub trait ProjectionBackend {
    fn name(&self) -> &'static str;

    /// Euclidean projection of `r` onto the intersection of `constraints`.
    fn project(&self, r: &Point, constraints: &[Constraint]) -> Result<Point>;
}

/// Unit-normal row `a·x (= | <=) b`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Row {
    pub a: Point,
    pub b: f64,
}

/// Rows split by kind: equalities first, then inequalities.
#[derive(Clone, Debug, Default)]
pub(crate) struct Rows {
    pub eq: Vec<Row>,
    pub le: Vec<Row>,
}

impl Rows {
    pub(crate) fn is_empty(&self) -> bool {
        self.eq.is_empty() && self.le.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.eq.len() + self.le.len()
    }

    pub(crate) fn satisfied_by(&self, x: &Point, eps: f64) -> bool {
        self.eq.iter().all(|r| (r.a.dot(x) - r.b).abs() <= eps)
            && self.le.iter().all(|r| r.a.dot(x) - r.b <= eps)
    }
}

pub(crate) fn assemble_rows(dim: usize, constraints: &[Constraint]) -> Result<Rows> {
    let mut rows = Rows::default();
    for c in constraints {
        debug_assert_eq!(c.dim(), dim, "constraint dimension mismatch");
        match c {
            Constraint::Hyperplane(h) => {
                let norm = h.normal.norm();
                if norm <= NORMAL_EPS {
                    if h.offset.abs() > FEAS_EPS {
                        return Err(ProjectionError::subproblem(
                            SubproblemFailure::Infeasible,
                            format!("degenerate equality 0 = {}", h.offset),
                        ));
                    }
                    continue;
                }
                rows.eq.push(Row {
                    a: &h.normal / norm,
                    b: h.offset / norm,
                });
            }
            Constraint::Halfspace(h) => {
                let norm = h.normal.norm();
                if norm <= NORMAL_EPS {
                    continue;
                }
                rows.le.push(Row {
                    a: &h.normal / norm,
                    b: h.bound() / norm,
                });
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests;
