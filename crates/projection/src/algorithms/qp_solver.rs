//! Two-set alternating halfspace-relaxation projection.
//!
//! Step k, from iterate `x`:
//! 1. project `x` onto each set (`left`, `right`);
//! 2. derive the supporting halfspace of each set at its projection;
//! 3. project `x` onto the intersection of the two halfspaces.
//!
//! Step 3 projects onto local linear relaxations of the sets, never onto the
//! true intersection. Stops when successive iterates are elementwise close.
//! Momentum is part of the shared options but unused here.

use super::{allclose, finish, start, Optimizer, Problem, SolveOptions, SolveResult, Status};
use crate::geometry::{Constraint, Halfspace};
use crate::subsolver::{ClarabelBackend, ProjectionBackend};
use crate::{ProjectionError, Result};

pub struct QPSolver {
    backend: Box<dyn ProjectionBackend>,
}

impl Default for QPSolver {
    fn default() -> Self {
        Self::new(Box::new(ClarabelBackend::default()))
    }
}

impl QPSolver {
    pub fn new(backend: Box<dyn ProjectionBackend>) -> Self {
        Self { backend }
    }
}

impl Optimizer for QPSolver {
    fn name(&self) -> &'static str {
        "qp"
    }

    fn solve(&self, problem: &mut Problem, options: &SolveOptions) -> Result<SolveResult> {
        if problem.sets().len() != 2 {
            return Err(ProjectionError::configuration(format!(
                "qp solver handles exactly 2 sets, got {}",
                problem.sets().len()
            )));
        }
        let (mut x, _rng) = start(problem, options)?;
        let sets = problem.sets();
        let mut iterates = vec![x.clone()];
        let mut residuals = Vec::new();
        let mut status = Status::MaxItersReached;

        for iter in 0..options.max_iters {
            // Picture the sets side by side on the plane: one on the left, one on the right.
            let left = sets[0].project(&x)?;
            let right = sets[1].project(&x)?;
            residuals.push(vec![(&x - &left).norm(), (&x - &right).norm()]);

            let relaxation: [Constraint; 2] = [
                Halfspace::supporting(&x, &left).into(),
                Halfspace::supporting(&x, &right).into(),
            ];
            let next = self.backend.project(&x, &relaxation)?;
            let done = !options.do_all_iters && allclose(&next, &x, options.atol);
            tracing::debug!(iter, step = (&next - &x).norm(), "qp step");
            iterates.push(next.clone());
            x = next;
            if done {
                status = Status::Converged;
                break;
            }
        }
        Ok(finish(self.name(), iterates, residuals, status))
    }
}
