//! Dykstra's projection algorithm over N sets.
//!
//! Keeps one correction vector per set so that, unlike plain alternating
//! projections, the limit is the projection of the starting point onto the
//! intersection. Momentum would break the corrections and is rejected.
//!
//! Feasibility alone does not mean Dykstra is done (an early sweep can land
//! inside the intersection away from the projection), so the stop rule also
//! asks for successive iterates to be close.

use super::{
    allclose, converged_by_residual, finish, project_all, start, Optimizer, Problem,
    SolveOptions, SolveResult, Status,
};
use crate::{Point, ProjectionError, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct Dykstra;

impl Optimizer for Dykstra {
    fn name(&self) -> &'static str {
        "dyk"
    }

    fn solve(&self, problem: &mut Problem, options: &SolveOptions) -> Result<SolveResult> {
        if options.momentum.is_some() {
            return Err(ProjectionError::configuration(
                "dykstra does not support momentum",
            ));
        }
        let (mut x, _rng) = start(problem, options)?;
        let sets = problem.sets();
        let mut corrections = vec![Point::zeros(x.len()); sets.len()];
        let mut iterates = vec![x.clone()];
        let mut residuals = Vec::new();
        let mut status = Status::MaxItersReached;

        for iter in 0..options.max_iters {
            let (_, dists) = project_all(sets, &x)?;
            let feasible = converged_by_residual(&dists, options);
            residuals.push(dists);
            let mut y = x.clone();
            for (set, q) in sets.iter().zip(corrections.iter_mut()) {
                let shifted = &y + &*q;
                let p = set.project(&shifted)?;
                *q = shifted - &p;
                y = p;
            }
            tracing::debug!(iter, step = (&y - &x).norm(), "dykstra sweep");
            let done = feasible && allclose(&y, &x, options.atol);
            iterates.push(y.clone());
            x = y;
            if done {
                status = Status::Converged;
                break;
            }
        }
        Ok(finish(self.name(), iterates, residuals, status))
    }
}
