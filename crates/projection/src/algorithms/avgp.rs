//! Averaged projections: `T(x) = mean_i P_i(x)`.

use super::{
    converged_by_residual, finish, mean, project_all, start, step, Optimizer, Problem,
    SolveOptions, SolveResult, Status,
};
use crate::Result;

#[derive(Clone, Copy, Debug, Default)]
pub struct AvgP;

impl Optimizer for AvgP {
    fn name(&self) -> &'static str {
        "avgp"
    }

    fn solve(&self, problem: &mut Problem, options: &SolveOptions) -> Result<SolveResult> {
        let (mut x, _rng) = start(problem, options)?;
        let sets = problem.sets();
        let mut iterates = vec![x.clone()];
        let mut residuals = Vec::new();
        let mut status = Status::MaxItersReached;

        for iter in 0..options.max_iters {
            let (points, dists) = project_all(sets, &x)?;
            let done = converged_by_residual(&dists, options);
            residuals.push(dists);
            if done {
                status = Status::Converged;
                break;
            }
            let prev = iterates.len().checked_sub(2).map(|i| &iterates[i]);
            let next = step(&x, prev, mean(&points), options.momentum);
            tracing::debug!(iter, step = (&next - &x).norm(), "avgp step");
            iterates.push(next.clone());
            x = next;
        }
        Ok(finish(self.name(), iterates, residuals, status))
    }
}
