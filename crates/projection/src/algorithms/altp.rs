//! Alternating projections: `T(x) = P_N(… P_2(P_1(x)))`.

use super::{
    converged_by_residual, finish, project_all, start, step, Optimizer, Problem, SolveOptions,
    SolveResult, Status,
};
use crate::Result;

#[derive(Clone, Copy, Debug, Default)]
pub struct AltP;

impl Optimizer for AltP {
    fn name(&self) -> &'static str {
        "altp"
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
            // The sweep reuses the first projection.
            let mut y = points.into_iter().next().unwrap_or_else(|| x.clone());
            for set in &sets[1..] {
                y = set.project(&y)?;
            }
            let prev = iterates.len().checked_sub(2).map(|i| &iterates[i]);
            let next = step(&x, prev, y, options.momentum);
            tracing::debug!(iter, step = (&next - &x).norm(), "altp sweep");
            iterates.push(next.clone());
            x = next;
        }
        Ok(finish(self.name(), iterates, residuals, status))
    }
}
