//! Projection onto a persistent outer polyhedral approximation (APOP).
//!
//! Generalizes `QPSolver` to N sets: supporting halfspaces are accumulated
//! across iterations in an `OuterApproximation` instead of being discarded,
//! and exact certificates returned by `query` join the approximation once.
//!
//! Step k, from iterate `x`:
//! 1. `query` every set; store certificates and the supporting halfspace at
//!    each projection;
//! 2. stop if the per-set distances sum to at most `atol`;
//! 3. target = mean of the projections (`average`) or `x` itself;
//! 4. `T(x)` = projection of the target onto the outer approximation;
//! 5. heavy-ball step toward `T(x)`.

use super::{
    converged_by_residual, finish, mean, start, step, Optimizer, Problem, SolveOptions,
    SolveResult, Status,
};
use crate::cfg::SOLVER_SLACK;
use crate::geometry::Halfspace;
use crate::outer::{OuterApproximation, OuterPolicy};
use crate::subsolver::{ClarabelBackend, ProjectionBackend};
use crate::Result;

#[derive(Clone, Copy, Debug)]
pub struct ApopCfg {
    pub policy: OuterPolicy,
    pub max_hyperplanes: Option<usize>,
    pub max_halfspaces: Option<usize>,
    /// Project the average of the set projections instead of the iterate.
    pub average: bool,
}

impl Default for ApopCfg {
    fn default() -> Self {
        Self {
            policy: OuterPolicy::Exact,
            max_hyperplanes: None,
            max_halfspaces: None,
            average: true,
        }
    }
}

pub struct Apop {
    cfg: ApopCfg,
    backend: Box<dyn ProjectionBackend>,
}

impl Default for Apop {
    fn default() -> Self {
        Self::new(ApopCfg::default())
    }
}

impl Apop {
    pub fn new(cfg: ApopCfg) -> Self {
        Self::with_backend(cfg, Box::new(ClarabelBackend::default()))
    }

    pub fn with_backend(cfg: ApopCfg, backend: Box<dyn ProjectionBackend>) -> Self {
        Self { cfg, backend }
    }
}

impl Optimizer for Apop {
    fn name(&self) -> &'static str {
        "apop"
    }

    fn solve(&self, problem: &mut Problem, options: &SolveOptions) -> Result<SolveResult> {
        let policy = self.cfg.policy.into_policy(self.cfg.max_halfspaces)?;
        let (mut x, mut rng) = start(problem, options)?;
        let mut outer = OuterApproximation::new(self.cfg.max_hyperplanes, policy);
        let mut iterates = vec![x.clone()];
        let mut residuals = Vec::new();
        let mut status = Status::MaxItersReached;

        for iter in 0..options.max_iters {
            let mut points = Vec::with_capacity(problem.sets().len());
            let mut dists = Vec::with_capacity(problem.sets().len());
            for set in problem.sets_mut() {
                let (p, certs) = set.query(&x)?;
                outer.add_certificates(certs);
                outer.add_halfspace(Halfspace::supporting(&x, &p), &mut rng);
                dists.push((&x - &p).norm());
                points.push(p);
            }
            let done = converged_by_residual(&dists, options);
            residuals.push(dists);
            if done {
                status = Status::Converged;
                break;
            }

            let target = if self.cfg.average {
                mean(&points)
            } else {
                x.clone()
            };
            let constraints = outer.constraints(&mut rng);
            let projected = self.backend.project(&target, &constraints)?;
            let violated = constraints
                .iter()
                .filter(|c| !c.satisfies_eps(&projected, SOLVER_SLACK))
                .count();
            if violated > 0 {
                tracing::warn!(iter, violated, "subsolver point violates the outer approximation");
            }
            let prev = iterates.len().checked_sub(2).map(|i| &iterates[i]);
            let next = step(&x, prev, projected, options.momentum);
            tracing::debug!(
                iter,
                policy = outer.policy_name(),
                certificates = outer.num_certificates(),
                halfspaces = outer.num_halfspaces(),
                step = (&next - &x).norm(),
                "apop step"
            );
            iterates.push(next.clone());
            x = next;
        }
        Ok(finish(self.name(), iterates, residuals, status))
    }
}
