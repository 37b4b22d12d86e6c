//! Optimizer contract and the projection-method family.
//!
//! Purpose
//! - `Optimizer::solve(problem, options) -> (iterates, residuals, status)` is
//!   the one shape shared by every algorithm.
//! - `QPSolver` is the two-set halfspace-relaxation method; `AltP`, `AvgP`,
//!   `Dykstra` and `Apop` are the N-set members.
//!
//! Conventions
//! - `iterates[0]` is the configured initial point (options first, then the
//!   problem's), or a uniform draw from `[-1, 1]^n` seeded by `options.seed`.
//! - Residual rows hold per-set distances `‖x_k − P_i(x_k)‖` of the iterate a
//!   step started from. Residual-based members stop once the row sums to at
//!   most `atol`; `QPSolver` stops when successive iterates are close.
//! - Exhausting `max_iters` is a normal outcome (`Status::MaxItersReached`).
//! - Oracles are only mutated through `ConvexSet::query`'s one-shot state.

mod altp;
mod apop;
mod avgp;
mod dykstra;
mod qp_solver;

pub use altp::AltP;
pub use apop::{Apop, ApopCfg};
pub use avgp::AvgP;
pub use dykstra::Dykstra;
pub use qp_solver::QPSolver;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cfg::CLOSE_RTOL;
use crate::oracles::ConvexSet;
use crate::{Point, ProjectionError, Result};

/// Terminal classification of one solve call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Converged,
    MaxItersReached,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::MaxItersReached => "max_iters_reached",
        }
    }
}

/// Heavy-ball parameters: `x⁺ = x + α (T(x) − x) + β (x − x⁻)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Momentum {
    pub alpha: f64,
    pub beta: f64,
}

#[derive(Clone, Debug)]
pub struct SolveOptions {
    pub initial_point: Option<Point>,
    pub max_iters: usize,
    /// Suppress early termination and run exactly `max_iters` steps.
    pub do_all_iters: bool,
    pub atol: f64,
    pub momentum: Option<Momentum>,
    /// Seed for the default initial point and randomized policies.
    pub seed: u64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            initial_point: None,
            max_iters: 100,
            do_all_iters: false,
            atol: 1e-4,
            momentum: None,
            seed: 0,
        }
    }
}

impl SolveOptions {
    pub fn validate(&self, var_dim: usize) -> Result<()> {
        if self.max_iters == 0 {
            return Err(ProjectionError::configuration("max_iters must be > 0"));
        }
        if !(self.atol.is_finite() && self.atol > 0.0) {
            return Err(ProjectionError::configuration(format!(
                "atol must be finite and > 0, got {}",
                self.atol
            )));
        }
        if let Some(m) = self.momentum {
            if !(m.alpha.is_finite() && m.alpha > 0.0) {
                return Err(ProjectionError::configuration(format!(
                    "momentum alpha must be finite and > 0, got {}",
                    m.alpha
                )));
            }
            if !(m.beta.is_finite() && m.beta >= 0.0) {
                return Err(ProjectionError::configuration(format!(
                    "momentum beta must be finite and >= 0, got {}",
                    m.beta
                )));
            }
        }
        if let Some(x0) = &self.initial_point {
            if x0.len() != var_dim {
                return Err(ProjectionError::configuration(format!(
                    "initial point has dim {} but the problem has dim {var_dim}",
                    x0.len()
                )));
            }
        }
        Ok(())
    }
}

/// Feasibility problem: at least two oracles over one variable space.
pub struct Problem {
    sets: Vec<Box<dyn ConvexSet>>,
    var_dim: usize,
    initial_point: Option<Point>,
}

impl Problem {
    pub fn new(
        sets: Vec<Box<dyn ConvexSet>>,
        var_dim: usize,
        initial_point: Option<Point>,
    ) -> Result<Self> {
        if sets.len() < 2 {
            return Err(ProjectionError::construction(format!(
                "a feasibility problem needs at least 2 sets, got {}",
                sets.len()
            )));
        }
        if var_dim == 0 {
            return Err(ProjectionError::construction("var_dim must be > 0"));
        }
        if let Some((i, s)) = sets.iter().enumerate().find(|(_, s)| s.dim() != var_dim) {
            return Err(ProjectionError::construction(format!(
                "set {i} (`{}`) has dim {} but var_dim is {var_dim}",
                s.name(),
                s.dim()
            )));
        }
        if let Some(x0) = &initial_point {
            if x0.len() != var_dim {
                return Err(ProjectionError::construction(format!(
                    "initial point has dim {} but var_dim is {var_dim}",
                    x0.len()
                )));
            }
        }
        Ok(Self {
            sets,
            var_dim,
            initial_point,
        })
    }

    pub fn sets(&self) -> &[Box<dyn ConvexSet>] {
        &self.sets
    }

    pub fn sets_mut(&mut self) -> &mut [Box<dyn ConvexSet>] {
        &mut self.sets
    }

    pub fn var_dim(&self) -> usize {
        self.var_dim
    }

    pub fn initial_point(&self) -> Option<&Point> {
        self.initial_point.as_ref()
    }
}

#[derive(Clone, Debug)]
pub struct SolveResult {
    pub iterates: Vec<Point>,
    pub residuals: Vec<Vec<f64>>,
    pub status: Status,
}

impl SolveResult {
    /// Candidate feasibility point (last iterate).
    pub fn point(&self) -> &Point {
        // `iterates` always starts with the initial point.
        &self.iterates[self.iterates.len() - 1]
    }

    pub fn iterations(&self) -> usize {
        self.iterates.len() - 1
    }
}

pub trait Optimizer {
    fn name(&self) -> &'static str;

    fn solve(&self, problem: &mut Problem, options: &SolveOptions) -> Result<SolveResult>;
}

/// Validate options and produce the initial point plus the per-call RNG.
pub(crate) fn start(problem: &Problem, options: &SolveOptions) -> Result<(Point, StdRng)> {
    options.validate(problem.var_dim())?;
    let mut rng = StdRng::seed_from_u64(options.seed);
    let x0 = match (&options.initial_point, problem.initial_point()) {
        (Some(x0), _) | (None, Some(x0)) => x0.clone(),
        (None, None) => Point::from_fn(problem.var_dim(), |_, _| rng.gen_range(-1.0..=1.0)),
    };
    Ok((x0, rng))
}

/// Elementwise closeness `|a_i − b_i| <= atol + rtol·|b_i|`.
pub(crate) fn allclose(a: &Point, b: &Point, atol: f64) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() <= atol + CLOSE_RTOL * y.abs())
}

/// Project `x` onto every set; returns the projections and their distances.
pub(crate) fn project_all(
    sets: &[Box<dyn ConvexSet>],
    x: &Point,
) -> Result<(Vec<Point>, Vec<f64>)> {
    let mut points = Vec::with_capacity(sets.len());
    let mut dists = Vec::with_capacity(sets.len());
    for set in sets {
        let p = set.project(x)?;
        dists.push((x - &p).norm());
        points.push(p);
    }
    Ok((points, dists))
}

pub(crate) fn mean(points: &[Point]) -> Point {
    let mut acc = Point::zeros(points[0].len());
    for p in points {
        acc += p;
    }
    acc / points.len() as f64
}

/// Heavy-ball update toward `target = T(x)`. Without momentum this is `target`.
pub(crate) fn step(
    x: &Point,
    prev: Option<&Point>,
    target: Point,
    momentum: Option<Momentum>,
) -> Point {
    match momentum {
        None => target,
        Some(Momentum { alpha, beta }) => {
            let mut next = x + (target - x) * alpha;
            if let Some(prev) = prev {
                next += (x - prev) * beta;
            }
            next
        }
    }
}

pub(crate) fn converged_by_residual(dists: &[f64], options: &SolveOptions) -> bool {
    !options.do_all_iters && dists.iter().sum::<f64>() <= options.atol
}

pub(crate) fn finish(
    solver: &'static str,
    iterates: Vec<Point>,
    residuals: Vec<Vec<f64>>,
    status: Status,
) -> SolveResult {
    let result = SolveResult {
        iterates,
        residuals,
        status,
    };
    tracing::info!(
        solver,
        iters = result.iterations(),
        status = status.as_str(),
        last_residual = ?result.residuals.last().map(|r| r.iter().sum::<f64>()),
        "solve finished"
    );
    result
}
