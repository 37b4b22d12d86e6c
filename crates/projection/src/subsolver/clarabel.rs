//! Clarabel-backed projection.
//!
//! The projection `min ½‖x‖² − rᵀx` is a QP with `P = I`, `q = −r`. Each
//! equality row becomes a zero-cone slack and each inequality a nonnegative
//! slack: `A x + s = b`.

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};

use super::{assemble_rows, ProjectionBackend, Rows};
use crate::cfg::FEAS_EPS;
use crate::error::SubproblemFailure;
use crate::geometry::Constraint;
use crate::{Point, ProjectionError, Result};

/// Clarabel settings exposed to callers.
#[derive(Clone, Copy, Debug)]
pub struct BackendSettings {
    pub verbose: bool,
    pub max_iter: u32,
    pub tol_gap_abs: f64,
    pub tol_gap_rel: f64,
    pub tol_feas: f64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            verbose: false,
            max_iter: 200,
            tol_gap_abs: 1e-9,
            tol_gap_rel: 1e-9,
            tol_feas: 1e-9,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClarabelBackend {
    pub settings: BackendSettings,
}

impl ClarabelBackend {
    pub fn new(settings: BackendSettings) -> Self {
        Self { settings }
    }
}

impl ProjectionBackend for ClarabelBackend {
    fn name(&self) -> &'static str {
        "clarabel"
    }

    fn project(&self, r: &Point, constraints: &[Constraint]) -> Result<Point> {
        let n = r.len();
        let rows = assemble_rows(n, constraints)?;
        if rows.is_empty() || rows.satisfied_by(r, FEAS_EPS) {
            return Ok(r.clone());
        }

        let p = identity_csc(n);
        let q: Vec<f64> = r.iter().map(|v| -v).collect();
        let (a, b) = stack_rows(n, &rows);
        let mut cones = Vec::with_capacity(2);
        if !rows.eq.is_empty() {
            cones.push(SupportedConeT::ZeroConeT(rows.eq.len()));
        }
        if !rows.le.is_empty() {
            cones.push(SupportedConeT::NonnegativeConeT(rows.le.len()));
        }

        let settings = DefaultSettingsBuilder::default()
            .verbose(self.settings.verbose)
            .max_iter(self.settings.max_iter)
            .tol_gap_abs(self.settings.tol_gap_abs)
            .tol_gap_rel(self.settings.tol_gap_rel)
            .tol_feas(self.settings.tol_feas)
            .build()
            .map_err(|e| ProjectionError::configuration(format!("clarabel settings: {e}")))?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings).map_err(|e| {
            ProjectionError::subproblem(
                SubproblemFailure::Numerical,
                format!("clarabel rejected the problem: {e}"),
            )
        })?;
        solver.solve();

        let status = solver.solution.status;
        let failure = match status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => {
                let x = Point::from_vec(solver.solution.x.clone());
                if x.iter().all(|v| v.is_finite()) {
                    return Ok(x);
                }
                SubproblemFailure::Numerical
            }
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                SubproblemFailure::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                SubproblemFailure::Unbounded
            }
            _ => SubproblemFailure::Numerical,
        };
        tracing::warn!(
            backend = self.name(),
            status = ?status,
            rows = rows.len(),
            dim = n,
            "projection subproblem failed"
        );
        Err(ProjectionError::subproblem(
            failure,
            format!("clarabel status {status:?} with {} rows in R^{n}", rows.len()),
        ))
    }
}

fn identity_csc(n: usize) -> CscMatrix<f64> {
    CscMatrix::new(n, n, (0..=n).collect(), (0..n).collect(), vec![1.0; n])
}

/// Column-compressed `[A_eq; A_le]` and the stacked right-hand side.
fn stack_rows(n: usize, rows: &Rows) -> (CscMatrix<f64>, Vec<f64>) {
    let all: Vec<_> = rows.eq.iter().chain(rows.le.iter()).collect();
    let m = all.len();
    let mut colptr = Vec::with_capacity(n + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    colptr.push(0);
    for j in 0..n {
        for (i, row) in all.iter().enumerate() {
            let v = row.a[j];
            if v != 0.0 {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr.push(rowval.len());
    }
    let b = all.iter().map(|row| row.b).collect();
    (CscMatrix::new(m, n, colptr, rowval, nzval), b)
}
