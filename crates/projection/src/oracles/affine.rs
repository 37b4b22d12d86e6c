//! Affine set `{x : A x = b}`; projection delegates to a `ProjectionBackend`.

use nalgebra::DMatrix;

use super::{ConvexSet, OneShot};
use crate::cfg::{CONTAINS_ATOL, FEAS_EPS, NORMAL_EPS};
use crate::geometry::{Constraint, Hyperplane};
use crate::subsolver::{ClarabelBackend, ProjectionBackend};
use crate::{Point, ProjectionError, Result};

pub struct AffineSet {
    a: DMatrix<f64>,
    b: Point,
    /// `A⁺`, so that `x − P(x) = A⁺ (A x − b)`.
    pinv: DMatrix<f64>,
    backend: Box<dyn ProjectionBackend>,
    certificate: OneShot,
}

impl AffineSet {
    /// Build with the default clarabel backend.
    pub fn new(a: DMatrix<f64>, b: Point) -> Result<Self> {
        Self::with_backend(a, b, Box::new(ClarabelBackend::default()))
    }

    pub fn with_backend(
        a: DMatrix<f64>,
        b: Point,
        backend: Box<dyn ProjectionBackend>,
    ) -> Result<Self> {
        if a.ncols() == 0 {
            return Err(ProjectionError::construction("affine set needs A with columns"));
        }
        if a.nrows() != b.len() {
            return Err(ProjectionError::construction(format!(
                "A has {} rows but b has {} entries",
                a.nrows(),
                b.len()
            )));
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(ProjectionError::construction("affine set data must be finite"));
        }
        let pinv = a
            .clone()
            .pseudo_inverse(NORMAL_EPS)
            .map_err(|e| ProjectionError::construction(format!("affine set: {e}")))?;
        Ok(Self {
            a,
            b,
            pinv,
            backend,
            certificate: OneShot::new(),
        })
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &Point {
        &self.b
    }

    fn hyperplanes(&self) -> Vec<Constraint> {
        self.a
            .row_iter()
            .zip(self.b.iter())
            .map(|(row, &bi)| Hyperplane::new(row.transpose(), bi).into())
            .collect()
    }
}

impl ConvexSet for AffineSet {
    fn name(&self) -> &'static str {
        "affine"
    }

    fn dim(&self) -> usize {
        self.a.ncols()
    }

    fn contains(&self, x: &Point, atol: f64) -> bool {
        debug_assert_eq!(x.len(), self.dim());
        let r = &self.a * x - &self.b;
        let dev = &self.pinv * &r;
        // An inconsistent system leaves part of `r` unexplained: the set is empty.
        dev.amax() <= atol && (&self.a * &dev - &r).amax() <= FEAS_EPS * (1.0 + r.amax())
    }

    fn project(&self, x: &Point) -> Result<Point> {
        if self.contains(x, CONTAINS_ATOL) {
            return Ok(x.clone());
        }
        self.backend.project(x, &self.hyperplanes())
    }

    fn query(&mut self, x: &Point) -> Result<(Point, Vec<Constraint>)> {
        let x_star = self.project(x)?;
        let certs = if self.certificate.take() {
            self.hyperplanes()
        } else {
            Vec::new()
        };
        Ok((x_star, certs))
    }
}
