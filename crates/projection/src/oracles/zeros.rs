//! The trivial set `{0}^n`.

use super::{ConvexSet, OneShot};
use crate::geometry::{Constraint, Hyperplane};
use crate::{cfg::CONTAINS_ATOL, Point, ProjectionError, Result};

#[derive(Clone, Debug)]
pub struct Zeros {
    dim: usize,
    certificate: OneShot,
}

impl Zeros {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(ProjectionError::construction("zero set needs dim > 0"));
        }
        Ok(Self {
            dim,
            certificate: OneShot::new(),
        })
    }

    /// `e_i · x = 0` for every coordinate; together they pin `x` to the origin.
    fn hyperplanes(&self) -> Vec<Constraint> {
        (0..self.dim)
            .map(|i| {
                let mut e = Point::zeros(self.dim);
                e[i] = 1.0;
                Hyperplane::new(e, 0.0).into()
            })
            .collect()
    }
}

impl ConvexSet for Zeros {
    fn name(&self) -> &'static str {
        "zeros"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn contains(&self, x: &Point, atol: f64) -> bool {
        debug_assert_eq!(x.len(), self.dim);
        x.iter().all(|v| v.abs() <= atol)
    }

    fn project(&self, x: &Point) -> Result<Point> {
        if self.contains(x, CONTAINS_ATOL) {
            Ok(x.clone())
        } else {
            Ok(Point::zeros(self.dim))
        }
    }

    fn query(&mut self, x: &Point) -> Result<(Point, Vec<Constraint>)> {
        let x_star = self.project(x)?;
        // Forcing x = 0 in an outer approximation amounts to a presolve.
        let certs = if self.certificate.take() {
            self.hyperplanes()
        } else {
            Vec::new()
        };
        Ok((x_star, certs))
    }
}
