//! Closed halfspace `{x : a·x <= b}` with closed-form projection.

use super::{ConvexSet, OneShot};
use crate::cfg::NORMAL_EPS;
use crate::geometry::{Constraint, Halfspace};
use crate::{Point, ProjectionError, Result};

#[derive(Clone, Debug)]
pub struct HalfspaceSet {
    a: Point,
    b: f64,
    certificate: OneShot,
}

impl HalfspaceSet {
    pub fn new(a: Point, b: f64) -> Result<Self> {
        if a.norm() <= NORMAL_EPS || !a.norm().is_finite() || !b.is_finite() {
            return Err(ProjectionError::construction(
                "halfspace needs a finite nonzero normal and finite offset",
            ));
        }
        Ok(Self {
            a,
            b,
            certificate: OneShot::new(),
        })
    }

    /// Same set in anchored form `{x : a·(x − p) <= 0}` with `p` on the boundary.
    fn anchored(&self) -> Halfspace {
        let p = &self.a * (self.b / self.a.norm_squared());
        Halfspace::new(self.a.clone(), p)
    }
}

impl ConvexSet for HalfspaceSet {
    fn name(&self) -> &'static str {
        "halfspace"
    }

    fn dim(&self) -> usize {
        self.a.len()
    }

    fn contains(&self, x: &Point, atol: f64) -> bool {
        debug_assert_eq!(x.len(), self.dim());
        let excess = self.a.dot(x) - self.b;
        excess <= 0.0 || excess / self.a.norm_squared() * self.a.amax() <= atol
    }

    fn project(&self, x: &Point) -> Result<Point> {
        let excess = self.a.dot(x) - self.b;
        if excess <= 0.0 {
            return Ok(x.clone());
        }
        Ok(x - &self.a * (excess / self.a.norm_squared()))
    }

    fn query(&mut self, x: &Point) -> Result<(Point, Vec<Constraint>)> {
        let x_star = self.project(x)?;
        let certs = if self.certificate.take() {
            vec![self.anchored().into()]
        } else {
            Vec::new()
        };
        Ok((x_star, certs))
    }
}
