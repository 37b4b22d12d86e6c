//! Euclidean ball `{x : ‖x − c‖ <= r}`.
//!
//! Not polyhedral: `query` never returns certificates, so outer approximations
//! of a ball are built purely from derived supporting halfspaces.

use super::ConvexSet;
use crate::geometry::Constraint;
use crate::{Point, ProjectionError, Result};

#[derive(Clone, Debug)]
pub struct Ball {
    center: Point,
    radius: f64,
}

impl Ball {
    pub fn new(center: Point, radius: f64) -> Result<Self> {
        if center.is_empty() {
            return Err(ProjectionError::construction("ball needs dim > 0"));
        }
        if !(radius.is_finite() && radius >= 0.0) || center.iter().any(|v| !v.is_finite()) {
            return Err(ProjectionError::construction(
                "ball needs a finite center and finite radius >= 0",
            ));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl ConvexSet for Ball {
    fn name(&self) -> &'static str {
        "ball"
    }

    fn dim(&self) -> usize {
        self.center.len()
    }

    fn contains(&self, x: &Point, atol: f64) -> bool {
        debug_assert_eq!(x.len(), self.dim());
        let d = x - &self.center;
        let dist = d.norm();
        if dist <= self.radius {
            return true;
        }
        // x − P(x) = d (1 − r/‖d‖)
        d.amax() * (1.0 - self.radius / dist) <= atol
    }

    fn project(&self, x: &Point) -> Result<Point> {
        let d = x - &self.center;
        let dist = d.norm();
        if dist <= self.radius {
            return Ok(x.clone());
        }
        Ok(&self.center + d * (self.radius / dist))
    }

    fn query(&mut self, x: &Point) -> Result<(Point, Vec<Constraint>)> {
        Ok((self.project(x)?, Vec::new()))
    }
}
