//! Convex-set oracles.
//!
//! Purpose
//! - `ConvexSet` is the capability contract every set implements: membership,
//!   Euclidean projection, and a certificate query. Algorithms only ever see
//!   `Box<dyn ConvexSet>`, so new set types plug in without touching them.
//!
//! Certificates
//! - `query` may return constraints valid for the *whole* set (stronger than a
//!   local supporting halfspace). Sets with an exact polyhedral description
//!   emit it on the first `query` made to the instance and nothing afterwards;
//!   callers accumulate certificates and must never see duplicates. The
//!   suppression flag is per instance; a fresh oracle starts over.
//!
//! Dimensions
//! - Oracles fix their dimension at construction. Passing a point of another
//!   dimension is a caller bug (checked with `debug_assert!`), not a runtime
//!   error; `Problem::new` rejects mismatched oracles up front.

mod affine;
mod ball;
mod halfspace;
mod zeros;

pub use affine::AffineSet;
pub use ball::Ball;
pub use halfspace::HalfspaceSet;
pub use zeros::Zeros;

use crate::geometry::Constraint;
use crate::{Point, Result};

pub trait ConvexSet {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Dimension of the ambient space.
    fn dim(&self) -> usize;

    /// True iff every coordinate deviation of `x` from the set is `<= atol`,
    /// i.e. `‖x − P(x)‖∞ <= atol`.
    fn contains(&self, x: &Point, atol: f64) -> bool;

    /// Euclidean projection onto the set. Contained points come back unchanged.
    fn project(&self, x: &Point) -> Result<Point>;

    /// Projection plus certificates valid for the entire set.
    fn query(&mut self, x: &Point) -> Result<(Point, Vec<Constraint>)>;
}

/// One-shot flag for certificate emission.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OneShot {
    pending: bool,
}

impl OneShot {
    pub(crate) fn new() -> Self {
        Self { pending: true }
    }

    /// True exactly once.
    pub(crate) fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }
}

#[cfg(test)]
mod tests;
