//! Hyperplanes, halfspaces and the supporting-halfspace rule.
//!
//! Purpose
//! - Carry the two linear constraint shapes that flow between oracles,
//!   optimizers and the subsolver.
//! - Provide the single derivation rule that turns a reference point and its
//!   projection onto a convex set into a valid separating constraint.
//!
//! Orientation
//! - For `p = P_S(r)`, every `y ∈ S` satisfies `(r − p)·(y − p) ≤ 0` (the
//!   obtuse-angle characterization of Euclidean projections), and
//!   `(r − p)·(r − p) = ‖r − p‖² > 0` when `r ≠ p`. So the normal is `r − p`
//!   and the inequality is `≤ 0`; the property tests below pin this down.

use crate::cfg::{FEAS_EPS, NORMAL_EPS};
use crate::Point;

/// Hyperplane `{x : a·x = b}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperplane {
    pub normal: Point,
    pub offset: f64,
}

impl Hyperplane {
    #[inline]
    pub fn new(normal: Point, offset: f64) -> Self {
        Self { normal, offset }
    }
    #[inline]
    pub fn dim(&self) -> usize {
        self.normal.len()
    }
    /// Signed residual `a·x − b`.
    #[inline]
    pub fn residual(&self, x: &Point) -> f64 {
        self.normal.dot(x) - self.offset
    }
    #[inline]
    pub fn satisfies_eps(&self, x: &Point, eps: f64) -> bool {
        self.residual(x).abs() <= eps
    }
}

/// Halfspace `{x : a·(x − p) ≤ 0}`, anchored at the reference point `p`.
///
/// Invariants:
/// - `normal` and `point` have the same dimension.
/// - A zero normal describes the whole space (vacuous constraint).
#[derive(Clone, Debug, PartialEq)]
pub struct Halfspace {
    pub normal: Point,
    pub point: Point,
}

impl Halfspace {
    #[inline]
    pub fn new(normal: Point, point: Point) -> Self {
        debug_assert_eq!(normal.len(), point.len(), "halfspace dimension mismatch");
        Self { normal, point }
    }

    /// Supporting halfspace of `S` derived from `reference` and its projection
    /// `projection = P_S(reference)`: `{x : (r − p)·(x − p) ≤ 0}`.
    ///
    /// Contains all of `S`; excludes `reference` whenever it differs from
    /// `projection`.
    pub fn supporting(reference: &Point, projection: &Point) -> Self {
        Self::new(reference - projection, projection.clone())
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.normal.len()
    }

    /// Right-hand side of the row form `a·x ≤ a·p`.
    #[inline]
    pub fn bound(&self) -> f64 {
        self.normal.dot(&self.point)
    }

    /// Signed value `a·(x − p)`; feasible iff `<= 0`.
    #[inline]
    pub fn value(&self, x: &Point) -> f64 {
        self.normal.dot(x) - self.bound()
    }

    #[inline]
    pub fn satisfies_eps(&self, x: &Point, eps: f64) -> bool {
        self.value(x) <= eps
    }

    #[inline]
    pub fn is_vacuous(&self) -> bool {
        self.normal.norm() <= NORMAL_EPS
    }
}

/// Linear constraint handed to the subsolver; also the certificate type that
/// oracles return from `query`.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    Hyperplane(Hyperplane),
    Halfspace(Halfspace),
}

impl Constraint {
    #[inline]
    pub fn dim(&self) -> usize {
        match self {
            Self::Hyperplane(h) => h.dim(),
            Self::Halfspace(h) => h.dim(),
        }
    }

    /// Membership with slack `eps` measured along the unit normal.
    /// Vacuous rows (zero normal) follow their right-hand side.
    pub fn satisfies_eps(&self, x: &Point, eps: f64) -> bool {
        match self {
            Self::Hyperplane(h) => {
                let norm = h.normal.norm();
                if norm <= NORMAL_EPS {
                    h.offset.abs() <= eps
                } else {
                    h.satisfies_eps(x, eps * norm)
                }
            }
            Self::Halfspace(h) => {
                let norm = h.normal.norm();
                norm <= NORMAL_EPS || h.satisfies_eps(x, eps * norm)
            }
        }
    }

    #[inline]
    pub fn satisfies(&self, x: &Point) -> bool {
        self.satisfies_eps(x, FEAS_EPS)
    }
}

impl From<Hyperplane> for Constraint {
    fn from(h: Hyperplane) -> Self {
        Self::Hyperplane(h)
    }
}

impl From<Halfspace> for Constraint {
    fn from(h: Halfspace) -> Self {
        Self::Halfspace(h)
    }
}
