//! Projection methods for convex feasibility problems.
//!
//! Given a finite family of convex sets, each reachable only through an oracle
//! (`ConvexSet`), find a point in their intersection. Algorithms advance an
//! iterate by projecting onto the sets, deriving supporting halfspaces from
//! those projections, and handing the resulting linear constraints to a
//! constrained-projection subsolver.
//!
//! Layout
//! - `geometry`: hyperplanes, halfspaces and the supporting-halfspace rule.
//! - `oracles`: the `ConvexSet` capability trait and concrete sets.
//! - `subsolver`: Euclidean projection onto a constraint collection (clarabel).
//! - `algorithms`: the `Optimizer` contract, `QPSolver` and the other family
//!   members (`AltP`, `AvgP`, `Dykstra`, `Apop`).
//! - `outer`: the outer polyhedral approximation container used by `Apop`.

pub mod algorithms;
pub mod cfg;
pub mod error;
pub mod geometry;
pub mod oracles;
pub mod outer;
pub mod subsolver;

pub use error::{ProjectionError, Result, SubproblemFailure};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dense point in the problem's variable space.
pub type Point = nalgebra::DVector<f64>;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::algorithms::{
        AltP, Apop, ApopCfg, AvgP, Dykstra, Momentum, Optimizer, Problem, QPSolver,
        SolveOptions, SolveResult, Status,
    };
    pub use crate::geometry::{Constraint, Halfspace, Hyperplane};
    pub use crate::oracles::{AffineSet, Ball, ConvexSet, HalfspaceSet, Zeros};
    pub use crate::outer::{ManagementPolicy, OuterApproximation, OuterPolicy};
    pub use crate::subsolver::{BackendSettings, ClarabelBackend, ProjectionBackend};
    pub use crate::{Point, ProjectionError, Result};
}
