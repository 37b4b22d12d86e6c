//! Tolerance defaults (internal).
//!
//! Policy
//! - Fixed constants, no per-call juggling. User-facing tolerances (`atol`)
//!   live in `SolveOptions`; these only guard numerics inside the core.

/// Feasibility slack: a point violating a unit-normal row by at most this much
/// is treated as feasible by the subsolver short-circuit.
pub(crate) const FEAS_EPS: f64 = 1e-9;
/// Normals shorter than this are vacuous (reference point already in the set).
pub(crate) const NORMAL_EPS: f64 = 1e-12;
/// Relative part of the elementwise closeness test between successive iterates.
pub(crate) const CLOSE_RTOL: f64 = 1e-5;
/// Default membership tolerance used by oracle `project` idempotence checks.
pub(crate) const CONTAINS_ATOL: f64 = 1e-9;
/// Slack (unit-normal) within which a subsolver answer must satisfy its rows.
pub(crate) const SOLVER_SLACK: f64 = 1e-6;
