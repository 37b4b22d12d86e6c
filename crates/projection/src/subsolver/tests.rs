use super::*;
use crate::geometry::{Halfspace, Hyperplane};
use crate::oracles::{AffineSet, ConvexSet, HalfspaceSet, Zeros};
use nalgebra::{dmatrix, dvector};

fn project(r: &Point, constraints: &[Constraint]) -> Result<Point> {
    ClarabelBackend::default().project(r, constraints)
}

/// Exact description of polyhedral sets, read off their first `query`.
fn certificates(sets: &mut [&mut dyn ConvexSet]) -> Vec<Constraint> {
    sets.iter_mut()
        .flat_map(|s| {
            let origin = Point::zeros(s.dim());
            s.query(&origin).unwrap().1
        })
        .collect()
}

#[test]
fn no_constraints_returns_reference() {
    let r = dvector![1.0, -2.0, 3.0];
    assert_eq!(project(&r, &[]).unwrap(), r);
}

#[test]
fn feasible_reference_is_returned_unchanged() {
    let r = dvector![-1.0, -1.0];
    let c: Constraint = Halfspace::new(dvector![1.0, 0.0], dvector![0.0, 0.0]).into();
    assert_eq!(project(&r, &[c]).unwrap(), r);
}

#[test]
fn vacuous_rows_are_dropped() {
    let r = dvector![2.0, 2.0];
    let vacuous: Constraint = Halfspace::supporting(&r, &r).into();
    let rows = assemble_rows(2, &[vacuous.clone()]).unwrap();
    assert!(rows.is_empty());
    assert_eq!(project(&r, &[vacuous]).unwrap(), r);
}

#[test]
fn rows_are_unit_scaled() {
    let c: Constraint = Hyperplane::new(dvector![0.0, 4.0], 8.0).into();
    let rows = assemble_rows(2, &[c]).unwrap();
    assert_eq!(rows.eq.len(), 1);
    assert!((rows.eq[0].a.norm() - 1.0).abs() < 1e-15);
    assert!((rows.eq[0].b - 2.0).abs() < 1e-15);
}

#[test]
fn projection_onto_two_halfspaces_hits_the_corner() {
    let r = dvector![5.0, 5.0];
    let cs: Vec<Constraint> = vec![
        Halfspace::new(dvector![1.0, 0.0], dvector![0.0, 5.0]).into(),
        Halfspace::new(dvector![0.0, 1.0], dvector![5.0, 0.0]).into(),
    ];
    let x = project(&r, &cs).unwrap();
    assert!(x.amax() < 1e-6, "got {x}");
}

#[test]
fn projection_matches_closed_form_halfspace() {
    let mut set = HalfspaceSet::new(dvector![1.0, 2.0, -1.0], 0.5).unwrap();
    let r = dvector![3.0, 1.0, 0.0];
    let closed = set.project(&r).unwrap();
    let cs = certificates(&mut [&mut set]);
    let via_solver = project(&r, &cs).unwrap();
    assert!((closed - via_solver).norm() < 1e-6);
}

#[test]
fn empty_intersection_is_a_subproblem_error() {
    // x₁ <= 0 and x₁ >= 1
    let cs: Vec<Constraint> = vec![
        Halfspace::new(dvector![1.0, 0.0], dvector![0.0, 0.0]).into(),
        Halfspace::new(dvector![-1.0, 0.0], dvector![1.0, 0.0]).into(),
    ];
    let err = project(&dvector![3.0, 3.0], &cs).unwrap_err();
    assert!(matches!(err, ProjectionError::Subproblem { .. }), "{err}");
}

#[test]
fn empty_intersection_of_exact_sets_is_a_subproblem_error() {
    // {0} ∩ {x : x₁ + x₂ >= 1}
    let mut zeros = Zeros::new(2).unwrap();
    let mut far = HalfspaceSet::new(dvector![-1.0, -1.0], -1.0).unwrap();
    let cs = certificates(&mut [&mut zeros, &mut far]);
    assert_eq!(cs.len(), 3);
    let err = project(&dvector![0.3, 0.3], &cs).unwrap_err();
    assert!(err.subproblem_failure().is_some(), "{err}");
}

#[test]
fn degenerate_equality_is_infeasible_without_solving() {
    let c: Constraint = Hyperplane::new(dvector![0.0, 0.0], 1.0).into();
    let err = project(&dvector![0.0, 0.0], &[c]).unwrap_err();
    assert_eq!(err.subproblem_failure(), Some(SubproblemFailure::Infeasible));
}

#[test]
fn affine_rows_become_equalities() {
    let mut line = AffineSet::new(dmatrix![1.0, 1.0], dvector![1.0]).unwrap();
    let cs = certificates(&mut [&mut line]);
    let rows = assemble_rows(2, &cs).unwrap();
    assert_eq!((rows.eq.len(), rows.le.len()), (1, 0));
    let x = project(&dvector![0.0, 0.0], &cs).unwrap();
    assert!((x - dvector![0.5, 0.5]).norm() < 1e-6);
}
