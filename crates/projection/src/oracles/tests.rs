use super::*;
use crate::geometry::Hyperplane;
use crate::ProjectionError;
use nalgebra::{dmatrix, dvector};
use proptest::prelude::*;

fn point(n: usize) -> impl Strategy<Value = Point> {
    prop::collection::vec(-20.0f64..20.0, n).prop_map(Point::from_vec)
}

#[test]
fn zeros_certificate_is_emitted_once() {
    let mut z = Zeros::new(3).unwrap();
    let (p0, c0) = z.query(&dvector![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(p0, Point::zeros(3));
    assert_eq!(c0.len(), 3);
    assert!(c0.iter().all(|c| matches!(c, Constraint::Hyperplane(_))));
    let (p1, c1) = z.query(&dvector![-4.0, 0.5, 0.0]).unwrap();
    assert_eq!(p1, Point::zeros(3));
    assert!(c1.is_empty());
    // A fresh instance starts over.
    let mut fresh = Zeros::new(3).unwrap();
    assert_eq!(fresh.query(&Point::zeros(3)).unwrap().1.len(), 3);
}

#[test]
fn halfspace_certificate_is_emitted_once_and_describes_the_set() {
    let mut h = HalfspaceSet::new(dvector![1.0, 1.0], 2.0).unwrap();
    let (p, certs) = h.query(&dvector![3.0, 3.0]).unwrap();
    assert!((p - dvector![1.0, 1.0]).norm() < 1e-12);
    assert_eq!(certs.len(), 1);
    assert!(certs[0].satisfies(&dvector![0.0, 0.0]));
    assert!(certs[0].satisfies(&dvector![2.0, 0.0]));
    assert!(!certs[0].satisfies(&dvector![2.0, 0.1]));
    assert!(h.query(&dvector![-1.0, 7.0]).unwrap().1.is_empty());
}

#[test]
fn ball_never_emits_certificates() {
    let mut b = Ball::new(dvector![1.0, 1.0], 0.5).unwrap();
    let (p, certs) = b.query(&dvector![4.0, 5.0]).unwrap();
    assert!((p - dvector![1.3, 1.4]).norm() < 1e-12);
    assert!(certs.is_empty());
}

#[test]
fn ball_membership_bounds_each_coordinate() {
    let ball = Ball::new(dvector![0.0, 0.0], 1.0).unwrap();
    let diag = dvector![1.0, 1.0] / 2f64.sqrt();
    // Euclidean gap 1.2e-4, per-coordinate gap ~0.85e-4.
    assert!(ball.contains(&(&diag * (1.0 + 1.2e-4)), 1e-4));
    assert!(!ball.contains(&(&diag * (1.0 + 1.5e-4)), 1e-4));
    assert!(!ball.contains(&dvector![1.0 + 1.2e-4, 0.0], 1e-4));
    assert!(ball.contains(&dvector![0.3, -0.2], 0.0));
}

#[test]
fn halfspace_membership_bounds_each_coordinate() {
    // 3x + 4y <= 0; x = s·a sits at Euclidean distance 5s, max coordinate gap 4s.
    let h = HalfspaceSet::new(dvector![3.0, 4.0], 0.0).unwrap();
    let a = dvector![3.0, 4.0];
    assert!(h.contains(&(&a * 2.4e-5), 1e-4));
    assert!(!h.contains(&(&a * 3.0e-5), 1e-4));
    assert!(h.contains(&(&a * -10.0), 0.0));
}

#[test]
fn affine_membership_ignores_row_scaling() {
    let steep = AffineSet::new(dmatrix![2.0, 0.0], dvector![0.0]).unwrap();
    assert!(steep.contains(&dvector![0.6e-4, 3.0], 1e-4));
    assert!(!steep.contains(&dvector![1.2e-4, 3.0], 1e-4));

    let flat = AffineSet::new(dmatrix![0.1, 0.0], dvector![0.0]).unwrap();
    assert!(!flat.contains(&dvector![5e-4, 0.0], 1e-4));
    assert!(flat.contains(&dvector![0.5e-4, -7.0], 1e-4));
}

#[test]
fn inconsistent_affine_system_contains_nothing() {
    // x₁ = 0 and x₁ = 1
    let empty = AffineSet::new(dmatrix![1.0, 0.0; 1.0, 0.0], dvector![0.0, 1.0]).unwrap();
    assert!(!empty.contains(&dvector![0.5, 0.0], 1.0));
    assert!(!empty.contains(&dvector![0.0, 0.0], 1e-4));
}

#[test]
fn affine_projection_through_clarabel() {
    // x₁ + x₂ = 1
    let mut set = AffineSet::new(dmatrix![1.0, 1.0], dvector![1.0]).unwrap();
    let x = dvector![2.0, 0.0];
    assert!(!set.contains(&x, 1e-6));
    let p = set.project(&x).unwrap();
    assert!((&p - dvector![1.5, -0.5]).norm() < 1e-6, "got {p}");
    assert!(set.contains(&p, 1e-6));
    let again = set.project(&p).unwrap();
    assert!((again - &p).norm() < 1e-6);

    let (_, certs) = set.query(&x).unwrap();
    assert_eq!(
        certs,
        vec![Constraint::Hyperplane(Hyperplane::new(dvector![1.0, 1.0], 1.0))]
    );
    assert!(set.query(&dvector![0.0, 0.0]).unwrap().1.is_empty());
}

#[test]
fn construction_rejects_mismatched_dimensions() {
    let err = AffineSet::new(dmatrix![1.0, 0.0; 0.0, 1.0], dvector![1.0]).err();
    assert!(matches!(err, Some(ProjectionError::Construction { .. })));
    assert!(Zeros::new(0).is_err());
    assert!(HalfspaceSet::new(dvector![0.0, 0.0], 1.0).is_err());
    assert!(Ball::new(dvector![0.0], -1.0).is_err());
    assert!(Ball::new(Point::zeros(0), 1.0).is_err());
}

proptest! {
    #[test]
    fn closed_form_projections_are_idempotent(
        x in point(3),
        a in point(3),
        b in -5.0f64..5.0,
        r in 0.0f64..4.0,
    ) {
        let zeros = Zeros::new(3).unwrap();
        let ball = Ball::new(a.clone(), r).unwrap();
        let mut sets: Vec<Box<dyn ConvexSet>> = vec![Box::new(zeros), Box::new(ball)];
        if a.norm() > 1e-3 {
            sets.push(Box::new(HalfspaceSet::new(a.clone(), b).unwrap()));
        }
        for set in &sets {
            let p = set.project(&x).unwrap();
            prop_assert!(set.contains(&p, 1e-8), "{} projection not contained", set.name());
            let pp = set.project(&p).unwrap();
            prop_assert!((&pp - &p).amax() <= 1e-8, "{} projection not idempotent", set.name());
        }
    }

    #[test]
    fn contained_points_are_returned_unchanged(a in point(2), b in -5.0f64..5.0, y in point(2)) {
        prop_assume!(a.norm() > 1e-3);
        let set = HalfspaceSet::new(a, b).unwrap();
        let inside = set.project(&y).unwrap();
        let again = set.project(&inside).unwrap();
        prop_assert!((again - &inside).amax() <= 1e-10);
    }
}
