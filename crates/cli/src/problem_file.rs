//! JSON problem files consumed by `cli run`.
//!
//! ```json
//! { "var_dim": 2, "initial_point": [5, 5],
//!   "sets": [ { "kind": "affine", "a": [[1, 0]], "b": [0] },
//!             { "kind": "ball", "center": [0, 0], "radius": 1 } ] }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use nalgebra::{DMatrix, DVector};
use projection::algorithms::Problem;
use projection::oracles::{AffineSet, Ball, ConvexSet, HalfspaceSet, Zeros};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetSpec {
    Zeros,
    Affine { a: Vec<Vec<f64>>, b: Vec<f64> },
    Halfspace { a: Vec<f64>, b: f64 },
    Ball { center: Vec<f64>, radius: f64 },
}

#[derive(Debug, Deserialize)]
pub struct ProblemFile {
    pub var_dim: usize,
    #[serde(default)]
    pub initial_point: Option<Vec<f64>>,
    pub sets: Vec<SetSpec>,
}

impl SetSpec {
    fn build(self, var_dim: usize) -> Result<Box<dyn ConvexSet>> {
        Ok(match self {
            SetSpec::Zeros => Box::new(Zeros::new(var_dim)?),
            SetSpec::Affine { a, b } => {
                let rows = a.len();
                let cols = a.first().map_or(0, Vec::len);
                if a.iter().any(|r| r.len() != cols) {
                    bail!("affine set has ragged rows");
                }
                let a = DMatrix::from_fn(rows, cols, |i, j| a[i][j]);
                Box::new(AffineSet::new(a, DVector::from_vec(b))?)
            }
            SetSpec::Halfspace { a, b } => Box::new(HalfspaceSet::new(DVector::from_vec(a), b)?),
            SetSpec::Ball { center, radius } => {
                Box::new(Ball::new(DVector::from_vec(center), radius)?)
            }
        })
    }
}

impl ProblemFile {
    pub fn into_problem(self) -> Result<Problem> {
        let var_dim = self.var_dim;
        let sets = self
            .sets
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.build(var_dim).with_context(|| format!("building set {i}")))
            .collect::<Result<Vec<_>>>()?;
        let x0 = self.initial_point.map(DVector::from_vec);
        Ok(Problem::new(sets, var_dim, x0)?)
    }
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Problem> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading problem {}", path.display()))?;
    let file: ProblemFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing problem {}", path.display()))?;
    file.into_problem()
}
