//! Outer polyhedral approximation of an intersection of convex sets.
//!
//! Purpose
//! - Accumulate constraints valid for every set across iterations: exact
//!   certificates from `ConvexSet::query` and supporting halfspaces derived at
//!   past iterates. Every stored constraint contains the true intersection, so
//!   projecting onto the container never cuts off a feasible point.
//!
//! Ownership
//! - One container per solve call; it is dropped when the call returns.
//!
//! Management
//! - Halfspace bookkeeping is a strategy object (`ManagementPolicy`) injected
//!   at construction: keep everything, evict the oldest, evict at random, or
//!   keep everything but project onto a random subsample.
//! - Certificates live in their own FIFO pool capped by `max_hyperplanes`.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use crate::geometry::{Constraint, Halfspace};
use crate::{ProjectionError, Result};

pub trait ManagementPolicy {
    fn name(&self) -> &'static str;

    /// Insert `h` into `pool`, evicting whatever the policy dictates.
    fn admit(&mut self, pool: &mut VecDeque<Halfspace>, h: Halfspace, rng: &mut StdRng);

    /// Halfspaces handed to the next projection.
    fn select(&mut self, pool: &VecDeque<Halfspace>, _rng: &mut StdRng) -> Vec<Halfspace> {
        pool.iter().cloned().collect()
    }
}

/// Keep every halfspace.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exact;

impl ManagementPolicy for Exact {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn admit(&mut self, pool: &mut VecDeque<Halfspace>, h: Halfspace, _rng: &mut StdRng) {
        pool.push_back(h);
    }
}

/// Bounded pool; evict the least recently added halfspace.
#[derive(Clone, Copy, Debug)]
pub struct Elra {
    pub capacity: usize,
}

impl ManagementPolicy for Elra {
    fn name(&self) -> &'static str {
        "elra"
    }

    fn admit(&mut self, pool: &mut VecDeque<Halfspace>, h: Halfspace, _rng: &mut StdRng) {
        pool.push_back(h);
        while pool.len() > self.capacity {
            pool.pop_front();
        }
    }
}

/// Bounded pool; evict a uniformly random halfspace.
#[derive(Clone, Copy, Debug)]
pub struct ERandom {
    pub capacity: usize,
}

impl ManagementPolicy for ERandom {
    fn name(&self) -> &'static str {
        "erandom"
    }

    fn admit(&mut self, pool: &mut VecDeque<Halfspace>, h: Halfspace, rng: &mut StdRng) {
        while pool.len() >= self.capacity && !pool.is_empty() {
            let victim = rng.gen_range(0..pool.len());
            pool.swap_remove_back(victim);
        }
        pool.push_back(h);
    }
}

/// Keep everything; project onto a random subsample of at most `size`.
#[derive(Clone, Copy, Debug)]
pub struct Subsample {
    pub size: usize,
}

impl ManagementPolicy for Subsample {
    fn name(&self) -> &'static str {
        "subsample"
    }

    fn admit(&mut self, pool: &mut VecDeque<Halfspace>, h: Halfspace, _rng: &mut StdRng) {
        pool.push_back(h);
    }

    fn select(&mut self, pool: &VecDeque<Halfspace>, rng: &mut StdRng) -> Vec<Halfspace> {
        if pool.len() <= self.size {
            return pool.iter().cloned().collect();
        }
        let mut picked = rand::seq::index::sample(rng, pool.len(), self.size).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|i| pool[i].clone()).collect()
    }
}

/// Policy selector (what the experiment driver exposes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OuterPolicy {
    #[default]
    Exact,
    Elra,
    ERandom,
    Subsample,
}

impl OuterPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "exact" => Some(Self::Exact),
            "elra" => Some(Self::Elra),
            "erandom" => Some(Self::ERandom),
            "subsample" => Some(Self::Subsample),
            _ => None,
        }
    }

    /// Build the strategy object. Bounded policies need `max_halfspaces >= 1`;
    /// `Exact` keeps everything and rejects a cap.
    pub fn into_policy(self, max_halfspaces: Option<usize>) -> Result<Box<dyn ManagementPolicy>> {
        let cap = match (self, max_halfspaces) {
            (Self::Exact, None) => return Ok(Box::new(Exact)),
            (Self::Exact, Some(_)) => {
                return Err(ProjectionError::configuration(
                    "exact policy keeps every halfspace and takes no max_halfspaces",
                ))
            }
            (_, Some(0)) | (_, None) => {
                return Err(ProjectionError::configuration(format!(
                    "{self:?} policy needs max_halfspaces >= 1"
                )))
            }
            (_, Some(cap)) => cap,
        };
        Ok(match self {
            Self::Elra => Box::new(Elra { capacity: cap }),
            Self::ERandom => Box::new(ERandom { capacity: cap }),
            Self::Subsample => Box::new(Subsample { size: cap }),
            Self::Exact => Box::new(Exact),
        })
    }
}

pub struct OuterApproximation {
    certificates: VecDeque<Constraint>,
    halfspaces: VecDeque<Halfspace>,
    max_hyperplanes: Option<usize>,
    policy: Box<dyn ManagementPolicy>,
}

impl OuterApproximation {
    pub fn new(max_hyperplanes: Option<usize>, policy: Box<dyn ManagementPolicy>) -> Self {
        Self {
            certificates: VecDeque::new(),
            halfspaces: VecDeque::new(),
            max_hyperplanes,
            policy,
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Store exact certificates; the oldest are evicted beyond `max_hyperplanes`.
    pub fn add_certificates(&mut self, certs: impl IntoIterator<Item = Constraint>) {
        self.certificates.extend(certs);
        if let Some(cap) = self.max_hyperplanes {
            while self.certificates.len() > cap {
                self.certificates.pop_front();
            }
        }
    }

    /// Hand a derived halfspace to the policy. Vacuous halfspaces are skipped.
    pub fn add_halfspace(&mut self, h: Halfspace, rng: &mut StdRng) {
        if h.is_vacuous() {
            return;
        }
        self.policy.admit(&mut self.halfspaces, h, rng);
    }

    /// Constraint list for the next projection: certificates first.
    pub fn constraints(&mut self, rng: &mut StdRng) -> Vec<Constraint> {
        let mut out: Vec<Constraint> = self.certificates.iter().cloned().collect();
        out.extend(
            self.policy
                .select(&self.halfspaces, rng)
                .into_iter()
                .map(Constraint::Halfspace),
        );
        out
    }

    pub fn num_certificates(&self) -> usize {
        self.certificates.len()
    }

    pub fn num_halfspaces(&self) -> usize {
        self.halfspaces.len()
    }
}
