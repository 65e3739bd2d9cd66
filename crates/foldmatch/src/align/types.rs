//! Search configuration, result records, and the bounded result list.

use std::fmt;

use crate::cfg::ANGLE_EPS;
use crate::error::{AlignError, Result};
use crate::geom::angle_dist;
use crate::vertex::Vertex;

/// Alignment configuration.
#[derive(Clone, Copy, Debug)]
pub struct AlignCfg {
    /// Per-branch angle tolerance (radians) for the loss and adjustment clamping.
    pub threshold: f64,
    /// Size N of the retained result list.
    pub number_of_output: usize,
    /// Keep the materialized vertex on each result.
    pub materialize: bool,
    /// Angle tolerance under which two materialized results count as the same.
    pub dedup_eps: f64,
}

impl Default for AlignCfg {
    fn default() -> Self {
        Self {
            threshold: 5.0_f64.to_radians(),
            number_of_output: 1,
            materialize: true,
            dedup_eps: ANGLE_EPS,
        }
    }
}

impl AlignCfg {
    pub fn new(threshold: f64, number_of_output: usize) -> Result<Self> {
        let cfg = Self {
            threshold,
            number_of_output,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(AlignError::InvalidConfig(format!(
                "threshold must be finite and positive, got {}",
                self.threshold
            )));
        }
        if self.number_of_output == 0 {
            return Err(AlignError::InvalidConfig(
                "number_of_output must be at least 1".into(),
            ));
        }
        if !(self.dedup_eps.is_finite() && self.dedup_eps >= 0.0) {
            return Err(AlignError::InvalidConfig(format!(
                "dedup_eps must be finite and non-negative, got {}",
                self.dedup_eps
            )));
        }
        Ok(())
    }
}

/// One alignment of the smaller vertex onto a subset of the larger one.
#[derive(Clone, Debug)]
pub struct Output {
    /// Rigid rotation applied to the smaller vertex (radians).
    pub rotation: f64,
    /// Correction for each sorted branch of the rotated smaller vertex (radians).
    pub angle_adjustments: Vec<f64>,
    /// Loss of the rotated (unadjusted) smaller vertex against the subset.
    pub cost: f64,
    /// Rotated and adjusted smaller vertex, if materialized.
    pub vertex: Option<Vertex>,
    /// Indices of the matched branches in the larger vertex.
    pub subset: Vec<usize>,
    /// Cyclic offset pairing smaller branch `i` with subset branch `i + offset`.
    pub offset: usize,
}

impl Output {
    /// Unfilled slot.
    pub fn placeholder() -> Self {
        Self {
            rotation: 0.0,
            angle_adjustments: Vec::new(),
            cost: f64::INFINITY,
            vertex: None,
            subset: Vec::new(),
            offset: 0,
        }
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.cost.is_finite()
    }

    /// Whether two results describe the same alignment.
    ///
    /// With both vertices materialized they are compared angle by angle; otherwise
    /// rotation, adjustments, and cost must each agree within `eps`.
    pub fn same_alignment(&self, other: &Output, eps: f64) -> bool {
        match (&self.vertex, &other.vertex) {
            (Some(a), Some(b)) => a.is_angle_compatible(b, eps),
            _ => {
                angle_dist(self.rotation, other.rotation) < eps
                    && self.angle_adjustments.len() == other.angle_adjustments.len()
                    && self
                        .angle_adjustments
                        .iter()
                        .zip(&other.angle_adjustments)
                        .all(|(a, b)| (a - b).abs() < eps)
                    && (self.cost == other.cost || (self.cost - other.cost).abs() < eps)
            }
        }
    }

    /// Rebuild the aligned vertex from the smaller input vertex.
    pub fn to_vertex(&self, base: &Vertex) -> Result<Vertex> {
        base.rotate(self.rotation).adjusted(&self.angle_adjustments)
    }
}

impl PartialEq for Output {
    fn eq(&self, other: &Self) -> bool {
        self.same_alignment(other, ANGLE_EPS)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adj: Vec<String> = self
            .angle_adjustments
            .iter()
            .map(|a| format!("{:.2}", a.to_degrees()))
            .collect();
        write!(
            f,
            "Rotation: {:.2}, Angle adjustments: {}, Cost: {:.3}",
            self.rotation.to_degrees(),
            adj.join(", "),
            self.cost
        )
    }
}

/// Drop unfilled (infinite-cost) slots.
pub fn filled(outputs: Vec<Output>) -> Vec<Output> {
    outputs.into_iter().filter(Output::is_filled).collect()
}

/// What happened to an offered candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Offer {
    /// Took the slot of the worst entry.
    Inserted,
    /// Replaced a costlier duplicate of itself.
    Improved,
    /// Matched a retained result that is at least as good.
    Duplicate,
}

/// Fixed-size result list, sorted ascending by cost.
#[derive(Clone, Debug)]
pub(crate) struct OutputList {
    entries: Vec<Output>,
    dedup_eps: f64,
}

impl OutputList {
    pub(crate) fn new(n: usize, dedup_eps: f64) -> Self {
        Self {
            entries: (0..n).map(|_| Output::placeholder()).collect(),
            dedup_eps,
        }
    }

    #[inline]
    pub(crate) fn best_cost(&self) -> f64 {
        self.entries.first().map_or(f64::INFINITY, |o| o.cost)
    }

    #[inline]
    pub(crate) fn worst_cost(&self) -> f64 {
        self.entries.last().map_or(f64::INFINITY, |o| o.cost)
    }

    /// Insert `candidate` under the dedup policy (`Output::same_alignment`).
    /// Callers only offer candidates cheaper than `worst_cost`.
    pub(crate) fn offer(&mut self, candidate: Output) -> Offer {
        let dup = self
            .entries
            .iter()
            .position(|e| e.same_alignment(&candidate, self.dedup_eps));
        let outcome = match dup {
            Some(k) if candidate.cost < self.entries[k].cost => {
                self.entries[k] = candidate;
                Offer::Improved
            }
            Some(_) => return Offer::Duplicate,
            None => {
                if let Some(last) = self.entries.last_mut() {
                    *last = candidate;
                }
                Offer::Inserted
            }
        };
        self.entries.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        outcome
    }

    pub(crate) fn into_outputs(self, materialize: bool) -> Vec<Output> {
        let mut out = self.entries;
        if !materialize {
            for o in &mut out {
                o.vertex = None;
            }
        }
        out
    }
}
