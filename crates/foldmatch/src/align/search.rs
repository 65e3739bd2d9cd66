//! Rotation × subset × offset sweep with a bounded result list.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::cfg::ROTATION_STEPS;
use crate::error::Result;
use crate::loss::Loss;
use crate::vertex::Vertex;

use super::combinations::Combinations;
use super::types::{AlignCfg, Offer, Output, OutputList};

/// Brute-force vertex aligner. Holds configuration only; every call builds its
/// own result list, so one instance can serve concurrent callers.
#[derive(Clone, Copy, Debug)]
pub struct Algorithm {
    cfg: AlignCfg,
    loss: Loss,
}

/// Convenience: align with `AlignCfg::default()`.
pub fn align_with_defaults(vertex1: &Vertex, vertex2: &Vertex) -> Result<Vec<Output>> {
    Algorithm::new(AlignCfg::default())?.optimize_pattern(vertex1, vertex2)
}

impl Algorithm {
    pub fn new(cfg: AlignCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            loss: Loss::new(cfg.threshold),
        })
    }

    #[inline]
    pub fn cfg(&self) -> &AlignCfg {
        &self.cfg
    }

    /// Align the smaller of the two vertices onto subsets of the larger one.
    ///
    /// With equal branch counts `vertex1` is the one rotated. Returns
    /// `number_of_output` results ascending by cost; unfilled slots keep an
    /// infinite cost (see `filled`).
    pub fn optimize_pattern(&self, vertex1: &Vertex, vertex2: &Vertex) -> Result<Vec<Output>> {
        self.run(vertex1, vertex2, false)
    }

    /// Same result as `optimize_pattern`, scoring each rotation on the rayon pool.
    pub fn optimize_pattern_par(&self, vertex1: &Vertex, vertex2: &Vertex) -> Result<Vec<Output>> {
        self.run(vertex1, vertex2, true)
    }

    fn run(&self, vertex1: &Vertex, vertex2: &Vertex, parallel: bool) -> Result<Vec<Output>> {
        let (smaller, larger) = order_by_size(vertex1, vertex2);
        let k = smaller.len();
        let _span = tracing::debug_span!(
            "optimize_pattern",
            smaller = k,
            larger = larger.len(),
            parallel
        )
        .entered();

        if smaller.is_empty() {
            debug!("empty vertex, trivial alignment");
            return Ok(self.trivial());
        }

        // Subsets do not depend on the rotation: extract them once.
        let subsets: Vec<(Vec<usize>, Vertex)> = Combinations::new(larger.len(), k)
            .map(|ix| -> Result<(Vec<usize>, Vertex)> {
                let sub = larger.extract_branches(ix.as_slice())?;
                Ok((ix, sub))
            })
            .collect::<Result<_>>()?;

        let mut out = OutputList::new(self.cfg.number_of_output, self.cfg.dedup_eps);
        for step in 0..ROTATION_STEPS {
            if out.best_cost() == 0.0 {
                debug!(step, "perfect match, stopping sweep");
                break;
            }
            let rotation = (step as f64).to_radians();
            let rotated = smaller.rotate(rotation);
            if parallel {
                let costs: Vec<Vec<f64>> = subsets
                    .par_iter()
                    .map(|(_, sub)| {
                        (0..k)
                            .map(|offset| self.loss.compute(&rotated, sub, offset))
                            .collect::<Result<Vec<f64>>>()
                    })
                    .collect::<Result<_>>()?;
                for ((ix, sub), row) in subsets.iter().zip(costs) {
                    for (offset, cost) in row.into_iter().enumerate() {
                        self.consider(&mut out, &rotated, rotation, ix, sub, offset, cost)?;
                    }
                }
            } else {
                for (ix, sub) in &subsets {
                    for offset in 0..k {
                        let cost = self.loss.compute(&rotated, sub, offset)?;
                        self.consider(&mut out, &rotated, rotation, ix, sub, offset, cost)?;
                    }
                }
            }
        }
        Ok(out.into_outputs(self.cfg.materialize))
    }

    #[allow(clippy::too_many_arguments)]
    fn consider(
        &self,
        out: &mut OutputList,
        rotated: &Vertex,
        rotation: f64,
        ix: &[usize],
        subset: &Vertex,
        offset: usize,
        cost: f64,
    ) -> Result<()> {
        if cost >= out.worst_cost() {
            return Ok(());
        }
        let angle_adjustments = self.loss.adjustments(subset, rotated, offset)?;
        let vertex = rotated.adjusted(&angle_adjustments)?;
        let candidate = Output {
            rotation,
            angle_adjustments,
            cost,
            vertex: Some(vertex),
            subset: ix.to_vec(),
            offset,
        };
        let deg = rotation.to_degrees();
        match out.offer(candidate) {
            Offer::Inserted => debug!(deg, cost, ?ix, offset, "filled slot"),
            Offer::Improved => debug!(deg, cost, ?ix, offset, "improved duplicate"),
            Offer::Duplicate => trace!(deg, cost, "already retained"),
        }
        Ok(())
    }

    fn trivial(&self) -> Vec<Output> {
        (0..self.cfg.number_of_output)
            .map(|_| Output {
                cost: 0.0,
                vertex: self.cfg.materialize.then(Vertex::empty),
                ..Output::placeholder()
            })
            .collect()
    }
}

/// (smaller, larger) by branch count; ties rotate the first argument.
#[inline]
fn order_by_size<'a>(vertex1: &'a Vertex, vertex2: &'a Vertex) -> (&'a Vertex, &'a Vertex) {
    if vertex2.len() < vertex1.len() {
        (vertex2, vertex1)
    } else {
        (vertex1, vertex2)
    }
}
