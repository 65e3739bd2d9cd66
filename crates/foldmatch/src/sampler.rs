//! Random fold vertices (jittered equal spacing + replay tokens).
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular jitter
//!   and an optional global phase; lengths are uniform in `[min_length, max_length]`.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//! - `draw_embedded_pair` plants a rotated subset of a drawn vertex, giving inputs
//!   whose best alignment is known in advance.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::geom::Branch;
use crate::vertex::Vertex;

/// Branch count distribution.
#[derive(Clone, Copy, Debug)]
pub enum BranchCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl BranchCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            BranchCount::Fixed(n) => n,
            BranchCount::Uniform { min, max } => rng.gen_range(min..=max.max(min)),
        }
    }
}

/// Sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct VertexCfg {
    pub branch_count: BranchCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    pub min_length: f64,
    pub max_length: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}
impl Default for VertexCfg {
    fn default() -> Self {
        Self {
            branch_count: BranchCount::Fixed(6),
            angle_jitter_frac: 0.3,
            min_length: 1.0,
            max_length: 1.0,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

fn draw_with<R: Rng>(cfg: &VertexCfg, rng: &mut R) -> Vertex {
    let n = cfg.branch_count.sample(rng);
    if n == 0 {
        return Vertex::empty();
    }
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let lo = cfg.min_length.max(0.0);
    let hi = cfg.max_length.max(lo);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let branches = (0..n)
        .map(|k| {
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let length = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            Branch::new(phase + (k as f64) * delta + jitter, length)
        })
        .collect();
    Vertex::new(branches)
}

pub fn draw_vertex(cfg: VertexCfg, tok: ReplayToken) -> Vertex {
    draw_with(&cfg, &mut tok.to_std_rng())
}

/// Draw a vertex plus `k` of its branches rotated by `-rotation_deg`.
///
/// Returns `(smaller, larger)`: rotating `smaller` by `rotation_deg` lays it exactly
/// onto a subset of `larger`. `k` is capped at the larger vertex's branch count.
pub fn draw_embedded_pair(
    cfg: VertexCfg,
    k: usize,
    rotation_deg: u32,
    tok: ReplayToken,
) -> Result<(Vertex, Vertex)> {
    let mut rng = tok.to_std_rng();
    let larger = draw_with(&cfg, &mut rng);
    let k = k.min(larger.len());
    let mut ix = sample(&mut rng, larger.len(), k).into_vec();
    ix.sort_unstable();
    let smaller = larger
        .extract_branches(ix)?
        .rotate(-(rotation_deg as f64).to_radians());
    Ok((smaller, larger))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_reproducible() {
        let cfg = VertexCfg::default();
        let a = draw_vertex(cfg, ReplayToken::new(1, 2));
        let b = draw_vertex(cfg, ReplayToken::new(1, 2));
        let c = draw_vertex(cfg, ReplayToken::new(1, 3));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn lengths_respect_bounds() {
        let cfg = VertexCfg {
            branch_count: BranchCount::Uniform { min: 3, max: 8 },
            min_length: 0.5,
            max_length: 2.0,
            ..VertexCfg::default()
        };
        for i in 0..20 {
            let v = draw_vertex(cfg, ReplayToken::new(9, i));
            assert!((3..=8).contains(&v.len()));
            assert!(v.iter().all(|b| (0.5..2.0).contains(&b.length)));
        }
    }

    #[test]
    fn embedded_pair_rotates_back_onto_larger() {
        let (smaller, larger) =
            draw_embedded_pair(VertexCfg::default(), 4, 40, ReplayToken::new(3, 0)).unwrap();
        assert_eq!(smaller.len(), 4);
        let back = smaller.rotate(40f64.to_radians());
        assert!(back.iter().all(|b| larger.iter().any(|l| l.is_close_to(b, 1e-9))));
    }
}
