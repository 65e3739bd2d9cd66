//! Reference fold vertices.
//!
//! - `yoshimura` / `miura`: the pair compared in the alignment experiments
//!   (Miura perturbed by ±0.1 rad on its oblique creases).
//! - `*_classic`: textbook layouts with the constraints that define them.

use std::f64::consts::PI;

use crate::constraint::{DiffAngle, Symmetry};
use crate::vertex::Vertex;

pub const NAMES: [&str; 4] = ["yoshimura", "miura", "yoshimura-classic", "miura-classic"];

pub fn yoshimura() -> Vertex {
    Vertex::from_angles(&[
        PI / 3.0,
        PI / 2.0,
        PI - PI / 3.0,
        PI + PI / 3.0,
        -PI / 2.0,
        -PI / 3.0,
    ])
}

pub fn miura() -> Vertex {
    Vertex::from_angles(&[PI / 3.0 + 0.1, PI / 2.0, PI - PI / 3.0 - 0.1, -PI / 2.0])
}

/// Six creases at 60° spacing; creases 1 and 4 are collinear.
pub fn yoshimura_classic() -> Vertex {
    Vertex::from_angles(&[
        0.0,
        PI / 3.0,
        PI - PI / 3.0,
        PI,
        PI + PI / 3.0,
        -PI / 3.0,
    ])
    .with_constraint(DiffAngle::new(1, 4, PI, PI))
}

/// Four creases, mirror-symmetric about the vertical axis.
pub fn miura_classic() -> Vertex {
    Vertex::from_angles(&[PI / 6.0, PI / 2.0, PI - PI / 6.0, -PI / 2.0])
        .with_constraint(DiffAngle::new(1, 3, PI, PI))
        .with_constraint(DiffAngle::new(0, 2, 0.0, PI))
        .with_constraint(Symmetry::new(PI / 2.0))
}

pub fn by_name(name: &str) -> Option<Vertex> {
    match name {
        "yoshimura" => Some(yoshimura()),
        "miura" => Some(miura()),
        "yoshimura-classic" => Some(yoshimura_classic()),
        "miura-classic" => Some(miura_classic()),
        _ => None,
    }
}
