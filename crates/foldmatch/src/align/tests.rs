//! Alignment search: reference examples, dedup and tie-break behavior, properties.

use super::types::{Offer, OutputList};
use super::*;
use crate::cfg::ANGLE_EPS;
use crate::error::AlignError;
use crate::patterns::{miura, yoshimura};
use crate::sampler::{draw_embedded_pair, BranchCount, ReplayToken, VertexCfg};
use crate::vertex::Vertex;
use proptest::prelude::*;
use std::f64::consts::PI;

fn deg(d: f64) -> f64 {
    d.to_radians()
}

fn v(angles_deg: &[f64]) -> Vertex {
    Vertex::from_angles(&angles_deg.iter().map(|d| deg(*d)).collect::<Vec<_>>())
}

fn sample() -> Vertex {
    v(&[30.0, 90.0, 150.0, 270.0])
}

fn algo(threshold_deg: f64, n: usize) -> Algorithm {
    Algorithm::new(AlignCfg::new(deg(threshold_deg), n).unwrap()).unwrap()
}

fn same_results(a: &[Output], b: &[Output]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.rotation == y.rotation
                && x.angle_adjustments == y.angle_adjustments
                && (x.cost == y.cost)
                && x.subset == y.subset
                && x.offset == y.offset
        })
}

#[test]
fn self_match_is_exact_at_zero_rotation() {
    let out = algo(5.0, 1).optimize_pattern(&sample(), &sample()).unwrap();
    assert_eq!(out.len(), 1);
    let best = &out[0];
    assert_eq!(best.rotation, 0.0);
    assert_eq!(best.cost, 0.0);
    assert_eq!(best.angle_adjustments, vec![0.0; 4]);
    assert_eq!(best.subset, vec![0, 1, 2, 3]);
    assert!(best.vertex.as_ref().unwrap().is_angle_compatible(&sample(), ANGLE_EPS));
}

#[test]
fn recovers_wholesale_rotation() {
    let target = sample().rotate(40f64.to_radians());
    let out = algo(5.0, 1).optimize_pattern(&sample(), &target).unwrap();
    assert_eq!(out[0].cost, 0.0);
    assert!((out[0].rotation - deg(40.0)).abs() < 1e-12);
}

#[test]
fn equal_sizes_rotate_the_first_argument() {
    let target = sample().rotate(40f64.to_radians());
    let out = algo(5.0, 1).optimize_pattern(&target, &sample()).unwrap();
    assert!(out[0].cost < 1e-9);
    assert!((out[0].rotation - deg(320.0)).abs() < 1e-9);
}

#[test]
fn finds_rotated_subset_regardless_of_argument_order() {
    let larger = v(&[0.0, 45.0, 100.0, 180.0, 250.0, 300.0]);
    let smaller = larger
        .extract_branches(vec![1, 3, 4])
        .unwrap()
        .rotate(deg(-30.0));
    let a = algo(5.0, 1);
    let out = a.optimize_pattern(&larger, &smaller).unwrap();
    let best = &out[0];
    assert!(best.cost < 1e-9);
    assert!((best.rotation - deg(30.0)).abs() < 1e-12);
    assert_eq!(best.subset, vec![1, 3, 4]);
    let flipped = a.optimize_pattern(&smaller, &larger).unwrap();
    assert!(same_results(&out, &flipped));
}

#[test]
fn yoshimura_miura_best_overlays_are_the_two_half_turns() {
    let out = algo(10.0, 2).optimize_pattern(&yoshimura(), &miura()).unwrap();
    assert!(out.iter().all(|o| (o.cost - 0.2).abs() < 1e-9));
    let mut rots: Vec<f64> = out.iter().map(|o| o.rotation.to_degrees().round()).collect();
    rots.sort_by(f64::total_cmp);
    assert_eq!(rots, vec![0.0, 180.0]);
    let at_zero = out.iter().find(|o| o.rotation == 0.0).unwrap();
    assert_eq!(at_zero.subset, vec![0, 1, 2, 4]);
    let expected = [-0.1, 0.0, 0.1, 0.0];
    for (a, e) in at_zero.angle_adjustments.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9);
    }
}

#[test]
fn saturated_branches_are_not_adjusted() {
    // the 90° crease misses 100° by more than the threshold at every rotation that fits 0°
    let out = algo(4.0, 1)
        .optimize_pattern(&v(&[0.0, 90.0]), &v(&[0.0, 100.0]))
        .unwrap();
    let best = &out[0];
    assert_eq!(best.rotation, 0.0);
    assert_eq!(best.cost, 1.0);
    assert_eq!(best.angle_adjustments, vec![0.0, 0.0]);
}

#[test]
fn results_are_sorted_and_mutually_distinct() {
    let out = algo(5.0, 6).optimize_pattern(&yoshimura(), &miura()).unwrap();
    assert_eq!(out.len(), 6);
    assert!(out.windows(2).all(|w| w[0].cost <= w[1].cost));
    let filled_out = filled(out);
    for (i, a) in filled_out.iter().enumerate() {
        for b in &filled_out[i + 1..] {
            let (va, vb) = (a.vertex.as_ref().unwrap(), b.vertex.as_ref().unwrap());
            assert!(!va.is_angle_compatible(vb, ANGLE_EPS));
        }
    }
}

#[test]
fn perfect_match_stops_early_and_leaves_placeholders() {
    // every other candidate at 0° materializes onto the same vertex
    let out = algo(5.0, 3).optimize_pattern(&sample(), &sample()).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].cost, 0.0);
    assert!(out[1..].iter().all(|o| !o.is_filled()));
    assert_eq!(filled(out).len(), 1);
}

#[test]
fn empty_vertex_fills_every_slot_trivially() {
    let out = algo(5.0, 3).optimize_pattern(&Vertex::empty(), &sample()).unwrap();
    assert_eq!(out.len(), 3);
    for o in &out {
        assert_eq!(o.cost, 0.0);
        assert!(o.angle_adjustments.is_empty());
        assert!(o.vertex.as_ref().unwrap().is_empty());
    }
}

#[test]
fn materialized_vertex_matches_to_vertex() {
    let smaller = miura();
    let out = algo(10.0, 3).optimize_pattern(&yoshimura(), &smaller).unwrap();
    for o in filled(out) {
        let rebuilt = o.to_vertex(&smaller).unwrap();
        assert!(rebuilt.is_angle_compatible(o.vertex.as_ref().unwrap(), 1e-12));
    }
}

#[test]
fn materialize_off_strips_vertices() {
    let cfg = AlignCfg {
        materialize: false,
        ..AlignCfg::new(deg(5.0), 2).unwrap()
    };
    let out = Algorithm::new(cfg)
        .unwrap()
        .optimize_pattern(&yoshimura(), &miura())
        .unwrap();
    assert!(out.iter().all(|o| o.vertex.is_none()));
}

#[test]
fn output_equality_follows_materialized_vertex() {
    let base = Output {
        rotation: 0.1,
        angle_adjustments: vec![0.0, 0.0],
        cost: 0.5,
        vertex: Some(Vertex::from_angles(&[0.0, 2.0])),
        subset: vec![0, 1],
        offset: 0,
    };
    // -2e-15 sorts last, just under 2π; still the same crease as 0
    let wrapped = Output {
        rotation: 0.2,
        angle_adjustments: vec![0.01, 0.0],
        cost: 0.3,
        vertex: Some(Vertex::from_angles(&[-2e-15, 2.0])),
        ..base.clone()
    };
    assert_eq!(base, wrapped);
    assert_ne!(Output::placeholder(), base);

    // without vertices, rotation, adjustments and cost decide
    let bare = Output {
        vertex: None,
        ..base.clone()
    };
    assert_ne!(
        bare,
        Output {
            vertex: None,
            ..wrapped.clone()
        }
    );
    assert_eq!(
        bare,
        Output {
            vertex: None,
            cost: 0.5 + 1e-9,
            ..base.clone()
        }
    );

    let mut list = OutputList::new(2, ANGLE_EPS);
    assert_eq!(list.offer(base.clone()), Offer::Inserted);
    assert_eq!(list.offer(wrapped), Offer::Improved);
    assert_eq!(list.offer(base), Offer::Duplicate);
    assert_eq!(list.best_cost(), 0.3);
    assert_eq!(list.worst_cost(), f64::INFINITY);
}

#[test]
fn parallel_sweep_matches_sequential() {
    let a = algo(8.0, 4);
    let seq = a.optimize_pattern(&yoshimura(), &miura()).unwrap();
    let par = a.optimize_pattern_par(&yoshimura(), &miura()).unwrap();
    assert!(same_results(&seq, &par));
}

#[test]
fn invalid_configs_are_rejected() {
    assert!(matches!(AlignCfg::new(0.0, 1), Err(AlignError::InvalidConfig(_))));
    assert!(matches!(AlignCfg::new(f64::NAN, 1), Err(AlignError::InvalidConfig(_))));
    assert!(matches!(AlignCfg::new(0.1, 0), Err(AlignError::InvalidConfig(_))));
    let bad = AlignCfg {
        number_of_output: 0,
        ..AlignCfg::default()
    };
    assert!(Algorithm::new(bad).is_err());
}

#[test]
fn defaults_align_self() {
    let out = align_with_defaults(&miura(), &miura()).unwrap();
    assert_eq!(out[0].cost, 0.0);
    assert!(out[0].to_string().starts_with("Rotation: 0.00"));
}

fn vertex_strategy(max_len: usize) -> impl Strategy<Value = Vertex> {
    prop::collection::vec(0.0..2.0 * PI, 1..=max_len).prop_map(|a| Vertex::from_angles(&a))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn costs_bounded_sorted_and_deterministic(
        a in vertex_strategy(3),
        b in vertex_strategy(4),
        threshold_deg in 1.0f64..60.0,
        n in 1usize..4,
    ) {
        let alg = algo(threshold_deg, n);
        let out = alg.optimize_pattern(&a, &b).unwrap();
        let k = a.len().min(b.len()) as f64;
        prop_assert_eq!(out.len(), n);
        prop_assert!(out.windows(2).all(|w| w[0].cost <= w[1].cost));
        for o in out.iter().filter(|o| o.is_filled()) {
            prop_assert!(o.cost >= 0.0 && o.cost <= k + 1e-12);
            prop_assert_eq!(o.angle_adjustments.len() as f64, k);
            prop_assert!(o.angle_adjustments.iter().all(|d| d.abs() <= deg(threshold_deg)));
        }
        let again = alg.optimize_pattern(&a, &b).unwrap();
        prop_assert!(same_results(&out, &again));
    }

    #[test]
    fn planted_rotation_is_recovered(
        seed in any::<u64>(),
        k in 2usize..=4,
        rotation_deg in 0u32..360,
    ) {
        let cfg = VertexCfg { branch_count: BranchCount::Fixed(5), ..VertexCfg::default() };
        let (smaller, larger) =
            draw_embedded_pair(cfg, k, rotation_deg, ReplayToken::new(seed, 0)).unwrap();
        let out = algo(5.0, 1).optimize_pattern(&smaller, &larger).unwrap();
        prop_assert!(out[0].cost < 1e-9);
        prop_assert!((out[0].rotation - (rotation_deg as f64).to_radians()).abs() < 1e-12);
    }
}
