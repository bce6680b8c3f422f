use super::*;
use nalgebra::vector;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn square(x0: f64, y0: f64, side: f64) -> Ring {
    Ring::from_xy(&[
        [x0, y0],
        [x0 + side, y0],
        [x0 + side, y0 + side],
        [x0, y0 + side],
        [x0, y0],
    ])
}

#[test]
fn unit_square_area_both_orientations() {
    let ccw = square(0.0, 0.0, 1.0);
    assert!((ring_signed_area(&ccw) - 1.0).abs() < 1e-12);
    let mut cw = ccw.clone();
    cw.pts.reverse();
    assert!((ring_signed_area(&cw) + 1.0).abs() < 1e-12);
    let g = Geometry::Polygon(Polygon::new(cw, vec![]));
    assert!((g.area().unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn open_and_closed_rings_agree() {
    let open = Ring::from_xy(&[[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]);
    let closed = open.closed();
    assert!(closed.is_closed());
    assert_eq!(closed.pts.len(), 4);
    assert_eq!(open.vertices().len(), 3);
    assert_eq!(closed.vertices().len(), 3);
    assert!((ring_signed_area(&open) - 6.0).abs() < 1e-12);
    assert!((ring_signed_area(&closed) - 6.0).abs() < 1e-12);
}

#[test]
fn holes_are_subtracted() {
    let poly = Polygon::new(square(0.0, 0.0, 10.0), vec![square(2.0, 2.0, 3.0)]);
    assert!((poly.area().unwrap() - 91.0).abs() < 1e-9);
}

#[test]
fn multipolygon_parts_are_summed() {
    let g = Geometry::MultiPolygon(vec![
        Polygon::new(square(0.0, 0.0, 2.0), vec![]),
        Polygon::new(square(10.0, 10.0, 3.0), vec![square(11.0, 11.0, 1.0)]),
    ]);
    assert!((g.area().unwrap() - (4.0 + 8.0)).abs() < 1e-9);
    assert_eq!(Geometry::MultiPolygon(vec![]).area().unwrap(), 0.0);
}

#[test]
fn oversized_hole_clamps_to_zero() {
    let poly = Polygon::new(square(0.0, 0.0, 1.0), vec![square(-1.0, -1.0, 5.0)]);
    assert_eq!(poly.area().unwrap(), 0.0);
}

#[test]
fn oversized_hole_only_clamps_its_own_part() {
    // Raw difference would be 1 - 25 = -24; the part contributes 0 instead.
    let bad = Polygon::new(square(0.0, 0.0, 1.0), vec![square(-1.0, -1.0, 5.0)]);
    let good = Polygon::new(square(10.0, 0.0, 2.0), vec![]);
    let g = Geometry::MultiPolygon(vec![bad.clone(), good]);
    assert!((g.area().unwrap() - 4.0).abs() < 1e-12);

    let lone = Geometry::Polygon(bad);
    assert_eq!(lone.area().unwrap(), 0.0);
    assert_eq!(
        crate::density::density_of(10.0, &lone, crate::density::ZeroAreaPolicy::Reject),
        Err(crate::density::DensityError::ZeroArea)
    );
}

#[test]
fn self_intersecting_ring_is_tolerated() {
    // Bow-tie: the two lobes cancel in the signed sum.
    let bowtie = Ring::from_xy(&[[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]]);
    let g = Geometry::Polygon(Polygon::new(bowtie, vec![]));
    let a = g.area().unwrap();
    assert!(a.abs() < 1e-12);
}

#[test]
fn structurally_invalid_rings_are_rejected() {
    let two = Ring::from_xy(&[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    let g = Geometry::Polygon(Polygon::new(two, vec![]));
    assert_eq!(
        g.area(),
        Err(GeometryError::TooFewCoordinates {
            part: 0,
            ring: 0,
            count: 2
        })
    );

    let hole_bad = Polygon::new(square(0.0, 0.0, 4.0), vec![Ring::new(vec![])]);
    let ok = Polygon::new(square(9.0, 9.0, 1.0), vec![]);
    let g = Geometry::MultiPolygon(vec![ok, hole_bad]);
    assert!(matches!(
        g.area(),
        Err(GeometryError::TooFewCoordinates {
            part: 1,
            ring: 1,
            count: 0
        })
    ));

    let mut nan = square(0.0, 0.0, 1.0);
    nan.pts[2] = vector![f64::NAN, 1.0];
    let g = Geometry::Polygon(Polygon::new(nan, vec![]));
    assert_eq!(
        g.area(),
        Err(GeometryError::NonFiniteCoordinate { part: 0, ring: 0 })
    );
}

#[test]
fn area_invariant_under_translation_seeded() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let n = rng.gen_range(3..12);
        let mut angles: Vec<f64> = (0..n)
            .map(|_| rng.gen::<f64>() * std::f64::consts::TAU)
            .collect();
        angles.sort_by(|a, b| a.total_cmp(b));
        let pts: Vec<_> = angles
            .iter()
            .map(|t| vector![t.cos(), t.sin()] * rng.gen_range(0.5..2.0))
            .collect();
        let ring = Ring::new(pts.clone());
        let shift = vector![rng.gen_range(-1e6..1e6), rng.gen_range(-1e6..1e6)];
        let moved = Ring::new(pts.iter().map(|p| p + shift).collect());
        let a = ring_signed_area(&ring);
        let b = ring_signed_area(&moved);
        assert!(a > 0.0, "star-shaped CCW ring has positive area");
        assert!((a - b).abs() < 1e-6 * a.max(1.0));
    }
}
