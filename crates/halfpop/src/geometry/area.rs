use std::fmt;

use nalgebra::Vector2;

use super::types::{Geometry, Polygon, Ring};

/// Structural problems that prevent an area computation.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// A ring has fewer than three vertices (closing point not counted).
    TooFewCoordinates {
        part: usize,
        ring: usize,
        count: usize,
    },
    /// A coordinate is NaN or infinite.
    NonFiniteCoordinate { part: usize, ring: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::TooFewCoordinates { part, ring, count } => write!(
                f,
                "ring {ring} of part {part} has {count} vertices (needs at least 3)"
            ),
            GeometryError::NonFiniteCoordinate { part, ring } => {
                write!(f, "ring {ring} of part {part} has a non-finite coordinate")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed shoelace area: positive for counterclockwise vertex order.
///
/// Works on the vertex list with or without closing point. Coordinates are
/// shifted by the first vertex to keep the cross products small for projected
/// (large-offset) coordinates.
pub fn ring_signed_area(ring: &Ring) -> f64 {
    let v = ring.vertices();
    if v.len() < 3 {
        return 0.0;
    }
    let o = v[0];
    let mut twice = 0.0;
    for k in 1..v.len() - 1 {
        twice += cross(v[k] - o, v[k + 1] - o);
    }
    0.5 * twice
}

fn check_ring(ring: &Ring, part: usize, idx: usize) -> Result<(), GeometryError> {
    if ring.pts.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate { part, ring: idx });
    }
    let count = ring.vertices().len();
    if count < 3 {
        return Err(GeometryError::TooFewCoordinates {
            part,
            ring: idx,
            count,
        });
    }
    Ok(())
}

impl Polygon {
    /// Area of the exterior minus the area of every hole, never below zero.
    ///
    /// Orientation is ignored (absolute ring areas). Holes larger than their
    /// shell only occur in invalid input and clamp to zero area.
    pub fn area(&self) -> Result<f64, GeometryError> {
        self.area_of_part(0)
    }

    fn area_of_part(&self, part: usize) -> Result<f64, GeometryError> {
        for (idx, ring) in self.rings().enumerate() {
            check_ring(ring, part, idx)?;
        }
        let shell = ring_signed_area(&self.exterior).abs();
        let holes: f64 = self
            .interiors
            .iter()
            .map(|r| ring_signed_area(r).abs())
            .sum();
        Ok((shell - holes).max(0.0))
    }
}

impl Geometry {
    /// Planar area summed over all parts. An empty multi-polygon has area 0.
    pub fn area(&self) -> Result<f64, GeometryError> {
        let mut total = 0.0;
        for (part, poly) in self.parts().iter().enumerate() {
            total += poly.area_of_part(part)?;
        }
        Ok(total)
    }
}
