//! Coordinate containers for polygonal region outlines.

use nalgebra::Vector2;

/// A linear ring. The closing point (repeat of the first) is optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ring {
    pub pts: Vec<Vector2<f64>>,
}

impl Ring {
    #[inline]
    pub fn new(pts: Vec<Vector2<f64>>) -> Self {
        Self { pts }
    }

    /// Build from `[x, y]` pairs.
    pub fn from_xy(xy: &[[f64; 2]]) -> Self {
        Self {
            pts: xy.iter().map(|p| Vector2::new(p[0], p[1])).collect(),
        }
    }

    /// Vertices without the closing point.
    pub fn vertices(&self) -> &[Vector2<f64>] {
        match (self.pts.first(), self.pts.last()) {
            (Some(first), Some(last)) if self.pts.len() > 1 && first == last => {
                &self.pts[..self.pts.len() - 1]
            }
            _ => &self.pts,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pts.len() > 1 && self.pts.first() == self.pts.last()
    }

    /// Copy with the closing point appended if missing (GeoJSON form).
    pub fn closed(&self) -> Ring {
        let mut pts = self.pts.clone();
        if !self.is_closed() {
            if let Some(&first) = pts.first() {
                pts.push(first);
            }
        }
        Ring { pts }
    }
}

/// Polygon with one exterior ring and zero or more holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,
}

impl Polygon {
    #[inline]
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Iterate exterior first, then holes.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }
}

/// Region outline: single polygon or a collection of disjoint parts.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    /// Polygon parts in order (one for `Polygon`).
    pub fn parts(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }
}
