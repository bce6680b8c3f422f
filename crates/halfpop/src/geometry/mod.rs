//! Planar polygon geometry and area.
//!
//! Purpose
//! - Hold region outlines as plain coordinate rings and compute their planar
//!   area (shoelace formula): exterior minus holes per polygon, summed over the
//!   parts of a multi-polygon.
//!
//! Conventions
//! - Coordinates are taken as given (no reprojection). Area is in squared CRS
//!   units, so densities are only comparable within one dataset.
//! - Rings may be open or closed; a trailing point equal to the first is the
//!   closing point and is not counted as a vertex.
//! - Self-intersecting rings are accepted (the shoelace sum is still defined);
//!   only rings with fewer than three vertices or non-finite coordinates are
//!   rejected.

mod area;
mod types;

pub use area::{ring_signed_area, GeometryError};
pub use types::{Geometry, Polygon, Ring};

#[cfg(test)]
mod tests;
