//! Quantity per unit area.
//!
//! A zero area makes the density undefined. `ZeroAreaPolicy` decides what
//! happens instead of letting a division by zero produce `inf`/`NaN`
//! silently: reject the region, or give it density `+inf` so it is processed
//! after every region with a finite density.

use std::fmt;

use crate::geometry::{Geometry, GeometryError};

/// What to do with a region whose area is exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroAreaPolicy {
    /// Fail with `DensityError::ZeroArea`.
    #[default]
    Reject,
    /// Assign density `+inf` (processed last).
    SortLast,
}

/// Area and density of one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionDensity {
    pub area: f64,
    pub density: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DensityError {
    /// Area is zero and the policy rejects it.
    ZeroArea,
    Geometry(GeometryError),
}

impl fmt::Display for DensityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityError::ZeroArea => write!(f, "zero area (density undefined)"),
            DensityError::Geometry(e) => write!(f, "invalid geometry: {e}"),
        }
    }
}

impl std::error::Error for DensityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DensityError::Geometry(e) => Some(e),
            DensityError::ZeroArea => None,
        }
    }
}

impl From<GeometryError> for DensityError {
    fn from(e: GeometryError) -> Self {
        DensityError::Geometry(e)
    }
}

/// `quantity / area`, with the zero-area case resolved by `policy`.
pub fn density(quantity: f64, area: f64, policy: ZeroAreaPolicy) -> Result<f64, DensityError> {
    if area > 0.0 {
        return Ok(quantity / area);
    }
    match policy {
        ZeroAreaPolicy::Reject => Err(DensityError::ZeroArea),
        ZeroAreaPolicy::SortLast => Ok(f64::INFINITY),
    }
}

/// Compute area from `geometry`, then the density of `quantity` over it.
pub fn density_of(
    quantity: f64,
    geometry: &Geometry,
    policy: ZeroAreaPolicy,
) -> Result<RegionDensity, DensityError> {
    let area = geometry.area()?;
    let density = density(quantity, area, policy)?;
    Ok(RegionDensity { area, density })
}
