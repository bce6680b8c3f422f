//! Density-ordered halving of weighted region sets.
//!
//! Given regions that each carry a polygon and a scalar quantity (population,
//! votes, ...), assign every region to one of two groups so that the first
//! group holds as close to half of the total quantity as a single greedy pass
//! allows. Sparse regions (low quantity per unit area) are taken first.
//!
//! Pipeline
//! - `schema::add_output_column` declares the 0/1 output attribute and
//!   defaults it to 0 on every region.
//! - `partition::allocate` computes areas and densities, orders regions by
//!   density, and walks them until the running sum reaches or crosses half.
//! - `report::Split` formats the resulting totals.
//!
//! The crate does no I/O; reading and writing geo-data lives in the CLI.

pub mod density;
pub mod geometry;
pub mod partition;
pub mod region;
pub mod report;
pub mod schema;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::density::{RegionDensity, ZeroAreaPolicy};
    pub use crate::geometry::{Geometry, GeometryError, Polygon, Ring};
    pub use crate::partition::{allocate, Allocation, PartitionCfg, PartitionError, Stop, TieBreak};
    pub use crate::region::{
        AttrType, AttrValue, Attributes, Dataset, GeometryKind, IdOrigin, Region, RegionId,
        Schema, SchemaError,
    };
    pub use crate::report::Split;
    pub use crate::schema::add_output_column;
    pub use nalgebra::Vector2 as Vec2;
}
