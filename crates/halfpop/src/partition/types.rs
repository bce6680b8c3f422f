//! Configuration, outcome, and error types for the halving pass.

use std::fmt;

use crate::density::{DensityError, RegionDensity, ZeroAreaPolicy};
use crate::region::{Dataset, RegionId};
use crate::report::Split;

/// Secondary key for regions with equal density.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep the order in which regions were supplied.
    #[default]
    InputOrder,
    /// Ascending region id (numeric ids numerically), then input order.
    Id,
}

/// Partition configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartitionCfg {
    pub tie_break: TieBreak,
    pub zero_area: ZeroAreaPolicy,
}

/// Where the walk ended. `step` is a position in the processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stop {
    /// The running sum hit half exactly with the region at `step` included.
    ExactHalf { step: usize },
    /// The region at `step` crossed half; `included` is the closer-wins verdict.
    Crossed { step: usize, included: bool },
    /// Every region was included without reaching half. Only reachable through
    /// floating-point rounding between the two summation orders.
    Exhausted,
}

impl Stop {
    pub fn label(&self) -> &'static str {
        match self {
            Stop::ExactHalf { .. } => "exact_half",
            Stop::Crossed { included: true, .. } => "crossed_included",
            Stop::Crossed { included: false, .. } => "crossed_excluded",
            Stop::Exhausted => "exhausted",
        }
    }
}

/// Result of `allocate`: the labelled dataset plus everything the walk saw.
#[derive(Clone, Debug)]
pub struct Allocation {
    pub dataset: Dataset,
    pub split: Split,
    /// Quantity per region, input order.
    pub quantities: Vec<f64>,
    /// Area and density per region, input order.
    pub densities: Vec<RegionDensity>,
    /// Region indices in processing order.
    pub order: Vec<usize>,
    /// First-half membership per region, input order.
    pub first_half: Vec<bool>,
    pub stop: Stop,
}

impl Allocation {
    /// Position of each region (input order) in the processing order.
    pub fn ranks(&self) -> Vec<usize> {
        let mut ranks = vec![0; self.order.len()];
        for (rank, &idx) in self.order.iter().enumerate() {
            ranks[idx] = rank;
        }
        ranks
    }
}

/// Errors surfaced by `allocate`. None of them leave a partial labelling.
#[derive(Clone, Debug, PartialEq)]
pub enum PartitionError {
    /// The quantity attribute is not declared in the schema.
    UnknownQuantity { name: String },
    /// The output attribute is not declared (run `add_output_column` first).
    UnknownOutputColumn { name: String },
    /// A region's quantity is null or not a number.
    NonNumericQuantity { region: RegionId, name: String },
    /// A region's quantity is NaN or infinite.
    NonFiniteQuantity { region: RegionId },
    /// Total quantity is zero or negative; nothing to halve.
    NonPositiveTotal { total: f64 },
    /// Area or density of a region could not be computed.
    Density {
        region: RegionId,
        source: DensityError,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownQuantity { name } => {
                write!(f, "quantity attribute '{name}' is not in the schema")
            }
            Self::UnknownOutputColumn { name } => {
                write!(f, "output attribute '{name}' has not been declared")
            }
            Self::NonNumericQuantity { region, name } => {
                write!(f, "region {region}: attribute '{name}' is not numeric")
            }
            Self::NonFiniteQuantity { region } => {
                write!(f, "region {region}: quantity is not finite")
            }
            Self::NonPositiveTotal { total } => {
                write!(f, "total quantity must be positive (got {total})")
            }
            Self::Density { region, source } => write!(f, "region {region}: {source}"),
        }
    }
}

impl std::error::Error for PartitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Density { source, .. } => Some(source),
            _ => None,
        }
    }
}
