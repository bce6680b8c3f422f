use std::cmp::Ordering;

use super::types::{Allocation, PartitionCfg, PartitionError, Stop, TieBreak};
use crate::density::{density_of, RegionDensity};
use crate::region::{AttrValue, Dataset, Region, RegionId};
use crate::report::Split;

/// Outcome of the walk over quantities already in processing order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Walk {
    /// Length of the included prefix of the processing order.
    pub included: usize,
    /// Sum of the included quantities.
    pub so_far: f64,
    pub stop: Stop,
}

/// Region indices sorted by density ascending.
///
/// The sort is stable: after the optional id key, equal densities keep input
/// order. `+inf` densities (zero-area regions under `SortLast`) go last.
pub fn processing_order(
    densities: &[f64],
    ids: &[&RegionId],
    tie_break: TieBreak,
) -> Vec<usize> {
    debug_assert_eq!(densities.len(), ids.len());
    let mut order: Vec<usize> = (0..densities.len()).collect();
    order.sort_by(|&a, &b| {
        densities[a]
            .total_cmp(&densities[b])
            .then_with(|| match tie_break {
                TieBreak::InputOrder => Ordering::Equal,
                TieBreak::Id => ids[a].cmp(ids[b]),
            })
    });
    order
}

/// Greedy walk towards `half` over `values` (processing order).
///
/// Each step compares `so_far + v` with `half` under `f64::total_cmp`, so the
/// three cases are exhaustive. Stops at the first value that reaches or
/// crosses `half`; a crossing value is kept only if that lands strictly closer
/// to `half` than leaving it out.
pub fn walk(values: &[f64], half: f64) -> Walk {
    let mut so_far = 0.0;
    for (step, &v) in values.iter().enumerate() {
        let next = so_far + v;
        match next.total_cmp(&half) {
            Ordering::Less => so_far = next,
            Ordering::Equal => {
                return Walk {
                    included: step + 1,
                    so_far: next,
                    stop: Stop::ExactHalf { step },
                }
            }
            Ordering::Greater => {
                let overshoot = next - half;
                let undershoot = half - so_far;
                let include = overshoot < undershoot;
                return Walk {
                    included: if include { step + 1 } else { step },
                    so_far: if include { next } else { so_far },
                    stop: Stop::Crossed {
                        step,
                        included: include,
                    },
                };
            }
        }
    }
    Walk {
        included: values.len(),
        so_far,
        stop: Stop::Exhausted,
    }
}

fn quantity_of(region: &Region, name: &str) -> Result<f64, PartitionError> {
    let v = region
        .attributes
        .get(name)
        .and_then(AttrValue::as_f64)
        .ok_or_else(|| PartitionError::NonNumericQuantity {
            region: region.id.clone(),
            name: name.to_string(),
        })?;
    if !v.is_finite() {
        return Err(PartitionError::NonFiniteQuantity {
            region: region.id.clone(),
        });
    }
    Ok(v)
}

/// Label every region of `dataset` with 1 (first half) or 0 in `output`.
///
/// Pre: `output` was declared by `schema::add_output_column`; `quantity` is a
/// declared numeric attribute; the quantities sum to a positive total.
/// All validation happens before any label is written, so an error never
/// yields a partially labelled dataset. Every region's label is written exactly
/// once, regardless of its prior value.
pub fn allocate(
    dataset: Dataset,
    quantity: &str,
    output: &str,
    cfg: PartitionCfg,
) -> Result<Allocation, PartitionError> {
    let schema = dataset.schema();
    if !schema.has_property(quantity) {
        return Err(PartitionError::UnknownQuantity {
            name: quantity.to_string(),
        });
    }
    if !schema.has_property(output) {
        return Err(PartitionError::UnknownOutputColumn {
            name: output.to_string(),
        });
    }

    let regions = dataset.regions();
    let quantities = regions
        .iter()
        .map(|r| quantity_of(r, quantity))
        .collect::<Result<Vec<f64>, _>>()?;
    let total: f64 = quantities.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Err(PartitionError::NonPositiveTotal { total });
    }

    let densities = regions
        .iter()
        .zip(&quantities)
        .map(|(r, &q)| {
            density_of(q, &r.geometry, cfg.zero_area).map_err(|source| {
                PartitionError::Density {
                    region: r.id.clone(),
                    source,
                }
            })
        })
        .collect::<Result<Vec<RegionDensity>, _>>()?;

    let keys: Vec<f64> = densities.iter().map(|d| d.density).collect();
    let ids: Vec<&RegionId> = regions.iter().map(|r| &r.id).collect();
    let order = processing_order(&keys, &ids, cfg.tie_break);

    let ordered: Vec<f64> = order.iter().map(|&i| quantities[i]).collect();
    let half = total / 2.0;
    let w = walk(&ordered, half);

    let mut first_half = vec![false; regions.len()];
    for &i in &order[..w.included] {
        first_half[i] = true;
    }

    let (mut regions, schema) = dataset.into_parts();
    for (r, &selected) in regions.iter_mut().zip(&first_half) {
        r.attributes.insert(output, AttrValue::Int(i64::from(selected)));
    }

    Ok(Allocation {
        dataset: Dataset::from_parts_unchecked(regions, schema),
        split: Split::new(total, w.so_far),
        quantities,
        densities,
        order,
        first_half,
        stop: w.stop,
    })
}
