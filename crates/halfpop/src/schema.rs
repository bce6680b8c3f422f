//! Output column declaration.

use crate::region::{AttrType, AttrValue, Dataset, SchemaError};

/// Declare `name` as an `int` attribute and set it to 0 on every region.
///
/// Consumes the dataset and returns the augmented one; geometry and all other
/// attributes are untouched. Fails with `DuplicateAttribute` if the schema
/// already declares `name`, leaving nothing half-applied.
pub fn add_output_column(dataset: Dataset, name: &str) -> Result<Dataset, SchemaError> {
    if dataset.schema().has_property(name) {
        return Err(SchemaError::DuplicateAttribute {
            name: name.to_string(),
        });
    }
    let (mut regions, mut schema) = dataset.into_parts();
    schema.properties.push((name.to_string(), AttrType::Int));
    for r in &mut regions {
        r.attributes.insert(name, AttrValue::Int(0));
    }
    Ok(Dataset::from_parts_unchecked(regions, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Polygon, Ring};
    use crate::region::{GeometryKind, Region, Schema};

    fn dataset() -> Dataset {
        let g = Geometry::Polygon(Polygon::new(
            Ring::from_xy(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            vec![],
        ));
        let regions = (0..3usize)
            .map(|i| {
                Region::new(
                    i,
                    g.clone(),
                    [("pop", AttrValue::Int(10 * i as i64))].into_iter().collect(),
                )
            })
            .collect();
        let schema = Schema::new("GeoJSON", Some("EPSG:3857".into()), GeometryKind::Polygon)
            .with_property("pop", AttrType::Int);
        Dataset::new(regions, schema).unwrap()
    }

    #[test]
    fn declares_int_and_defaults_to_zero() {
        let before = dataset();
        let out = add_output_column(before.clone(), "half").unwrap();
        assert_eq!(out.schema().property("half"), Some(AttrType::Int));
        assert_eq!(out.schema().crs.as_deref(), Some("EPSG:3857"));
        for (a, b) in before.regions().iter().zip(out.regions()) {
            assert_eq!(b.attributes.get("half"), Some(&AttrValue::Int(0)));
            assert_eq!(a.attributes.get("pop"), b.attributes.get("pop"));
            assert_eq!(a.geometry, b.geometry);
        }
        // Still consistent under full validation.
        let (regions, schema) = out.into_parts();
        assert!(Dataset::new(regions, schema).is_ok());
    }

    #[test]
    fn second_call_with_same_name_fails() {
        let once = add_output_column(dataset(), "half").unwrap();
        assert_eq!(
            add_output_column(once, "half"),
            Err(SchemaError::DuplicateAttribute {
                name: "half".into()
            })
        );
    }

    #[test]
    fn existing_input_column_cannot_be_reused() {
        assert!(matches!(
            add_output_column(dataset(), "pop"),
            Err(SchemaError::DuplicateAttribute { .. })
        ));
    }
}
