//! Regions, attribute values, and the dataset schema descriptor.
//!
//! A `Dataset` pairs an ordered list of `Region`s with a `Schema`. The two must
//! agree: every attribute key on a region is declared in the schema and every
//! declared attribute is present on every region. `Dataset::new` checks this;
//! the transforms in `schema` and `partition` preserve it.

use std::cmp::Ordering;
use std::fmt;

use crate::geometry::Geometry;

/// Stable region identifier, unique within a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(pub String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<usize> for RegionId {
    fn from(i: usize) -> Self {
        Self(i.to_string())
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialOrd for RegionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric ids ("2" < "10") compare as numbers; anything else lexicographically.
/// Numeric ids sort before non-numeric ones.
impl Ord for RegionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

/// Declared attribute type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrType {
    Int,
    Float,
    Str,
    Bool,
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttrType::Int => "int",
            AttrType::Float => "float",
            AttrType::Str => "str",
            AttrType::Bool => "bool",
        };
        f.write_str(s)
    }
}

/// Attribute value carried by a region.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl AttrValue {
    /// Numeric view used for the quantity being halved.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            AttrValue::Int(i) => Some(i as f64),
            AttrValue::Float(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            AttrValue::Int(i) => Some(i),
            _ => None,
        }
    }
}

/// Insertion-ordered attribute map. Small per region, so a linear scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite; new keys go to the end.
    pub fn insert(&mut self, key: impl Into<String>, value: AttrValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

}

impl<K: Into<String>> FromIterator<(K, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttrValue)>>(iter: I) -> Self {
        let mut out = Attributes::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

/// How a region's id appeared in the source record, so writers can emit it
/// the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdOrigin {
    #[default]
    Text,
    Number,
    /// No id in the source; the id is the record's position.
    Absent,
}

/// One input record.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub id_origin: IdOrigin,
    pub geometry: Geometry,
    pub attributes: Attributes,
}

impl Region {
    pub fn new(id: impl Into<RegionId>, geometry: Geometry, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            id_origin: IdOrigin::Text,
            geometry,
            attributes,
        }
    }
}

/// Geometry type recorded in the schema descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
    /// Mixed `Polygon`/`MultiPolygon` features.
    Any,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::Any => "Unknown",
        };
        f.write_str(s)
    }
}

/// Format/CRS/attribute descriptor travelling with the records.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    /// Storage driver identifier, e.g. `"GeoJSON"`.
    pub driver: String,
    /// Coordinate reference system identifier, if the source declared one.
    pub crs: Option<String>,
    pub geometry: GeometryKind,
    /// Attribute name → type, in declaration order.
    pub properties: Vec<(String, AttrType)>,
}

impl Schema {
    pub fn new(driver: impl Into<String>, crs: Option<String>, geometry: GeometryKind) -> Self {
        Self {
            driver: driver.into(),
            crs,
            geometry,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, ty: AttrType) -> Self {
        self.properties.push((name.into(), ty));
        self
    }

    pub fn property(&self, name: &str) -> Option<AttrType> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}

/// Schema/record consistency errors.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaError {
    /// The attribute to add already exists.
    DuplicateAttribute { name: String },
    /// A region carries a key the schema does not declare.
    Undeclared { region: RegionId, name: String },
    /// A region lacks a key the schema declares.
    Missing { region: RegionId, name: String },
    /// Two regions share an id.
    DuplicateId { region: RegionId },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateAttribute { name } => {
                write!(f, "attribute '{name}' already exists in the schema")
            }
            SchemaError::Undeclared { region, name } => write!(
                f,
                "region {region} has attribute '{name}' which the schema does not declare"
            ),
            SchemaError::Missing { region, name } => {
                write!(f, "region {region} lacks declared attribute '{name}'")
            }
            SchemaError::DuplicateId { region } => write!(f, "region id {region} is not unique"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Regions plus their schema descriptor, kept mutually consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    regions: Vec<Region>,
    schema: Schema,
}

impl Dataset {
    /// Validate and assemble. Fails on the first inconsistency found.
    pub fn new(regions: Vec<Region>, schema: Schema) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::with_capacity(regions.len());
        for r in &regions {
            if !seen.insert(&r.id) {
                return Err(SchemaError::DuplicateId {
                    region: r.id.clone(),
                });
            }
            if let Some(k) = r.attributes.keys().find(|k| !schema.has_property(k)) {
                return Err(SchemaError::Undeclared {
                    region: r.id.clone(),
                    name: k.to_string(),
                });
            }
            if let Some((name, _)) = schema
                .properties
                .iter()
                .find(|(n, _)| !r.attributes.contains(n))
            {
                return Err(SchemaError::Missing {
                    region: r.id.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(Self { regions, schema })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Region>, Schema) {
        (self.regions, self.schema)
    }

    /// Crate-internal constructor for transforms that preserve consistency.
    pub(crate) fn from_parts_unchecked(regions: Vec<Region>, schema: Schema) -> Self {
        Self { regions, schema }
    }
}
