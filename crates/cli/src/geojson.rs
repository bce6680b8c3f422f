//! GeoJSON FeatureCollection reader/writer.
//!
//! Reading yields a schema-consistent `Dataset`: attribute types are inferred
//! over all features (first-seen key order) and features lacking a key get
//! `null` for it. Only `Polygon` and `MultiPolygon` geometries are accepted.
//! The legacy named `crs` member is carried through to the output.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use halfpop::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const DRIVER: &str = "GeoJSON";

#[derive(Deserialize, Serialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crs: Option<Value>,
    features: Vec<Feature>,
}

#[derive(Deserialize, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize, Serialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type Positions = Vec<Vec<f64>>;

fn ring_from(positions: Positions) -> Result<Ring> {
    let pts = positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Vec2::new(*x, *y)),
            _ => Err(anyhow!("position has fewer than 2 ordinates")),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Ring::new(pts))
}

fn polygon_from(rings: Vec<Positions>) -> Result<Polygon> {
    let mut rings = rings.into_iter();
    let exterior = match rings.next() {
        Some(r) => ring_from(r)?,
        None => bail!("polygon has no exterior ring"),
    };
    let interiors = rings.map(ring_from).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn geometry_from(raw: RawGeometry) -> Result<Geometry> {
    match raw.kind.as_str() {
        "Polygon" => {
            let rings: Vec<Positions> = serde_json::from_value(raw.coordinates)?;
            Ok(Geometry::Polygon(polygon_from(rings)?))
        }
        "MultiPolygon" => {
            let parts: Vec<Vec<Positions>> = serde_json::from_value(raw.coordinates)?;
            let polys = parts
                .into_iter()
                .map(polygon_from)
                .collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiPolygon(polys))
        }
        other => bail!("unsupported geometry type {other} (expected Polygon or MultiPolygon)"),
    }
}

fn ring_coords(r: &Ring) -> Value {
    let pts: Vec<[f64; 2]> = r.closed().pts.iter().map(|p| [p.x, p.y]).collect();
    json!(pts)
}

fn polygon_coords(p: &Polygon) -> Value {
    Value::Array(p.rings().map(ring_coords).collect())
}

fn geometry_to_raw(g: &Geometry) -> RawGeometry {
    match g {
        Geometry::Polygon(p) => RawGeometry {
            kind: "Polygon".into(),
            coordinates: polygon_coords(p),
        },
        Geometry::MultiPolygon(ps) => RawGeometry {
            kind: "MultiPolygon".into(),
            coordinates: Value::Array(ps.iter().map(polygon_coords).collect()),
        },
    }
}

fn crs_name(crs: &Value) -> Option<String> {
    match (crs.get("type"), crs.pointer("/properties/name")) {
        (Some(Value::String(t)), Some(Value::String(name))) if t == "name" => Some(name.clone()),
        _ => None,
    }
}

/// Narrowest type that holds every non-null value seen for a key.
fn widen(seen: Option<AttrType>, v: &Value) -> Option<AttrType> {
    let this = match v {
        Value::Null => return seen,
        Value::Bool(_) => AttrType::Bool,
        Value::Number(n) if n.is_i64() => AttrType::Int,
        Value::Number(_) => AttrType::Float,
        _ => AttrType::Str,
    };
    Some(match (seen, this) {
        (None, t) => t,
        (Some(a), b) if a == b => a,
        (Some(AttrType::Int), AttrType::Float) | (Some(AttrType::Float), AttrType::Int) => {
            AttrType::Float
        }
        _ => AttrType::Str,
    })
}

fn attr_value(v: &Value, ty: AttrType) -> AttrValue {
    match (ty, v) {
        (_, Value::Null) => AttrValue::Null,
        (AttrType::Int, Value::Number(n)) => n.as_i64().map_or(AttrValue::Null, AttrValue::Int),
        (AttrType::Float, Value::Number(n)) => n.as_f64().map_or(AttrValue::Null, AttrValue::Float),
        (AttrType::Bool, Value::Bool(b)) => AttrValue::Bool(*b),
        (_, Value::String(s)) => AttrValue::Str(s.clone()),
        (_, other) => AttrValue::Str(other.to_string()),
    }
}

fn attr_json(v: &AttrValue) -> Value {
    match v {
        AttrValue::Null => Value::Null,
        AttrValue::Int(i) => json!(i),
        AttrValue::Float(x) => serde_json::Number::from_f64(*x).map_or(Value::Null, Value::Number),
        AttrValue::Str(s) => Value::String(s.clone()),
        AttrValue::Bool(b) => Value::Bool(*b),
    }
}

fn region_id(id: Option<&Value>, index: usize) -> Result<(RegionId, IdOrigin)> {
    match id {
        None | Some(Value::Null) => Ok((RegionId::from(index), IdOrigin::Absent)),
        Some(Value::String(s)) => Ok((RegionId::new(s.clone()), IdOrigin::Text)),
        Some(Value::Number(n)) => Ok((RegionId::new(n.to_string()), IdOrigin::Number)),
        Some(other) => bail!("feature {index}: id must be a string or number, got {other}"),
    }
}

/// The feature `id` member as it appeared on input; `None` omits it.
fn id_json(r: &Region) -> Result<Option<Value>> {
    Ok(match r.id_origin {
        IdOrigin::Absent => None,
        IdOrigin::Text => Some(Value::String(r.id.to_string())),
        IdOrigin::Number => {
            let n: serde_json::Number = r
                .id
                .as_str()
                .parse()
                .with_context(|| format!("feature {}: id is not a number", r.id))?;
            Some(Value::Number(n))
        }
    })
}

/// Parse a FeatureCollection document.
pub fn parse(text: &str) -> Result<Dataset> {
    let fc: FeatureCollection = serde_json::from_str(text).context("parsing GeoJSON")?;
    if fc.kind != "FeatureCollection" {
        bail!("expected a FeatureCollection, got {}", fc.kind);
    }
    let crs = match &fc.crs {
        Some(c) => {
            let name = crs_name(c);
            if name.is_none() {
                tracing::warn!(crs = %c, "unsupported crs member dropped");
            }
            name
        }
        None => None,
    };

    let mut types: Vec<(String, Option<AttrType>)> = Vec::new();
    for f in &fc.features {
        for (k, v) in f.properties.iter().flatten() {
            match types.iter_mut().find(|(name, _)| name == k) {
                Some((_, seen)) => *seen = widen(*seen, v),
                None => types.push((k.clone(), widen(None, v))),
            }
        }
    }
    let properties: Vec<(String, AttrType)> = types
        .into_iter()
        .map(|(k, t)| (k, t.unwrap_or(AttrType::Str)))
        .collect();

    let mut kinds = (false, false);
    let mut regions = Vec::with_capacity(fc.features.len());
    for (index, f) in fc.features.into_iter().enumerate() {
        let (id, id_origin) = region_id(f.id.as_ref(), index)?;
        let raw = f
            .geometry
            .ok_or_else(|| anyhow!("feature {id}: geometry is null"))?;
        let geometry = geometry_from(raw).with_context(|| format!("feature {id}"))?;
        match geometry {
            Geometry::Polygon(_) => kinds.0 = true,
            Geometry::MultiPolygon(_) => kinds.1 = true,
        }
        let props = f.properties.unwrap_or_default();
        let attributes: Attributes = properties
            .iter()
            .map(|(k, ty)| {
                let v = props.get(k).map_or(AttrValue::Null, |v| attr_value(v, *ty));
                (k.clone(), v)
            })
            .collect();
        regions.push(Region {
            id,
            id_origin,
            geometry,
            attributes,
        });
    }
    let kind = match kinds {
        (true, true) => GeometryKind::Any,
        (false, true) => GeometryKind::MultiPolygon,
        _ => GeometryKind::Polygon,
    };

    let mut schema = Schema::new(DRIVER, crs, kind);
    schema.properties = properties;
    Ok(Dataset::new(regions, schema)?)
}

/// Read `path` as a GeoJSON FeatureCollection.
pub fn open(path: &Path) -> Result<Dataset> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse(&text).with_context(|| format!("loading {}", path.display()))
}

/// Serialize a dataset; properties follow schema order.
pub fn render(dataset: &Dataset) -> Result<String> {
    let schema = dataset.schema();
    let crs = schema
        .crs
        .as_ref()
        .map(|name| json!({"type": "name", "properties": {"name": name}}));
    let features = dataset
        .regions()
        .iter()
        .map(|r| -> Result<Feature> {
            let properties: Map<String, Value> = schema
                .properties
                .iter()
                .map(|(k, _)| {
                    let v = r.attributes.get(k).map_or(Value::Null, attr_json);
                    (k.clone(), v)
                })
                .collect();
            Ok(Feature {
                kind: "Feature".into(),
                id: id_json(r)?,
                geometry: Some(geometry_to_raw(&r.geometry)),
                properties: Some(properties),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let fc = FeatureCollection {
        kind: "FeatureCollection".into(),
        crs,
        features,
    };
    Ok(serde_json::to_string(&fc)?)
}

/// Write `dataset` to `path`, creating parent directories. The document is
/// rendered completely before the file is touched.
pub fn write(path: &Path, dataset: &Dataset) -> Result<()> {
    let text = render(dataset)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
