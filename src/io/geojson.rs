use std::{fs, io::Write, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};

use crate::{
    config::ZoneColumns,
    error::ZoneError,
    io::{open_for_write, PendingWrite},
    types::{AttrValue, OutputRecord, ZoneFeature, ZoneLayer, OUTPUT_FIELDS},
};

/// Reads a GeoJSON FeatureCollection of (Multi)Polygon zones.
pub fn read_zone_layer(path: &Path, columns: &ZoneColumns) -> Result<ZoneLayer<MultiPolygon<f64>>> {
    let bytes = fs::read(path)
        .map_err(|e| ZoneError::invalid_source(path.display().to_string(), e.to_string()))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ZoneError::invalid_source(path.display().to_string(), e.to_string()))?;
    zone_layer_from_geojson(&value)
        .and_then(|layer| layer_with_columns(layer, columns))
        .with_context(|| format!("[io::geojson] Failed to read zones from {}", path.display()))
}

/// Raw features (geometry + properties) and CRS of a FeatureCollection.
struct RawLayer {
    features: Vec<(MultiPolygon<f64>, Map<String, Value>)>,
    crs: Option<String>,
}

fn zone_layer_from_geojson(value: &Value) -> Result<RawLayer> {
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("expected a FeatureCollection with a features array"))?;

    let features = features.iter()
        .map(|feature| -> Result<(MultiPolygon<f64>, Map<String, Value>)> {
            let geometry = match &feature["geometry"] {
                Value::Null => MultiPolygon(Vec::new()),
                geometry => geometry_to_multipolygon(geometry)?,
            };
            let properties = feature["properties"].as_object().cloned().unwrap_or_default();
            Ok((geometry, properties))
        })
        .collect::<Result<Vec<_>>>()?;

    // Legacy named CRS member, e.g. {"type": "name", "properties": {"name": "EPSG:4326"}}.
    let crs = value["crs"]["properties"]["name"].as_str().map(str::to_string);

    Ok(RawLayer { features, crs })
}

fn layer_with_columns(raw: RawLayer, columns: &ZoneColumns) -> Result<ZoneLayer<MultiPolygon<f64>>> {
    let features = raw.features.into_iter().enumerate()
        .map(|(idx, (geometry, props))| {
            properties_to_zone(&props, columns, geometry).with_context(|| format!("feature {idx}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ZoneLayer { features, crs: raw.crs })
}

fn properties_to_zone(
    props: &Map<String, Value>,
    columns: &ZoneColumns,
    geometry: MultiPolygon<f64>,
) -> Result<ZoneFeature<MultiPolygon<f64>>> {
    Ok(ZoneFeature {
        object_id_1: get_number(props, &columns.object_id_1)?.trunc() as i64,
        object_id: get_number(props, &columns.object_id)?.trunc() as i64,
        zone_id: get_text(props, &columns.zone_id)?,
        zone_name: get_text(props, &columns.zone_name)?,
        world_abc: get_text(props, &columns.world_abc)?,
        province: get_text(props, &columns.province)?,
        country: get_text(props, &columns.country)?,
        region: get_text(props, &columns.region)?,
        population: get_number(props, &columns.population)?,
        geometry,
    })
}

fn get_text(props: &Map<String, Value>, field: &str) -> Result<String> {
    match props.get(field) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Null) => Ok(String::new()),
        _ => bail!("missing or invalid text property: {}", field),
    }
}

fn get_number(props: &Map<String, Value>, field: &str) -> Result<f64> {
    match props.get(field) {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| anyhow!("invalid number in property: {}", field)),
        Some(Value::String(s)) => s.trim().parse()
            .with_context(|| format!("non-numeric value {s:?} in property: {field}")),
        _ => bail!("missing or invalid numeric property: {}", field),
    }
}

/// Parse a GeoJSON Polygon or MultiPolygon geometry.
fn geometry_to_multipolygon(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("geometry is missing coordinates"))?;
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => Ok(MultiPolygon(coords.iter()
            .map(|polygon| polygon.as_array()
                .ok_or_else(|| anyhow!("invalid MultiPolygon member"))
                .and_then(|rings| parse_polygon(rings)))
            .collect::<Result<Vec<_>>>()?)),
        other => bail!("unsupported geometry type: {:?}", other),
    }
}

/// Parse polygon rings: exterior first, then holes.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter()
        .map(|ring| ring.as_array()
            .ok_or_else(|| anyhow!("invalid polygon ring"))
            .and_then(|coords| parse_ring_coords(coords)));
    let exterior = rings.next().ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    Ok(Polygon::new(exterior, rings.collect::<Result<Vec<_>>>()?))
}

/// Parse a ring from GeoJSON coordinates: [[x, y], [x, y], ...]
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|pair| -> Result<Coord<f64>> {
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    // Ensure ring is closed (first point == last point)
    if points.first() != points.last() { points.push(points[0]) }

    Ok(LineString(points))
}

fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let ring = |ls: &LineString<f64>| ls.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>();
    let polygons = mp.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring)
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();
    json!({ "type": "MultiPolygon", "coordinates": polygons })
}

fn attr_to_json(value: AttrValue) -> Value {
    match value {
        AttrValue::Int(v) => v.map_or(Value::Null, |v| json!(v)),
        AttrValue::Double(v) => v.map_or(Value::Null, |v| json!(v)),
        AttrValue::Text(v) => v.map_or(Value::Null, Value::String),
    }
}

/// Export output records as a GeoJSON FeatureCollection; properties follow `OUTPUT_FIELDS`.
pub fn output_to_geojson(records: &[OutputRecord<MultiPolygon<f64>>], crs: Option<&str>) -> Value {
    let features = records.iter()
        .map(|record| {
            let properties = OUTPUT_FIELDS.iter()
                .zip(record.attributes())
                .map(|(field, value)| (field.name.to_string(), attr_to_json(value)))
                .collect::<Map<_, _>>();
            json!({
                "type": "Feature",
                "geometry": multipolygon_to_geojson(&record.geometry),
                "properties": properties,
            })
        })
        .collect::<Vec<_>>();

    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let Some(crs) = crs {
        collection["crs"] = json!({ "type": "name", "properties": { "name": crs } });
    }
    collection
}

/// Serialize the output layer as GeoJSON into `writer`.
pub fn write_geojson<W: Write>(records: &[OutputRecord<MultiPolygon<f64>>], crs: Option<&str>, mut writer: W) -> Result<()> {
    serde_json::to_writer(&mut writer, &output_to_geojson(records, crs))
        .context("[io::geojson] Failed to serialize GeoJSON")?;
    writer.flush()?;
    Ok(())
}

/// Write the output layer as GeoJSON to `path`, atomically.
pub fn write_output(records: &[OutputRecord<MultiPolygon<f64>>], crs: Option<&str>, path: &Path, force: bool) -> Result<()> {
    let mut pending: PendingWrite = open_for_write(path, force)?;
    write_geojson(records, crs, &mut pending)?;
    pending.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_json(name: &str, population: Value) -> Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
            },
            "properties": {
                "OBJECTID_1": 1, "OBJECTID": 2, "WorldID": 5001, "Zone_Name": name,
                "World": "B", "Adm1_Name": "North", "Cnty_Name": "Chad",
                "RegionYWAM": "Africa", "Population": population
            }
        })
    }

    #[test]
    fn reads_polygon_zones() {
        let value = json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "EPSG:4326" } },
            "features": [zone_json("Z1", json!(1200.5)), zone_json("Z2", json!("300"))]
        });
        let layer = layer_with_columns(zone_layer_from_geojson(&value).unwrap(), &ZoneColumns::default()).unwrap();

        assert_eq!(layer.crs.as_deref(), Some("EPSG:4326"));
        assert_eq!(layer.features.len(), 2);
        let z1 = &layer.features[0];
        assert_eq!(z1.zone_id, "5001");
        assert_eq!(z1.zone_name, "Z1");
        assert_eq!(z1.population, 1200.5);
        assert_eq!(layer.features[1].population, 300.0);

        // Ring is closed on read.
        assert_eq!(z1.geometry.0[0].exterior().0.len(), 5);
    }

    #[test]
    fn missing_population_is_an_error() {
        let value = json!({ "type": "FeatureCollection", "features": [zone_json("Z1", Value::Null)] });
        let raw = zone_layer_from_geojson(&value).unwrap();
        assert!(layer_with_columns(raw, &ZoneColumns::default()).is_err());
    }

    #[test]
    fn multipolygon_round_trips_through_output() {
        let geometry = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]], [[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]],
                [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 5.0]]]
            ]
        });
        let mp = geometry_to_multipolygon(&geometry).unwrap();
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert_eq!(multipolygon_to_geojson(&mp), geometry);
    }

    #[test]
    fn output_properties_follow_schema_order() {
        let zone = ZoneFeature {
            object_id_1: 1,
            object_id: 2,
            zone_id: "W1".into(),
            zone_name: "Z1".into(),
            world_abc: "A".into(),
            province: "P".into(),
            country: "Country1".into(),
            region: "R".into(),
            population: 10.0,
            geometry: MultiPolygon(Vec::new()),
        };
        let mut hidden = OutputRecord::from_zone(zone);
        hidden.redact();

        let value = output_to_geojson(&[hidden], Some("EPSG:4326"));
        let props = value["features"][0]["properties"].as_object().unwrap();
        let keys: Vec<_> = props.keys().map(String::as_str).collect();
        let expected: Vec<_> = OUTPUT_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(keys, expected);
        assert_eq!(props["Number UBL"], Value::Null);
        assert_eq!(props["Language Details"], Value::Null);
        assert_eq!(props["Population"], json!(10.0));
        assert_eq!(value["crs"]["properties"]["name"], "EPSG:4326");
    }
}
