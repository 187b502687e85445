use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{dbase::{FieldValue, Record}, Reader, Shape};

use crate::{config::ZoneColumns, error::ZoneError, types::{ZoneFeature, ZoneLayer}};

/// Reads a polygon shapefile and its `.dbf` attributes into zone features.
/// The CRS is the raw WKT of the sibling `.prj` file, if any.
pub fn read_zone_layer(path: &Path, columns: &ZoneColumns) -> Result<ZoneLayer<MultiPolygon<f64>>> {
    let mut reader = Reader::from_path(path)
        .map_err(|e| ZoneError::invalid_source(path.display().to_string(), e.to_string()))?;

    let mut features = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record in {}", path.display()))?;
        let geometry = shape_to_multipolygon(shape)
            .with_context(|| format!("[io::shp] Bad geometry for feature {} in {}", features.len(), path.display()))?;
        features.push(record_to_zone(&record, columns, geometry)
            .with_context(|| format!("[io::shp] Bad attributes for feature {} in {}", features.len(), path.display()))?);
    }

    let crs = fs::read_to_string(path.with_extension("prj")).ok()
        .map(|wkt| wkt.trim().to_string())
        .filter(|wkt| !wkt.is_empty());

    Ok(ZoneLayer { features, crs })
}

fn record_to_zone(record: &Record, columns: &ZoneColumns, geometry: MultiPolygon<f64>) -> Result<ZoneFeature<MultiPolygon<f64>>> {
    Ok(ZoneFeature {
        object_id_1: get_integer_field(record, &columns.object_id_1)?,
        object_id: get_integer_field(record, &columns.object_id)?,
        zone_id: get_character_field(record, &columns.zone_id)?,
        zone_name: get_character_field(record, &columns.zone_name)?,
        world_abc: get_character_field(record, &columns.world_abc)?,
        province: get_character_field(record, &columns.province)?,
        country: get_character_field(record, &columns.country)?,
        region: get_character_field(record, &columns.region)?,
        population: get_numeric_field(record, &columns.population)?,
        geometry,
    })
}

/// Get a field as text; numeric identifiers are rendered without a fractional part.
fn get_character_field(record: &Record, field: &str) -> Result<String> {
    match record.get(field) {
        Some(FieldValue::Character(s)) => Ok(s.as_deref().unwrap_or_default().trim().to_string()),
        Some(FieldValue::Integer(n)) => Ok(n.to_string()),
        Some(FieldValue::Numeric(Some(n))) if n.fract() == 0.0 => Ok(format!("{}", *n as i64)),
        Some(FieldValue::Numeric(Some(n))) => Ok(n.to_string()),
        Some(FieldValue::Numeric(None)) => Ok(String::new()),
        _ => bail!("missing or invalid character field: {}", field)
    }
}

/// Get a field as a float.
fn get_numeric_field(record: &Record, field: &str) -> Result<f64> {
    match record.get(field) {
        Some(FieldValue::Numeric(Some(n))) => Ok(*n),
        Some(FieldValue::Double(n)) => Ok(*n),
        Some(FieldValue::Float(Some(n))) => Ok(f64::from(*n)),
        Some(FieldValue::Integer(n)) => Ok(f64::from(*n)),
        Some(FieldValue::Character(Some(s))) => s.trim().parse()
            .with_context(|| format!("non-numeric value {s:?} in field: {field}")),
        _ => bail!("missing or invalid numeric field: {}", field)
    }
}

/// Get a field as an integer.
fn get_integer_field(record: &Record, field: &str) -> Result<i64> {
    match record.get(field) {
        Some(FieldValue::Integer(n)) => Ok(i64::from(*n)),
        _ => Ok(get_numeric_field(record, field)?.trunc() as i64),
    }
}

/// Coerce a generic shape into an owned multipolygon, raising error if different shape
fn shape_to_multipolygon(shape: Shape) -> Result<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(polygon) => Ok(shp_to_geo(&polygon)),
        Shape::NullShape => Ok(MultiPolygon(Vec::new())),
        other => bail!("found non-Polygon shape in layer: {:?}", other.shapetype())
    }
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>
fn shp_to_geo(p: &shapefile::Polygon) -> MultiPolygon<f64> {
    let mut polys = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    // Shapefile stores each outer ring followed by its holes.
    for ring in p.rings() {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        if coords.first() != coords.last() { coords.push(coords[0]) }

        if signed_area(&coords) < 0.0 { // clockwise => outer ring
            if let Some(ext) = exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(LineString(coords));
        } else {
            holes.push(LineString(coords));
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

/// Shoelace area of a closed ring (negative for clockwise).
fn signed_area(pts: &[Coord<f64>]) -> f64 {
    pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::{Point, PolygonRing};

    fn square(x0: f64, y0: f64, size: f64, clockwise: bool) -> Vec<Point> {
        let mut pts = vec![
            Point::new(x0, y0),
            Point::new(x0 + size, y0),
            Point::new(x0 + size, y0 + size),
            Point::new(x0, y0 + size),
            Point::new(x0, y0),
        ];
        if clockwise { pts.reverse() }
        pts
    }

    #[test]
    fn groups_holes_with_their_outer_ring() {
        let polygon = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0, true)),
            PolygonRing::Inner(square(2.0, 2.0, 2.0, false)),
            PolygonRing::Outer(square(20.0, 0.0, 5.0, true)),
        ]);

        let mp = shp_to_geo(&polygon);
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.0[1].interiors().is_empty());
    }

    #[test]
    fn null_shapes_become_empty() {
        assert!(shape_to_multipolygon(Shape::NullShape).unwrap().0.is_empty());
        assert!(shape_to_multipolygon(Shape::Point(Point::new(0.0, 0.0))).is_err());
    }

    #[test]
    fn reads_attribute_fields() {
        let mut record = Record::default();
        record.insert("Zone_Name".to_string(), FieldValue::Character(Some(" Z1 ".to_string())));
        record.insert("WorldID".to_string(), FieldValue::Numeric(Some(1234.0)));
        record.insert("Population".to_string(), FieldValue::Numeric(Some(1500.5)));
        record.insert("OBJECTID".to_string(), FieldValue::Integer(12));
        record.insert("Empty".to_string(), FieldValue::Numeric(None));

        assert_eq!(get_character_field(&record, "Zone_Name").unwrap(), "Z1");
        assert_eq!(get_character_field(&record, "WorldID").unwrap(), "1234");
        assert_eq!(get_numeric_field(&record, "Population").unwrap(), 1500.5);
        assert_eq!(get_integer_field(&record, "OBJECTID").unwrap(), 12);
        assert!(get_numeric_field(&record, "Empty").is_err());
        assert!(get_character_field(&record, "Missing").is_err());
    }

    #[test]
    fn missing_file_is_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_zone_layer(&dir.path().join("none.shp"), &ZoneColumns::default()).unwrap_err();
        assert!(matches!(err.downcast_ref::<ZoneError>(), Some(ZoneError::InvalidSource { .. })));
    }
}
