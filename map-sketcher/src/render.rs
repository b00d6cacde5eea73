//! GeoJSON output for the map's overlay layer.
//!
//! Vertices are emitted as point features the page can bind drag/context
//! handlers to; the `index` property carries the vertex's position so those
//! events can be routed back into the editor. Styles:
//!
//! 1) "hovered": the vertex under the cursor (or being dragged)
//! 2) "vertex": any other draggable vertex

use geo::{LineString, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use map_sketcher_model::{Entity, Shape, Vertex};

use crate::editor::{PointEditor, ShapeEditor, ShapeKind};
use crate::picker::EntityIndex;

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn props(entries: &[(&str, serde_json::Value)]) -> JsonObject {
    let mut map = JsonObject::new();
    for (key, value) in entries {
        map.insert((*key).to_string(), value.clone());
    }
    map
}

fn line_string(points: &[Vertex]) -> LineString<f64> {
    LineString::new(points.iter().map(|p| (*p).into()).collect())
}

/// Geometry for a vertex sequence: a line once two points exist, a closed
/// polygon once an area has three. Below that there is nothing to draw but
/// the vertices themselves.
fn sequence_geometry(kind: ShapeKind, points: &[Vertex]) -> Option<Value> {
    if points.len() < 2 {
        return None;
    }
    match kind {
        ShapeKind::Area if points.len() >= 3 => {
            // Polygon closes the ring itself; the sequence never stores a
            // duplicated closing vertex.
            let polygon = Polygon::new(line_string(points), Vec::new());
            Some(Value::from(&polygon))
        }
        _ => Some(Value::from(&line_string(points))),
    }
}

/// Overlay for a shape being captured: the geometry so far plus one point
/// feature per vertex.
pub fn shape_overlay(editor: &ShapeEditor) -> String {
    let mut features = Vec::new();

    if let Some(geometry) = sequence_geometry(editor.kind(), editor.points()) {
        features.push(feature(geometry, JsonObject::new()));
    }

    for (idx, point) in editor.points().iter().enumerate() {
        let role = if editor.hovered() == Some(idx) {
            "hovered"
        } else {
            "vertex"
        };
        features.push(feature(
            Value::from(&point.to_point()),
            props(&[("role", role.into()), ("index", idx.into())]),
        ));
    }

    collection(features)
}

/// Overlay for the single marker coordinate.
pub fn point_overlay(editor: &PointEditor) -> String {
    let features = vec![feature(
        Value::from(&editor.point().to_point()),
        props(&[("role", "marker".into())]),
    )];
    collection(features)
}

/// Overlay for a loaded entity list: one feature per entity, carrying the
/// fields its popup shows. Shapes without enough points to draw are skipped.
pub fn entity_overlay<E: Entity>(index: &EntityIndex<E>) -> String {
    let mut features = Vec::new();

    for entity in index.entities() {
        let geometry = match entity.shape() {
            Shape::Point(v) => Some(Value::from(&v.to_point())),
            Shape::Line(points) => sequence_geometry(ShapeKind::Line, points),
            Shape::Ring(points) => sequence_geometry(ShapeKind::Area, points),
        };
        let Some(geometry) = geometry else {
            continue;
        };
        features.push(feature(
            geometry,
            props(&[
                ("id", entity.id().into()),
                ("name", entity.name().into()),
                ("description", entity.description().into()),
            ]),
        ));
    }

    collection(features)
}

fn collection(features: Vec<Feature>) -> String {
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_string(&collection).unwrap()
}
