use serde_json::json;

use map_sketcher_model::{EntityKind, Marker, Route, Vertex};

use crate::editor::{Mode, Phase, PointEditor, ShapeEditor, ShapeKind};
use crate::form::{DraftBody, EditForm};
use crate::layers::TileLayer;
use crate::notice::{NoticeKind, DISMISS_MS, NAVIGATE_DELAY_MS};
use crate::picker::EntityIndex;
use crate::{render, DEFAULT_CENTER, FOCUS_ZOOM};

fn v(lat: f64, lng: f64) -> Vertex {
    Vertex::new(lat, lng)
}

fn editor_with(kind: ShapeKind, points: &[Vertex]) -> ShapeEditor {
    let mut editor = ShapeEditor::new(kind);
    for point in points {
        editor.add_point(*point);
    }
    editor
}

#[test]
fn add_points_keeps_call_order() {
    let points = [v(0.0, 0.0), v(0.5, 0.5), v(1.0, 0.0), v(0.5, -0.5)];
    let editor = editor_with(ShapeKind::Line, &points);
    assert_eq!(editor.points(), &points);
}

#[test]
fn validity_tracks_the_shape_minimum() {
    let mut line = ShapeEditor::new(ShapeKind::Line);
    assert!(!line.is_valid());
    line.add_point(v(0.0, 0.0));
    assert!(!line.is_valid());
    line.add_point(v(1.0, 1.0));
    assert!(line.is_valid());

    let mut area = ShapeEditor::new(ShapeKind::Area);
    area.add_point(v(0.0, 0.0));
    area.add_point(v(0.0, 1.0));
    assert!(!area.is_valid());
    area.add_point(v(1.0, 0.0));
    assert!(area.is_valid());
}

#[test]
fn remove_at_the_minimum_is_refused() {
    let mut area = editor_with(ShapeKind::Area, &[v(0.0, 0.0), v(0.0, 1.0), v(1.0, 0.0)]);
    assert!(!area.remove_point(1));
    assert_eq!(area.points().len(), 3);

    let mut line = editor_with(ShapeKind::Line, &[v(0.0, 0.0), v(1.0, 1.0)]);
    assert!(!line.remove_point(0));
    assert_eq!(line.points().len(), 2);
}

#[test]
fn remove_above_the_minimum_shifts_the_tail() {
    let mut area = editor_with(
        ShapeKind::Area,
        &[v(0.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(1.0, 0.0)],
    );
    assert!(area.remove_point(1));
    assert_eq!(area.points(), &[v(0.0, 0.0), v(1.0, 1.0), v(1.0, 0.0)]);
}

#[test]
fn remove_out_of_bounds_is_a_noop() {
    let mut line = editor_with(ShapeKind::Line, &[v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0)]);
    assert!(!line.remove_point(3));
    assert_eq!(line.points().len(), 3);
}

#[test]
fn move_replaces_in_place_and_ignores_out_of_bounds() {
    let mut line = editor_with(ShapeKind::Line, &[v(0.0, 0.0), v(1.0, 1.0)]);
    assert!(line.move_point(0, v(5.0, 5.0)));
    assert_eq!(line.points(), &[v(5.0, 5.0), v(1.0, 1.0)]);

    assert!(!line.move_point(2, v(9.0, 9.0)));
    assert_eq!(line.points(), &[v(5.0, 5.0), v(1.0, 1.0)]);
}

#[test]
fn phase_walks_empty_partial_valid() {
    let mut line = ShapeEditor::new(ShapeKind::Line);
    assert_eq!(line.phase(), Phase::Empty);
    line.add_point(v(0.0, 0.0));
    assert_eq!(line.phase(), Phase::PartiallyDrawn);
    line.add_point(v(1.0, 1.0));
    assert_eq!(line.phase(), Phase::Valid);
}

#[test]
fn replace_all_below_minimum_enters_being_edited() {
    let mut area = ShapeEditor::new(ShapeKind::Area);
    area.replace_all(vec![v(0.0, 0.0), v(0.0, 1.0)]);
    assert_eq!(area.phase(), Phase::BeingEdited);
    assert!(!area.is_valid());

    // Still renders what it was given, untouched.
    assert_eq!(area.points(), &[v(0.0, 0.0), v(0.0, 1.0)]);

    // One more point satisfies the minimum and leaves the loaded state.
    area.add_point(v(1.0, 0.0));
    assert_eq!(area.phase(), Phase::Valid);
    assert!(!area.remove_point(0));
}

#[test]
fn replace_all_with_enough_points_is_immediately_valid() {
    let mut line = ShapeEditor::new(ShapeKind::Line);
    line.replace_all(vec![v(0.0, 0.0), v(1.0, 1.0), v(2.0, 0.0)]);
    assert_eq!(line.phase(), Phase::Valid);
}

#[test]
fn hover_and_drag_route_through_move() {
    let a = v(-8.40, 115.18);
    let b = v(-8.41, 115.20);
    let mut line = editor_with(ShapeKind::Line, &[a, b]);

    // Nowhere near a vertex: nothing to hover.
    assert!(!line.on_mouse_move(v(-8.60, 115.00), 10.0));
    assert_eq!(line.mode(), Mode::Neutral);

    // On top of the second vertex.
    assert!(line.on_mouse_move(b, 10.0));
    assert_eq!(line.mode(), Mode::Hovering(1));

    assert!(line.on_drag_start());
    let dropped = v(-8.42, 115.21);
    assert!(line.on_mouse_move(dropped, 10.0));
    assert!(line.on_drag_end(dropped));

    assert_eq!(line.points(), &[a, dropped]);
    assert_eq!(line.mode(), Mode::Hovering(1));
}

#[test]
fn drag_start_without_hover_does_not_hijack() {
    let mut line = editor_with(ShapeKind::Line, &[v(0.0, 0.0), v(1.0, 1.0)]);
    assert!(!line.on_drag_start());
}

#[test]
fn marker_point_replaces_unconditionally() {
    let mut marker = PointEditor::new(DEFAULT_CENTER);
    assert_eq!(marker.point(), DEFAULT_CENTER);
    marker.set_point(v(-8.5, 115.2));
    marker.set_point(v(-8.6, 115.3));
    assert_eq!(marker.point(), v(-8.6, 115.3));
}

// Viewport binding.

fn route(id: i64, name: &str, points: Vec<Vertex>) -> Route {
    Route {
        id,
        name: name.to_string(),
        description: String::new(),
        points,
    }
}

#[test]
fn focus_jumps_to_the_first_vertex() {
    let mut index = EntityIndex::new();
    index.replace_all(vec![
        route(1, "Pantai", vec![v(-8.4, 115.1), v(-8.5, 115.2)]),
        route(2, "Gunung", vec![v(-8.2, 115.4)]),
    ]);

    let command = index.focus(1).unwrap();
    assert_eq!(command.center, v(-8.4, 115.1));
    assert_eq!(command.zoom, FOCUS_ZOOM);
    assert_eq!(command.id, 1);
}

#[test]
fn focus_on_a_stale_id_changes_nothing() {
    let mut index = EntityIndex::new();
    index.replace_all(vec![route(1, "Pantai", vec![v(-8.4, 115.1)])]);
    assert!(index.focus(99).is_none());
}

#[test]
fn focus_on_an_empty_shape_changes_nothing() {
    let mut index = EntityIndex::new();
    index.replace_all(vec![route(1, "Kosong", Vec::new())]);
    assert!(index.focus(1).is_none());
}

#[test]
fn focus_on_a_marker_uses_its_point() {
    let mut index = EntityIndex::new();
    index.replace_all(vec![Marker {
        id: 5,
        name: "Pura".to_string(),
        description: String::new(),
        latitude: -8.3,
        longitude: 115.25,
    }]);
    assert_eq!(index.focus(5).unwrap().center, v(-8.3, 115.25));
}

// Form shell.

fn polygon_form() -> EditForm {
    let mut form = EditForm::new(EntityKind::Area, None);
    form.set_name("Sawah");
    form.set_description("Uji");
    form.map_click(v(0.0, 0.0));
    form.map_click(v(0.0, 1.0));
    form.map_click(v(1.0, 0.0));
    form
}

#[test]
fn polygon_payload_matches_the_wire_format() {
    let form = polygon_form();
    let DraftBody::Shape(draft) = form.payload().unwrap() else {
        panic!("polygon form must build a shape draft");
    };
    assert_eq!(
        serde_json::to_value(&draft).unwrap(),
        json!({
            "name": "Sawah",
            "description": "Uji",
            "points": [
                {"latitude": 0.0, "longitude": 0.0},
                {"latitude": 0.0, "longitude": 1.0},
                {"latitude": 1.0, "longitude": 0.0},
            ],
        })
    );
}

#[test]
fn payload_is_refused_below_the_minimum() {
    let mut form = EditForm::new(EntityKind::Route, None);
    form.map_click(v(0.0, 0.0));
    assert_eq!(
        form.payload().unwrap_err(),
        "Rute harus memiliki minimal 2 titik!"
    );

    let form = EditForm::new(EntityKind::Area, None);
    assert_eq!(
        form.payload().unwrap_err(),
        "Polygon harus memiliki minimal 3 titik!"
    );
}

#[test]
fn failed_create_keeps_the_form_for_retry() {
    let mut form = polygon_form();
    form.submit_failure("Gagal menambahkan rute", 1_000.0);

    let notice = form.notice(1_000.0).unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Gagal menambahkan rute");

    assert_eq!(form.name(), "Sawah");
    assert_eq!(form.description(), "Uji");
    assert_eq!(form.shape().unwrap().points().len(), 3);
}

#[test]
fn successful_create_clears_the_form() {
    let mut form = polygon_form();
    form.submit_success(1_000.0);

    let notice = form.notice(1_000.0).unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "Polygon berhasil ditambahkan!");

    assert_eq!(form.name(), "");
    assert_eq!(form.description(), "");
    assert_eq!(form.shape().unwrap().points().len(), 0);
    assert!(form.take_due_navigation(f64::MAX).is_none());
}

#[test]
fn successful_update_navigates_after_the_delay_and_not_before() {
    let mut form = EditForm::new(
        EntityKind::Route,
        Some("/dashboard/line/preview".to_string()),
    );
    form.load_shape(3, "Jalur", "", vec![v(0.0, 0.0), v(1.0, 1.0)]);
    form.set_description("diperbarui");

    form.submit_success(10_000.0);
    assert_eq!(
        form.notice(10_000.0).unwrap().text,
        "Rute berhasil diperbarui!"
    );

    assert!(form.take_due_navigation(10_000.0).is_none());
    assert!(form
        .take_due_navigation(10_000.0 + NAVIGATE_DELAY_MS - 1.0)
        .is_none());
    assert_eq!(
        form.take_due_navigation(10_000.0 + NAVIGATE_DELAY_MS)
            .as_deref(),
        Some("/dashboard/line/preview")
    );
    // Consumed: asking again yields nothing.
    assert!(form.take_due_navigation(f64::MAX).is_none());
}

#[test]
fn notices_expire_after_the_dismiss_delay() {
    let mut form = polygon_form();
    form.submit_failure("Gagal menambahkan polygon", 0.0);

    assert!(form.notice(DISMISS_MS - 1.0).is_some());
    assert!(form.notice(DISMISS_MS).is_none());
    // Stays gone.
    assert!(form.notice(0.0).is_none());
}

#[test]
fn loading_an_entity_resets_the_dirty_flag() {
    let mut form = EditForm::new(EntityKind::Route, None);
    form.set_name("draft");
    assert!(form.is_dirty());

    form.load_shape(7, "Jalur", "desc", vec![v(0.0, 0.0)]);
    assert!(!form.is_dirty());
    assert_eq!(form.editing_id(), Some(7));
    assert_eq!(form.shape().unwrap().phase(), Phase::BeingEdited);

    form.map_click(v(1.0, 1.0));
    assert!(form.is_dirty());
}

#[test]
fn context_action_respects_the_capture_guard() {
    let mut form = EditForm::new(EntityKind::Area, None);
    for point in [v(0.0, 0.0), v(0.0, 1.0), v(1.0, 0.0)] {
        form.map_click(point);
    }
    form.vertex_context_action(0);
    assert_eq!(form.shape().unwrap().points().len(), 3);

    form.map_click(v(1.0, 1.0));
    form.vertex_context_action(0);
    assert_eq!(form.shape().unwrap().points().len(), 3);
}

// Rendering.

#[test]
fn area_overlay_closes_the_ring() {
    let area = editor_with(ShapeKind::Area, &[v(0.0, 0.0), v(0.0, 1.0), v(1.0, 0.0)]);
    let geojson: serde_json::Value = serde_json::from_str(&render::shape_overlay(&area)).unwrap();

    let features = geojson["features"].as_array().unwrap();
    // Geometry first, then one point feature per vertex.
    assert_eq!(features.len(), 4);
    assert_eq!(features[0]["geometry"]["type"], "Polygon");

    let ring = features[0]["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 4);
    assert_eq!(ring.first(), ring.last());
}

#[test]
fn vertex_features_carry_their_index_and_hover_style() {
    let mut line = editor_with(ShapeKind::Line, &[v(-8.40, 115.18), v(-8.41, 115.20)]);
    line.on_mouse_move(v(-8.41, 115.20), 10.0);

    let geojson: serde_json::Value = serde_json::from_str(&render::shape_overlay(&line)).unwrap();
    let features = geojson["features"].as_array().unwrap();

    assert_eq!(features[0]["geometry"]["type"], "LineString");
    assert_eq!(features[1]["properties"]["role"], "vertex");
    assert_eq!(features[1]["properties"]["index"], 0);
    assert_eq!(features[2]["properties"]["role"], "hovered");
    assert_eq!(features[2]["properties"]["index"], 1);
}

#[test]
fn single_point_overlay_has_no_line_geometry() {
    let line = editor_with(ShapeKind::Line, &[v(0.0, 0.0)]);
    let geojson: serde_json::Value = serde_json::from_str(&render::shape_overlay(&line)).unwrap();
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Point");
}

#[test]
fn entity_overlay_carries_popup_fields_and_skips_empty_shapes() {
    let mut index = EntityIndex::new();
    index.replace_all(vec![
        route(1, "Pantai", vec![v(-8.4, 115.1), v(-8.5, 115.2)]),
        route(2, "Kosong", Vec::new()),
    ]);

    let geojson: serde_json::Value =
        serde_json::from_str(&render::entity_overlay(&index)).unwrap();
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["id"], 1);
    assert_eq!(features[0]["properties"]["name"], "Pantai");
    // GeoJSON positions are [lng, lat].
    assert_eq!(
        features[0]["geometry"]["coordinates"][0],
        json!([115.1, -8.4])
    );
}

// Tile layers.

#[test]
fn tile_layer_keys_round_trip() {
    for layer in TileLayer::ALL {
        assert_eq!(layer.key().parse::<TileLayer>().unwrap(), layer);
    }
    assert!("mapbox".parse::<TileLayer>().is_err());
}

#[test]
fn default_layer_is_openstreetmap() {
    assert_eq!(TileLayer::default(), TileLayer::Osm);
    assert!(TileLayer::default().url_template().contains("openstreetmap"));
}
