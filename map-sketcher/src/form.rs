//! The edit session around a capture controller: name/description fields,
//! tile-layer choice, validation, and the notification/navigation follow-up
//! after a submit resolves.
//!
//! The form never talks to the network itself. The bridge asks it for a
//! payload, runs the request, and reports back through [`EditForm::submit_success`]
//! or [`EditForm::submit_failure`]; on failure every field keeps its value so
//! the user can retry.

use map_sketcher_model::{EntityKind, Marker, MarkerDraft, ShapeDraft, Vertex};

use crate::editor::{PointEditor, ShapeEditor, ShapeKind};
use crate::layers::TileLayer;
use crate::notice::{Notice, NoticeBoard, NoticeKind, NAVIGATE_DELAY_MS};
use crate::{render, DEFAULT_CENTER};

/// The capture controller backing a form: markers hold one point, routes and
/// areas a sequence.
pub enum Capture {
    Point(PointEditor),
    Shape(ShapeEditor),
}

impl Capture {
    fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Marker => Capture::Point(PointEditor::new(DEFAULT_CENTER)),
            EntityKind::Route => Capture::Shape(ShapeEditor::new(ShapeKind::Line)),
            EntityKind::Area => Capture::Shape(ShapeEditor::new(ShapeKind::Area)),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Capture::Point(_) => true,
            Capture::Shape(editor) => editor.is_valid(),
        }
    }
}

/// A validated request body, ready for the client.
#[derive(Debug)]
pub enum DraftBody {
    Marker(MarkerDraft),
    Shape(ShapeDraft),
}

pub struct EditForm {
    kind: EntityKind,
    name: String,
    description: String,
    layer: TileLayer,
    capture: Capture,
    dirty: bool,
    /// Id of the entity being edited; `None` while creating a new one.
    editing: Option<i64>,
    notices: NoticeBoard,
    /// Route to move to once the post-success delay elapses.
    nav_target: Option<String>,
    pending_nav: Option<(String, f64)>,
}

impl EditForm {
    pub fn new(kind: EntityKind, nav_target: Option<String>) -> Self {
        Self {
            kind,
            name: String::new(),
            description: String::new(),
            layer: TileLayer::default(),
            capture: Capture::for_kind(kind),
            dirty: false,
            editing: None,
            notices: NoticeBoard::default(),
            nav_target,
            pending_nav: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.dirty = true;
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
        self.dirty = true;
    }

    pub fn layer(&self) -> TileLayer {
        self.layer
    }

    /// Layer choice only changes what the map shows; it never dirties the
    /// session.
    pub fn set_layer(&mut self, layer: TileLayer) {
        self.layer = layer;
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    pub fn shape(&self) -> Option<&ShapeEditor> {
        match &self.capture {
            Capture::Shape(editor) => Some(editor),
            Capture::Point(_) => None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing
    }

    pub fn is_valid(&self) -> bool {
        self.capture.is_valid()
    }

    // Map events, routed into the capture controller.

    pub fn map_click(&mut self, at: Vertex) {
        match &mut self.capture {
            Capture::Point(editor) => editor.set_point(at),
            Capture::Shape(editor) => editor.add_point(at),
        }
        self.dirty = true;
    }

    pub fn vertex_drag_end(&mut self, idx: usize, to: Vertex) {
        if let Capture::Shape(editor) = &mut self.capture {
            if editor.move_point(idx, to) {
                self.dirty = true;
            }
        }
    }

    pub fn vertex_context_action(&mut self, idx: usize) {
        if let Capture::Shape(editor) = &mut self.capture {
            if editor.remove_point(idx) {
                self.dirty = true;
            }
        }
    }

    pub fn mouse_move(&mut self, at: Vertex, radius_meters: f64) -> bool {
        match &mut self.capture {
            Capture::Shape(editor) => editor.on_mouse_move(at, radius_meters),
            Capture::Point(_) => false,
        }
    }

    /// Begins an edit session over a fetched marker.
    pub fn load_marker(&mut self, marker: &Marker) {
        self.name = marker.name.clone();
        self.description = marker.description.clone();
        self.capture = Capture::Point(PointEditor::new(Vertex::new(
            marker.latitude,
            marker.longitude,
        )));
        self.editing = Some(marker.id);
        self.dirty = false;
    }

    /// Begins an edit session over a fetched route or area. The sequence is
    /// installed verbatim even when it's below the shape minimum.
    pub fn load_shape(&mut self, id: i64, name: &str, description: &str, points: Vec<Vertex>) {
        self.name = name.to_string();
        self.description = description.to_string();
        if let Capture::Shape(editor) = &mut self.capture {
            editor.replace_all(points);
        }
        self.editing = Some(id);
        self.dirty = false;
    }

    /// Builds the request body, or the validation message that should be
    /// shown instead. No request may be issued on `Err`.
    pub fn payload(&self) -> Result<DraftBody, &'static str> {
        match &self.capture {
            Capture::Point(editor) => {
                let point = editor.point();
                Ok(DraftBody::Marker(MarkerDraft {
                    name: self.name.clone(),
                    latitude: point.latitude,
                    longitude: point.longitude,
                    description: self.description.clone(),
                }))
            }
            Capture::Shape(editor) => {
                if !editor.is_valid() {
                    return Err(editor.kind().too_few_points_message());
                }
                Ok(DraftBody::Shape(ShapeDraft {
                    name: self.name.clone(),
                    description: self.description.clone(),
                    points: editor.points().to_vec(),
                }))
            }
        }
    }

    /// Success path: notification, then either a cleared form (create) or a
    /// scheduled navigation (update).
    pub fn submit_success(&mut self, now_ms: f64) {
        let updating = self.editing.is_some();
        self.notices
            .post(success_text(self.kind, updating), NoticeKind::Success, now_ms);
        self.dirty = false;

        if updating {
            if let Some(target) = &self.nav_target {
                self.pending_nav = Some((target.clone(), now_ms + NAVIGATE_DELAY_MS));
            }
        } else {
            self.name.clear();
            self.description.clear();
            self.capture = Capture::for_kind(self.kind);
        }
    }

    /// Discards the session: fields, geometry, pending notifications and
    /// navigation. The kind and navigation target survive.
    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        self.capture = Capture::for_kind(self.kind);
        self.dirty = false;
        self.editing = None;
        self.notices.clear();
        self.pending_nav = None;
    }

    /// Failure path, shared by client-side validation refusals and backend
    /// rejections: an error notification, everything else untouched.
    pub fn submit_failure(&mut self, message: &str, now_ms: f64) {
        self.notices.post(message, NoticeKind::Error, now_ms);
    }

    pub fn notice(&mut self, now_ms: f64) -> Option<Notice> {
        self.notices.current(now_ms).cloned()
    }

    /// The navigation scheduled by a successful update, once its delay has
    /// elapsed, and not before. Consumed on return.
    pub fn take_due_navigation(&mut self, now_ms: f64) -> Option<String> {
        let (_, due) = self.pending_nav.as_ref()?;
        if now_ms < *due {
            return None;
        }
        self.pending_nav.take().map(|(target, _)| target)
    }

    /// GeoJSON for the capture overlay.
    pub fn overlay(&self) -> String {
        match &self.capture {
            Capture::Point(editor) => render::point_overlay(editor),
            Capture::Shape(editor) => render::shape_overlay(editor),
        }
    }
}

fn success_text(kind: EntityKind, updating: bool) -> &'static str {
    match (kind, updating) {
        (EntityKind::Marker, false) => "Marker berhasil ditambahkan!",
        (EntityKind::Route, false) => "Rute berhasil ditambahkan!",
        (EntityKind::Area, false) => "Polygon berhasil ditambahkan!",
        (EntityKind::Marker, true) => "Marker berhasil diperbarui!",
        (EntityKind::Route, true) => "Rute berhasil diperbarui!",
        (EntityKind::Area, true) => "Data berhasil diperbarui!",
    }
}

/// Notification shown after a delete succeeds.
pub fn delete_success_text(kind: EntityKind) -> String {
    let noun = match kind {
        EntityKind::Marker => "Marker",
        EntityKind::Route => "Rute",
        EntityKind::Area => "Polygon",
    };
    format!("{noun} berhasil dihapus!")
}
