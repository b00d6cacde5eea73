//! Geometry capture: turns map interaction into an ordered vertex sequence.
//!
//! One [`ShapeEditor`] lives per edit session and is thrown away with it.
//! All mutation goes through its operations; callers render from
//! [`ShapeEditor::points`] and must never write to the sequence directly.

use map_sketcher_model::Vertex;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates. Plenty accurate for
/// hit-testing a cursor against vertices a few meters apart.
pub(crate) fn distance_meters(a: Vertex, b: Vertex) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShapeKind {
    Line,
    Area,
}

impl ShapeKind {
    /// Fewest vertices that make the shape submittable.
    pub fn min_points(self) -> usize {
        match self {
            ShapeKind::Line => 2,
            ShapeKind::Area => 3,
        }
    }

    /// Validation text shown when a submit is attempted below the minimum.
    pub fn too_few_points_message(self) -> &'static str {
        match self {
            ShapeKind::Line => "Rute harus memiliki minimal 2 titik!",
            ShapeKind::Area => "Polygon harus memiliki minimal 3 titik!",
        }
    }
}

/// Lifecycle of the captured sequence. `BeingEdited` marks a server-loaded
/// shape that hasn't reached the minimum yet; once it does, the usual
/// `Valid`/`PartiallyDrawn` cycle takes over.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Empty,
    PartiallyDrawn,
    Valid,
    BeingEdited,
}

/// What the cursor is doing to the shape right now. Only affects rendering
/// styles and drag routing, never validity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Neutral,
    Hovering(usize),
    Dragging(usize),
}

pub struct ShapeEditor {
    kind: ShapeKind,
    points: Vec<Vertex>,
    mode: Mode,
    // Set by replace_all, cleared the first time the sequence becomes valid.
    loaded_below_min: bool,
}

impl ShapeEditor {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
            mode: Mode::Neutral,
            loaded_below_min: false,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The live ordered sequence, for rendering and payload construction.
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    pub fn is_valid(&self) -> bool {
        self.points.len() >= self.kind.min_points()
    }

    pub fn phase(&self) -> Phase {
        if self.is_valid() {
            Phase::Valid
        } else if self.loaded_below_min {
            Phase::BeingEdited
        } else if self.points.is_empty() {
            Phase::Empty
        } else {
            Phase::PartiallyDrawn
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn hovered(&self) -> Option<usize> {
        match self.mode {
            Mode::Hovering(idx) | Mode::Dragging(idx) => Some(idx),
            Mode::Neutral => None,
        }
    }

    /// Appends a vertex. No upper bound on length.
    pub fn add_point(&mut self, at: Vertex) {
        self.points.push(at);
        self.settle();
    }

    /// Replaces the vertex at `idx` in place. Out of bounds is a silent no-op.
    pub fn move_point(&mut self, idx: usize, to: Vertex) -> bool {
        let Some(slot) = self.points.get_mut(idx) else {
            return false;
        };
        *slot = to;
        self.settle();
        true
    }

    /// Removes the vertex at `idx`, shifting the tail down. Refused when the
    /// sequence would drop below the shape's minimum. The guard lives here,
    /// not in callers.
    pub fn remove_point(&mut self, idx: usize) -> bool {
        if idx >= self.points.len() || self.points.len() <= self.kind.min_points() {
            return false;
        }
        self.points.remove(idx);
        self.mode = Mode::Neutral;
        true
    }

    /// Installs a server-loaded sequence verbatim, even one below the
    /// minimum. The screen still renders it; submission stays blocked until
    /// enough points exist.
    pub fn replace_all(&mut self, points: Vec<Vertex>) {
        self.loaded_below_min = points.len() < self.kind.min_points();
        self.points = points;
        self.mode = Mode::Neutral;
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.mode = Mode::Neutral;
        self.loaded_below_min = false;
    }

    /// Hit-tests the cursor against the vertices and updates the interaction
    /// mode. While dragging, the grabbed vertex follows the cursor. Returns
    /// true when the overlay should be redrawn.
    pub fn on_mouse_move(&mut self, at: Vertex, radius_meters: f64) -> bool {
        match self.mode {
            Mode::Dragging(idx) => self.move_point(idx, at),
            Mode::Neutral => {
                if let Some(idx) = self.hit_test(at, radius_meters) {
                    self.mode = Mode::Hovering(idx);
                    return true;
                }
                false
            }
            Mode::Hovering(_) => {
                self.mode = match self.hit_test(at, radius_meters) {
                    Some(idx) => Mode::Hovering(idx),
                    None => Mode::Neutral,
                };
                true
            }
        }
    }

    /// True if the map's own pan handling should be suppressed for this drag.
    pub fn on_drag_start(&mut self) -> bool {
        if let Mode::Hovering(idx) = self.mode {
            self.mode = Mode::Dragging(idx);
            return true;
        }
        false
    }

    /// Drops the vertex at the final position and ends the drag.
    pub fn on_drag_end(&mut self, at: Vertex) -> bool {
        let Mode::Dragging(idx) = self.mode else {
            return false;
        };
        self.move_point(idx, at);
        self.mode = Mode::Hovering(idx);
        true
    }

    fn hit_test(&self, at: Vertex, radius_meters: f64) -> Option<usize> {
        let (idx, nearest) = self
            .points
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx, distance_meters(*p, at)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))?;
        (nearest <= radius_meters).then_some(idx)
    }

    fn settle(&mut self) {
        if self.is_valid() {
            self.loaded_below_min = false;
        }
    }
}

/// Single-coordinate capture for markers. There is no minimum-count concept:
/// the editor always holds exactly one point and replacing it is
/// unconditional.
pub struct PointEditor {
    point: Vertex,
}

impl PointEditor {
    pub fn new(start: Vertex) -> Self {
        Self { point: start }
    }

    pub fn point(&self) -> Vertex {
        self.point
    }

    pub fn set_point(&mut self, at: Vertex) {
        self.point = at;
    }
}
