//! Shared data model for the map-sketcher crates: the entities owned by the
//! GIS backend, the request bodies sent back to it, and the auth payloads.
//!
//! Field names mirror the backend's JSON exactly; anything the server sends
//! beyond these fields is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// One latitude/longitude pair. Ordering inside a sequence is meaningful;
/// a vertex has no identity beyond its position and index.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Vertex {
    pub latitude: f64,
    pub longitude: f64,
}

impl Vertex {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl From<Vertex> for geo::Coord<f64> {
    fn from(v: Vertex) -> Self {
        geo::Coord {
            x: v.longitude,
            y: v.latitude,
        }
    }
}

/// The three entity collections the backend serves.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntityKind {
    Marker,
    Route,
    Area,
}

impl EntityKind {
    /// URL path segment for the collection.
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::Marker => "markers",
            EntityKind::Route => "routes",
            EntityKind::Area => "polygons",
        }
    }

    /// The noun used in user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Marker => "marker",
            EntityKind::Route => "rute",
            EntityKind::Area => "polygon",
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marker" | "markers" => Ok(EntityKind::Marker),
            "route" | "routes" | "line" => Ok(EntityKind::Route),
            "area" | "polygon" | "polygons" => Ok(EntityKind::Area),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

/// Borrowed view of an entity's geometry, uniform across kinds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Shape<'a> {
    Point(Vertex),
    Line(&'a [Vertex]),
    Ring(&'a [Vertex]),
}

/// A persisted domain object owned by the backend. The client only ever holds
/// a transient copy of one.
pub trait Entity {
    const KIND: EntityKind;

    /// Request body for create/update calls (everything but the id).
    type Draft: Serialize;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn shape(&self) -> Shape<'_>;

    /// Representative coordinate: the single point for markers, the first
    /// vertex for routes and areas. `None` for an empty sequence.
    fn anchor(&self) -> Option<Vertex> {
        match self.shape() {
            Shape::Point(v) => Some(v),
            Shape::Line(pts) | Shape::Ring(pts) => pts.first().copied(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Marker {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Entity for Marker {
    const KIND: EntityKind = EntityKind::Marker;
    type Draft = MarkerDraft;

    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Point(Vertex::new(self.latitude, self.longitude))
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Route {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub points: Vec<Vertex>,
}

impl Entity for Route {
    const KIND: EntityKind = EntityKind::Route;
    type Draft = ShapeDraft;

    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Line(&self.points)
    }
}

/// A closed region. `points` holds the ring vertices without a duplicated
/// closing vertex; closing is the renderer's job.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Area {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub points: Vec<Vertex>,
}

impl Entity for Area {
    const KIND: EntityKind = EntityKind::Area;
    type Draft = ShapeDraft;

    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn shape(&self) -> Shape<'_> {
        Shape::Ring(&self.points)
    }
}

/// Create/update body for markers.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct MarkerDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

/// Create/update body for routes and areas. Outgoing points carry only the
/// coordinate pair, even when the server's copy had extra per-point fields.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ShapeDraft {
    pub name: String,
    pub description: String,
    pub points: Vec<Vertex>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Registration {
    /// The backend expects this exact field name.
    #[serde(rename = "nama_lengkap")]
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct TokenResponse {
    pub token: String,
}

/// The authenticated user as returned by `GET /users`. The backend's schema
/// is not under our control, so unrecognized fields are kept verbatim.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nama_lengkap", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Token plus user object, as stored client-side between login and logout.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}
