//! The tile sources the layer selector offers. The client only hands the URL
//! template to the map widget; the providers are external collaborators.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileLayer {
    #[default]
    Osm,
    Satellite,
    Terrain,
    Google,
    GoogleHybrid,
}

impl TileLayer {
    pub const ALL: [TileLayer; 5] = [
        TileLayer::Osm,
        TileLayer::Satellite,
        TileLayer::Terrain,
        TileLayer::Google,
        TileLayer::GoogleHybrid,
    ];

    /// Value used by the form's `<select>`.
    pub fn key(self) -> &'static str {
        match self {
            TileLayer::Osm => "osm",
            TileLayer::Satellite => "satellite",
            TileLayer::Terrain => "terrain",
            TileLayer::Google => "google",
            TileLayer::GoogleHybrid => "googleHybrid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TileLayer::Osm => "OpenStreetMap",
            TileLayer::Satellite => "Satellite (ArcGIS)",
            TileLayer::Terrain => "Topographic",
            TileLayer::Google => "Google Maps",
            TileLayer::GoogleHybrid => "Google Hybrid",
        }
    }

    pub fn url_template(self) -> &'static str {
        match self {
            TileLayer::Osm => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            TileLayer::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            TileLayer::Terrain => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            TileLayer::Google => "https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}",
            TileLayer::GoogleHybrid => "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}",
        }
    }
}

impl std::str::FromStr for TileLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TileLayer::ALL
            .into_iter()
            .find(|layer| layer.key() == s)
            .ok_or_else(|| format!("unknown tile layer: {s}"))
    }
}
