use serde::Deserialize;

use map_sketcher_model::EntityKind;

/// Compile-time default, overridable per deployment. The original screens
/// hard-coded a different host each; one value rules them all here.
const DEFAULT_BASE_URL: &str = match option_env!("MAP_SKETCHER_API") {
    Some(url) => url,
    None => "http://localhost:5000",
};

/// Where the backend lives. Deserializable so the embedding page can pass it
/// in at startup; missing fields fall back to the compiled default.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ApiConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn collection_url(&self, kind: EntityKind) -> String {
        self.endpoint(kind.path())
    }

    pub fn item_url(&self, kind: EntityKind, id: i64) -> String {
        format!("{}/{id}", self.collection_url(kind))
    }
}
