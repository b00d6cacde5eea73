//! Client core for a map dashboard: interactive geometry capture for
//! markers, routes and polygon areas, an entity index that drives the map
//! viewport, and the form/notification shell around create/update/delete
//! calls to the GIS backend.
//!
//! The crate compiles to WebAssembly and is driven by a JS map page through
//! the bindings in [`wasm`]; everything else is plain Rust and runs (and is
//! tested) natively. GeoJSON strings flow out for the map to render.

use map_sketcher_model::Vertex;

pub mod editor;
pub mod form;
pub mod layers;
pub mod notice;
pub mod picker;
pub mod render;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(test)]
mod tests;

/// Where every screen starts out: central Bali.
pub const DEFAULT_CENTER: Vertex = Vertex {
    latitude: -8.409518,
    longitude: 115.188919,
};

/// Initial zoom for capture screens.
pub const EDITOR_ZOOM: f64 = 12.0;

/// Initial zoom for pick-from-list screens.
pub const PICKER_ZOOM: f64 = 10.0;

/// Zoom applied when the viewport jumps to a selected entity.
pub const FOCUS_ZOOM: f64 = 14.0;

/// Southwest / northeast corners the overview map fits itself to.
pub const FIT_BOUNDS: [Vertex; 2] = [
    Vertex {
        latitude: -8.75,
        longitude: 114.9,
    },
    Vertex {
        latitude: -8.1,
        longitude: 115.5,
    },
];
