//! Entity list plus viewport binding: picking an entity from the list jumps
//! the map to it and opens its popup.

use serde::Serialize;

use map_sketcher_model::{Entity, Vertex};

use crate::FOCUS_ZOOM;

/// Instruction for the map widget: recenter, zoom, open the popup for `id`.
#[derive(Serialize, Clone, Copy, PartialEq, Debug)]
pub struct ViewCommand {
    pub center: Vertex,
    pub zoom: f64,
    /// Entity whose popup should open after the jump.
    pub id: i64,
}

/// The currently loaded list for one entity kind. Screens refill it on every
/// activation; there is deliberately no caching layer behind it.
pub struct EntityIndex<E> {
    entities: Vec<E>,
}

impl<E: Entity> EntityIndex<E> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    pub fn replace_all(&mut self, entities: Vec<E>) {
        self.entities = entities;
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn get(&self, id: i64) -> Option<&E> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// Resolves a selection to a viewport jump. A stale id (not in the loaded
    /// list) or an entity without coordinates resolves to `None`: the prior
    /// view stays put and nothing errors.
    pub fn focus(&self, id: i64) -> Option<ViewCommand> {
        let entity = self.get(id)?;
        let center = entity.anchor()?;
        Some(ViewCommand {
            center,
            zoom: FOCUS_ZOOM,
            id,
        })
    }
}

impl<E: Entity> Default for EntityIndex<E> {
    fn default() -> Self {
        Self::new()
    }
}
