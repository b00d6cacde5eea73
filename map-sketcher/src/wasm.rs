//! Browser bindings. The JS map page owns the widgets and routing; these
//! exports own all state and logic.
//!
//! Sync objects (`JsEditForm`, `JsEntityIndex`, ...) are driven by map
//! events and re-render from their `renderGeojson()` output. Network calls
//! are free functions that resolve through a `done(err, value)` callback;
//! the page feeds the outcome back into the form with `resolveSuccess` /
//! `resolveFailure`. A list response that arrives after a newer request for
//! the same collection (or after logout) is dropped, never applied.

use std::cell::RefCell;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use map_sketcher_api::{ApiClient, ApiConfig, BrowserStore, FetchTransport, SessionStore};
use map_sketcher_model::{
    Area, Credentials, Entity, EntityKind, Marker, Registration, Route, Vertex,
};

use crate::editor::PointEditor;
use crate::form::{delete_success_text, DraftBody, EditForm};
use crate::layers::TileLayer;
use crate::notice::{NoticeBoard, DISMISS_MS, NAVIGATE_DELAY_MS};
use crate::picker::EntityIndex;
use crate::render;
use crate::{DEFAULT_CENTER, EDITOR_ZOOM, FIT_BOUNDS, FOCUS_ZOOM, PICKER_ZOOM};

thread_local! {
    static CONFIG: RefCell<ApiConfig> = RefCell::new(ApiConfig::default());
    // One counter per collection; a bump invalidates responses still in flight.
    static LIST_EPOCHS: RefCell<[u64; 3]> = const { RefCell::new([0; 3]) };
}

fn err_to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Serializes with JSON semantics so maps come out as plain JS objects, not
/// `Map` instances.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn client() -> ApiClient<FetchTransport> {
    ApiClient::new(CONFIG.with(|c| c.borrow().clone()), FetchTransport)
}

fn kind_slot(kind: EntityKind) -> usize {
    match kind {
        EntityKind::Marker => 0,
        EntityKind::Route => 1,
        EntityKind::Area => 2,
    }
}

fn bump_epoch(kind: EntityKind) -> u64 {
    LIST_EPOCHS.with(|epochs| {
        let mut epochs = epochs.borrow_mut();
        epochs[kind_slot(kind)] += 1;
        epochs[kind_slot(kind)]
    })
}

fn current_epoch(kind: EntityKind) -> u64 {
    LIST_EPOCHS.with(|epochs| epochs.borrow()[kind_slot(kind)])
}

/// Invokes `done(err, value)`; a callback that throws is the page's problem.
fn finish(done: &js_sys::Function, result: Result<JsValue, String>) {
    let _ = match result {
        Ok(value) => done.call2(&JsValue::NULL, &JsValue::NULL, &value),
        Err(message) => done.call2(
            &JsValue::NULL,
            &JsValue::from_str(&message),
            &JsValue::UNDEFINED,
        ),
    };
}

/// One-time setup: panic hook, console logging, backend location. An absent
/// or empty config keeps the compiled-in default.
#[wasm_bindgen(js_name = initApp)]
pub fn init_app(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if !config.is_undefined() && !config.is_null() {
        let parsed: ApiConfig = serde_wasm_bindgen::from_value(config).map_err(err_to_js)?;
        CONFIG.with(|c| *c.borrow_mut() = parsed);
    }
    log::info!(
        "map-sketcher ready, backend at {}",
        CONFIG.with(|c| c.borrow().base_url.clone())
    );
    Ok(())
}

/// Map and timing constants for the page: `{center, editorZoom, pickerZoom,
/// focusZoom, fitBounds, dismissMs, navigateDelayMs}`.
#[wasm_bindgen(js_name = mapDefaults)]
pub fn map_defaults() -> Result<JsValue, JsValue> {
    let defaults = serde_json::json!({
        "center": [DEFAULT_CENTER.latitude, DEFAULT_CENTER.longitude],
        "editorZoom": EDITOR_ZOOM,
        "pickerZoom": PICKER_ZOOM,
        "focusZoom": FOCUS_ZOOM,
        "fitBounds": [
            [FIT_BOUNDS[0].latitude, FIT_BOUNDS[0].longitude],
            [FIT_BOUNDS[1].latitude, FIT_BOUNDS[1].longitude],
        ],
        "dismissMs": DISMISS_MS,
        "navigateDelayMs": NAVIGATE_DELAY_MS,
    });
    to_js(&defaults).map_err(err_to_js)
}

/// The tile sources for the layer selector: `[{key, label, url}]`.
#[wasm_bindgen(js_name = tileLayers)]
pub fn tile_layers() -> Result<JsValue, JsValue> {
    let layers: Vec<serde_json::Value> = TileLayer::ALL
        .into_iter()
        .map(|layer| {
            serde_json::json!({
                "key": layer.key(),
                "label": layer.label(),
                "url": layer.url_template(),
            })
        })
        .collect();
    to_js(&layers).map_err(err_to_js)
}

// Network calls. Single-attempt, like every screen in the app: the user
// retries by hand if one fails.

async fn list_as_js<E: Entity + DeserializeOwned + Serialize>() -> Result<JsValue, String> {
    let entities = client()
        .collection::<E>()
        .list()
        .await
        .map_err(|err| err.message().to_string())?;
    to_js(&entities).map_err(|err| err.to_string())
}

async fn get_as_js<E: Entity + DeserializeOwned + Serialize>(id: i64) -> Result<JsValue, String> {
    let entity = client()
        .collection::<E>()
        .get(id)
        .await
        .map_err(|err| err.message().to_string())?;
    to_js(&entity).map_err(|err| err.to_string())
}

async fn mutate_as_js<E: Entity + DeserializeOwned>(
    id: Option<i64>,
    payload: JsValue,
) -> Result<JsValue, String>
where
    E::Draft: DeserializeOwned,
{
    let draft: E::Draft =
        serde_wasm_bindgen::from_value(payload).map_err(|err| err.to_string())?;
    let api = client();
    let echo = match id {
        Some(id) => api.collection::<E>().update(id, &draft).await,
        None => api.collection::<E>().create(&draft).await,
    }
    .map_err(|err| err.message().to_string())?;
    to_js(&echo).map_err(|err| err.to_string())
}

/// Fetches the full list for `kind`. Stale responses (superseded by a newer
/// call or a logout) are silently discarded instead of reaching the page.
#[wasm_bindgen(js_name = listEntities)]
pub fn list_entities(kind: String, done: js_sys::Function) -> Result<(), JsValue> {
    let kind = EntityKind::from_str(&kind).map_err(err_to_js)?;
    let epoch = bump_epoch(kind);
    spawn_local(async move {
        let result = match kind {
            EntityKind::Marker => list_as_js::<Marker>().await,
            EntityKind::Route => list_as_js::<Route>().await,
            EntityKind::Area => list_as_js::<Area>().await,
        };
        if current_epoch(kind) != epoch {
            log::info!("dropping stale {} list response", kind.path());
            return;
        }
        finish(&done, result);
    });
    Ok(())
}

#[wasm_bindgen(js_name = getEntity)]
pub fn get_entity(kind: String, id: f64, done: js_sys::Function) -> Result<(), JsValue> {
    let kind = EntityKind::from_str(&kind).map_err(err_to_js)?;
    let id = id as i64;
    spawn_local(async move {
        let result = match kind {
            EntityKind::Marker => get_as_js::<Marker>(id).await,
            EntityKind::Route => get_as_js::<Route>(id).await,
            EntityKind::Area => get_as_js::<Area>(id).await,
        };
        finish(&done, result);
    });
    Ok(())
}

#[wasm_bindgen(js_name = createEntity)]
pub fn create_entity(kind: String, payload: JsValue, done: js_sys::Function) -> Result<(), JsValue> {
    let kind = EntityKind::from_str(&kind).map_err(err_to_js)?;
    spawn_local(async move {
        let result = match kind {
            EntityKind::Marker => mutate_as_js::<Marker>(None, payload).await,
            EntityKind::Route => mutate_as_js::<Route>(None, payload).await,
            EntityKind::Area => mutate_as_js::<Area>(None, payload).await,
        };
        finish(&done, result);
    });
    Ok(())
}

#[wasm_bindgen(js_name = updateEntity)]
pub fn update_entity(
    kind: String,
    id: f64,
    payload: JsValue,
    done: js_sys::Function,
) -> Result<(), JsValue> {
    let kind = EntityKind::from_str(&kind).map_err(err_to_js)?;
    let id = id as i64;
    spawn_local(async move {
        let result = match kind {
            EntityKind::Marker => mutate_as_js::<Marker>(Some(id), payload).await,
            EntityKind::Route => mutate_as_js::<Route>(Some(id), payload).await,
            EntityKind::Area => mutate_as_js::<Area>(Some(id), payload).await,
        };
        finish(&done, result);
    });
    Ok(())
}

/// Deletes and, on success, hands the page the confirmation text to show.
#[wasm_bindgen(js_name = deleteEntity)]
pub fn delete_entity(kind: String, id: f64, done: js_sys::Function) -> Result<(), JsValue> {
    let kind = EntityKind::from_str(&kind).map_err(err_to_js)?;
    let id = id as i64;
    spawn_local(async move {
        let api = client();
        let outcome = match kind {
            EntityKind::Marker => api.collection::<Marker>().remove(id).await,
            EntityKind::Route => api.collection::<Route>().remove(id).await,
            EntityKind::Area => api.collection::<Area>().remove(id).await,
        };
        let result = outcome
            .map(|()| JsValue::from_str(&delete_success_text(kind)))
            .map_err(|err| err.message().to_string());
        finish(&done, result);
    });
    Ok(())
}

// Auth. The session lands in localStorage under `token`/`user` and stays
// there until logout.

#[wasm_bindgen]
pub fn login(email: String, password: String, done: js_sys::Function) {
    spawn_local(async move {
        let credentials = Credentials { email, password };
        let result = match client().login(&credentials).await {
            Ok(session) => {
                BrowserStore.save(&session);
                to_js(&session.user).map_err(|err| err.to_string())
            }
            Err(err) => Err(err.message().to_string()),
        };
        finish(&done, result);
    });
}

#[wasm_bindgen]
pub fn register(payload: JsValue, confirm_password: String, done: js_sys::Function) {
    let registration: Registration = match serde_wasm_bindgen::from_value(payload) {
        Ok(registration) => registration,
        Err(err) => {
            finish(&done, Err(err.to_string()));
            return;
        }
    };
    if let Err(message) = map_sketcher_api::validate_registration(&registration, &confirm_password)
    {
        finish(&done, Err(message.to_string()));
        return;
    }
    spawn_local(async move {
        let result = client()
            .register(&registration)
            .await
            .map(|()| JsValue::from_str("Registration successful! Redirecting to login..."))
            .map_err(|err| err.message().to_string());
        finish(&done, result);
    });
}

/// Clears the stored session and invalidates every in-flight list fetch.
#[wasm_bindgen]
pub fn logout() {
    BrowserStore.clear();
    for kind in [EntityKind::Marker, EntityKind::Route, EntityKind::Area] {
        bump_epoch(kind);
    }
}

/// The stored user object, or undefined when nobody is logged in.
#[wasm_bindgen(js_name = currentUser)]
pub fn current_user() -> JsValue {
    match BrowserStore.load() {
        Some(session) => {
            to_js(&session.user).unwrap_or(JsValue::UNDEFINED)
        }
        None => JsValue::UNDEFINED,
    }
}

/// One add/edit screen's worth of state: fields, capture controller,
/// notifications, post-success navigation.
#[wasm_bindgen]
pub struct JsEditForm {
    form: EditForm,
}

#[wasm_bindgen]
impl JsEditForm {
    /// `kind` is `"marker"`, `"route"` or `"polygon"`; `nav_target` is where
    /// the page should go after a successful update, if anywhere.
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, nav_target: Option<String>) -> Result<JsEditForm, JsValue> {
        let kind = EntityKind::from_str(kind).map_err(err_to_js)?;
        Ok(Self {
            form: EditForm::new(kind, nav_target),
        })
    }

    #[wasm_bindgen(js_name = setName)]
    pub fn set_name(&mut self, name: &str) {
        self.form.set_name(name);
    }

    #[wasm_bindgen(js_name = setDescription)]
    pub fn set_description(&mut self, description: &str) {
        self.form.set_description(description);
    }

    #[wasm_bindgen(js_name = setLayer)]
    pub fn set_layer(&mut self, key: &str) -> Result<(), JsValue> {
        let layer = TileLayer::from_str(key).map_err(err_to_js)?;
        self.form.set_layer(layer);
        Ok(())
    }

    /// Tile URL template for the currently chosen layer.
    #[wasm_bindgen(js_name = layerUrl)]
    pub fn layer_url(&self) -> String {
        self.form.layer().url_template().to_string()
    }

    #[wasm_bindgen(js_name = onClick)]
    pub fn on_click(&mut self, lat: f64, lng: f64) {
        self.form.map_click(Vertex::new(lat, lng));
    }

    #[wasm_bindgen(js_name = onDragEnd)]
    pub fn on_drag_end(&mut self, index: u32, lat: f64, lng: f64) {
        self.form.vertex_drag_end(index as usize, Vertex::new(lat, lng));
    }

    #[wasm_bindgen(js_name = onContextAction)]
    pub fn on_context_action(&mut self, index: u32) {
        self.form.vertex_context_action(index as usize);
    }

    /// True when the overlay should be redrawn.
    #[wasm_bindgen(js_name = onMouseMove)]
    pub fn on_mouse_move(&mut self, lat: f64, lng: f64, radius_meters: f64) -> bool {
        self.form.mouse_move(Vertex::new(lat, lng), radius_meters)
    }

    /// Loads a fetched entity (from `getEntity`) into the form for editing.
    #[wasm_bindgen(js_name = editExisting)]
    pub fn edit_existing(&mut self, entity: JsValue) -> Result<(), JsValue> {
        match self.form.kind() {
            EntityKind::Marker => {
                let marker: Marker =
                    serde_wasm_bindgen::from_value(entity).map_err(err_to_js)?;
                self.form.load_marker(&marker);
            }
            EntityKind::Route => {
                let route: Route = serde_wasm_bindgen::from_value(entity).map_err(err_to_js)?;
                self.form
                    .load_shape(route.id, &route.name, &route.description, route.points);
            }
            EntityKind::Area => {
                let area: Area = serde_wasm_bindgen::from_value(entity).map_err(err_to_js)?;
                self.form
                    .load_shape(area.id, &area.name, &area.description, area.points);
            }
        }
        Ok(())
    }

    #[wasm_bindgen(js_name = clearState)]
    pub fn clear_state(&mut self) {
        self.form.reset();
    }

    #[wasm_bindgen(js_name = isValid)]
    pub fn is_valid(&self) -> bool {
        self.form.is_valid()
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.form.is_dirty()
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> u32 {
        match self.form.shape() {
            Some(editor) => editor.points().len() as u32,
            None => 1,
        }
    }

    #[wasm_bindgen(js_name = editingId)]
    pub fn editing_id(&self) -> Option<f64> {
        self.form.editing_id().map(|id| id as f64)
    }

    #[wasm_bindgen(js_name = renderGeojson)]
    pub fn render_geojson(&self) -> String {
        self.form.overlay()
    }

    /// The request body for `createEntity`/`updateEntity`, or undefined when
    /// the geometry is below its minimum, in which case the validation
    /// notice is already posted and no request must be made.
    pub fn payload(&mut self, now_ms: f64) -> JsValue {
        let body = match self.form.payload() {
            Ok(body) => body,
            Err(message) => {
                self.form.submit_failure(message, now_ms);
                return JsValue::UNDEFINED;
            }
        };
        let encoded = match &body {
            DraftBody::Marker(draft) => to_js(draft),
            DraftBody::Shape(draft) => to_js(draft),
        };
        encoded.unwrap_or(JsValue::UNDEFINED)
    }

    #[wasm_bindgen(js_name = resolveSuccess)]
    pub fn resolve_success(&mut self, now_ms: f64) {
        self.form.submit_success(now_ms);
    }

    #[wasm_bindgen(js_name = resolveFailure)]
    pub fn resolve_failure(&mut self, message: &str, now_ms: f64) {
        self.form.submit_failure(message, now_ms);
    }

    /// `{text, kind}` or undefined once expired.
    #[wasm_bindgen(js_name = currentNotice)]
    pub fn current_notice(&mut self, now_ms: f64) -> JsValue {
        match self.form.notice(now_ms) {
            Some(notice) => to_js(&notice).unwrap_or(JsValue::UNDEFINED),
            None => JsValue::UNDEFINED,
        }
    }

    /// The route to navigate to, once the post-success delay has elapsed.
    #[wasm_bindgen(js_name = takeDueNavigation)]
    pub fn take_due_navigation(&mut self, now_ms: f64) -> Option<String> {
        self.form.take_due_navigation(now_ms)
    }
}

enum IndexKind {
    Marker(EntityIndex<Marker>),
    Route(EntityIndex<Route>),
    Area(EntityIndex<Area>),
}

/// The loaded entity list behind a pick-from-list screen.
#[wasm_bindgen]
pub struct JsEntityIndex {
    inner: IndexKind,
}

#[wasm_bindgen]
impl JsEntityIndex {
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str) -> Result<JsEntityIndex, JsValue> {
        let inner = match EntityKind::from_str(kind).map_err(err_to_js)? {
            EntityKind::Marker => IndexKind::Marker(EntityIndex::new()),
            EntityKind::Route => IndexKind::Route(EntityIndex::new()),
            EntityKind::Area => IndexKind::Area(EntityIndex::new()),
        };
        Ok(Self { inner })
    }

    /// Installs a list fetched via `listEntities`.
    #[wasm_bindgen(js_name = replaceAll)]
    pub fn replace_all(&mut self, entities: JsValue) -> Result<(), JsValue> {
        match &mut self.inner {
            IndexKind::Marker(index) => {
                index.replace_all(serde_wasm_bindgen::from_value(entities).map_err(err_to_js)?)
            }
            IndexKind::Route(index) => {
                index.replace_all(serde_wasm_bindgen::from_value(entities).map_err(err_to_js)?)
            }
            IndexKind::Area(index) => {
                index.replace_all(serde_wasm_bindgen::from_value(entities).map_err(err_to_js)?)
            }
        }
        Ok(())
    }

    /// `{center, zoom, id}` for a known id; undefined for a stale one, in
    /// which case the page leaves the viewport alone.
    pub fn select(&self, id: f64) -> JsValue {
        let command = match &self.inner {
            IndexKind::Marker(index) => index.focus(id as i64),
            IndexKind::Route(index) => index.focus(id as i64),
            IndexKind::Area(index) => index.focus(id as i64),
        };
        match command {
            Some(command) => to_js(&command).unwrap_or(JsValue::UNDEFINED),
            None => JsValue::UNDEFINED,
        }
    }

    #[wasm_bindgen(js_name = renderGeojson)]
    pub fn render_geojson(&self) -> String {
        match &self.inner {
            IndexKind::Marker(index) => render::entity_overlay(index),
            IndexKind::Route(index) => render::entity_overlay(index),
            IndexKind::Area(index) => render::entity_overlay(index),
        }
    }

    pub fn len(&self) -> u32 {
        let len = match &self.inner {
            IndexKind::Marker(index) => index.entities().len(),
            IndexKind::Route(index) => index.entities().len(),
            IndexKind::Area(index) => index.entities().len(),
        };
        len as u32
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Click-for-coordinates on the overview map; no form, no backend.
#[wasm_bindgen]
pub struct JsCoordPicker {
    editor: PointEditor,
}

#[wasm_bindgen]
impl JsCoordPicker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCoordPicker {
        Self {
            editor: PointEditor::new(DEFAULT_CENTER),
        }
    }

    #[wasm_bindgen(js_name = onClick)]
    pub fn on_click(&mut self, lat: f64, lng: f64) {
        self.editor.set_point(Vertex::new(lat, lng));
    }

    /// `[lat, lng]` of the picked coordinate.
    pub fn coordinates(&self) -> Vec<f64> {
        let point = self.editor.point();
        vec![point.latitude, point.longitude]
    }

    #[wasm_bindgen(js_name = renderGeojson)]
    pub fn render_geojson(&self) -> String {
        render::point_overlay(&self.editor)
    }
}

impl Default for JsCoordPicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifications for screens without a form (delete dashboards).
#[wasm_bindgen]
pub struct JsNoticeBoard {
    board: NoticeBoard,
}

#[wasm_bindgen]
impl JsNoticeBoard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsNoticeBoard {
        Self {
            board: NoticeBoard::default(),
        }
    }

    #[wasm_bindgen(js_name = postSuccess)]
    pub fn post_success(&mut self, text: &str, now_ms: f64) {
        self.board
            .post(text, crate::notice::NoticeKind::Success, now_ms);
    }

    #[wasm_bindgen(js_name = postError)]
    pub fn post_error(&mut self, text: &str, now_ms: f64) {
        self.board
            .post(text, crate::notice::NoticeKind::Error, now_ms);
    }

    pub fn current(&mut self, now_ms: f64) -> JsValue {
        match self.board.current(now_ms) {
            Some(notice) => to_js(notice).unwrap_or(JsValue::UNDEFINED),
            None => JsValue::UNDEFINED,
        }
    }
}

impl Default for JsNoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}
