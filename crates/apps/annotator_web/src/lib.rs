use console_error_panic_hook::set_once;
use js_sys::Array;
use wasm_bindgen::prelude::*;

use annotations::FeatureMetadata;
use formats::Geometry;
use foundation::{DraftId, OverlayToken};
use session::{Collaborators, Session, SessionConfig};

mod dom;
mod hooks;

use dom::{BlobDownload, DomLoader};
use hooks::JsHooks;

const LOADER_ELEMENT_ID: &str = "loader";

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Annotation session driven by the page's event handlers.
#[wasm_bindgen]
pub struct Annotator {
    session: Session,
}

#[wasm_bindgen]
impl Annotator {
    /// `config_json` may be omitted to use the built-in deployment settings.
    #[wasm_bindgen(constructor)]
    pub fn new(hooks: JsValue, config_json: Option<String>) -> Result<Annotator, JsValue> {
        let config = match config_json {
            Some(json) => SessionConfig::from_json_str(&json).map_err(js_err)?,
            None => SessionConfig::default(),
        };
        let hooks = JsHooks::from_js(&hooks)?;
        let collab = Collaborators {
            map: Box::new(hooks.clone()),
            tiles: Box::new(hooks.clone()),
            chart: Box::new(hooks),
            loader: Box::new(DomLoader::new(LOADER_ELEMENT_ID)),
            export: Box::new(BlobDownload),
        };
        Ok(Annotator {
            session: Session::new(config, collab),
        })
    }

    /// Call once the map and chart exist, with the date picker's current value.
    pub fn start(&mut self, initial_date: Option<String>) {
        self.session.start(initial_date.as_deref());
    }

    /// Map set-up (centre, zoom, base layers) as JSON.
    #[wasm_bindgen(js_name = mapConfig)]
    pub fn map_config(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.config().map).map_err(js_err)
    }

    /// Values for the date picker, in ascending order.
    #[wasm_bindgen(js_name = dateKeys)]
    pub fn date_keys(&self) -> Array {
        self.session
            .config()
            .overlay
            .dates
            .keys()
            .map(JsValue::from_str)
            .collect()
    }

    /// A shape was drawn. `geometry_json` is `layer.toGeoJSON().geometry`, stringified.
    #[wasm_bindgen(js_name = beginShape)]
    pub fn begin_shape(&mut self, geometry_json: &str) -> Result<u64, JsValue> {
        let geometry = Geometry::from_geojson_str(geometry_json).map_err(js_err)?;
        Ok(self.session.begin_shape(geometry).get())
    }

    /// Commits a drawn shape with its prompt answers. A `null` answer is stored as empty text.
    ///
    /// Returns the new feature id, or `undefined` if the draft was already settled.
    #[wasm_bindgen(js_name = completeShape)]
    pub fn complete_shape(
        &mut self,
        draft: u64,
        area_name: Option<String>,
        issue_type: Option<String>,
        notes: Option<String>,
    ) -> Option<String> {
        let metadata = FeatureMetadata::new(
            area_name.unwrap_or_default(),
            issue_type.unwrap_or_default(),
            notes.unwrap_or_default(),
        );
        self.session
            .complete_shape(DraftId::new(draft), Some(metadata))
            .map(|f| f.id.to_string())
    }

    /// The user dismissed the prompts; the shape is dropped.
    #[wasm_bindgen(js_name = cancelShape)]
    pub fn cancel_shape(&mut self, draft: u64) {
        self.session.complete_shape(DraftId::new(draft), None);
    }

    /// Triggers the `features.geojson` download and returns the document.
    pub fn export(&mut self) -> Result<String, JsValue> {
        self.session.export().map_err(js_err)
    }

    #[wasm_bindgen(js_name = resetChart)]
    pub fn reset_chart(&mut self) {
        self.session.reset_chart();
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Current counts as `{"flood": n, "dark_spot": n}`.
    #[wasm_bindgen(js_name = countsJson)]
    pub fn counts_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.counts()).map_err(js_err)
    }

    /// Date picker `change` handler. Returns the overlay state name.
    #[wasm_bindgen(js_name = selectDate)]
    pub fn select_date(&mut self, value: Option<String>) -> String {
        self.session
            .select_date(value.as_deref())
            .as_str()
            .to_string()
    }

    #[wasm_bindgen(js_name = tilesLoaded)]
    pub fn tiles_loaded(&mut self, token: u32) -> String {
        self.session
            .tiles_loaded(OverlayToken::new(token))
            .as_str()
            .to_string()
    }

    #[wasm_bindgen(js_name = tileError)]
    pub fn tile_error(&mut self, token: u32) -> String {
        self.session
            .tile_error(OverlayToken::new(token))
            .as_str()
            .to_string()
    }
}
