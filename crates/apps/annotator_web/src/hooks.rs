use annotations::{AnnotatedFeature, FeatureStyle, SummaryCounts};
use foundation::{LonLatBounds, OverlayToken};
use js_sys::{Array, Function, Object, Reflect};
use overlay::{OverlayRequest, WmsSource};
use session::{ChartRenderer, MapView, TileService};
use wasm_bindgen::{JsCast, JsValue};

/// Callbacks supplied by the page's Leaflet / Chart.js glue.
///
/// Expected members of the hooks object:
/// - `fitBounds(south, west, north, east)`
/// - `showFeature(id, color | null, areaName, issueType, notes)`: attach the
///   layer that was just drawn (the glue keeps it while the prompts run)
/// - `clearFeatures()`
/// - `addOverlay(token, url, options)`: `options` is a Leaflet WMS option bag;
///   the glue must call `tilesLoaded(token)` / `tileError(token)` on the annotator
/// - `removeOverlay(token)`
/// - `renderChart(labels, values)`
/// - `resetChart()`
#[derive(Clone)]
pub struct JsHooks {
    fit_bounds: Function,
    show_feature: Function,
    clear_features: Function,
    add_overlay: Function,
    remove_overlay: Function,
    render_chart: Function,
    reset_chart: Function,
}

fn hook(hooks: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(hooks, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("hooks.{name} must be a function")))
}

fn report(name: &str, result: Result<JsValue, JsValue>) {
    if let Err(err) = result {
        web_sys::console::warn_1(&JsValue::from_str(&format!("{name} hook failed: {err:?}")));
    }
}

impl JsHooks {
    pub fn from_js(hooks: &JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            fit_bounds: hook(hooks, "fitBounds")?,
            show_feature: hook(hooks, "showFeature")?,
            clear_features: hook(hooks, "clearFeatures")?,
            add_overlay: hook(hooks, "addOverlay")?,
            remove_overlay: hook(hooks, "removeOverlay")?,
            render_chart: hook(hooks, "renderChart")?,
            reset_chart: hook(hooks, "resetChart")?,
        })
    }
}

impl MapView for JsHooks {
    fn fit_bounds(&mut self, bounds: LonLatBounds) {
        let args = Array::of4(
            &bounds.south.into(),
            &bounds.west.into(),
            &bounds.north.into(),
            &bounds.east.into(),
        );
        report("fitBounds", self.fit_bounds.apply(&JsValue::NULL, &args));
    }

    fn show_feature(&mut self, feature: &AnnotatedFeature, style: FeatureStyle) {
        let color = style.color.map(JsValue::from_str).unwrap_or(JsValue::NULL);
        let args = Array::of5(
            &JsValue::from_str(&feature.id.to_string()),
            &color,
            &JsValue::from_str(&feature.area_name),
            &JsValue::from_str(&feature.issue_type),
            &JsValue::from_str(&feature.notes),
        );
        report("showFeature", self.show_feature.apply(&JsValue::NULL, &args));
    }

    fn clear_features(&mut self) {
        report("clearFeatures", self.clear_features.call0(&JsValue::NULL));
    }
}

impl TileService for JsHooks {
    fn add_overlay(&mut self, request: &OverlayRequest, source: &WmsSource) {
        let options = match wms_options(request, source) {
            Ok(options) => options,
            Err(err) => {
                report("addOverlay", Err(err));
                return;
            }
        };
        report(
            "addOverlay",
            self.add_overlay.call3(
                &JsValue::NULL,
                &request.token.get().into(),
                &JsValue::from_str(&source.url),
                &options,
            ),
        );
    }

    fn remove_overlay(&mut self, token: OverlayToken) {
        report(
            "removeOverlay",
            self.remove_overlay.call1(&JsValue::NULL, &token.get().into()),
        );
    }
}

impl ChartRenderer for JsHooks {
    fn render(&mut self, counts: &SummaryCounts) {
        let labels: Array = SummaryCounts::labels()
            .iter()
            .map(|l| JsValue::from_str(l))
            .collect();
        let values: Array = counts
            .series()
            .iter()
            .map(|v| JsValue::from(*v))
            .collect();
        report(
            "renderChart",
            self.render_chart.call2(&JsValue::NULL, &labels, &values),
        );
    }

    fn reset(&mut self) {
        report("resetChart", self.reset_chart.call0(&JsValue::NULL));
    }
}

/// WMS query parameters plus the Leaflet layer options that are not part of the query.
fn wms_options(request: &OverlayRequest, source: &WmsSource) -> Result<JsValue, JsValue> {
    let options = Object::new();
    for (key, value) in request.tile_params(source) {
        // Leaflet derives these from tileSize and fills in its own defaults.
        if matches!(key, "width" | "height" | "service" | "request" | "version") {
            continue;
        }
        Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_str(&value))?;
    }
    Reflect::set(&options, &"transparent".into(), &source.transparent.into())?;
    Reflect::set(&options, &"tileSize".into(), &source.tile_size.into())?;
    Reflect::set(&options, &"attribution".into(), &JsValue::from_str(&source.attribution))?;
    Reflect::set(&options, &"zIndex".into(), &source.z_index.into())?;
    Ok(options.into())
}
