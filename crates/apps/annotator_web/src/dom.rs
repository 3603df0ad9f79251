use session::{ExportSink, LoaderIndicator, SinkError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, HtmlElement, Url};

// The browser reads the object URL after `click()` returns.
const REVOKE_DELAY_MS: i32 = 1_000;

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Toggles `display` on the loader element.
pub struct DomLoader {
    element_id: String,
}

impl DomLoader {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }

    fn set_display(&self, display: &str) {
        let result = document().and_then(|doc| {
            let el = doc
                .get_element_by_id(&self.element_id)
                .ok_or_else(|| JsValue::from_str(&format!("#{} not found", self.element_id)))?
                .dyn_into::<HtmlElement>()
                .map_err(|_| JsValue::from_str("loader is not an HTML element"))?;
            el.style().set_property("display", display)
        });
        if let Err(err) = result {
            web_sys::console::warn_1(&JsValue::from_str(&format!("loader: {err:?}")));
        }
    }
}

impl LoaderIndicator for DomLoader {
    fn show(&mut self) {
        self.set_display("block");
    }

    fn hide(&mut self) {
        self.set_display("none");
    }
}

/// Offers the export through a temporary object URL and a synthetic link click.
pub struct BlobDownload;

impl BlobDownload {
    fn download(file_name: &str, mime: &str, contents: &str) -> Result<(), JsValue> {
        let parts = js_sys::Array::of1(&JsValue::from_str(contents));
        let bag = BlobPropertyBag::new();
        bag.set_type(mime);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &bag)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let anchor = document()?
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| JsValue::from_str("failed to create link"))?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        anchor.click();

        let revoke = Closure::once_into_js(move || {
            let _ = Url::revoke_object_url(&url);
        });
        web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                revoke.unchecked_ref(),
                REVOKE_DELAY_MS,
            )?;
        Ok(())
    }
}

impl ExportSink for BlobDownload {
    fn offer(&mut self, file_name: &str, mime: &str, contents: &str) -> Result<(), SinkError> {
        Self::download(file_name, mime, contents).map_err(|err| format!("{err:?}").into())
    }
}
