use std::cell::{Cell, RefCell};
use std::rc::Rc;

use annotations::{AnnotatedFeature, FeatureStyle, SummaryCounts};
use foundation::{LonLatBounds, OverlayToken};
use overlay::{OverlayRequest, WmsSource};

use crate::collab::{
    ChartRenderer, Collaborators, ExportSink, LoaderIndicator, MapView, SinkError, TileService,
};

/// Collaborator call, as observed by the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FitBounds([[f64; 2]; 2]),
    ShowFeature(Option<&'static str>),
    ClearFeatures,
    AddOverlay(OverlayToken, String),
    RemoveOverlay(OverlayToken),
    Render([u32; 2]),
    ResetChart,
    ShowLoader,
    HideLoader,
    Offer {
        file_name: String,
        mime: String,
        contents: String,
    },
}

/// Records every collaborator call in order. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    fail_exports: Rc<Cell<bool>>,
}

impl Recorder {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            map: Box::new(self.clone()),
            tiles: Box::new(self.clone()),
            chart: Box::new(self.clone()),
            loader: Box::new(self.clone()),
            export: Box::new(self.clone()),
        }
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn fail_exports(&self) {
        self.fail_exports.set(true);
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl MapView for Recorder {
    fn fit_bounds(&mut self, bounds: LonLatBounds) {
        self.push(Call::FitBounds(bounds.corners()));
    }

    fn show_feature(&mut self, _feature: &AnnotatedFeature, style: FeatureStyle) {
        self.push(Call::ShowFeature(style.color));
    }

    fn clear_features(&mut self) {
        self.push(Call::ClearFeatures);
    }
}

impl TileService for Recorder {
    fn add_overlay(&mut self, request: &OverlayRequest, _source: &WmsSource) {
        self.push(Call::AddOverlay(request.token, request.time_range.to_string()));
    }

    fn remove_overlay(&mut self, token: OverlayToken) {
        self.push(Call::RemoveOverlay(token));
    }
}

impl ChartRenderer for Recorder {
    fn render(&mut self, counts: &SummaryCounts) {
        self.push(Call::Render(counts.series()));
    }

    fn reset(&mut self) {
        self.push(Call::ResetChart);
    }
}

impl LoaderIndicator for Recorder {
    fn show(&mut self) {
        self.push(Call::ShowLoader);
    }

    fn hide(&mut self) {
        self.push(Call::HideLoader);
    }
}

impl ExportSink for Recorder {
    fn offer(&mut self, file_name: &str, mime: &str, contents: &str) -> Result<(), SinkError> {
        if self.fail_exports.get() {
            return Err("download blocked".into());
        }
        self.push(Call::Offer {
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            contents: contents.to_string(),
        });
        Ok(())
    }
}
