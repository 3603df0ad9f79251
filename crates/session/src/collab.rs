//! Narrow interfaces to the page: map widget, tile service, chart, loader and
//! download link. The session only ever talks to these traits.

use annotations::{AnnotatedFeature, FeatureStyle, SummaryCounts};
use foundation::{LonLatBounds, OverlayToken};
use overlay::{OverlayRequest, WmsSource};

pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

pub trait MapView {
    fn fit_bounds(&mut self, bounds: LonLatBounds);
    /// Adds a committed feature to the drawn-items layer with its category style.
    fn show_feature(&mut self, feature: &AnnotatedFeature, style: FeatureStyle);
    fn clear_features(&mut self);
}

pub trait TileService {
    /// Starts streaming tiles for `request`. `load` / `tileerror` must be
    /// reported back with `request.token`.
    fn add_overlay(&mut self, request: &OverlayRequest, source: &WmsSource);
    /// Removes the overlay. In-flight fetches may or may not be cancelled.
    fn remove_overlay(&mut self, token: OverlayToken);
}

pub trait ChartRenderer {
    fn render(&mut self, counts: &SummaryCounts);
    fn reset(&mut self);
}

pub trait LoaderIndicator {
    fn show(&mut self);
    fn hide(&mut self);
}

pub trait ExportSink {
    fn offer(&mut self, file_name: &str, mime: &str, contents: &str) -> Result<(), SinkError>;
}

pub struct Collaborators {
    pub map: Box<dyn MapView>,
    pub tiles: Box<dyn TileService>,
    pub chart: Box<dyn ChartRenderer>,
    pub loader: Box<dyn LoaderIndicator>,
    pub export: Box<dyn ExportSink>,
}
