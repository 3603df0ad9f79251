use annotations::{
    AnnotatedFeature, FeatureMetadata, FeatureStore, FeatureStyle, SummaryCounts, recompute, reset,
};
use formats::{GeoJsonError, Geometry};
use foundation::{DraftId, OverlayToken};
use overlay::{OverlayEffect, OverlaySelector, OverlayState};
use thiserror::Error;
use tracing::info;

use crate::collab::{Collaborators, SinkError};
use crate::config::SessionConfig;

pub const EXPORT_MIME: &str = "application/json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to serialize annotations: {0}")]
    Serialize(#[from] GeoJsonError),
    #[error("export failed: {0}")]
    Sink(#[source] SinkError),
}

/// One annotation session: the feature store, what the chart shows, and the
/// imagery overlay, wired to the page's collaborators.
///
/// All handlers run to completion on the UI thread; nothing here is shared.
pub struct Session {
    config: SessionConfig,
    store: FeatureStore,
    displayed: SummaryCounts,
    overlay: OverlaySelector,
    collab: Collaborators,
}

impl Session {
    pub fn new(config: SessionConfig, collab: Collaborators) -> Self {
        let overlay = OverlaySelector::new(
            config.overlay.dates.clone(),
            config.overlay.coverage_bounds(),
        );
        Self {
            config,
            store: FeatureStore::new(),
            displayed: SummaryCounts::zero(),
            overlay,
            collab,
        }
    }

    /// Draws the empty chart and applies the date picker's initial value, if any.
    pub fn start(&mut self, initial_date: Option<&str>) {
        self.collab.chart.render(&self.displayed);
        if let Some(date) = initial_date.filter(|d| !d.is_empty()) {
            self.select_date(Some(date));
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    /// Counts derived from the store right now.
    pub fn counts(&self) -> SummaryCounts {
        recompute(self.store.all())
    }

    /// Counts last pushed to the chart. Differs from [`Session::counts`] after a chart reset.
    pub fn displayed_counts(&self) -> SummaryCounts {
        self.displayed
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    pub fn active_overlay_token(&self) -> Option<OverlayToken> {
        self.overlay.active().map(|r| r.token)
    }

    /// A shape was drawn; hold it until the metadata prompt returns.
    pub fn begin_shape(&mut self, geometry: Geometry) -> DraftId {
        self.store.begin_draft(geometry)
    }

    /// Settles a drawn shape. `None` metadata means the prompt was cancelled.
    pub fn complete_shape(
        &mut self,
        draft: DraftId,
        metadata: Option<FeatureMetadata>,
    ) -> Option<AnnotatedFeature> {
        let Some(metadata) = metadata else {
            self.store.discard_draft(draft);
            return None;
        };
        let feature = self.store.confirm_draft(draft, metadata)?;
        self.publish(&feature);
        Some(feature)
    }

    /// Single-step insert for shapes whose metadata is already known.
    pub fn add_feature(&mut self, geometry: Geometry, metadata: FeatureMetadata) -> AnnotatedFeature {
        let feature = self.store.insert(
            geometry,
            metadata.area_name,
            metadata.issue_type,
            metadata.notes,
        );
        self.publish(&feature);
        feature
    }

    fn publish(&mut self, feature: &AnnotatedFeature) {
        let style = FeatureStyle::for_issue_type(&feature.issue_type);
        self.collab.map.show_feature(feature, style);
        self.refresh_chart();
    }

    pub fn refresh_chart(&mut self) {
        self.displayed = recompute(self.store.all());
        self.collab.chart.render(&self.displayed);
    }

    /// Zeroes the chart. The stored features are left alone.
    pub fn reset_chart(&mut self) {
        self.displayed = reset();
        self.collab.chart.reset();
    }

    /// Drops every annotation and redraws the chart from the now empty store.
    pub fn clear(&mut self) {
        self.store.clear();
        self.collab.map.clear_features();
        self.refresh_chart();
    }

    /// Serializes the store and hands it to the download link. Returns the document.
    pub fn export(&mut self) -> Result<String, SessionError> {
        let collection = self.store.export();
        let payload = collection.to_geojson_string()?;
        self.collab
            .export
            .offer(&self.config.export_file_name, EXPORT_MIME, &payload)
            .map_err(SessionError::Sink)?;
        info!(
            features = collection.len(),
            file = %self.config.export_file_name,
            "annotations exported"
        );
        Ok(payload)
    }

    pub fn select_date(&mut self, date_key: Option<&str>) -> OverlayState {
        let effects = self.overlay.select_date(date_key);
        self.apply(effects);
        self.overlay.state()
    }

    pub fn tiles_loaded(&mut self, token: OverlayToken) -> OverlayState {
        let effects = self.overlay.tiles_loaded(token);
        self.apply(effects);
        self.overlay.state()
    }

    pub fn tile_error(&mut self, token: OverlayToken) -> OverlayState {
        let effects = self.overlay.tile_error(token);
        self.apply(effects);
        self.overlay.state()
    }

    fn apply(&mut self, effects: Vec<OverlayEffect>) {
        for effect in effects {
            match effect {
                OverlayEffect::Release(token) => self.collab.tiles.remove_overlay(token),
                OverlayEffect::FitBounds(bounds) => self.collab.map.fit_bounds(bounds),
                OverlayEffect::ShowLoader => self.collab.loader.show(),
                OverlayEffect::HideLoader => self.collab.loader.hide(),
                OverlayEffect::Request(request) => self
                    .collab
                    .tiles
                    .add_overlay(&request, &self.config.overlay.source),
            }
        }
    }
}
