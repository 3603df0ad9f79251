use std::collections::BTreeMap;

use formats::{Feature, FeatureCollection, Geometry};
use foundation::{DraftId, FeatureId, Sequence};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// User-entered metadata for one shape. Stored verbatim, empty strings included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMetadata {
    pub area_name: String,
    pub issue_type: String,
    pub notes: String,
}

impl FeatureMetadata {
    pub fn new(
        area_name: impl Into<String>,
        issue_type: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            area_name: area_name.into(),
            issue_type: issue_type.into(),
            notes: notes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedFeature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub area_name: String,
    pub issue_type: String,
    pub notes: String,
}

impl AnnotatedFeature {
    fn to_geojson_feature(&self) -> Feature {
        let mut properties = Map::new();
        properties.insert(
            "areaName".to_string(),
            Value::String(self.area_name.clone()),
        );
        properties.insert(
            "issueType".to_string(),
            Value::String(self.issue_type.clone()),
        );
        properties.insert("notes".to_string(), Value::String(self.notes.clone()));

        Feature {
            id: Some(self.id.to_string()),
            properties,
            geometry: self.geometry.clone(),
        }
    }
}

/// Annotations drawn during one session.
///
/// Ordering contract:
/// - `all()` and `export()` yield features in insertion order.
///
/// Shapes may be parked as drafts while their metadata is collected; a draft
/// only becomes a feature once it is confirmed, so the store never holds a
/// shape without metadata.
#[derive(Debug, Default)]
pub struct FeatureStore {
    features: Vec<AnnotatedFeature>,
    drafts: BTreeMap<DraftId, Geometry>,
    ids: Sequence,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        geometry: Geometry,
        area_name: impl Into<String>,
        issue_type: impl Into<String>,
        notes: impl Into<String>,
    ) -> AnnotatedFeature {
        let feature = AnnotatedFeature {
            id: self.ids.next_feature(),
            geometry,
            area_name: area_name.into(),
            issue_type: issue_type.into(),
            notes: notes.into(),
        };
        info!(
            id = %feature.id,
            kind = feature.geometry.kind(),
            issue_type = %feature.issue_type,
            "annotation stored"
        );
        self.features.push(feature.clone());
        feature
    }

    pub fn all(&self) -> &[AnnotatedFeature] {
        &self.features
    }

    pub fn get(&self, id: FeatureId) -> Option<&AnnotatedFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn export(&self) -> FeatureCollection {
        FeatureCollection::new(
            self.features
                .iter()
                .map(AnnotatedFeature::to_geojson_feature)
                .collect(),
        )
    }

    /// Drops every feature and pending draft. Ids keep counting up.
    pub fn clear(&mut self) {
        info!(
            features = self.features.len(),
            drafts = self.drafts.len(),
            "annotation store cleared"
        );
        self.features.clear();
        self.drafts.clear();
    }

    pub fn begin_draft(&mut self, geometry: Geometry) -> DraftId {
        let id = self.ids.next_draft();
        debug!(draft = id.get(), kind = geometry.kind(), "shape awaiting metadata");
        self.drafts.insert(id, geometry);
        id
    }

    pub fn pending_drafts(&self) -> usize {
        self.drafts.len()
    }

    /// Commits a draft with its metadata.
    ///
    /// Returns `None` if the draft is unknown or was already settled.
    pub fn confirm_draft(
        &mut self,
        draft: DraftId,
        metadata: FeatureMetadata,
    ) -> Option<AnnotatedFeature> {
        let geometry = self.drafts.remove(&draft)?;
        Some(self.insert(
            geometry,
            metadata.area_name,
            metadata.issue_type,
            metadata.notes,
        ))
    }

    /// Returns `true` if a pending draft was dropped.
    pub fn discard_draft(&mut self, draft: DraftId) -> bool {
        let removed = self.drafts.remove(&draft).is_some();
        if removed {
            debug!(draft = draft.get(), "shape discarded");
        }
        removed
    }
}
