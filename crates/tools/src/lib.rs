use annotations::{SummaryCounts, count_issue_types};
use formats::{FeatureCollection, GeoJsonError};
use serde::Serialize;
use session::SessionConfig;

/// What an exported `features.geojson` contains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub features: usize,
    pub counts: SummaryCounts,
    /// Features whose issue type is neither flood nor dark spot (or missing).
    pub unrecognized: usize,
    pub geometry_kinds: Vec<(String, usize)>,
    /// `[[south, west], [north, east]]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[[f64; 2]; 2]>,
}

pub fn summarize_export(payload: &str) -> Result<ExportSummary, GeoJsonError> {
    let collection = FeatureCollection::from_geojson_str(payload)?;
    Ok(summarize_collection(&collection))
}

pub fn summarize_collection(collection: &FeatureCollection) -> ExportSummary {
    let counts = count_issue_types(
        collection
            .features
            .iter()
            .filter_map(|f| f.properties.get("issueType").and_then(|v| v.as_str())),
    );

    let mut geometry_kinds: Vec<(String, usize)> = Vec::new();
    for feature in &collection.features {
        let kind = feature.geometry.kind();
        match geometry_kinds.iter_mut().find(|(k, _)| k == kind) {
            Some((_, n)) => *n += 1,
            None => geometry_kinds.push((kind.to_string(), 1)),
        }
    }
    geometry_kinds.sort();

    ExportSummary {
        features: collection.len(),
        counts,
        unrecognized: collection.len() - counts.total() as usize,
        geometry_kinds,
        bounds: collection.bounds().map(|b| b.corners()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRow {
    pub date_key: String,
    pub time_range: String,
    pub days: i64,
}

pub fn date_rows(config: &SessionConfig) -> Vec<DateRow> {
    config
        .overlay
        .dates
        .iter()
        .map(|(key, range)| DateRow {
            date_key: key.to_string(),
            time_range: range.to_string(),
            days: range.days(),
        })
        .collect()
}
