use foundation::LonLatBounds;
use overlay::{DateCatalog, WmsSource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "features.geojson";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("overlay coverage is not a valid south-west/north-east box: {0:?}")]
    InvalidCoverage([[f64; 2]; 2]),
    #[error("overlay source is missing `{0}`")]
    MissingSource(&'static str),
    #[error("export file name must not be empty")]
    EmptyExportFileName,
}

/// Everything the page needs to set up a session.
///
/// Every section is optional in JSON; missing sections take the defaults of
/// the Sundarbans deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub map: MapConfig,
    pub overlay: OverlayConfig,
    pub export_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
    pub base_layers: Vec<BaseLayer>,
}

/// Base map choice offered in the layer switcher. The first one is shown at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// `[[south, west], [north, east]]`, the area the dated imagery covers.
    pub coverage: [[f64; 2]; 2],
    pub dates: DateCatalog,
    pub source: WmsSource,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            overlay: OverlayConfig::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [21.734791, 88.112761],
            zoom: 11,
            base_layers: vec![
                BaseLayer {
                    name: "Esri Satellite".to_string(),
                    url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                    attribution: "© Esri Satellite Image".to_string(),
                },
                BaseLayer {
                    name: "OpenStreetMap".to_string(),
                    url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                    attribution: "© OSM".to_string(),
                },
            ],
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            coverage: [[21.571121, 87.824427], [21.930816, 88.44833]],
            dates: DateCatalog::default(),
            source: WmsSource::default(),
        }
    }
}

impl OverlayConfig {
    pub fn coverage_bounds(&self) -> LonLatBounds {
        LonLatBounds::from_sw_ne(self.coverage[0], self.coverage[1])
    }
}

impl SessionConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Time ranges are already checked while deserializing the date catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.overlay.coverage_bounds().is_valid() {
            return Err(ConfigError::InvalidCoverage(self.overlay.coverage));
        }
        if self.overlay.source.url.trim().is_empty() {
            return Err(ConfigError::MissingSource("url"));
        }
        if self.overlay.source.layers.trim().is_empty() {
            return Err(ConfigError::MissingSource("layers"));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::EmptyExportFileName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SessionConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_yields_defaults() {
        let config = SessionConfig::from_json_str("{}").expect("defaults");
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.export_file_name, "features.geojson");
        assert_eq!(config.overlay.dates.len(), 2);
        assert_eq!(config.map.zoom, 11);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{
                "overlay": {
                    "dates": {"2024-10-01": "2024-10-01/2024-10-31"},
                    "source": {"layers": "TRUE_COLOR"}
                }
            }"#,
        )
        .expect("config");
        assert_eq!(config.overlay.dates.len(), 1);
        assert_eq!(config.overlay.source.layers, "TRUE_COLOR");
        assert_eq!(config.overlay.source.tile_size, 512);
        assert_eq!(config.overlay.coverage, [[21.571121, 87.824427], [21.930816, 88.44833]]);
    }

    #[test]
    fn rejects_bad_time_range() {
        let err = SessionConfig::from_json_str(
            r#"{"overlay": {"dates": {"2024-10-01": "2024-10-31/2024-10-01"}}}"#,
        )
        .expect_err("reversed range");
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn rejects_inverted_coverage_and_blank_source() {
        let err = SessionConfig::from_json_str(
            r#"{"overlay": {"coverage": [[22.0, 88.0], [21.0, 87.0]]}}"#,
        )
        .expect_err("inverted");
        assert!(matches!(err, ConfigError::InvalidCoverage(_)));

        let err = SessionConfig::from_json_str(r#"{"overlay": {"source": {"url": " "}}}"#)
            .expect_err("blank url");
        assert!(matches!(err, ConfigError::MissingSource("url")));
    }

    #[test]
    fn round_trips_through_json() {
        let config = SessionConfig::default();
        let json = config.to_json_string_pretty().expect("serialize");
        let back = SessionConfig::from_json_str(&json).expect("parse");
        assert_eq!(back.overlay.dates, config.overlay.dates);
        assert_eq!(back.overlay.source, config.overlay.source);
        assert_eq!(back.map.base_layers, config.map.base_layers);
    }
}
