use serde::{Deserialize, Serialize};

/// WMS imagery endpoint used for the dated overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmsSource {
    pub url: String,
    pub layers: String,
    pub tile_size: u32,
    pub format: String,
    pub transparent: bool,
    pub attribution: String,
    /// Stacking order above the base map.
    pub z_index: i32,
}

impl Default for WmsSource {
    fn default() -> Self {
        Self {
            url: "https://services.sentinel-hub.com/ogc/wms/fa1c8af3-fd9b-4baf-a007-c51de0dde728"
                .to_string(),
            layers: "2_FALSE_COLOR".to_string(),
            tile_size: 512,
            format: "image/png".to_string(),
            transparent: true,
            attribution: "&copy; Sentinel Hub".to_string(),
            z_index: 10,
        }
    }
}
