/// Geographic bounding box in degrees.
///
/// Stored as south-west / north-east corners, matching how map widgets take
/// their `fitBounds` argument.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLatBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LonLatBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        LonLatBounds {
            south,
            west,
            north,
            east,
        }
    }

    /// Builds bounds from `[lat, lon]` corner pairs.
    pub fn from_sw_ne(sw: [f64; 2], ne: [f64; 2]) -> Self {
        Self::new(sw[0], sw[1], ne[0], ne[1])
    }

    /// Corners as `[[south, west], [north, east]]`.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }

    pub fn center(&self) -> [f64; 2] {
        [
            0.5 * (self.south + self.north),
            0.5 * (self.west + self.east),
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.south.is_finite()
            && self.west.is_finite()
            && self.north.is_finite()
            && self.east.is_finite()
            && self.south <= self.north
            && self.west <= self.east
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}
