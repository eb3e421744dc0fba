use strum_macros::{AsRefStr, Display};

const SECTOR_DEG: f64 = 22.5;

/// One of the 16 points of the compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Compass {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl Compass {
    pub const ALL: [Compass; 16] = [
        Compass::N,
        Compass::NNE,
        Compass::NE,
        Compass::ENE,
        Compass::E,
        Compass::ESE,
        Compass::SE,
        Compass::SSE,
        Compass::S,
        Compass::SSW,
        Compass::SW,
        Compass::WSW,
        Compass::W,
        Compass::WNW,
        Compass::NW,
        Compass::NNW,
    ];

    /// Map a bearing in degrees from true north to the nearest point.
    ///
    /// Each point owns a 22.5° sector centered on it. Bearings outside
    /// [0, 360) wrap around; non-finite input maps to north.
    pub fn from_bearing(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Compass::N;
        }
        let normalized = degrees.rem_euclid(360.0);
        let index = (normalized / SECTOR_DEG).round() as usize % Self::ALL.len();
        Self::ALL[index]
    }
}
