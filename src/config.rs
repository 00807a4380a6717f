//! JSON configuration files.
//!
//! Every field is optional; anything left out keeps its default.
//!
//! ```json
//! {
//!   "scoring": { "mouth_curvature_weight": 0.7, "smoothing": "logistic" },
//!   "palette": { "mouth": [255, 0, 0, 178] }
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::Palette;
use crate::score::ScoringConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub palette: Palette,
}

impl Config {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.scoring.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.scoring.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::score::Smoothing;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::from_json(
            r#"{"scoring": {"eye_narrowing_weight": 0.3, "smoothing": "linear"}}"#,
        )
        .unwrap();

        assert!((config.scoring.eye_narrowing_weight - 0.3).abs() < 1e-6);
        assert_eq!(config.scoring.smoothing, Smoothing::Linear);
        assert_eq!(config.scoring.min_region_points, 10);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Config::from_json(r#"{"scoring": {"score_step": 0}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = Config::from_json(r#"{"scoring": {"smoothing": "cubic"}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join("happy_lens_config_test.json");
        std::fs::write(&path, r#"{"palette": {"nose": [1, 2, 3, 4]}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.palette.nose, [1, 2, 3, 4]);

        std::fs::remove_file(path).ok();
    }
}
