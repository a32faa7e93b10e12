//! Design parameters and TOML loading.
//!
//! Every field has a literal default, so an empty file (or no file at all)
//! reproduces the stock designs. Lengths are in millimeters.
//!
//! ```toml
//! [keychain]
//! text = "TINA"
//! hole_diameter = 6.0
//!
//! [pendant]
//! diameter = 40.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Parameters for the three-color pendant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PendantParams {
    /// Outer diameter of the black disc.
    pub diameter: f64,
    /// Black layer thickness (printed first).
    pub black_height: f64,
    /// Red layer thickness.
    pub red_height: f64,
    /// White layer thickness (printed last).
    pub white_height: f64,
    /// How far the red disc sits inside the black rim (radius difference).
    pub rim_width: f64,
    /// Segments for the black and red discs.
    pub disc_segments: u32,
    /// Lettering in the white layer.
    pub text: String,
    /// Letter height.
    pub text_height: f64,
    /// Letter stroke thickness.
    pub stroke_width: f64,
    /// Advance per letter.
    pub letter_spacing: f64,
    /// Center x of the first letter's spine.
    pub text_x: f64,
    /// Vertical center of the lettering.
    pub text_y: f64,
    /// Width of the tab joining disc and ring.
    pub loop_width: f64,
    /// Gap between disc edge and ring.
    pub loop_neck: f64,
    /// How far the tab reaches into the disc and into the ring.
    pub loop_overlap: f64,
    /// Ring outer diameter.
    pub loop_diameter: f64,
    /// Chain hole diameter.
    pub loop_hole_diameter: f64,
}

impl Default for PendantParams {
    fn default() -> Self {
        Self {
            diameter: 35.0,
            black_height: 1.0,
            red_height: 1.0,
            white_height: 1.0,
            rim_width: 2.0,
            disc_segments: 64,
            text: "BULLS".into(),
            text_height: 4.0,
            stroke_width: 0.8,
            letter_spacing: 3.5,
            text_x: -8.0,
            text_y: -8.0,
            loop_width: 4.0,
            loop_neck: 2.0,
            loop_overlap: 1.0,
            loop_diameter: 6.0,
            loop_hole_diameter: 3.0,
        }
    }
}

impl PendantParams {
    /// Disc radius.
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Total height of the three layers.
    pub fn total_height(&self) -> f64 {
        self.black_height + self.red_height + self.white_height
    }

    /// Center y of the chain ring.
    pub fn loop_center_y(&self) -> f64 {
        self.radius() + self.loop_neck + self.loop_diameter / 2.0
    }
}

/// Parameters for the text keychain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeychainParams {
    /// Base size along X.
    pub length: f64,
    /// Base size along Y.
    pub width: f64,
    /// Base thickness.
    pub height: f64,
    /// Keyring hole diameter.
    pub hole_diameter: f64,
    /// Distance from the right edge to the hole center.
    pub hole_inset: f64,
    /// Segments for the hole cylinder.
    pub hole_segments: u32,
    /// Embossed lettering.
    pub text: String,
    /// Left edge of the first letter.
    pub text_x: f64,
    /// Letter height.
    pub text_height: f64,
    /// How far the lettering stands proud of the top face.
    pub text_depth: f64,
    /// Letter stroke thickness.
    pub stroke_width: f64,
    /// Advance per letter.
    pub letter_spacing: f64,
}

impl Default for KeychainParams {
    fn default() -> Self {
        Self {
            length: 50.0,
            width: 20.0,
            height: 3.0,
            hole_diameter: 5.0,
            hole_inset: 5.0,
            hole_segments: 32,
            text: "AUSTIN".into(),
            text_x: 4.0,
            text_height: 8.0,
            text_depth: 1.0,
            stroke_width: 1.2,
            letter_spacing: 5.5,
        }
    }
}

impl KeychainParams {
    /// Keyring hole center in the XY plane.
    pub fn hole_center(&self) -> (f64, f64) {
        (self.length - self.hole_inset, self.width / 2.0)
    }
}

/// Parameters for every design, as read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrinketConfig {
    /// `[pendant]` table.
    pub pendant: PendantParams,
    /// `[keychain]` table.
    pub keychain: KeychainParams,
}

impl TrinketConfig {
    /// Parse TOML; missing tables and fields keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = TrinketConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrinketConfig::default());
        assert_eq!(config.keychain.text, "AUSTIN");
        assert_eq!(config.pendant.disc_segments, 64);
    }

    #[test]
    fn partial_tables_override_fields() {
        let config = TrinketConfig::from_toml_str(
            r#"
            [keychain]
            text = "TINA"
            hole_diameter = 6.0

            [pendant]
            diameter = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(config.keychain.text, "TINA");
        assert_eq!(config.keychain.hole_diameter, 6.0);
        assert_eq!(config.keychain.length, 50.0);
        assert_eq!(config.pendant.radius(), 20.0);
        assert_eq!(config.pendant.text, "BULLS");
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = TrinketConfig::from_toml_str("[keychain]\nlength = \"long\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn misspelled_key_is_a_parse_error() {
        let err = TrinketConfig::from_toml_str("[keychain]\nhole_diamter = 6.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("hole_diamter"));

        let err = TrinketConfig::from_toml_str("[keychian]\ntext = \"TINA\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = TrinketConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.toml");
        std::fs::write(&path, "[pendant]\nloop_hole_diameter = 2.5\n").unwrap();
        let config = TrinketConfig::load(&path).unwrap();
        assert_eq!(config.pendant.loop_hole_diameter, 2.5);
    }

    #[test]
    fn derived_positions() {
        let pendant = PendantParams::default();
        assert_eq!(pendant.loop_center_y(), 22.5);
        assert_eq!(pendant.total_height(), 3.0);
        assert_eq!(KeychainParams::default().hole_center(), (45.0, 10.0));
    }
}
