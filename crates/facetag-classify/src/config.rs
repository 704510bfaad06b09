//! Feature-parameter configuration for the classifier.
//!
//! A [`FeatureConfig`] is static per-part-family input: an ordered list of
//! rules, each pairing a surface match (kind + nominal parameters + absolute
//! tolerance) with optional centroid/extent discriminators and a label
//! suffix scheme. Rules are evaluated in declaration order; the first match
//! wins. Authoring these tables is out of scope for the pipeline; they are
//! deserialized from TOML (or any serde format) as supplied.

use serde::Deserialize;
use thiserror::Error;

use facetag_math::Axis;

/// Errors raised while loading or validating a feature configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML text could not be deserialized.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A rule is structurally invalid.
    #[error("rule '{label}': {message}")]
    Rule {
        /// Label of the offending rule.
        label: String,
        /// What is wrong with it.
        message: String,
    },
}

/// A numeric acceptance band.
///
/// Either a nominal value with an absolute tolerance (`{ at, tolerance }`)
/// or explicit limits (`{ min, max }`, each optional).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Band {
    /// Nominal ± absolute tolerance.
    Nominal {
        /// Nominal value.
        at: f64,
        /// Absolute tolerance.
        tolerance: f64,
    },
    /// Half-open or closed interval.
    Limits {
        /// Lower bound, inclusive.
        #[serde(default)]
        min: Option<f64>,
        /// Upper bound, inclusive.
        #[serde(default)]
        max: Option<f64>,
    },
}

impl Band {
    /// Whether `value` falls inside the band.
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Band::Nominal { at, tolerance } => (value - at).abs() <= *tolerance,
            Band::Limits { min, max } => {
                min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
            }
        }
    }
}

/// Constraint on a plane's normal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalRule {
    /// Normal dominantly along X.
    X,
    /// Normal dominantly along Y.
    Y,
    /// Normal dominantly along Z (horizontal face).
    Z,
    /// Normal not dominated by Z: vertical or steep faces such as spoke
    /// flanks and spline tooth sides.
    Lateral,
}

/// Constraint on a cylinder's axis direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRule {
    /// Axis dominantly along X.
    X,
    /// Axis dominantly along Y.
    Y,
    /// Axis dominantly along Z.
    Z,
}

impl AxisRule {
    /// The math axis this rule names.
    pub fn axis(&self) -> Axis {
        match self {
            AxisRule::X => Axis::X,
            AxisRule::Y => Axis::Y,
            AxisRule::Z => Axis::Z,
        }
    }
}

fn default_tolerance() -> f64 {
    0.2
}

/// Kind dispatch plus kind-specific numeric match for one rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceRule {
    /// Match planar faces, optionally constraining the normal direction.
    Plane {
        /// Normal constraint; absent means any plane.
        #[serde(default)]
        normal: Option<NormalRule>,
    },
    /// Match cylindrical faces at a nominal radius.
    Cylinder {
        /// Nominal radius.
        radius: f64,
        /// Absolute radius tolerance.
        tolerance: f64,
        /// Axis constraint; absent means any axis.
        #[serde(default)]
        axis: Option<AxisRule>,
    },
    /// Match conical faces, optionally constraining the apex height.
    Cone {
        /// Band on the apex Z coordinate.
        #[serde(default)]
        apex_z: Option<Band>,
    },
    /// Match toroidal faces, optionally at a nominal minor radius.
    Torus {
        /// Nominal minor (tube) radius; absent means any torus.
        #[serde(default)]
        minor_radius: Option<f64>,
        /// Absolute minor-radius tolerance.
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    /// Match surfaces of revolution.
    Revolution {},
    /// Match freeform (B-spline) faces, typically loft and fillet artifacts.
    Freeform {},
}

fn default_base() -> u32 {
    1
}

/// Angular-pattern suffix scheme for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectorRule {
    /// Number of equal sectors in the pattern.
    pub count: u32,
    /// Angle of sector 0's center, degrees.
    #[serde(default)]
    pub start_deg: f64,
    /// Use the half-offset (window) convention: sectors centered *between*
    /// pattern positions, for hub arcs and window walls.
    #[serde(default)]
    pub window: bool,
    /// Also append `.left` / `.right`, resolved by the cross-product sign
    /// against the sector's reference direction.
    #[serde(default)]
    pub side: bool,
    /// First displayed index (patterns are conventionally numbered from 1).
    #[serde(default = "default_base")]
    pub base: u32,
}

/// One classification rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureRule {
    /// Base label assigned on match.
    pub label: String,
    /// Surface kind and parameter match.
    pub surface: SurfaceRule,
    /// Band on the centroid Z coordinate.
    #[serde(default)]
    pub centroid_z: Option<Band>,
    /// Band on the centroid's radial distance from the Z axis.
    #[serde(default)]
    pub centroid_radius: Option<Band>,
    /// Band on the centroid X coordinate.
    #[serde(default)]
    pub centroid_x: Option<Band>,
    /// Band on the centroid Y coordinate.
    #[serde(default)]
    pub centroid_y: Option<Band>,
    /// Band on the face bounding box's Z extent.
    #[serde(default)]
    pub span_z: Option<Band>,
    /// Angular-pattern suffix (`label_{index:02}`).
    #[serde(default)]
    pub sector: Option<SectorRule>,
    /// Occurrence-counter suffix: the nth matching face (in traversal
    /// order) gets `label_{n:02}` appended.
    #[serde(default)]
    pub numbered: bool,
}

/// An ordered set of classification rules for one part family.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FeatureConfig {
    /// Rules in priority order; first match wins.
    #[serde(rename = "feature", default)]
    pub features: Vec<FeatureRule>,
}

impl FeatureConfig {
    /// Load and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: FeatureConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rule in &self.features {
            let fail = |message: String| ConfigError::Rule {
                label: rule.label.clone(),
                message,
            };
            if rule.label.is_empty() {
                return Err(fail("label must not be empty".into()));
            }
            if let Some(sector) = &rule.sector {
                if sector.count == 0 {
                    return Err(fail("sector count must be at least 1".into()));
                }
                if rule.numbered {
                    return Err(fail(
                        "sector and numbered suffixes are mutually exclusive".into(),
                    ));
                }
            }
            if let SurfaceRule::Cylinder { tolerance, .. } = &rule.surface {
                if *tolerance < 0.0 {
                    return Err(fail("tolerance must not be negative".into()));
                }
            }
            if let SurfaceRule::Torus { tolerance, .. } = &rule.surface {
                if *tolerance < 0.0 {
                    return Err(fail("tolerance must not be negative".into()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_nominal() {
        let band = Band::Nominal {
            at: 2.5,
            tolerance: 0.1,
        };
        assert!(band.contains(2.52));
        assert!(band.contains(2.4));
        assert!(!band.contains(2.7));
    }

    #[test]
    fn test_band_limits() {
        let band = Band::Limits {
            min: Some(10.0),
            max: None,
        };
        assert!(band.contains(10.0));
        assert!(band.contains(1e9));
        assert!(!band.contains(9.9));
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
            [[feature]]
            label = "top"
            surface = { type = "plane", normal = "z" }
            centroid_z = { at = 50.0, tolerance = 0.2 }

            [[feature]]
            label = "bore.wall"
            surface = { type = "cylinder", radius = 2.5, tolerance = 0.1 }

            [[feature]]
            label = "rim"
            surface = { type = "cylinder", radius = 100.0, tolerance = 0.1 }
            sector = { count = 5 }
        "#;
        let config = FeatureConfig::from_toml_str(text).unwrap();
        assert_eq!(config.features.len(), 3);
        assert_eq!(config.features[0].label, "top");
        assert!(matches!(
            config.features[1].surface,
            SurfaceRule::Cylinder { radius, .. } if radius == 2.5
        ));
        let sector = config.features[2].sector.unwrap();
        assert_eq!(sector.count, 5);
        assert_eq!(sector.base, 1);
        assert!(!sector.window);
    }

    #[test]
    fn test_parse_json() {
        // The model is format-agnostic; JSON configs deserialize too.
        let text = r#"{
            "feature": [
                {
                    "label": "spoke",
                    "surface": { "type": "plane", "normal": "lateral" },
                    "sector": { "count": 5, "side": true }
                }
            ]
        }"#;
        let config: FeatureConfig = serde_json::from_str(text).unwrap();
        config.validate().unwrap();
        let sector = config.features[0].sector.unwrap();
        assert!(sector.side);
    }

    #[test]
    fn test_validate_rejects_zero_sectors() {
        let text = r#"
            [[feature]]
            label = "arm"
            surface = { type = "plane" }
            sector = { count = 0 }
        "#;
        let err = FeatureConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Rule { .. }));
    }

    #[test]
    fn test_validate_rejects_sector_and_numbered() {
        let text = r#"
            [[feature]]
            label = "fillet"
            surface = { type = "torus" }
            sector = { count = 3 }
            numbered = true
        "#;
        assert!(FeatureConfig::from_toml_str(text).is_err());
    }
}
