//! User preferences for the gesture-to-twist pipeline.
//!
//! Every threshold used by the pipeline is read from here. The defaults live
//! in `default.yaml`, which is embedded in the binary; a user file only needs
//! to contain the keys it overrides.

#![allow(missing_docs)] // too many things to document

#[macro_use]
extern crate lazy_static;

use std::path::Path;

use serde::{Deserialize, Serialize};

mod animation;
mod feedback;
mod gesture;
mod rgb;

pub use animation::*;
pub use feedback::*;
pub use gesture::*;
pub use rgb::Rgb;

const PREFS_FILE_FORMAT: config::FileFormat = config::FileFormat::Yaml;
const DEFAULT_PREFS_STR: &str = include_str!("default.yaml");

lazy_static! {
    /// Preferences loaded from the embedded `default.yaml`.
    pub static ref DEFAULT_PREFS: Preferences =
        serde_norway::from_str(DEFAULT_PREFS_STR).expect("error loading default preferences");
}

/// All preferences used by the pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Preferences {
    /// Pointer tracking thresholds.
    pub gesture: GesturePreferences,
    /// Facelet adjacency thresholds.
    pub adjacency: AdjacencyPreferences,
    /// Twist direction guards.
    pub direction: DirectionPreferences,
    /// Twist animation settings.
    pub animation: AnimationPreferences,
    /// Visual feedback payloads.
    pub feedback: FeedbackPreferences,
}
impl Default for Preferences {
    fn default() -> Self {
        DEFAULT_PREFS.clone()
    }
}
impl Preferences {
    /// Loads preferences from a YAML file layered on top of the defaults.
    ///
    /// If `path` is `None` or the file cannot be loaded, the defaults are
    /// returned and a warning is logged.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        Self::try_load(path).unwrap_or_else(|e| {
            log::warn!("Error loading preferences from {}: {e}", path.display());
            Self::default()
        })
    }

    /// Loads preferences from a YAML file layered on top of the defaults.
    pub fn try_load(path: &Path) -> Result<Self, config::ConfigError> {
        let user_source = config::File::from(path).format(PREFS_FILE_FORMAT);
        Self::build_with_source(user_source)
    }

    /// Parses preferences from a YAML string layered on top of the defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, config::ConfigError> {
        Self::build_with_source(config::File::from_str(s, PREFS_FILE_FORMAT))
    }

    fn build_with_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_PREFS_STR, PREFS_FILE_FORMAT))
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Serializes the preferences to YAML.
    pub fn to_yaml_string(&self) -> Result<String, serde_norway::Error> {
        serde_norway::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_prefs_match_documented_values() {
        let prefs = Preferences::default();
        assert_eq!(prefs.gesture.validity_timeout, 3.0);
        assert_eq!(prefs.gesture.max_contacts, 2);
        assert_eq!(prefs.adjacency.adjacency_threshold, 1.1);
        assert_eq!(prefs.adjacency.diagonal_threshold, 1.6);
        assert_eq!(prefs.direction.minimum_torque_angle, 15.0);
        assert_eq!(prefs.direction.maximum_torque_angle, 165.0);
        assert!(!prefs.direction.grip_sensitive);
        assert_eq!(prefs.animation.twist_interpolation, InterpolateFn::EaseInOut);
        assert_eq!(prefs.animation.animation_lock, AnimationLock::Pieces);
    }

    #[test]
    fn test_partial_override() {
        let prefs = Preferences::from_yaml_str(
            "gesture:\n  validity_timeout: 1.5\nanimation:\n  animation_lock: face\n",
        )
        .unwrap();
        assert_eq!(prefs.gesture.validity_timeout, 1.5);
        assert_eq!(prefs.animation.animation_lock, AnimationLock::Face);
        // untouched keys keep their defaults
        assert_eq!(prefs.gesture.hysteresis_threshold, 0.02);
        assert_eq!(prefs.feedback, DEFAULT_PREFS.feedback);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "adjacency:\n  diagonal_threshold: 2.0").unwrap();
        let prefs = Preferences::load(Some(file.path()));
        assert_eq!(prefs.adjacency.diagonal_threshold, 2.0);
        assert_eq!(prefs.adjacency.adjacency_threshold, 1.1);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let prefs = Preferences::load(Some(Path::new("/nonexistent/quarterturn.yaml")));
        assert_eq!(prefs, Preferences::default());

        assert!(Preferences::from_yaml_str("gesture:\n  max_contacts: lots\n").is_err());
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let s = Preferences::default().to_yaml_string().unwrap();
        assert_eq!(Preferences::from_yaml_str(&s).unwrap(), Preferences::default());
    }
}
