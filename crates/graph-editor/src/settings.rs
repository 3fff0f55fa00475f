use labeled_graph::{EdgePolicy, EditorOptions};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the path of a JSON settings file.
pub const SETTINGS_ENV: &str = "GRAPH_EDITOR_SETTINGS";

/// Common slider metadata so bounds live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

pub const NODE_DIAMETER_RANGE: SliderRange =
    SliderRange::new(10.0, 200.0, 1.0);
pub const LABEL_FONT_RANGE: SliderRange =
    SliderRange::new(8.0, 32.0, 1.0);
pub const EDGE_WIDTH_RANGE: SliderRange =
    SliderRange::new(0.5, 8.0, 0.5);

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub node_diameter: f32,
    pub edge_policy: EdgePolicy,
    pub edit_on_create: bool,
    pub visuals: CanvasVisuals,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let options = EditorOptions::default();
        Self {
            node_diameter: options.node_diameter,
            edge_policy: options.edge_policy,
            edit_on_create: options.edit_on_create,
            visuals: CanvasVisuals::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasVisuals {
    pub label_font_size: f32,
    pub edge_width: f32,
    pub node_stroke_width: f32,
}

impl Default for CanvasVisuals {
    fn default() -> Self {
        Self {
            label_font_size: 14.0,
            edge_width: 2.0,
            node_stroke_width: 1.5,
        }
    }
}

impl EditorSettings {
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            node_diameter: self.node_diameter,
            edge_policy: self.edge_policy,
            edit_on_create: self.edit_on_create,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.clamped())
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| {
            SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_json(&json)
    }

    /// Settings from the file named by [`SETTINGS_ENV`], or defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(SETTINGS_ENV) else {
            info!("{} not set, using default settings", SETTINGS_ENV);
            return Self::default();
        };

        let path = PathBuf::from(path);
        match Self::load(&path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("{}. Using default settings.", e);
                Self::default()
            }
        }
    }

    fn clamped(mut self) -> Self {
        self.node_diameter = NODE_DIAMETER_RANGE.clamp(self.node_diameter);
        self.visuals.label_font_size =
            LABEL_FONT_RANGE.clamp(self.visuals.label_font_size);
        self.visuals.edge_width =
            EDGE_WIDTH_RANGE.clamp(self.visuals.edge_width);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings =
            EditorSettings::from_json(r#"{ "edge_policy": "streaming" }"#)
                .expect("valid settings");

        assert_eq!(settings.edge_policy, EdgePolicy::Streaming);
        assert_eq!(settings.node_diameter, 60.0);
        assert!(settings.edit_on_create);
        assert_eq!(settings.visuals, CanvasVisuals::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = EditorSettings::from_json(
            r#"{ "node_diameter": 5000, "visuals": { "label_font_size": 1 } }"#,
        )
        .expect("valid settings");

        assert_eq!(settings.node_diameter, NODE_DIAMETER_RANGE.max);
        assert_eq!(settings.visuals.label_font_size, LABEL_FONT_RANGE.min);
        assert_eq!(settings.visuals.edge_width, 2.0);
    }

    #[test]
    fn test_editor_options_follow_settings() {
        let settings = EditorSettings {
            node_diameter: 40.0,
            edge_policy: EdgePolicy::Streaming,
            edit_on_create: false,
            visuals: CanvasVisuals::default(),
        };
        let options = settings.editor_options();
        assert_eq!(options.node_diameter, 40.0);
        assert_eq!(options.edge_policy, EdgePolicy::Streaming);
        assert!(!options.edit_on_create);
    }

    #[test]
    fn test_bad_input_is_reported() {
        assert!(matches!(
            EditorSettings::from_json(r#"{ "edge_policy": "sideways" }"#),
            Err(SettingsError::Parse(_))
        ));

        let missing = std::env::temp_dir()
            .join("graph_editor_settings_that_does_not_exist.json");
        assert!(matches!(
            EditorSettings::load(&missing),
            Err(SettingsError::Io { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("graph_editor_settings_test.json");
        std::fs::write(&path, r#"{ "node_diameter": 80, "edit_on_create": false }"#)
            .expect("Failed to write file");

        let settings = EditorSettings::load(&path).expect("Failed to load file");
        assert_eq!(settings.node_diameter, 80.0);
        assert!(!settings.edit_on_create);

        std::fs::remove_file(&path).ok();
    }
}
