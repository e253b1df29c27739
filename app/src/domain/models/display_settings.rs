//! Domain model for the device-local display settings blob.
//!
//! The blob is a singleton (one per installation) persisted under the
//! `displaySettings` key with camelCase field names. Loading is deliberately
//! field-granular: a malformed `brightness` must not discard a valid
//! `textSize` stored in the same blob.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text size shown on symbol cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Color/contrast treatment of the whole board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContrastMode {
    #[default]
    Default,
    HighContrastLight,
    HighContrastDark,
}

/// Grid density of the communication board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLayout {
    Simple,
    #[default]
    Standard,
    Dense,
}

/// Display settings, one per installation.
///
/// Defaults: standard layout, brightness 0 (no darkening overlay),
/// brightness unlocked, medium text, dark mode off, default contrast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub layout: GridLayout,
    /// Overlay darkening factor, 0-100
    pub brightness: u8,
    pub brightness_locked: bool,
    pub text_size: TextSize,
    pub dark_mode_enabled: bool,
    pub contrast_mode: ContrastMode,
}

impl DisplaySettings {
    /// Build a fully valid settings object from a possibly partial or
    /// corrupt stored blob.
    ///
    /// Starts from defaults and overwrites one field at a time, only when
    /// the stored value is present, correctly typed, and in range / in the
    /// enum. Anything else silently keeps that field's default. A blob that
    /// does not parse at all yields all defaults; that is logged and never
    /// an error, because corruption here is self-healing on the next flush.
    pub fn merge_stored(raw: &str) -> Self {
        let mut settings = Self::default();

        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored display settings are not valid JSON, using defaults: {}", e);
                return settings;
            }
        };
        let Some(map) = value.as_object() else {
            warn!("Stored display settings are not a JSON object, using defaults");
            return settings;
        };

        if let Some(field) = map.get("layout") {
            match serde_json::from_value::<GridLayout>(field.clone()) {
                Ok(layout) => settings.layout = layout,
                Err(_) => warn!("Ignoring invalid stored layout: {}", field),
            }
        }
        if let Some(field) = map.get("brightness") {
            // as_u64 also rejects negatives and non-integers
            match field.as_u64() {
                Some(brightness) if brightness <= 100 => {
                    settings.brightness = brightness as u8;
                }
                _ => warn!("Ignoring out-of-range stored brightness: {}", field),
            }
        }
        if let Some(field) = map.get("brightnessLocked") {
            match field.as_bool() {
                Some(locked) => settings.brightness_locked = locked,
                None => warn!("Ignoring non-boolean stored brightnessLocked: {}", field),
            }
        }
        if let Some(field) = map.get("textSize") {
            match serde_json::from_value::<TextSize>(field.clone()) {
                Ok(text_size) => settings.text_size = text_size,
                Err(_) => warn!("Ignoring invalid stored textSize: {}", field),
            }
        }
        if let Some(field) = map.get("darkModeEnabled") {
            match field.as_bool() {
                Some(enabled) => settings.dark_mode_enabled = enabled,
                None => warn!("Ignoring non-boolean stored darkModeEnabled: {}", field),
            }
        }
        if let Some(field) = map.get("contrastMode") {
            match serde_json::from_value::<ContrastMode>(field.clone()) {
                Ok(mode) => settings.contrast_mode = mode,
                Err(_) => warn!("Ignoring invalid stored contrastMode: {}", field),
            }
        }

        settings
    }

    /// Serialize for the durable store.
    pub fn to_stored(&self) -> String {
        // Serialization of a plain struct with string/number/bool fields
        // cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Compute the minimal patch that turns `baseline` into `self`, for
    /// the optimistic push to the remote appearance endpoint.
    pub fn diff(&self, baseline: &DisplaySettings) -> DisplaySettingsPatch {
        let mut patch = DisplaySettingsPatch::default();
        if self.layout != baseline.layout {
            patch.layout = Some(self.layout);
        }
        if self.brightness != baseline.brightness {
            patch.brightness = Some(self.brightness);
        }
        if self.brightness_locked != baseline.brightness_locked {
            patch.brightness_locked = Some(self.brightness_locked);
        }
        if self.text_size != baseline.text_size {
            patch.text_size = Some(self.text_size);
        }
        if self.dark_mode_enabled != baseline.dark_mode_enabled {
            patch.dark_mode_enabled = Some(self.dark_mode_enabled);
        }
        if self.contrast_mode != baseline.contrast_mode {
            patch.contrast_mode = Some(self.contrast_mode);
        }
        patch
    }
}

/// Minimal field diff against the last remotely-synced snapshot.
/// `None` means "unchanged, do not send".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySettingsPatch {
    pub layout: Option<GridLayout>,
    pub brightness: Option<u8>,
    pub brightness_locked: Option<bool>,
    pub text_size: Option<TextSize>,
    pub dark_mode_enabled: Option<bool>,
    pub contrast_mode: Option<ContrastMode>,
}

impl DisplaySettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_empty_blob_yields_defaults() {
        let settings = DisplaySettings::merge_stored("{}");
        assert_eq!(settings, DisplaySettings::default());
    }

    #[test]
    fn test_merge_unparseable_blob_yields_defaults() {
        let settings = DisplaySettings::merge_stored("not json at all");
        assert_eq!(settings, DisplaySettings::default());
    }

    #[test]
    fn test_merge_non_object_blob_yields_defaults() {
        let settings = DisplaySettings::merge_stored("[1,2,3]");
        assert_eq!(settings, DisplaySettings::default());
    }

    #[test]
    fn test_merge_is_field_granular() {
        // brightness out of range must not discard the valid textSize
        let settings = DisplaySettings::merge_stored(r#"{"brightness": 150, "textSize": "medium"}"#);

        assert_eq!(settings.brightness, DisplaySettings::default().brightness);
        assert_eq!(settings.text_size, TextSize::Medium);
        assert_eq!(settings.dark_mode_enabled, DisplaySettings::default().dark_mode_enabled);
        assert_eq!(settings.contrast_mode, DisplaySettings::default().contrast_mode);
    }

    #[test]
    fn test_merge_rejects_negative_brightness() {
        let settings = DisplaySettings::merge_stored(r#"{"brightness": -5}"#);
        assert_eq!(settings.brightness, 0);
    }

    #[test]
    fn test_merge_rejects_wrong_types_per_field() {
        let settings = DisplaySettings::merge_stored(
            r#"{"darkModeEnabled": "yes", "contrastMode": "high-contrast-dark", "layout": 7}"#,
        );

        assert!(!settings.dark_mode_enabled);
        assert_eq!(settings.contrast_mode, ContrastMode::HighContrastDark);
        assert_eq!(settings.layout, GridLayout::Standard);
    }

    #[test]
    fn test_merge_accepts_fully_valid_blob() {
        let stored = DisplaySettings {
            layout: GridLayout::Dense,
            brightness: 35,
            brightness_locked: true,
            text_size: TextSize::Large,
            dark_mode_enabled: true,
            contrast_mode: ContrastMode::HighContrastLight,
        };

        let loaded = DisplaySettings::merge_stored(&stored.to_stored());
        assert_eq!(loaded, stored);
    }

    #[test]
    fn test_diff_contains_only_changed_fields() {
        let baseline = DisplaySettings::default();
        let mut edited = baseline.clone();
        edited.brightness = 60;
        edited.dark_mode_enabled = true;

        let patch = edited.diff(&baseline);
        assert_eq!(patch.brightness, Some(60));
        assert_eq!(patch.dark_mode_enabled, Some(true));
        assert_eq!(patch.layout, None);
        assert_eq!(patch.text_size, None);
        assert!(edited.diff(&edited).is_empty());
    }

    #[test]
    fn test_stored_blob_uses_camel_case_keys() {
        let json: serde_json::Value =
            serde_json::from_str(&DisplaySettings::default().to_stored()).unwrap();

        assert!(json.get("textSize").is_some());
        assert!(json.get("darkModeEnabled").is_some());
        assert!(json.get("brightnessLocked").is_some());
        assert_eq!(json["contrastMode"], "default");
        assert_eq!(json["layout"], "standard");
    }
}
