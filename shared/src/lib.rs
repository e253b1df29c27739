use serde::{Deserialize, Serialize};

/// Appearance settings as they travel over the wire (snake_case).
///
/// The server is authoritative for this shape; the app keeps its own
/// in-memory model and translates field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceSettingsDto {
    /// Board grid density: "simple", "standard" or "dense"
    pub layout: String,
    /// Overlay darkening factor, 0-100
    pub brightness: u8,
    /// Whether the brightness slider is locked by a parent
    pub brightness_locked: bool,
    /// "small", "medium" or "large"
    pub text_size: String,
    pub dark_mode_enabled: bool,
    /// "default", "high-contrast-light" or "high-contrast-dark"
    pub contrast_mode: String,
}

/// Partial appearance update; only populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceSettingsPatchDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast_mode: Option<String>,
}

/// Parental settings wire format (snake_case).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentalSettingsDto {
    /// Absent until the server has persisted the record once
    pub id: Option<String>,
    /// "low", "medium", "high" or null meaning no special needs
    pub asd_level: Option<String>,
    pub block_inappropriate: bool,
    pub block_violence: bool,
    pub data_sharing_preference: bool,
    pub downtime_enabled: bool,
    pub require_passcode: bool,
    /// String-encoded integer; kept as a string to avoid leading-zero
    /// and empty-field friction in the editing UI
    pub daily_limit_hours: String,
    /// Weekday tokens "Mon".."Sun"; membership only, order irrelevant
    pub downtime_days: Vec<String>,
    /// "HH:MM"
    pub downtime_start: String,
    /// "HH:MM"
    pub downtime_end: String,
    pub notify_emails: Vec<String>,
}

/// Partial parental update; only populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentalSettingsPatchDto {
    /// Double Option: outer = "include this field in the patch",
    /// inner = the value, which may legitimately be null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asd_level: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_inappropriate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_violence: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_sharing_preference: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downtime_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_passcode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_limit_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downtime_days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downtime_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downtime_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_emails: Option<Vec<String>>,
}

/// One keyword entry in an ARASAAC search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArasaacKeyword {
    pub keyword: String,
}

/// Raw ARASAAC pictogram search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArasaacPictogram {
    #[serde(rename = "_id")]
    pub id: u64,
    #[serde(default)]
    pub keywords: Vec<ArasaacKeyword>,
}

/// A pictogram search result as the app consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pictogram {
    pub id: u64,
    pub keyword: String,
    /// Image URL templated from the numeric id
    pub pictogram_url: String,
}

/// Minimal user profile cached on the device under the `userData` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}
