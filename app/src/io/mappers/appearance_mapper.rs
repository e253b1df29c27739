use log::warn;

use crate::domain::models::{
    ContrastMode, DisplaySettings, DisplaySettingsPatch, GridLayout, TextSize,
};
use shared::{AppearanceSettingsDto, AppearanceSettingsPatchDto};

/// Mapper between the snake_case appearance wire format and the domain
/// display-settings model.
pub struct AppearanceMapper;

impl AppearanceMapper {
    /// Converts a wire snapshot to the domain model.
    ///
    /// Enum tokens the client does not know (a newer server) degrade to the
    /// documented default for that field, with a warning; the server stays
    /// authoritative for everything it sent that we do understand.
    pub fn to_domain(dto: AppearanceSettingsDto) -> DisplaySettings {
        DisplaySettings {
            layout: parse_enum_token(&dto.layout, "layout"),
            brightness: if dto.brightness <= 100 {
                dto.brightness
            } else {
                warn!("Server sent out-of-range brightness {}, using default", dto.brightness);
                DisplaySettings::default().brightness
            },
            brightness_locked: dto.brightness_locked,
            text_size: parse_enum_token(&dto.text_size, "text_size"),
            dark_mode_enabled: dto.dark_mode_enabled,
            contrast_mode: parse_enum_token(&dto.contrast_mode, "contrast_mode"),
        }
    }

    /// Converts the domain model to a full wire snapshot.
    pub fn to_dto(domain: &DisplaySettings) -> AppearanceSettingsDto {
        AppearanceSettingsDto {
            layout: enum_token(&domain.layout),
            brightness: domain.brightness,
            brightness_locked: domain.brightness_locked,
            text_size: enum_token(&domain.text_size),
            dark_mode_enabled: domain.dark_mode_enabled,
            contrast_mode: enum_token(&domain.contrast_mode),
        }
    }

    /// Converts a domain diff to the partial wire payload.
    pub fn patch_to_dto(patch: &DisplaySettingsPatch) -> AppearanceSettingsPatchDto {
        AppearanceSettingsPatchDto {
            layout: patch.layout.as_ref().map(enum_token),
            brightness: patch.brightness,
            brightness_locked: patch.brightness_locked,
            text_size: patch.text_size.as_ref().map(enum_token),
            dark_mode_enabled: patch.dark_mode_enabled,
            contrast_mode: patch.contrast_mode.as_ref().map(enum_token),
        }
    }
}

/// Serialize an enum variant to its wire token ("high-contrast-dark" etc.)
/// by round-tripping through its serde representation.
fn enum_token<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(token)) => token,
        _ => String::new(),
    }
}

fn parse_enum_token<T>(token: &str, field: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match serde_json::from_value(serde_json::Value::String(token.to_string())) {
        Ok(value) => value,
        Err(_) => {
            warn!("Server sent unknown {} token '{}', using default", field, token);
            T::default()
        }
    }
}
