use log::warn;
use std::collections::BTreeSet;

use crate::domain::models::{AsdLevel, ParentalSettings, ParentalSettingsPatch, Weekday};
use shared::{ParentalSettingsDto, ParentalSettingsPatchDto};

/// Mapper between the snake_case parental wire format and the domain model.
pub struct ParentalMapper;

impl ParentalMapper {
    /// Converts a wire snapshot to the domain model.
    ///
    /// Lenient on enum-ish tokens: an unknown `asd_level` degrades to
    /// "no special needs" and unknown weekday tokens are skipped, each with
    /// a warning. The record is server-owned, so a hard failure here would
    /// only make the settings screen unusable.
    pub fn to_domain(dto: ParentalSettingsDto) -> ParentalSettings {
        let asd_level = match dto.asd_level.as_deref() {
            None => None,
            Some(token) => match AsdLevel::parse(token) {
                Some(level) => Some(level),
                None => {
                    warn!("Server sent unknown asd_level '{}', treating as none", token);
                    None
                }
            },
        };

        let mut downtime_days = BTreeSet::new();
        for token in &dto.downtime_days {
            match Weekday::parse(token) {
                Some(day) => {
                    downtime_days.insert(day);
                }
                None => warn!("Server sent unknown weekday token '{}', skipping", token),
            }
        }

        ParentalSettings {
            id: dto.id,
            asd_level,
            block_inappropriate: dto.block_inappropriate,
            block_violence: dto.block_violence,
            data_sharing_preference: dto.data_sharing_preference,
            downtime_enabled: dto.downtime_enabled,
            require_passcode: dto.require_passcode,
            daily_limit_hours: dto.daily_limit_hours,
            downtime_days,
            downtime_start: dto.downtime_start,
            downtime_end: dto.downtime_end,
            notify_emails: dto.notify_emails,
        }
    }

    /// Converts the domain model to a full wire snapshot.
    pub fn to_dto(domain: &ParentalSettings) -> ParentalSettingsDto {
        ParentalSettingsDto {
            id: domain.id.clone(),
            asd_level: domain.asd_level.map(|level| level.as_str().to_string()),
            block_inappropriate: domain.block_inappropriate,
            block_violence: domain.block_violence,
            data_sharing_preference: domain.data_sharing_preference,
            downtime_enabled: domain.downtime_enabled,
            require_passcode: domain.require_passcode,
            daily_limit_hours: domain.daily_limit_hours.clone(),
            downtime_days: domain
                .downtime_days
                .iter()
                .map(|day| day.as_str().to_string())
                .collect(),
            downtime_start: domain.downtime_start.clone(),
            downtime_end: domain.downtime_end.clone(),
            notify_emails: domain.notify_emails.clone(),
        }
    }

    /// Converts a domain diff to the partial wire payload.
    pub fn patch_to_dto(patch: &ParentalSettingsPatch) -> ParentalSettingsPatchDto {
        ParentalSettingsPatchDto {
            asd_level: patch
                .asd_level
                .map(|level| level.map(|l| l.as_str().to_string())),
            block_inappropriate: patch.block_inappropriate,
            block_violence: patch.block_violence,
            data_sharing_preference: patch.data_sharing_preference,
            downtime_enabled: patch.downtime_enabled,
            require_passcode: patch.require_passcode,
            daily_limit_hours: patch.daily_limit_hours.clone(),
            downtime_days: patch.downtime_days.as_ref().map(|days| {
                days.iter().map(|day| day.as_str().to_string()).collect()
            }),
            downtime_start: patch.downtime_start.clone(),
            downtime_end: patch.downtime_end.clone(),
            notify_emails: patch.notify_emails.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto() -> ParentalSettingsDto {
        ParentalSettingsDto {
            id: Some("ps_1".to_string()),
            asd_level: Some("medium".to_string()),
            block_inappropriate: true,
            block_violence: true,
            data_sharing_preference: false,
            downtime_enabled: true,
            require_passcode: false,
            daily_limit_hours: "3".to_string(),
            downtime_days: vec!["Sat".to_string(), "Mon".to_string()],
            downtime_start: "20:30".to_string(),
            downtime_end: "07:00".to_string(),
            notify_emails: vec!["parent@example.com".to_string()],
        }
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let domain = ParentalMapper::to_domain(sample_dto());
        assert_eq!(domain.asd_level, Some(AsdLevel::Medium));
        assert!(domain.downtime_days.contains(&Weekday::Mon));
        assert!(domain.downtime_days.contains(&Weekday::Sat));

        let dto = ParentalMapper::to_dto(&domain);
        // BTreeSet ordering normalizes day order; membership is what matters
        assert_eq!(dto.downtime_days.len(), 2);
        assert_eq!(dto.asd_level.as_deref(), Some("medium"));
        assert_eq!(dto.daily_limit_hours, "3");
    }

    #[test]
    fn test_unknown_tokens_are_lenient() {
        let mut dto = sample_dto();
        dto.asd_level = Some("extreme".to_string());
        dto.downtime_days = vec!["Mon".to_string(), "Monday".to_string()];

        let domain = ParentalMapper::to_domain(dto);
        assert_eq!(domain.asd_level, None);
        assert_eq!(domain.downtime_days.len(), 1);
    }

    #[test]
    fn test_patch_dto_distinguishes_clear_from_unchanged() {
        let patch = ParentalSettingsPatch {
            asd_level: Some(None),
            ..Default::default()
        };

        let json = serde_json::to_value(ParentalMapper::patch_to_dto(&patch)).unwrap();
        let object = json.as_object().unwrap();
        // asd_level is present (explicit null); untouched fields are absent
        assert_eq!(object.len(), 1);
        assert!(object["asd_level"].is_null());
    }
}
