//! Domain model for parental settings.
//!
//! Unlike display settings, this record is owned by the remote service; the
//! device only holds a cache that is reconciled on every fetch and save. The
//! model therefore carries a [`diff`](ParentalSettings::diff) that computes
//! the minimal patch to send upstream.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Support level for a child on the autism spectrum; `None` on the parent
/// record means "no special needs".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsdLevel {
    Low,
    Medium,
    High,
}

impl AsdLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AsdLevel::Low => "low",
            AsdLevel::Medium => "medium",
            AsdLevel::High => "high",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "low" => Some(AsdLevel::Low),
            "medium" => Some(AsdLevel::Medium),
            "high" => Some(AsdLevel::High),
            _ => None,
        }
    }
}

/// Weekday tokens as they appear in `downtime_days`. Membership only;
/// order is irrelevant, hence the `BTreeSet` in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "Mon" => Some(Weekday::Mon),
            "Tue" => Some(Weekday::Tue),
            "Wed" => Some(Weekday::Wed),
            "Thu" => Some(Weekday::Thu),
            "Fri" => Some(Weekday::Fri),
            "Sat" => Some(Weekday::Sat),
            "Sun" => Some(Weekday::Sun),
            _ => None,
        }
    }
}

/// Parental settings for one child profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentalSettings {
    /// Absent until the record has been saved remotely once
    pub id: Option<String>,
    pub asd_level: Option<AsdLevel>,
    pub block_inappropriate: bool,
    pub block_violence: bool,
    pub data_sharing_preference: bool,
    pub downtime_enabled: bool,
    pub require_passcode: bool,
    /// String-encoded integer, kept as a string to avoid leading-zero and
    /// empty-field friction while editing
    pub daily_limit_hours: String,
    pub downtime_days: BTreeSet<Weekday>,
    /// "HH:MM"
    pub downtime_start: String,
    /// "HH:MM"
    pub downtime_end: String,
    /// Ordered; each entry unique case-insensitively
    pub notify_emails: Vec<String>,
}

impl Default for ParentalSettings {
    fn default() -> Self {
        Self {
            id: None,
            asd_level: None,
            block_inappropriate: false,
            block_violence: false,
            data_sharing_preference: false,
            downtime_enabled: false,
            require_passcode: false,
            daily_limit_hours: String::new(),
            downtime_days: BTreeSet::new(),
            downtime_start: "20:00".to_string(),
            downtime_end: "07:00".to_string(),
            notify_emails: Vec::new(),
        }
    }
}

/// Minimal field diff between a local edit and its fetched baseline.
/// `None` means "unchanged, do not send".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentalSettingsPatch {
    pub asd_level: Option<Option<AsdLevel>>,
    pub block_inappropriate: Option<bool>,
    pub block_violence: Option<bool>,
    pub data_sharing_preference: Option<bool>,
    pub downtime_enabled: Option<bool>,
    pub require_passcode: Option<bool>,
    pub daily_limit_hours: Option<String>,
    pub downtime_days: Option<BTreeSet<Weekday>>,
    pub downtime_start: Option<String>,
    pub downtime_end: Option<String>,
    pub notify_emails: Option<Vec<String>>,
}

impl ParentalSettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ParentalSettings {
    /// Compute the minimal patch that turns `baseline` into `self`.
    pub fn diff(&self, baseline: &ParentalSettings) -> ParentalSettingsPatch {
        let mut patch = ParentalSettingsPatch::default();

        if self.asd_level != baseline.asd_level {
            patch.asd_level = Some(self.asd_level);
        }
        if self.block_inappropriate != baseline.block_inappropriate {
            patch.block_inappropriate = Some(self.block_inappropriate);
        }
        if self.block_violence != baseline.block_violence {
            patch.block_violence = Some(self.block_violence);
        }
        if self.data_sharing_preference != baseline.data_sharing_preference {
            patch.data_sharing_preference = Some(self.data_sharing_preference);
        }
        if self.downtime_enabled != baseline.downtime_enabled {
            patch.downtime_enabled = Some(self.downtime_enabled);
        }
        if self.require_passcode != baseline.require_passcode {
            patch.require_passcode = Some(self.require_passcode);
        }
        if self.daily_limit_hours != baseline.daily_limit_hours {
            patch.daily_limit_hours = Some(self.daily_limit_hours.clone());
        }
        if self.downtime_days != baseline.downtime_days {
            patch.downtime_days = Some(self.downtime_days.clone());
        }
        if self.downtime_start != baseline.downtime_start {
            patch.downtime_start = Some(self.downtime_start.clone());
        }
        if self.downtime_end != baseline.downtime_end {
            patch.downtime_end = Some(self.downtime_end.clone());
        }
        if self.notify_emails != baseline.notify_emails {
            patch.notify_emails = Some(self.notify_emails.clone());
        }

        patch
    }
}

/// Validation errors for the notification email list.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("Please enter a valid email address")]
    InvalidFormat,
    #[error("That email address is already on the list")]
    Duplicate,
}

/// Check an email address for basic structural validity: exactly one `@`,
/// a non-empty local part, and a domain containing a dot. Deliberately
/// loose; the remote service does its own verification.
pub fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut domain_parts = domain.split('.');
    let head = domain_parts.next().unwrap_or("");
    match domain_parts.next() {
        Some(tail) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

/// Validate a candidate for `notify_emails`: structural validity plus
/// case-insensitive uniqueness within the existing list.
pub fn validate_notify_email(
    candidate: &str,
    existing: &[String],
) -> Result<(), EmailValidationError> {
    let candidate = candidate.trim();
    if !is_valid_email(candidate) {
        return Err(EmailValidationError::InvalidFormat);
    }
    let lowered = candidate.to_lowercase();
    if existing.iter().any(|e| e.to_lowercase() == lowered) {
        return Err(EmailValidationError::Duplicate);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_of_identical_settings_is_empty() {
        let settings = ParentalSettings::default();
        assert!(settings.diff(&settings).is_empty());
    }

    #[test]
    fn test_diff_contains_only_changed_fields() {
        let baseline = ParentalSettings::default();
        let mut edited = baseline.clone();
        edited.block_violence = true;
        edited.daily_limit_hours = "2".to_string();

        let patch = edited.diff(&baseline);
        assert_eq!(patch.block_violence, Some(true));
        assert_eq!(patch.daily_limit_hours, Some("2".to_string()));
        assert_eq!(patch.block_inappropriate, None);
        assert_eq!(patch.downtime_days, None);
        assert_eq!(patch.asd_level, None);
    }

    #[test]
    fn test_diff_captures_clearing_asd_level() {
        let mut baseline = ParentalSettings::default();
        baseline.asd_level = Some(AsdLevel::Medium);
        let mut edited = baseline.clone();
        edited.asd_level = None;

        // The outer Some marks the field as changed; the inner None is the
        // new value (no special needs)
        assert_eq!(edited.diff(&baseline).asd_level, Some(None));
    }

    #[test]
    fn test_email_format_validation() {
        assert!(is_valid_email("parent@example.com"));
        assert!(is_valid_email("a.b+c@mail.co.uk"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn test_duplicate_email_check_is_case_insensitive() {
        let existing = vec!["a@x.com".to_string()];
        assert_eq!(
            validate_notify_email("A@x.com", &existing),
            Err(EmailValidationError::Duplicate)
        );
        assert!(validate_notify_email("b@x.com", &existing).is_ok());
    }

    #[test]
    fn test_weekday_token_round_trip() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(Weekday::parse(day.as_str()), Some(day));
        }
        assert_eq!(Weekday::parse("Monday"), None);
    }
}
