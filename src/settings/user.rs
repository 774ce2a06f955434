//! Household settings collected at onboarding

use serde::{Deserialize, Serialize};

use crate::core::error::{QatraError, Result};

/// Days of the week, Saturday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Saturday,
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Case-insensitive name or three-letter prefix
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_ascii_lowercase();
        if input.len() < 3 {
            return None;
        }
        Self::ALL.into_iter().find(|day| {
            let name = format!("{:?}", day).to_ascii_lowercase();
            name.starts_with(&input)
        })
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub name: String,
    pub tank_count: u32,
    pub refill_day: Weekday,
    /// Free text about when the municipal supply stops
    #[serde(default)]
    pub refill_stop_info: String,
}

impl UserSettings {
    pub fn new(name: impl Into<String>, tank_count: u32, refill_day: Weekday) -> Self {
        Self {
            name: name.into(),
            tank_count,
            refill_day,
            refill_stop_info: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(QatraError::InvalidSettings("name must not be empty".into()));
        }
        if self.tank_count == 0 {
            return Err(QatraError::InvalidSettings(
                "at least one tank is required".into(),
            ));
        }
        Ok(())
    }
}

/// Tank count as typed by the user: positive integers parse, anything else is 0
pub fn parse_tank_count(input: &str) -> u32 {
    input.trim().parse::<u32>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tank_count() {
        assert_eq!(parse_tank_count("3"), 3);
        assert_eq!(parse_tank_count(" 2 "), 2);
        assert_eq!(parse_tank_count("0"), 0);
        assert_eq!(parse_tank_count("-1"), 0);
        assert_eq!(parse_tank_count("two"), 0);
        assert_eq!(parse_tank_count(""), 0);
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!(Weekday::parse("sat"), Some(Weekday::Saturday));
        assert_eq!(Weekday::parse("Thursday"), Some(Weekday::Thursday));
        assert_eq!(Weekday::parse("th"), None);
        assert_eq!(Weekday::parse("noday"), None);
    }

    #[test]
    fn test_week_starts_saturday() {
        assert_eq!(Weekday::ALL[0], Weekday::Saturday);
        assert_eq!(Weekday::ALL[6], Weekday::Friday);
    }

    #[test]
    fn test_validate() {
        assert!(UserSettings::new("Huda", 2, Weekday::Monday).validate().is_ok());
        assert!(UserSettings::new(" ", 2, Weekday::Monday).validate().is_err());
        assert!(UserSettings::new("Huda", 0, Weekday::Monday).validate().is_err());
    }

    #[test]
    fn test_serializes_as_flat_camel_case() {
        let settings = UserSettings {
            refill_stop_info: "Supply stops Friday noon".into(),
            ..UserSettings::new("Huda", 2, Weekday::Sunday)
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["tankCount"], 2);
        assert_eq!(json["refillDay"], "Sunday");
        assert_eq!(json["refillStopInfo"], "Supply stops Friday noon");
    }
}
