use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which variant of a routine pack is being viewed or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Daytime,
    Nighttime,
}

impl Mode {
    /// Maps the day/night toggle state to a mode.
    pub fn from_daytime(is_daytime: bool) -> Self {
        if is_daytime {
            Mode::Daytime
        } else {
            Mode::Nighttime
        }
    }

    pub fn is_daytime(&self) -> bool {
        matches!(self, Mode::Daytime)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Daytime => write!(f, "daytime"),
            Mode::Nighttime => write!(f, "nighttime"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daytime" => Ok(Mode::Daytime),
            "night" | "nighttime" => Ok(Mode::Nighttime),
            _ => Err(format!(
                "Invalid mode '{}'. Valid options: daytime, nighttime",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(format!("{}", Mode::Daytime), "daytime");
        assert_eq!(format!("{}", Mode::Nighttime), "nighttime");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("daytime").unwrap(), Mode::Daytime);
        assert_eq!(Mode::from_str("day").unwrap(), Mode::Daytime);
        assert_eq!(Mode::from_str("NIGHT").unwrap(), Mode::Nighttime);
        assert_eq!(Mode::from_str("nighttime").unwrap(), Mode::Nighttime);
        assert!(Mode::from_str("dawn").is_err());
    }

    #[test]
    fn test_mode_from_daytime() {
        assert_eq!(Mode::from_daytime(true), Mode::Daytime);
        assert_eq!(Mode::from_daytime(false), Mode::Nighttime);
    }

    #[test]
    fn test_mode_json_roundtrip() {
        let json = serde_json::to_string(&Mode::Daytime).unwrap();
        assert_eq!(json, "\"daytime\"");

        let parsed: Mode = serde_json::from_str("\"nighttime\"").unwrap();
        assert_eq!(parsed, Mode::Nighttime);
    }
}
