// src/platform.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Upwork,
    Indeed,
    Behance,
    Freelance,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::LinkedIn,
        Platform::Upwork,
        Platform::Indeed,
        Platform::Behance,
        Platform::Freelance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Upwork => "upwork",
            Platform::Indeed => "indeed",
            Platform::Behance => "behance",
            Platform::Freelance => "freelance",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Upwork => "Upwork",
            Platform::Indeed => "Indeed",
            Platform::Behance => "Behance",
            Platform::Freelance => "Freelancer",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(Platform::LinkedIn),
            "upwork" => Ok(Platform::Upwork),
            "indeed" => Ok(Platform::Indeed),
            "behance" => Ok(Platform::Behance),
            "freelance" | "freelancer" => Ok(Platform::Freelance),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
        assert_eq!("Freelancer".parse::<Platform>(), Ok(Platform::Freelance));
        assert!("monster".parse::<Platform>().is_err());
    }
}
