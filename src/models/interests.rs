use serde::{Deserialize, Serialize};

/// Followed stocks and sectors, independent of bookmarks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInterests {
    #[serde(default)]
    pub stocks: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub preferred_country: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Member,
    Pro,
}

impl Default for Membership {
    fn default() -> Self {
        Membership::Member
    }
}

impl Membership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Membership::Member => "member",
            Membership::Pro => "pro",
        }
    }

    /// Unknown or absent values fall back to the free tier.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("pro") => Membership::Pro,
            _ => Membership::Member,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }
}
