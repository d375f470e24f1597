//! Closed sets of theme choices offered by the design console.

use serde::{Deserialize, Serialize};

/// Errors produced when parsing a theme choice from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// Unknown font family.
    #[error("unknown font family: {0} (expected modern, elegant, tech or mono)")]
    UnknownFont(String),
    /// Unknown button radius.
    #[error("unknown button radius: {0} (expected none, md, xl or full)")]
    UnknownRadius(String),
}

/// Typeface used across the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Modern,
    Elegant,
    Tech,
    Mono,
}

impl FontFamily {
    /// All choices, in display order.
    pub const ALL: [Self; 4] = [Self::Modern, Self::Elegant, Self::Tech, Self::Mono];

    /// Stored name of this choice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Elegant => "elegant",
            Self::Tech => "tech",
            Self::Mono => "mono",
        }
    }
}

impl std::fmt::Display for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FontFamily {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|font| font.as_str() == s.trim())
            .ok_or_else(|| ThemeError::UnknownFont(s.to_owned()))
    }
}

/// Corner radius applied to buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ButtonRadius {
    None,
    Md,
    #[default]
    Xl,
    Full,
}

impl ButtonRadius {
    /// All choices, in display order.
    pub const ALL: [Self; 4] = [Self::None, Self::Md, Self::Xl, Self::Full];

    /// Stored name of this choice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Md => "md",
            Self::Xl => "xl",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for ButtonRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ButtonRadius {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|radius| radius.as_str() == s.trim())
            .ok_or_else(|| ThemeError::UnknownRadius(s.to_owned()))
    }
}
