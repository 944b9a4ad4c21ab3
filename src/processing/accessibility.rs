//! Display settings for readers with dyslexia or ADHD
//!
//! Rendering happens client-side; the server only validates and echoes the
//! normalized settings.

use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Spacing {
    #[default]
    Normal,
    Wide,
    ExtraWide,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Font {
    #[default]
    Default,
    OpenDyslexic,
    ComicSans,
    Arial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorTheme {
    #[default]
    Default,
    HighContrast,
    Sepia,
    Dark,
}

impl Spacing {
    fn parse(value: &str) -> Option<Self> {
        match normalize(value).as_str() {
            "normal" => Some(Self::Normal),
            "wide" => Some(Self::Wide),
            "extra-wide" => Some(Self::ExtraWide),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Wide => "wide",
            Self::ExtraWide => "extra-wide",
        }
    }
}

impl Font {
    fn parse(value: &str) -> Option<Self> {
        match normalize(value).as_str() {
            "default" => Some(Self::Default),
            "open-dyslexic" | "opendyslexic" => Some(Self::OpenDyslexic),
            "comic-sans" | "comicsans" => Some(Self::ComicSans),
            "arial" => Some(Self::Arial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::OpenDyslexic => "open-dyslexic",
            Self::ComicSans => "comic-sans",
            Self::Arial => "arial",
        }
    }
}

impl ColorTheme {
    fn parse(value: &str) -> Option<Self> {
        match normalize(value).as_str() {
            "default" => Some(Self::Default),
            "high-contrast" => Some(Self::HighContrast),
            "sepia" => Some(Self::Sepia),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HighContrast => "high-contrast",
            Self::Sepia => "sepia",
            Self::Dark => "dark",
        }
    }
}

/// Lower-case, with spaces and underscores turned into hyphens
fn normalize(value: &str) -> String {
    value.trim().to_lowercase().replace([' ', '_'], "-")
}

/// Validated accessibility settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessibilitySettings {
    pub spacing: Spacing,
    pub font: Font,
    pub color_theme: ColorTheme,
}

impl AccessibilitySettings {
    /// Parse client settings; unknown values are rejected, unknown keys ignored
    pub fn from_map(raw: &HashMap<String, String>) -> Result<Self> {
        let mut settings = Self::default();
        for (key, value) in raw {
            match key.as_str() {
                "spacing" | "letter_spacing" | "letterSpacing" => {
                    settings.spacing = Spacing::parse(value)
                        .ok_or_else(|| anyhow!("unknown spacing '{value}' (normal, wide, extra-wide)"))?;
                }
                "font" => {
                    settings.font = Font::parse(value).ok_or_else(|| {
                        anyhow!("unknown font '{value}' (default, open-dyslexic, comic-sans, arial)")
                    })?;
                }
                "colorTheme" | "color_theme" | "theme" => {
                    settings.color_theme = ColorTheme::parse(value).ok_or_else(|| {
                        anyhow!("unknown color theme '{value}' (default, high-contrast, sepia, dark)")
                    })?;
                }
                other => tracing::debug!(key = other, "Ignoring unknown accessibility setting"),
            }
        }
        Ok(settings)
    }

    /// Normalized settings echoed to the client
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("spacing".to_string(), self.spacing.as_str().to_string()),
            ("font".to_string(), self.font.as_str().to_string()),
            ("colorTheme".to_string(), self.color_theme.as_str().to_string()),
        ])
    }
}
