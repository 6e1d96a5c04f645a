//! Shared domain enumerations aligned with persisted database enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ceremony flavour chosen at registration; drives the two ceremony titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "event_type", rename_all = "snake_case")]
pub enum EventType {
    Islam,
    Kristen,
    Katolik,
    Hindu,
    Buddha,
    Custom,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Islam => "islam",
            EventType::Kristen => "kristen",
            EventType::Katolik => "katolik",
            EventType::Hindu => "hindu",
            EventType::Buddha => "buddha",
            EventType::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for EventType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "islam" => Ok(EventType::Islam),
            "kristen" | "christian" => Ok(EventType::Kristen),
            "katolik" | "catholic" => Ok(EventType::Katolik),
            "hindu" => Ok(EventType::Hindu),
            "buddha" | "buddhist" => Ok(EventType::Buddha),
            "custom" => Ok(EventType::Custom),
            _ => Err(()),
        }
    }
}

/// Locales the compiler can render labels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Id,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Id => "id",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale `{0}`")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "id" | "id-id" | "id_id" => Ok(Locale::Id),
            "en" | "en-us" | "en_us" | "en-gb" | "en_gb" => Ok(Locale::En),
            _ => Err(UnknownLocale(value.to_string())),
        }
    }
}

/// Editable content areas of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Registration,
    Greetings,
    LoveStory,
    Gallery,
    WeddingGift,
    Closing,
    Music,
    Theme,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Registration => "registration",
            SectionKind::Greetings => "greetings",
            SectionKind::LoveStory => "love_story",
            SectionKind::Gallery => "gallery",
            SectionKind::WeddingGift => "wedding_gift",
            SectionKind::Closing => "closing",
            SectionKind::Music => "music",
            SectionKind::Theme => "theme",
        }
    }
}
