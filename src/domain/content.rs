//! The compiled invitation document served to public pages.
//!
//! Every top-level key is required when decoding: a stored document that lacks
//! one of them was written by an older shape and must be recompiled.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledContent {
    pub profile: ProfileContent,
    pub bride: PersonContent,
    pub groom: PersonContent,
    pub event: EventContent,
    pub greetings: GreetingsContent,
    pub event_details: EventDetailsContent,
    pub love_story: LoveStoryContent,
    pub gallery: GalleryContent,
    pub wedding_gift: WeddingGiftContent,
    pub closing: ClosingContent,
    pub music_settings: MusicContent,
}

impl CompiledContent {
    pub fn slug(&self) -> &str {
        &self.profile.slug
    }

    pub fn theme_key(&self) -> &str {
        &self.profile.theme_key
    }

    /// Canonical JSON bytes. Field order follows the struct layout, so equal
    /// documents always serialize identically.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Hex-encoded SHA-256 of the canonical JSON bytes.
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let bytes = self.to_canonical_json()?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContent {
    pub slug: String,
    pub couple_names: String,
    pub theme_key: String,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub countdown: bool,
    pub rsvp: bool,
    pub guestbook: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            countdown: true,
            rsvp: true,
            guestbook: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonContent {
    pub full_name: String,
    pub nickname: String,
    pub parents_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContent {
    /// ISO-8601 calendar date of the first ceremony.
    pub date: String,
    pub date_label: String,
    pub time_label: String,
    pub timezone: String,
    /// RFC 3339 instant of the first ceremony's start, in the event timezone.
    pub countdown_target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreetingsContent {
    pub is_enabled: bool,
    pub title: String,
    pub message: String,
    pub quote: String,
    pub quote_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsContent {
    pub holy_matrimony: EventBlockContent,
    pub reception: EventBlockContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBlockContent {
    pub title: String,
    pub date: String,
    pub date_label: String,
    pub time_label: String,
    pub venue_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoveStoryContent {
    pub is_enabled: bool,
    pub main_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    pub overlay_opacity: f64,
    pub blocks: Vec<LoveStoryBlockContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoveStoryBlockContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryContent {
    pub is_enabled: bool,
    pub title: String,
    pub top_row_images: Vec<GalleryImageContent>,
    pub middle_images: Vec<GalleryImageContent>,
    pub bottom_grid_images: Vec<GalleryImageContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageContent {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeddingGiftContent {
    pub is_enabled: bool,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_address: Option<String>,
    pub bank_accounts: Vec<BankAccountContent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountContent {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingContent {
    pub is_enabled: bool,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    pub overlay_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicContent {
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}
