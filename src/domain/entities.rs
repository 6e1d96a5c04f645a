//! Domain entities mirrored from persistent storage.

use chrono_tz::Tz;
use serde::Serialize;
use time::{Date, OffsetDateTime, Time};
use uuid::Uuid;

use crate::domain::types::EventType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRecord {
    pub full_name: String,
    pub nickname: String,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub instagram: Option<String>,
    pub photo_url: Option<String>,
}

/// Venue and schedule of the first ceremony; every field is required.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeremonyRecord {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Option<Time>,
    pub venue_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub maps_url: Option<String>,
}

/// Second ceremony. Absent fields and set `same_*` flags fall back to event 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecondCeremonyRecord {
    pub same_date: bool,
    pub same_time: bool,
    pub same_venue: bool,
    pub date: Option<Date>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub maps_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub slug: String,
    pub event_type: EventType,
    pub custom_event1_label: Option<String>,
    pub custom_event2_label: Option<String>,
    pub timezone: Tz,
    pub cover_image_url: Option<String>,
    pub bride: PersonRecord,
    pub groom: PersonRecord,
    pub event1: CeremonyRecord,
    pub event2: SecondCeremonyRecord,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreetingSettingsRecord {
    pub registration_id: Uuid,
    pub is_enabled: bool,
    pub title: Option<String>,
    pub message: Option<String>,
    pub quote_text: Option<String>,
    pub quote_source: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoveStorySettingsRecord {
    pub registration_id: Uuid,
    pub is_enabled: bool,
    pub main_title: Option<String>,
    pub background_image_url: Option<String>,
    /// Stored as free text; older rows hold values such as `"50%"`.
    pub overlay_opacity: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoveStoryBlockRecord {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub title: String,
    pub date_label: Option<String>,
    pub body: String,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GallerySettingsRecord {
    pub registration_id: Uuid,
    pub is_enabled: bool,
    pub title: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryImageRecord {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub image_url: String,
    pub caption: Option<String>,
    pub display_order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeddingGiftSettingsRecord {
    pub registration_id: Uuid,
    pub is_enabled: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_address: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankAccountRecord {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub display_order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosingSettingsRecord {
    pub registration_id: Uuid,
    pub is_enabled: bool,
    pub title: Option<String>,
    pub message: Option<String>,
    pub background_image_url: Option<String>,
    pub overlay_opacity: Option<String>,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicSettingsRecord {
    pub registration_id: Uuid,
    pub is_enabled: bool,
    pub audio_url: Option<String>,
    pub title: Option<String>,
    pub autoplay: bool,
    pub loop_playback: bool,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSettingsRecord {
    pub registration_id: Uuid,
    pub theme_key: String,
    pub locale: Option<String>,
    pub countdown_enabled: bool,
    pub rsvp_enabled: bool,
    pub guestbook_enabled: bool,
    pub updated_at: OffsetDateTime,
}
