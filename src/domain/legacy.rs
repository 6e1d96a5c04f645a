//! Decoding of stored documents, including rows written by the first
//! generation of the compiler (`clientProfile`, `clouds`, `event_cloud`).

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::content::{
    ClosingContent, CompiledContent, EventBlockContent, EventContent, EventDetailsContent,
    FeatureFlags, GalleryContent, GreetingsContent, LoveStoryContent, PersonContent,
    ProfileContent, WeddingGiftContent,
};
use super::defaults;
use super::types::Locale;

const LEGACY_MARKERS: [&str; 3] = ["clientProfile", "clouds", "event_cloud"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    LegacyV1,
    Unknown,
}

impl DocumentShape {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentShape::LegacyV1 => "legacy_v1",
            DocumentShape::Unknown => "unknown",
        }
    }
}

/// A stored document that does not decode into the current shape.
///
/// `upgraded` carries the adapted document when the row is a well-formed
/// legacy document.
#[derive(Debug, Clone, Error)]
#[error("stored document has {} shape: {reason}", shape.as_str())]
pub struct ShapeMismatch {
    pub shape: DocumentShape,
    pub reason: String,
    pub upgraded: Option<Box<CompiledContent>>,
}

pub fn decode_document(value: Value) -> Result<CompiledContent, ShapeMismatch> {
    let is_legacy = value
        .as_object()
        .is_some_and(|object| LEGACY_MARKERS.iter().any(|key| object.contains_key(*key)));

    if is_legacy {
        return Err(match serde_json::from_value::<LegacyContentV1>(value) {
            Ok(legacy) => ShapeMismatch {
                shape: DocumentShape::LegacyV1,
                reason: "legacy keys present".to_string(),
                upgraded: Some(Box::new(legacy.upgrade())),
            },
            Err(err) => ShapeMismatch {
                shape: DocumentShape::LegacyV1,
                reason: err.to_string(),
                upgraded: None,
            },
        });
    }

    serde_json::from_value::<CompiledContent>(value).map_err(|err| ShapeMismatch {
        shape: DocumentShape::Unknown,
        reason: err.to_string(),
        upgraded: None,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyContentV1 {
    client_profile: LegacyProfile,
    bride: PersonContent,
    groom: PersonContent,
    event: EventContent,
    clouds: LegacyClouds,
    #[serde(rename = "event_cloud")]
    event_cloud: LegacyEventCloud,
    love_story: LoveStoryContent,
    gallery: GalleryContent,
    wedding_gift: WeddingGiftContent,
    closing: ClosingContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyProfile {
    slug: String,
    #[serde(default)]
    couple_names: Option<String>,
    #[serde(default)]
    theme_key: Option<String>,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    cover_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyClouds {
    #[serde(default = "enabled")]
    is_enabled: bool,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    quote: Option<String>,
    #[serde(default)]
    quote_source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyEventCloud {
    akad: EventBlockContent,
    resepsi: EventBlockContent,
}

fn enabled() -> bool {
    true
}

impl LegacyContentV1 {
    fn upgrade(self) -> CompiledContent {
        let couple_names = self
            .client_profile
            .couple_names
            .unwrap_or_else(|| format!("{} & {}", self.bride.nickname, self.groom.nickname));
        let locale = self
            .client_profile
            .locale
            .as_deref()
            .and_then(|value| value.parse::<Locale>().ok())
            .unwrap_or_default();

        let fallback = defaults::greetings(self.clouds.is_enabled);
        let greetings = GreetingsContent {
            is_enabled: self.clouds.is_enabled,
            title: self.clouds.title.unwrap_or(fallback.title),
            message: self.clouds.message.unwrap_or(fallback.message),
            quote: self.clouds.quote.unwrap_or(fallback.quote),
            quote_source: self.clouds.quote_source.unwrap_or(fallback.quote_source),
        };

        CompiledContent {
            profile: ProfileContent {
                slug: self.client_profile.slug,
                couple_names,
                theme_key: self
                    .client_profile
                    .theme_key
                    .unwrap_or_else(|| defaults::DEFAULT_THEME_KEY.to_string()),
                locale: locale.as_str().to_string(),
                cover_image_url: self.client_profile.cover_image_url,
                features: FeatureFlags::default(),
            },
            bride: self.bride,
            groom: self.groom,
            event: self.event,
            greetings,
            event_details: EventDetailsContent {
                holy_matrimony: self.event_cloud.akad,
                reception: self.event_cloud.resepsi,
            },
            love_story: self.love_story,
            gallery: self.gallery,
            wedding_gift: self.wedding_gift,
            closing: self.closing,
            music_settings: defaults::music(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(name: &str) -> Value {
        json!({ "fullName": name, "nickname": name, "parentsLabel": "" })
    }

    fn block(title: &str) -> Value {
        json!({
            "title": title,
            "date": "2025-06-01",
            "dateLabel": "Minggu, 1 Juni 2025",
            "timeLabel": "08:00–10:00 WIB",
            "venueName": "Masjid Agung",
            "address": "Jakarta"
        })
    }

    fn legacy_document() -> Value {
        json!({
            "clientProfile": { "slug": "ayu-budi", "themeKey": "rustic" },
            "bride": person("Ayu"),
            "groom": person("Budi"),
            "event": {
                "date": "2025-06-01",
                "dateLabel": "Minggu, 1 Juni 2025",
                "timeLabel": "08:00–10:00 WIB",
                "timezone": "Asia/Jakarta",
                "countdownTarget": "2025-06-01T08:00:00+07:00"
            },
            "clouds": { "title": "Bismillah" },
            "event_cloud": { "akad": block("Akad Nikah"), "resepsi": block("Resepsi") },
            "loveStory": serde_json::to_value(defaults::love_story(true)).unwrap(),
            "gallery": serde_json::to_value(defaults::gallery(true)).unwrap(),
            "weddingGift": serde_json::to_value(defaults::wedding_gift(true)).unwrap(),
            "closing": serde_json::to_value(defaults::closing(true)).unwrap()
        })
    }

    #[test]
    fn legacy_document_is_upgraded() {
        let err = decode_document(legacy_document()).expect_err("legacy shape");
        assert_eq!(err.shape, DocumentShape::LegacyV1);

        let upgraded = err.upgraded.expect("upgradable");
        assert_eq!(upgraded.slug(), "ayu-budi");
        assert_eq!(upgraded.theme_key(), "rustic");
        assert_eq!(upgraded.profile.couple_names, "Ayu & Budi");
        assert_eq!(upgraded.greetings.title, "Bismillah");
        assert_eq!(
            upgraded.greetings.quote_source,
            defaults::DEFAULT_GREETING_QUOTE_SOURCE
        );
        assert_eq!(upgraded.event_details.holy_matrimony.title, "Akad Nikah");
        assert_eq!(upgraded.event_details.reception.title, "Resepsi");
        assert!(!upgraded.music_settings.is_enabled);
    }

    #[test]
    fn broken_legacy_document_has_no_upgrade() {
        let mut document = legacy_document();
        document
            .as_object_mut()
            .expect("object")
            .remove("event_cloud");
        document["clouds"] = json!("not an object");

        let err = decode_document(document).expect_err("legacy shape");
        assert_eq!(err.shape, DocumentShape::LegacyV1);
        assert!(err.upgraded.is_none());
    }

    #[test]
    fn missing_top_level_key_is_unknown_shape() {
        let err = decode_document(json!({ "profile": {} })).expect_err("incomplete");
        assert_eq!(err.shape, DocumentShape::Unknown);
        assert!(err.upgraded.is_none());
    }
}
