//! Pure mapping from section records to the compiled document.

use crate::domain::content::{
    BankAccountContent, ClosingContent, CompiledContent, EventBlockContent, EventContent,
    EventDetailsContent, FeatureFlags, GalleryContent, GalleryImageContent, GreetingsContent,
    LoveStoryBlockContent, LoveStoryContent, MusicContent, PersonContent, ProfileContent,
    WeddingGiftContent,
};
use crate::domain::defaults;
use crate::domain::entities::{
    BankAccountRecord, ClosingSettingsRecord, GalleryImageRecord, GallerySettingsRecord,
    GreetingSettingsRecord, LoveStoryBlockRecord, LoveStorySettingsRecord, MusicSettingsRecord,
    PersonRecord, RegistrationRecord, ThemeSettingsRecord, WeddingGiftSettingsRecord,
};
use crate::domain::format::{self, Partner};
use crate::domain::types::Locale;

pub const GALLERY_TOP_ROW_COUNT: usize = 3;
pub const GALLERY_MIDDLE_COUNT: usize = 3;

/// Everything read from the repositories for one registration.
#[derive(Debug, Clone)]
pub struct SectionSources {
    pub registration: RegistrationRecord,
    pub theme: Option<ThemeSettingsRecord>,
    pub greetings: Option<GreetingSettingsRecord>,
    pub love_story: Option<LoveStorySettingsRecord>,
    pub love_story_blocks: Vec<LoveStoryBlockRecord>,
    pub gallery: Option<GallerySettingsRecord>,
    pub gallery_images: Vec<GalleryImageRecord>,
    pub wedding_gift: Option<WeddingGiftSettingsRecord>,
    pub bank_accounts: Vec<BankAccountRecord>,
    pub closing: Option<ClosingSettingsRecord>,
    pub music: Option<MusicSettingsRecord>,
}

pub fn assemble(sources: SectionSources, default_locale: Locale) -> CompiledContent {
    let locale = resolve_locale(sources.theme.as_ref(), default_locale);
    let registration = &sources.registration;

    CompiledContent {
        profile: build_profile(registration, sources.theme.as_ref(), locale),
        bride: build_person(&registration.bride, Partner::Bride, locale),
        groom: build_person(&registration.groom, Partner::Groom, locale),
        event: build_event(registration, locale),
        greetings: build_greetings(sources.greetings.as_ref()),
        event_details: build_event_details(registration, locale),
        love_story: build_love_story(sources.love_story.as_ref(), &sources.love_story_blocks),
        gallery: build_gallery(sources.gallery.as_ref(), &sources.gallery_images),
        wedding_gift: build_wedding_gift(sources.wedding_gift.as_ref(), &sources.bank_accounts),
        closing: build_closing(sources.closing.as_ref()),
        music_settings: build_music(sources.music.as_ref()),
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn text_or(value: Option<&String>, fallback: String) -> String {
    non_blank(value).unwrap_or(fallback)
}

pub fn resolve_locale(theme: Option<&ThemeSettingsRecord>, default_locale: Locale) -> Locale {
    theme
        .and_then(|theme| theme.locale.as_deref())
        .and_then(|locale| locale.parse().ok())
        .unwrap_or(default_locale)
}

pub fn build_profile(
    registration: &RegistrationRecord,
    theme: Option<&ThemeSettingsRecord>,
    locale: Locale,
) -> ProfileContent {
    let features = theme
        .map(|theme| FeatureFlags {
            countdown: theme.countdown_enabled,
            rsvp: theme.rsvp_enabled,
            guestbook: theme.guestbook_enabled,
        })
        .unwrap_or_default();

    ProfileContent {
        slug: registration.slug.clone(),
        couple_names: format!(
            "{} & {}",
            registration.bride.nickname.trim(),
            registration.groom.nickname.trim()
        ),
        theme_key: text_or(
            theme.map(|theme| &theme.theme_key),
            defaults::DEFAULT_THEME_KEY.to_string(),
        ),
        locale: locale.as_str().to_string(),
        cover_image_url: non_blank(registration.cover_image_url.as_ref()),
        features,
    }
}

pub fn build_person(person: &PersonRecord, partner: Partner, locale: Locale) -> PersonContent {
    PersonContent {
        full_name: person.full_name.trim().to_string(),
        nickname: person.nickname.trim().to_string(),
        parents_label: format::parents_label(
            partner,
            person.father_name.as_deref(),
            person.mother_name.as_deref(),
            locale,
        ),
        instagram: format::normalize_instagram(person.instagram.as_deref()),
        photo_url: non_blank(person.photo_url.as_ref()),
    }
}

pub fn build_event(registration: &RegistrationRecord, locale: Locale) -> EventContent {
    let event = &registration.event1;
    let tz = registration.timezone;
    let zone = format::zone_abbreviation(tz, event.date, event.start_time);

    EventContent {
        date: format::iso_date(event.date),
        date_label: format::long_date(event.date, locale),
        time_label: format::time_label(event.start_time, event.end_time, &zone, locale),
        timezone: tz.name().to_string(),
        countdown_target: format::countdown_target(tz, event.date, event.start_time),
    }
}

pub fn build_event_details(registration: &RegistrationRecord, locale: Locale) -> EventDetailsContent {
    let (first_title, second_title) = format::ceremony_titles(
        registration.event_type,
        registration.custom_event1_label.as_deref(),
        registration.custom_event2_label.as_deref(),
    );
    let tz = registration.timezone;
    let first = &registration.event1;
    let second = &registration.event2;

    let holy_matrimony = event_block(
        first_title,
        EventSlot {
            date: first.date,
            start_time: first.start_time,
            end_time: first.end_time,
            venue_name: &first.venue_name,
            address: [
                first.address.as_deref(),
                first.city.as_deref(),
                first.province.as_deref(),
            ],
            maps_url: first.maps_url.as_ref(),
        },
        tz,
        locale,
    );

    let date = match second.date {
        Some(date) if !second.same_date => date,
        _ => first.date,
    };
    let (start_time, end_time) = match second.start_time {
        Some(start) if !second.same_time => (start, second.end_time),
        _ => (first.start_time, first.end_time),
    };
    let own_venue = second
        .venue_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !second.same_venue && !name.is_empty());
    let slot = match own_venue {
        Some(venue_name) => EventSlot {
            date,
            start_time,
            end_time,
            venue_name,
            address: [
                second.address.as_deref(),
                second.city.as_deref(),
                second.province.as_deref(),
            ],
            maps_url: second.maps_url.as_ref(),
        },
        None => EventSlot {
            date,
            start_time,
            end_time,
            venue_name: &first.venue_name,
            address: [
                first.address.as_deref(),
                first.city.as_deref(),
                first.province.as_deref(),
            ],
            maps_url: first.maps_url.as_ref(),
        },
    };
    let reception = event_block(second_title, slot, tz, locale);

    EventDetailsContent {
        holy_matrimony,
        reception,
    }
}

struct EventSlot<'a> {
    date: time::Date,
    start_time: time::Time,
    end_time: Option<time::Time>,
    venue_name: &'a str,
    address: [Option<&'a str>; 3],
    maps_url: Option<&'a String>,
}

fn event_block(
    title: String,
    slot: EventSlot<'_>,
    tz: chrono_tz::Tz,
    locale: Locale,
) -> EventBlockContent {
    let zone = format::zone_abbreviation(tz, slot.date, slot.start_time);
    EventBlockContent {
        title,
        date: format::iso_date(slot.date),
        date_label: format::long_date(slot.date, locale),
        time_label: format::time_label(slot.start_time, slot.end_time, &zone, locale),
        venue_name: slot.venue_name.trim().to_string(),
        address: format::join_address(&slot.address),
        maps_url: non_blank(slot.maps_url),
    }
}

pub fn build_greetings(settings: Option<&GreetingSettingsRecord>) -> GreetingsContent {
    let Some(settings) = settings else {
        return defaults::greetings(true);
    };
    if !settings.is_enabled {
        return defaults::greetings(false);
    }

    let fallback = defaults::greetings(true);
    GreetingsContent {
        is_enabled: true,
        title: text_or(settings.title.as_ref(), fallback.title),
        message: text_or(settings.message.as_ref(), fallback.message),
        quote: text_or(settings.quote_text.as_ref(), fallback.quote),
        quote_source: text_or(settings.quote_source.as_ref(), fallback.quote_source),
    }
}

pub fn build_love_story(
    settings: Option<&LoveStorySettingsRecord>,
    blocks: &[LoveStoryBlockRecord],
) -> LoveStoryContent {
    let Some(settings) = settings else {
        return defaults::love_story(true);
    };
    if !settings.is_enabled {
        return defaults::love_story(false);
    }

    LoveStoryContent {
        is_enabled: true,
        main_title: text_or(
            settings.main_title.as_ref(),
            defaults::DEFAULT_LOVE_STORY_TITLE.to_string(),
        ),
        background_image_url: non_blank(settings.background_image_url.as_ref()),
        overlay_opacity: format::coerce_opacity(
            settings.overlay_opacity.as_deref(),
            defaults::DEFAULT_LOVE_STORY_OPACITY,
        ),
        blocks: blocks
            .iter()
            .map(|block| LoveStoryBlockContent {
                title: block.title.clone(),
                date_label: non_blank(block.date_label.as_ref()),
                body: block.body.clone(),
                image_url: non_blank(block.image_url.as_ref()),
            })
            .collect(),
    }
}

/// Splits images (already in display order) into the three gallery rows.
pub fn split_gallery(
    images: &[GalleryImageRecord],
) -> (
    Vec<GalleryImageContent>,
    Vec<GalleryImageContent>,
    Vec<GalleryImageContent>,
) {
    let mut content = images.iter().map(|image| GalleryImageContent {
        url: image.image_url.clone(),
        caption: non_blank(image.caption.as_ref()),
    });

    let top = content.by_ref().take(GALLERY_TOP_ROW_COUNT).collect();
    let middle = content.by_ref().take(GALLERY_MIDDLE_COUNT).collect();
    let bottom = content.collect();
    (top, middle, bottom)
}

pub fn build_gallery(
    settings: Option<&GallerySettingsRecord>,
    images: &[GalleryImageRecord],
) -> GalleryContent {
    let Some(settings) = settings else {
        return defaults::gallery(true);
    };
    if !settings.is_enabled {
        return defaults::gallery(false);
    }

    let (top_row_images, middle_images, bottom_grid_images) = split_gallery(images);
    GalleryContent {
        is_enabled: true,
        title: text_or(
            settings.title.as_ref(),
            defaults::DEFAULT_GALLERY_TITLE.to_string(),
        ),
        top_row_images,
        middle_images,
        bottom_grid_images,
    }
}

pub fn build_wedding_gift(
    settings: Option<&WeddingGiftSettingsRecord>,
    accounts: &[BankAccountRecord],
) -> WeddingGiftContent {
    let Some(settings) = settings else {
        return defaults::wedding_gift(true);
    };
    if !settings.is_enabled {
        return defaults::wedding_gift(false);
    }

    WeddingGiftContent {
        is_enabled: true,
        title: text_or(
            settings.title.as_ref(),
            defaults::DEFAULT_GIFT_TITLE.to_string(),
        ),
        description: text_or(
            settings.description.as_ref(),
            defaults::DEFAULT_GIFT_DESCRIPTION.to_string(),
        ),
        recipient_name: non_blank(settings.recipient_name.as_ref()),
        recipient_address: non_blank(settings.recipient_address.as_ref()),
        bank_accounts: accounts
            .iter()
            .map(|account| BankAccountContent {
                bank_name: account.bank_name.clone(),
                account_number: account.account_number.clone(),
                account_holder: account.account_holder.clone(),
            })
            .collect(),
    }
}

pub fn build_closing(settings: Option<&ClosingSettingsRecord>) -> ClosingContent {
    let Some(settings) = settings else {
        return defaults::closing(true);
    };
    if !settings.is_enabled {
        return defaults::closing(false);
    }

    ClosingContent {
        is_enabled: true,
        title: text_or(
            settings.title.as_ref(),
            defaults::DEFAULT_CLOSING_TITLE.to_string(),
        ),
        message: text_or(
            settings.message.as_ref(),
            defaults::DEFAULT_CLOSING_MESSAGE.to_string(),
        ),
        background_image_url: non_blank(settings.background_image_url.as_ref()),
        overlay_opacity: format::coerce_opacity(
            settings.overlay_opacity.as_deref(),
            defaults::DEFAULT_CLOSING_OPACITY,
        ),
    }
}

/// Music plays only when enabled with a track configured.
pub fn build_music(settings: Option<&MusicSettingsRecord>) -> MusicContent {
    let Some(settings) = settings.filter(|settings| settings.is_enabled) else {
        return defaults::music();
    };
    let Some(audio_url) = non_blank(settings.audio_url.as_ref()) else {
        return defaults::music();
    };

    MusicContent {
        is_enabled: true,
        audio_url: Some(audio_url),
        title: non_blank(settings.title.as_ref()),
        autoplay: settings.autoplay,
        loop_playback: settings.loop_playback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CeremonyRecord, SecondCeremonyRecord};
    use crate::domain::types::EventType;
    use time::OffsetDateTime;
    use time::macros::{date, time};
    use uuid::Uuid;

    fn person(full_name: &str, nickname: &str) -> PersonRecord {
        PersonRecord {
            full_name: full_name.to_string(),
            nickname: nickname.to_string(),
            father_name: Some("Ahmad".to_string()),
            mother_name: Some("Siti".to_string()),
            instagram: Some("@someone".to_string()),
            photo_url: None,
        }
    }

    fn registration() -> RegistrationRecord {
        RegistrationRecord {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            slug: "ayu-budi".to_string(),
            event_type: EventType::Islam,
            custom_event1_label: None,
            custom_event2_label: None,
            timezone: chrono_tz::Asia::Jakarta,
            cover_image_url: None,
            bride: person("Ayu Lestari", "Ayu"),
            groom: person("Budi Santoso", "Budi"),
            event1: CeremonyRecord {
                date: date!(2025 - 06 - 01),
                start_time: time!(08:00),
                end_time: Some(time!(10:00)),
                venue_name: "Masjid Al-Ikhlas".to_string(),
                address: Some("Jl. Mawar 1".to_string()),
                city: Some(" ".to_string()),
                province: Some("DKI Jakarta".to_string()),
                maps_url: None,
            },
            event2: SecondCeremonyRecord {
                same_date: true,
                ..SecondCeremonyRecord::default()
            },
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn sources(registration: RegistrationRecord) -> SectionSources {
        SectionSources {
            registration,
            theme: None,
            greetings: None,
            love_story: None,
            love_story_blocks: Vec::new(),
            gallery: None,
            gallery_images: Vec::new(),
            wedding_gift: None,
            bank_accounts: Vec::new(),
            closing: None,
            music: None,
        }
    }

    fn images(registration_id: Uuid, count: usize) -> Vec<GalleryImageRecord> {
        (0..count)
            .map(|index| GalleryImageRecord {
                id: Uuid::new_v4(),
                registration_id,
                image_url: format!("https://cdn.example/{index}.jpg"),
                caption: None,
                display_order: index as i32,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .collect()
    }

    fn gallery_settings(registration_id: Uuid) -> GallerySettingsRecord {
        GallerySettingsRecord {
            registration_id,
            is_enabled: true,
            title: None,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn islam_ceremonies_share_first_event_date() {
        let content = assemble(sources(registration()), Locale::Id);
        let details = &content.event_details;

        assert_eq!(details.holy_matrimony.title, "Akad Nikah");
        assert_eq!(details.reception.title, "Resepsi");
        assert_eq!(details.holy_matrimony.date_label, "Minggu, 1 Juni 2025");
        assert_eq!(details.reception.date_label, details.holy_matrimony.date_label);
        assert_eq!(details.holy_matrimony.time_label, "08:00–10:00 WIB");
        assert_eq!(details.holy_matrimony.address, "Jl. Mawar 1, DKI Jakarta");
        assert_eq!(content.event.countdown_target, "2025-06-01T08:00:00+07:00");
    }

    #[test]
    fn second_event_keeps_its_own_fields_when_not_shared() {
        let mut registration = registration();
        registration.event2 = SecondCeremonyRecord {
            same_date: false,
            same_time: false,
            same_venue: false,
            date: Some(date!(2025 - 06 - 02)),
            start_time: Some(time!(19:00)),
            end_time: None,
            venue_name: Some("Gedung Serbaguna".to_string()),
            address: None,
            city: Some("Bogor".to_string()),
            province: None,
            maps_url: Some("https://maps.example/x".to_string()),
        };

        let details = build_event_details(&registration, Locale::Id);
        assert_eq!(details.reception.date_label, "Senin, 2 Juni 2025");
        assert_eq!(details.reception.time_label, "19:00 WIB – Selesai");
        assert_eq!(details.reception.venue_name, "Gedung Serbaguna");
        assert_eq!(details.reception.address, "Bogor");
        assert_eq!(
            details.reception.maps_url.as_deref(),
            Some("https://maps.example/x")
        );
    }

    #[test]
    fn absent_love_story_uses_defaults() {
        let content = assemble(sources(registration()), Locale::Id);

        assert!(content.love_story.is_enabled);
        assert!(content.love_story.blocks.is_empty());
        assert_eq!(
            content.love_story.main_title,
            defaults::DEFAULT_LOVE_STORY_TITLE
        );
    }

    #[test]
    fn disabled_sections_fall_back_to_defaults() {
        let registration = registration();
        let id = registration.id;
        let mut sources = sources(registration);
        sources.closing = Some(ClosingSettingsRecord {
            registration_id: id,
            is_enabled: false,
            title: Some("Custom".to_string()),
            message: None,
            background_image_url: None,
            overlay_opacity: Some("80%".to_string()),
            updated_at: OffsetDateTime::UNIX_EPOCH,
        });

        let content = assemble(sources, Locale::Id);
        assert_eq!(content.closing, defaults::closing(false));
        assert_eq!(content.music_settings, defaults::music());
        assert_eq!(content.greetings, defaults::greetings(true));
    }

    #[test]
    fn two_images_fill_the_top_row() {
        let registration = registration();
        let id = registration.id;
        let mut sources = sources(registration);
        sources.gallery = Some(gallery_settings(id));
        sources.gallery_images = images(id, 2);

        let gallery = assemble(sources, Locale::Id).gallery;
        assert_eq!(gallery.top_row_images.len(), 2);
        assert!(gallery.middle_images.is_empty());
        assert!(gallery.bottom_grid_images.is_empty());
        assert_eq!(gallery.top_row_images[0].url, "https://cdn.example/0.jpg");
    }

    #[test]
    fn gallery_split_is_deterministic() {
        let id = Uuid::new_v4();
        for (count, expected) in [
            (0, (0, 0, 0)),
            (1, (1, 0, 0)),
            (3, (3, 0, 0)),
            (4, (3, 1, 0)),
            (6, (3, 3, 0)),
            (7, (3, 3, 1)),
            (10, (3, 3, 4)),
        ] {
            let images = images(id, count);
            let (top, middle, bottom) = split_gallery(&images);
            assert_eq!((top.len(), middle.len(), bottom.len()), expected, "n = {count}");

            let order: Vec<_> = top.iter().chain(&middle).chain(&bottom).collect();
            for (index, image) in order.iter().enumerate() {
                assert_eq!(image.url, format!("https://cdn.example/{index}.jpg"));
            }
        }
    }

    #[test]
    fn theme_locale_overrides_default() {
        let registration = registration();
        let id = registration.id;
        let mut sources = sources(registration);
        sources.theme = Some(ThemeSettingsRecord {
            registration_id: id,
            theme_key: "rustic".to_string(),
            locale: Some("en".to_string()),
            countdown_enabled: false,
            rsvp_enabled: true,
            guestbook_enabled: true,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        });

        let content = assemble(sources, Locale::Id);
        assert_eq!(content.profile.locale, "en");
        assert_eq!(content.profile.theme_key, "rustic");
        assert!(!content.profile.features.countdown);
        assert_eq!(content.event.date_label, "Sunday, 1 June 2025");
        assert_eq!(content.bride.parents_label, "Daughter of Mr. Ahmad & Mrs. Siti");
    }

    #[test]
    fn every_section_is_present_without_settings() {
        let content = assemble(sources(registration()), Locale::Id);
        let json = serde_json::to_value(&content).expect("serializes");

        for key in [
            "profile",
            "bride",
            "groom",
            "event",
            "greetings",
            "eventDetails",
            "loveStory",
            "gallery",
            "weddingGift",
            "closing",
            "musicSettings",
        ] {
            assert!(json.get(key).is_some_and(|value| !value.is_null()), "{key}");
        }
        assert_eq!(content.profile.couple_names, "Ayu & Budi");
        assert_eq!(content.bride.instagram.as_deref(), Some("someone"));
    }
}
