#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::macros::{date, time};
use undangan::application::compiler::{CompileOptions, ContentCompiler};
use undangan::application::content::ContentService;
use undangan::application::invalidation::InvalidationTrigger;
use undangan::application::repos::SectionRepos;
use undangan::application::sections::SectionService;
use undangan::domain::defaults;
use undangan::domain::entities::{
    CeremonyRecord, PersonRecord, RegistrationRecord, SecondCeremonyRecord,
};
use undangan::domain::types::{EventType, Locale};
use undangan::infra::memory::InMemoryRepositories;
use uuid::Uuid;

pub struct Harness {
    pub store: Arc<InMemoryRepositories>,
    pub compiler: ContentCompiler,
    pub content: ContentService,
    pub trigger: InvalidationTrigger,
    pub sections: SectionService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let store = Arc::new(InMemoryRepositories::new());
        let repos = SectionRepos::from_backend(store.clone());
        let compiler = ContentCompiler::new(
            repos.clone(),
            CompileOptions {
                timeout,
                default_locale: Locale::Id,
            },
        );
        let content = ContentService::new(
            compiler.clone(),
            store.clone(),
            repos.registrations.clone(),
        );
        let trigger = InvalidationTrigger::new(content.clone());
        let sections = SectionService::new(repos, trigger.clone());

        Self {
            store,
            compiler,
            content,
            trigger,
            sections,
        }
    }

    pub fn register(&self, slug: &str) -> RegistrationRecord {
        let record = registration(slug);
        self.store.insert_registration(record.clone());
        record
    }
}

pub fn person(full_name: &str, nickname: &str) -> PersonRecord {
    PersonRecord {
        full_name: full_name.to_string(),
        nickname: nickname.to_string(),
        father_name: Some("Hadi".to_string()),
        mother_name: Some("Sri".to_string()),
        instagram: Some("https://instagram.com/someone".to_string()),
        photo_url: None,
    }
}

pub fn registration(slug: &str) -> RegistrationRecord {
    RegistrationRecord {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        slug: slug.to_string(),
        event_type: EventType::Islam,
        custom_event1_label: None,
        custom_event2_label: None,
        timezone: chrono_tz::Asia::Jakarta,
        cover_image_url: Some("https://cdn.example/cover.jpg".to_string()),
        bride: person("Ayu Lestari", "Ayu"),
        groom: person("Bima Pratama", "Bima"),
        event1: CeremonyRecord {
            date: date!(2025 - 06 - 01),
            start_time: time!(08:00),
            end_time: Some(time!(10:00)),
            venue_name: "Masjid Al-Ikhlas".to_string(),
            address: Some("Jl. Mawar 1".to_string()),
            city: Some("Jakarta Selatan".to_string()),
            province: Some("DKI Jakarta".to_string()),
            maps_url: Some("https://maps.example/masjid".to_string()),
        },
        event2: SecondCeremonyRecord {
            same_date: true,
            start_time: Some(time!(11:00)),
            end_time: None,
            venue_name: Some("Gedung Serbaguna".to_string()),
            address: Some("Jl. Melati 2".to_string()),
            city: Some("Jakarta Selatan".to_string()),
            ..SecondCeremonyRecord::default()
        },
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

/// A complete cache row written before the current document shape existed.
pub fn legacy_document(slug: &str) -> Value {
    let block = |title: &str| {
        json!({
            "title": title,
            "date": "2025-06-01",
            "dateLabel": "Minggu, 1 Juni 2025",
            "timeLabel": "08:00–10:00 WIB",
            "venueName": "Masjid Al-Ikhlas",
            "address": "Jl. Mawar 1, Jakarta Selatan"
        })
    };

    json!({
        "clientProfile": {
            "slug": slug,
            "coupleNames": "Ayu & Bima",
            "themeKey": "classic"
        },
        "bride": {
            "fullName": "Ayu Lestari",
            "nickname": "Ayu",
            "parentsLabel": "Putri dari Bapak Hadi & Ibu Sri"
        },
        "groom": {
            "fullName": "Bima Pratama",
            "nickname": "Bima",
            "parentsLabel": "Putra dari Bapak Hadi & Ibu Sri"
        },
        "event": {
            "date": "2025-06-01",
            "dateLabel": "Minggu, 1 Juni 2025",
            "timeLabel": "08:00–10:00 WIB",
            "timezone": "Asia/Jakarta",
            "countdownTarget": "2025-06-01T08:00:00+07:00"
        },
        "clouds": {
            "title": "Old greeting",
            "message": "Old message"
        },
        "event_cloud": {
            "akad": block("Akad Nikah"),
            "resepsi": block("Resepsi")
        },
        "loveStory": to_value(defaults::love_story(true)),
        "gallery": to_value(defaults::gallery(true)),
        "weddingGift": to_value(defaults::wedding_gift(true)),
        "closing": to_value(defaults::closing(true))
    })
}

fn to_value(section: impl Serialize) -> Value {
    serde_json::to_value(section).expect("default section serializes")
}
