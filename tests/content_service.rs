mod support;

use std::time::Duration;

use time::OffsetDateTime;
use undangan::application::compiler::{CompileError, RegistrationKey};
use undangan::application::content::{ContentError, ContentSource};
use undangan::application::repos::{UpsertGalleryParams, UpsertGreetingParams};
use undangan::domain::defaults;
use undangan::domain::legacy::decode_document;
use uuid::Uuid;

use support::{Harness, legacy_document};

#[tokio::test]
async fn first_fetch_compiles_and_second_is_served_from_cache() {
    let harness = Harness::new();
    harness.register("ayu-bima");

    let first = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("compiled");
    assert_eq!(first.source, ContentSource::Compiled);
    let lookups_after_compile = harness.store.registration_lookups();

    let second = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("cached");
    assert_eq!(second.source, ContentSource::Cache);
    assert_eq!(second.content, first.content);
    assert_eq!(second.content_hash, first.content_hash);
    assert_eq!(harness.store.registration_lookups(), lookups_after_compile);
}

#[tokio::test]
async fn recompiling_unchanged_data_is_byte_identical() {
    let harness = Harness::new();
    harness.register("ayu-bima");

    let first = harness
        .content
        .compile_and_cache("ayu-bima")
        .await
        .expect("first compile");
    let second = harness
        .content
        .compile_and_cache("ayu-bima")
        .await
        .expect("second compile");

    assert_eq!(
        first.content.to_canonical_json().expect("json"),
        second.content.to_canonical_json().expect("json")
    );
    assert_eq!(first.content_hash, second.content_hash);
}

#[tokio::test]
async fn legacy_row_is_recompiled_and_overwritten() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.store.insert_compiled_document(
        "ayu-bima",
        "classic",
        legacy_document("ayu-bima"),
        OffsetDateTime::UNIX_EPOCH,
    );

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("recompiled");
    assert_eq!(served.source, ContentSource::Compiled);
    assert_eq!(served.content.greetings.title, defaults::DEFAULT_GREETING_TITLE);

    let row = harness.store.compiled_row("ayu-bima").expect("row stored");
    let object = row.document.as_object().expect("object");
    assert!(object.contains_key("profile"));
    assert!(!object.contains_key("clientProfile"));
    assert!(!object.contains_key("clouds"));
    assert!(!object.contains_key("event_cloud"));
    assert_eq!(
        decode_document(row.document).expect("current shape"),
        served.content
    );

    let again = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("cached");
    assert_eq!(again.source, ContentSource::Cache);
}

#[tokio::test]
async fn section_write_refreshes_cached_content() {
    let harness = Harness::new();
    let registration = harness.register("ayu-bima");

    let before = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("compiled");
    assert_eq!(before.content.greetings.title, defaults::DEFAULT_GREETING_TITLE);

    harness
        .sections
        .upsert_greetings(
            registration.client_id,
            registration.id,
            UpsertGreetingParams {
                is_enabled: true,
                title: Some("Assalamualaikum".to_string()),
                message: None,
                quote_text: None,
                quote_source: None,
            },
        )
        .await
        .expect("greetings saved");

    let after = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("cached");
    assert_eq!(after.source, ContentSource::Cache);
    assert_eq!(after.content.greetings.title, "Assalamualaikum");
    assert_eq!(
        after.content.greetings.message,
        defaults::DEFAULT_GREETING_MESSAGE
    );
    assert_ne!(after.content_hash, before.content_hash);
}

#[tokio::test]
async fn disabling_a_section_serves_its_disabled_default() {
    let harness = Harness::new();
    let registration = harness.register("ayu-bima");

    harness
        .sections
        .upsert_gallery(
            registration.client_id,
            registration.id,
            UpsertGalleryParams {
                is_enabled: false,
                title: Some("Ignored".to_string()),
            },
        )
        .await
        .expect("gallery saved");

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("cached");
    assert_eq!(served.content.gallery, defaults::gallery(false));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let harness = Harness::new();

    let err = harness
        .content
        .fetch_content("nobody")
        .await
        .expect_err("no registration");
    assert!(matches!(err, ContentError::NotFound));
    assert!(harness.store.compiled_row("nobody").is_none());
}

#[tokio::test]
async fn stale_legacy_row_does_not_mask_a_deleted_registration() {
    let harness = Harness::new();
    harness.store.insert_compiled_document(
        "gone",
        "classic",
        legacy_document("gone"),
        OffsetDateTime::UNIX_EPOCH,
    );

    let err = harness
        .content
        .fetch_content("gone")
        .await
        .expect_err("registration removed");
    assert!(matches!(err, ContentError::NotFound));
}

#[tokio::test]
async fn failed_cache_write_still_returns_fresh_content() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.store.set_fail_cache_writes(true);

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("compiled despite write failure");
    assert_eq!(served.source, ContentSource::Compiled);
    assert!(harness.store.compiled_row("ayu-bima").is_none());

    harness.store.set_fail_cache_writes(false);
    let retried = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("compiled again");
    assert_eq!(retried.source, ContentSource::Compiled);
    assert!(harness.store.compiled_row("ayu-bima").is_some());
}

#[tokio::test]
async fn failed_cache_read_falls_through_to_compile() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.store.set_fail_cache_reads(true);

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("compiled");
    assert_eq!(served.source, ContentSource::Compiled);
}

#[tokio::test]
async fn source_failure_without_stale_row_propagates() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.store.set_fail_section_reads(true);

    let err = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect_err("sections unavailable");
    assert!(matches!(err, ContentError::SourceRead(_)));
}

#[tokio::test]
async fn source_failure_serves_upgraded_legacy_row() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    let legacy_started_at = OffsetDateTime::UNIX_EPOCH;
    harness.store.insert_compiled_document(
        "ayu-bima",
        "classic",
        legacy_document("ayu-bima"),
        legacy_started_at,
    );
    harness.store.set_fail_section_reads(true);

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("stale content served");
    assert_eq!(served.source, ContentSource::Stale);
    assert_eq!(served.content.slug(), "ayu-bima");
    assert_eq!(served.content.greetings.title, "Old greeting");
    assert!(!served.content.music_settings.is_enabled);

    let row = harness.store.compiled_row("ayu-bima").expect("row kept");
    assert!(row.document.get("clientProfile").is_some());
    assert_eq!(row.compile_started_at, legacy_started_at);
}

#[tokio::test]
async fn slow_sources_time_out() {
    let harness = Harness::with_timeout(Duration::from_millis(50));
    harness.register("ayu-bima");
    harness
        .store
        .set_section_read_delay(Duration::from_millis(500));

    let err = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect_err("compile exceeded budget");
    assert!(matches!(err, ContentError::Timeout(limit) if limit == Duration::from_millis(50)));
    assert!(harness.store.compiled_row("ayu-bima").is_none());
}

#[tokio::test]
async fn older_compile_does_not_overwrite_newer_row() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    let future = OffsetDateTime::now_utc() + time::Duration::hours(1);
    harness.store.insert_compiled_document(
        "ayu-bima",
        "classic",
        legacy_document("ayu-bima"),
        future,
    );

    let served = harness
        .content
        .compile_and_cache("ayu-bima")
        .await
        .expect("compiled");
    assert_eq!(served.source, ContentSource::Compiled);

    let row = harness.store.compiled_row("ayu-bima").expect("row kept");
    assert_eq!(row.compile_started_at, future);
    assert!(row.document.get("clientProfile").is_some());
}

#[tokio::test]
async fn invalidate_rebuilds_on_demand() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.store.insert_compiled_document(
        "ayu-bima",
        "classic",
        legacy_document("ayu-bima"),
        OffsetDateTime::UNIX_EPOCH,
    );

    harness.trigger.invalidate("ayu-bima").await;

    let row = harness.store.compiled_row("ayu-bima").expect("row");
    assert!(row.document.get("profile").is_some());
    assert!(row.document.get("clientProfile").is_none());

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("cached");
    assert_eq!(served.source, ContentSource::Cache);
    assert_eq!(row.content_hash.as_deref(), Some(served.content_hash.as_str()));
}

#[tokio::test]
async fn failed_invalidate_keeps_the_stored_row() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.store.insert_compiled_document(
        "ayu-bima",
        "classic",
        legacy_document("ayu-bima"),
        OffsetDateTime::UNIX_EPOCH,
    );
    harness.store.set_fail_section_reads(true);

    harness.trigger.invalidate("ayu-bima").await;

    let row = harness.store.compiled_row("ayu-bima").expect("row kept");
    assert!(row.document.get("clientProfile").is_some());
}

#[tokio::test]
async fn row_missing_a_required_key_is_recompiled() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness
        .content
        .compile_and_cache("ayu-bima")
        .await
        .expect("compiled");

    let mut document = harness
        .store
        .compiled_row("ayu-bima")
        .expect("row stored")
        .document;
    document
        .as_object_mut()
        .expect("object")
        .remove("eventDetails");
    harness.store.insert_compiled_document(
        "ayu-bima",
        "classic",
        document,
        OffsetDateTime::UNIX_EPOCH,
    );

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("recompiled");
    assert_eq!(served.source, ContentSource::Compiled);
    assert_eq!(served.content.event_details.holy_matrimony.title, "Akad Nikah");

    let row = harness.store.compiled_row("ayu-bima").expect("row stored");
    assert!(row.document.get("eventDetails").is_some());
    assert_eq!(row.content_hash.as_deref(), Some(served.content_hash.as_str()));
}

#[tokio::test]
async fn parent_names_get_a_single_honorific() {
    let harness = Harness::new();
    harness.register("ayu-bima");

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("compiled");
    assert_eq!(
        served.content.bride.parents_label,
        "Putri dari Bapak Hadi & Ibu Sri"
    );
    assert_eq!(
        served.content.groom.parents_label,
        "Putra dari Bapak Hadi & Ibu Sri"
    );
}

#[tokio::test]
async fn recompile_all_reports_every_registration() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.register("citra-dimas");
    harness.register("eka-fajar");

    let report = harness
        .content
        .recompile_all(2)
        .await
        .expect("sweep finished");
    assert_eq!(report.compiled, 3);
    assert_eq!(report.missing, 0);
    assert!(report.failed.is_empty());

    for slug in ["ayu-bima", "citra-dimas", "eka-fajar"] {
        assert!(harness.store.compiled_row(slug).is_some(), "{slug} cached");
    }
}

#[tokio::test]
async fn recompile_all_collects_failures() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.register("citra-dimas");
    harness.store.set_fail_section_reads(true);

    let report = harness
        .content
        .recompile_all(4)
        .await
        .expect("sweep finished");
    assert_eq!(report.compiled, 0);
    assert_eq!(
        report.failed,
        vec!["ayu-bima".to_string(), "citra-dimas".to_string()]
    );
}

#[tokio::test]
async fn writes_for_unknown_registration_are_not_found() {
    let harness = Harness::new();

    let err = harness
        .sections
        .upsert_greetings(
            Uuid::new_v4(),
            Uuid::new_v4(),
            UpsertGreetingParams {
                is_enabled: true,
                title: None,
                message: None,
                quote_text: None,
                quote_source: None,
            },
        )
        .await
        .expect_err("no registration");
    assert!(matches!(
        err,
        undangan::application::sections::SectionError::NotFound
    ));
}

#[tokio::test]
async fn compile_by_id_matches_compile_by_slug() {
    let harness = Harness::new();
    let registration = harness.register("ayu-bima");

    let by_id = harness
        .compiler
        .compile(&RegistrationKey::Id(registration.id))
        .await
        .expect("compiled by id");
    let by_slug = harness
        .compiler
        .compile(&RegistrationKey::slug("ayu-bima"))
        .await
        .expect("compiled by slug");
    assert_eq!(by_id, by_slug);

    let err = harness
        .compiler
        .compile(&RegistrationKey::Id(Uuid::new_v4()))
        .await
        .expect_err("unknown id");
    assert!(matches!(err, CompileError::NotFound));
}
