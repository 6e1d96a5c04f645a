mod support;

use std::collections::HashSet;

use metrics_util::debugging::DebuggingRecorder;
use serial_test::serial;
use time::OffsetDateTime;
use undangan::domain::types::SectionKind;
use undangan::infra::telemetry;

use support::{Harness, legacy_document};

#[tokio::test]
#[serial]
async fn fetch_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.register("citra-dimas");

    // miss, then hit
    harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("compiled");
    harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("cached");

    // shape mismatch served stale while sources are down
    harness.store.insert_compiled_document(
        "citra-dimas",
        "classic",
        legacy_document("citra-dimas"),
        OffsetDateTime::UNIX_EPOCH,
    );
    harness.store.set_fail_section_reads(true);
    harness
        .content
        .fetch_content("citra-dimas")
        .await
        .expect("stale content");

    // invalidation failure
    harness
        .trigger
        .section_changed("ayu-bima", SectionKind::Greetings)
        .await;
    harness.store.set_fail_section_reads(false);

    // cache write failure
    harness.store.set_fail_cache_writes(true);
    harness
        .content
        .compile_and_cache("ayu-bima")
        .await
        .expect("compiled without caching");

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "undangan_content_cache_hit_total",
        "undangan_content_cache_miss_total",
        "undangan_content_shape_mismatch_total",
        "undangan_content_compile_ms",
        "undangan_content_cache_write_failure_total",
        "undangan_content_stale_served_total",
        "undangan_invalidation_failure_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
