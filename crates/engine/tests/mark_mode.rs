mod common;

use std::sync::Arc;

use common::{harness, irvine, settle};
use engine::{
    ClickOutcome, Cursor, EngineError, MarkMode, RecordingRenderer, RefreshOutcome, SightingsEngine,
};
use foundation::{GeoBounds, LonLat, OwnerId};
use streaming::MemoryPointStore;

#[tokio::test(start_paused = true)]
async fn toggling_twice_returns_to_inactive() {
    let h = harness();
    h.engine.on_load(None).await.unwrap();
    assert_eq!(h.engine.mark_mode(), MarkMode::Inactive);

    assert_eq!(h.engine.toggle_mark_mode(), MarkMode::Active);
    assert_eq!(h.renderer.cursor(), Cursor::Crosshair);
    assert_eq!(h.engine.toggle_mark_mode(), MarkMode::Inactive);
    assert_eq!(h.renderer.cursor(), Cursor::Default);
}

#[tokio::test(start_paused = true)]
async fn clicks_while_inactive_never_reach_the_store() {
    let h = harness();
    h.engine.on_load(Some(irvine())).await.unwrap();
    h.engine.toggle_mark_mode();
    h.engine.toggle_mark_mode();

    let outcome = h.engine.on_click(LonLat::new(-117.8, 33.5)).await.unwrap();
    assert_eq!(outcome, ClickOutcome::Ignored);
    assert_eq!(h.store.insert_calls(), 0);
    assert_eq!(h.store.queries().len(), 1);
    assert_eq!(h.engine.metrics().counter("click.ignored"), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_submit_refreshes_current_viewport_once() {
    let h = harness();
    h.engine.on_load(Some(irvine())).await.unwrap();
    h.engine.toggle_mark_mode();

    let outcome = h.engine.on_click(LonLat::new(-117.8, 33.5)).await.unwrap();
    let ClickOutcome::Submitted { point, refresh } = outcome else {
        panic!("expected a submission");
    };
    assert_eq!(refresh, Some(RefreshOutcome::Applied { features: 1 }));
    assert_eq!(h.store.insert_calls(), 1);
    assert_eq!(h.store.queries(), vec![irvine(), irvine()]);

    let source = h.renderer.source("sightings").unwrap();
    assert_eq!(source.features[0].properties.id, point.id);
    assert_eq!(source.features[0].properties.weight, 5.0);
    assert!(point.owner_id.is_anonymous());
    assert_eq!(h.engine.mark_mode(), MarkMode::Active);
}

#[tokio::test(start_paused = true)]
async fn clicks_before_load_are_not_submitted() {
    let h = harness();
    h.engine.toggle_mark_mode();

    let outcome = h.engine.on_click(LonLat::new(-117.8, 33.5)).await.unwrap();
    assert_eq!(outcome, ClickOutcome::NotLoaded);
    assert_eq!(h.store.insert_calls(), 0);
    assert!(h.store.queries().is_empty());
    assert_eq!(h.engine.metrics().counter("click.not_loaded"), 1);
}

#[tokio::test(start_paused = true)]
async fn submit_during_pending_settle_fetches_the_new_viewport_once() {
    let h = harness();
    h.engine.on_load(Some(irvine())).await.unwrap();
    h.engine.toggle_mark_mode();

    let bay = GeoBounds::new(-122.6, 37.6, -122.3, 37.9);
    h.engine.on_viewport_change(bay).unwrap();
    assert!(h.engine.is_settling());

    let outcome = h.engine.on_click(LonLat::new(-122.4, 37.8)).await.unwrap();
    let ClickOutcome::Submitted { refresh, .. } = outcome else {
        panic!("expected a submission");
    };
    assert_eq!(refresh, Some(RefreshOutcome::Applied { features: 1 }));

    settle().await;
    assert_eq!(h.store.insert_calls(), 1);
    assert_eq!(h.store.queries(), vec![irvine(), bay]);
    let metrics = h.engine.metrics();
    assert_eq!(metrics.counter("fetch.skipped_within_threshold"), 1);
    let sizes = metrics.histogram("fetch.features").unwrap();
    assert_eq!((sizes.count, sizes.min, sizes.max), (2, 0, 1));
}

#[tokio::test(start_paused = true)]
async fn failed_submit_stays_active_and_leaves_data_alone() {
    let h = harness();
    h.engine.on_load(Some(irvine())).await.unwrap();
    h.engine.toggle_mark_mode();
    h.store.fail_inserts(true);

    let err = h.engine.on_click(LonLat::new(-117.8, 33.5)).await.unwrap_err();
    assert!(matches!(err, EngineError::NetworkFailure(_)));
    assert_eq!(h.engine.mark_mode(), MarkMode::Active);
    assert_eq!(h.store.queries().len(), 1);
    assert_eq!(h.renderer.data_updates(), 1);
    assert!(h.renderer.source("sightings").unwrap().is_empty());
    assert_eq!(h.engine.metrics().counter("submit.failed"), 1);
}

#[tokio::test(start_paused = true)]
async fn out_of_range_click_is_an_invalid_submission() {
    let h = harness();
    h.engine.on_load(Some(irvine())).await.unwrap();
    h.engine.toggle_mark_mode();

    let err = h.engine.on_click(LonLat::new(200.0, 33.5)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidSubmission(_)));
    assert_eq!(h.store.insert_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn submit_without_viewport_skips_refresh() {
    let h = harness();
    h.engine.on_load(None).await.unwrap();
    h.engine.toggle_mark_mode();

    let outcome = h.engine.on_click(LonLat::new(1.0, 2.0)).await.unwrap();
    assert!(matches!(outcome, ClickOutcome::Submitted { refresh: None, .. }));
    assert!(h.store.queries().is_empty());
}

#[tokio::test]
async fn submissions_carry_the_configured_user() {
    let store = Arc::new(MemoryPointStore::new());
    let engine = SightingsEngine::builder(store.clone(), Arc::new(RecordingRenderer::new()))
        .user(OwnerId::new("user-42"))
        .build()
        .unwrap();
    engine.on_load(None).await.unwrap();
    engine.toggle_mark_mode();

    engine.on_click(LonLat::new(1.0, 2.0)).await.unwrap();
    let stored = store.query_now(&foundation::GeoBounds::world());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].owner_id, OwnerId::new("user-42"));
}
