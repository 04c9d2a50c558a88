//! Tests for the trigger adapters

use super::*;
use crate::config::ViewportConfig;
use crate::error::Error;
use crate::pagination::FetchOutcome;
use crate::testing::{controller, page, wait_for, ScriptedFetcher};
use crate::types::{Filters, FIRST_PAGE};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_test::assert_pending;

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_viewport_scrollable() {
    let metrics = ViewportMetrics {
        content_height: 1050.0,
        viewport_height: 1000.0,
    };
    assert!(!metrics.is_scrollable(50.0));
    assert!(metrics.is_scrollable(49.0));
}

#[test]
fn test_sentinel_visibility_margin() {
    let entry = |sentinel_offset| SentinelEntry {
        sentinel_offset,
        scroll_offset: 1000.0,
        viewport_height: 800.0,
    };

    assert!(entry(1500.0).is_visible(0.0));
    assert!(!entry(2100.0).is_visible(0.0));
    assert!(entry(2100.0).is_visible(400.0));
    assert!(entry(2200.0).is_visible(400.0));
    assert!(!entry(2201.0).is_visible(400.0));
    assert!(entry(700.0).is_visible(400.0));
    assert!(!entry(500.0).is_visible(400.0));
}

// ============================================================================
// Visibility Trigger
// ============================================================================

fn far_sentinel() -> SentinelEntry {
    SentinelEntry {
        sentinel_offset: 10_000.0,
        scroll_offset: 0.0,
        viewport_height: 800.0,
    }
}

fn near_sentinel() -> SentinelEntry {
    SentinelEntry {
        sentinel_offset: 1000.0,
        scroll_offset: 0.0,
        viewport_height: 800.0,
    }
}

#[tokio::test]
async fn test_sentinel_signal_loads_when_visible() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("a", 10, None)));
    let trigger = VisibilityTrigger::new(Arc::new(controller), ViewportConfig::default());

    assert_eq!(
        trigger
            .on_signal(ContinuationSignal::Sentinel(far_sentinel()))
            .await,
        None
    );
    assert!(fetcher.requests().is_empty());

    let outcome = trigger
        .on_signal(ContinuationSignal::Sentinel(near_sentinel()))
        .await;
    assert!(outcome.is_some_and(|o| o.is_success()));
    assert_eq!(fetcher.requests()[0].page, FIRST_PAGE);
}

#[tokio::test]
async fn test_signal_ignored_at_end() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("a", 3, None)));
    let trigger = VisibilityTrigger::new(Arc::new(controller), ViewportConfig::default());

    trigger.on_signal(ContinuationSignal::Ready).await;
    assert_eq!(trigger.on_signal(ContinuationSignal::Ready).await, None);
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn test_signal_ignored_while_loading() {
    let (fetcher, _source, controller) = controller(10);
    let gate = fetcher.push_gated(Ok(page("a", 10, None)));
    let controller = Arc::new(controller);
    let trigger = VisibilityTrigger::new(Arc::clone(&controller), ViewportConfig::default());

    let mut in_flight = tokio_test::task::spawn(controller.load_next());
    assert_pending!(in_flight.poll());

    assert_eq!(trigger.on_signal(ContinuationSignal::Ready).await, None);
    assert_eq!(fetcher.requests().len(), 1);

    gate.notify_one();
    assert!(in_flight.await.is_success());
}

#[tokio::test]
async fn test_ensure_filled() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("a", 10, None)));
    let trigger = VisibilityTrigger::new(Arc::new(controller), ViewportConfig::default());

    let tall = || ViewportMetrics {
        content_height: 3000.0,
        viewport_height: 800.0,
    };
    let short = || ViewportMetrics {
        content_height: 820.0,
        viewport_height: 800.0,
    };

    assert_eq!(trigger.ensure_filled(&tall).await, None);
    assert!(trigger.ensure_filled(&short).await.is_some());
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn test_run_backfills_until_scrollable() {
    // 100px rows in an 800px viewport: needs more than 850px of content,
    // i.e. at least 9 rows, i.e. three pages of 4.
    let (fetcher, _source, controller) = controller(4);
    for prefix in ["a", "b", "c", "d"] {
        fetcher.push(Ok(page(prefix, 4, None)));
    }
    let controller = Arc::new(controller);
    let trigger = Arc::new(VisibilityTrigger::new(
        Arc::clone(&controller),
        ViewportConfig::default(),
    ));

    let observed = controller.subscribe();
    let viewport = move || ViewportMetrics {
        content_height: observed.borrow().items.len() as f64 * 100.0,
        viewport_height: 800.0,
    };

    let (signals, rx) = mpsc::channel(8);
    let runner = {
        let trigger = Arc::clone(&trigger);
        tokio::spawn(async move { trigger.run(rx, viewport).await })
    };

    let mut state = controller.subscribe();
    wait_for(&mut state, |s| s.items.len() == 12 && !s.loading).await;
    tokio::task::yield_now().await;
    assert_eq!(fetcher.requests().len(), 3);

    // Scrolling to the sentinel continues past the fill
    signals
        .send(ContinuationSignal::Sentinel(near_sentinel()))
        .await
        .unwrap();
    wait_for(&mut state, |s| s.items.len() == 16 && !s.loading).await;

    drop(signals);
    runner.await.unwrap();
    assert_eq!(fetcher.requests().len(), 4);
}

#[tokio::test]
async fn test_run_refills_after_filter_reset() {
    let (fetcher, source, controller) = controller(4);
    fetcher.push(Ok(page("a", 4, None)));
    fetcher.push(Ok(page("m7", 4, None)));
    let controller = Arc::new(controller);
    let trigger = Arc::new(VisibilityTrigger::new(
        Arc::clone(&controller),
        ViewportConfig::default(),
    ));

    // Viewport that is always full once anything is loaded
    let observed = controller.subscribe();
    let viewport = move || ViewportMetrics {
        content_height: if observed.borrow().items.is_empty() { 0.0 } else { 5000.0 },
        viewport_height: 800.0,
    };

    let (signals, rx) = mpsc::channel(1);
    let runner = {
        let trigger = Arc::clone(&trigger);
        tokio::spawn(async move { trigger.run(rx, viewport).await })
    };

    let mut state = controller.subscribe();
    wait_for(&mut state, |s| s.items.len() == 4 && !s.loading).await;

    // A reset empties the list; the trigger loads the first page again
    source.set(Filters::new().with_merchants([7]));
    controller.reset();
    wait_for(&mut state, |s| s.items.len() == 4 && s.items[0].id == "m7-0").await;

    drop(signals);
    runner.await.unwrap();
    assert_eq!(fetcher.requests()[1].page, FIRST_PAGE);
    assert_eq!(fetcher.requests()[1].filters, Filters::new().with_merchants([7]));
}

// ============================================================================
// Callback Trigger
// ============================================================================

#[test]
fn test_load_status_strings() {
    assert_eq!(LoadStatus::Ok.as_str(), "ok");
    assert_eq!(LoadStatus::Empty.to_string(), "empty");
    assert_eq!(
        serde_json::to_value(LoadStatus::Error).unwrap(),
        serde_json::json!("error")
    );
}

#[tokio::test]
async fn test_callback_statuses() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("a", 10, None)));
    fetcher.push(Err(Error::http_status(500, "boom")));
    fetcher.push(Ok(page("b", 10, None)));
    fetcher.push(Ok(page("c", 2, None)));
    let trigger = CallbackTrigger::new(Arc::new(controller));

    assert_eq!(trigger.load().await, LoadStatus::Ok);
    assert_eq!(trigger.load().await, LoadStatus::Error);
    assert_eq!(trigger.load().await, LoadStatus::Ok);
    assert_eq!(trigger.load().await, LoadStatus::Empty);

    // After the end: answered without fetching
    assert_eq!(trigger.load().await, LoadStatus::Empty);
    assert_eq!(fetcher.requests().len(), 4);
}

#[tokio::test]
async fn test_callback_empty_page() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("a", 0, None)));
    let trigger = CallbackTrigger::new(Arc::new(controller));

    let mut seen = Vec::new();
    trigger.on_load(|status| seen.push(status)).await;
    assert_eq!(seen, vec![LoadStatus::Empty]);
}

#[tokio::test]
async fn test_callback_while_loading_answers_ok() {
    let (fetcher, _source, controller) = controller(10);
    let gate = fetcher.push_gated(Ok(page("a", 10, None)));
    let controller = Arc::new(controller);
    let trigger = CallbackTrigger::new(Arc::clone(&controller));

    let mut first = tokio_test::task::spawn(trigger.load());
    assert_pending!(first.poll());

    let mut status = None;
    trigger.on_load(|s| status = Some(s)).await;
    assert_eq!(status, Some(LoadStatus::Ok));
    assert_eq!(fetcher.requests().len(), 1);

    gate.notify_one();
    assert_eq!(first.await, LoadStatus::Ok);
}

// ============================================================================
// Primed Feed
// ============================================================================

#[tokio::test]
async fn test_prefetch_then_hydrate() {
    let prefetcher = ScriptedFetcher::new();
    prefetcher.push(Ok(page("ssr", 10, Some(15))));
    let first = prefetch_first_page(&*prefetcher, Filters::new().with_category(3), 10).await;

    let requests = prefetcher.requests();
    assert_eq!(requests[0].page, FIRST_PAGE);
    assert_eq!(requests[0].filters.category_id, Some(3));

    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("client", 5, Some(15))));
    let feed = PrimedFeed::hydrate(Arc::new(controller), first);

    let state = feed.controller().snapshot();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.current_page, 1);
    assert!(fetcher.requests().is_empty());

    assert_eq!(feed.load().await, LoadStatus::Empty);
    assert_eq!(fetcher.requests()[0].page, 2);
    assert_eq!(feed.controller().state().items.len(), 15);
}

#[tokio::test]
async fn test_hydrate_replaces_existing_items() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("stale", 10, None)));
    let controller = Arc::new(controller);
    controller.load_next().await;

    let feed = PrimedFeed::hydrate(Arc::clone(&controller), Ok(page("ssr", 10, None)));
    let ids: Vec<String> = feed
        .controller()
        .state()
        .items
        .iter()
        .map(|i| i.id.clone())
        .collect();
    assert_eq!(ids.len(), 10);
    assert!(ids.iter().all(|id| id.starts_with("ssr-")));
}

#[tokio::test]
async fn test_hydrate_after_failed_prefetch() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("client", 10, None)));

    let feed = PrimedFeed::hydrate(
        Arc::new(controller),
        Err(Error::http_status(503, "unavailable")),
    );
    assert!(feed.controller().state().error.is_some());

    let mut status = None;
    feed.on_load(|s| status = Some(s)).await;
    assert_eq!(status, Some(LoadStatus::Ok));
    assert_eq!(fetcher.requests()[0].page, FIRST_PAGE);
    assert!(feed.controller().state().error.is_none());
}

#[tokio::test]
async fn test_hydrate_after_cancelled_prefetch() {
    let (fetcher, _source, controller) = controller(10);
    fetcher.push(Ok(page("client", 3, None)));

    let feed = PrimedFeed::hydrate(Arc::new(controller), Err(Error::Cancelled));
    assert!(feed.controller().state().error.is_none());

    assert_eq!(feed.load().await, LoadStatus::Empty);
    assert_eq!(fetcher.requests()[0].page, FIRST_PAGE);
    assert_eq!(
        feed.controller().snapshot().items.len(),
        3,
        "first page should load after a cancelled prefetch"
    );
    assert!(matches!(
        feed.controller().load_next().await,
        FetchOutcome::Skipped
    ));
}
