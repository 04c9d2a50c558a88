//! Test fixtures shared by unit tests

use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use crate::filters::FilterSource;
use crate::pagination::{PaginationController, PaginationState};
use crate::types::{Item, PageRequest, PageResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// Build `n` items whose ids start with `prefix`
pub fn items(prefix: &str, n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item {
            id: format!("{prefix}-{i}"),
            name: format!("{prefix} product {i}"),
            slug: format!("{prefix}-product-{i}"),
            min_price: 1000.0 * (i as f64 + 1.0),
            max_price: 1500.0 * (i as f64 + 1.0),
            image_url: format!("https://cdn.example.com/{prefix}/{i}.png"),
            ..Item::default()
        })
        .collect()
}

/// A page of `n` items
pub fn page(prefix: &str, n: usize, total: Option<u64>) -> PageResponse {
    PageResponse::new(items(prefix, n), total)
}

struct Step {
    result: Result<PageResponse>,
    gate: Option<Arc<Notify>>,
}

/// Fetcher that replays scripted responses in order and records requests
#[derive(Default)]
pub struct ScriptedFetcher {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response delivered immediately
    pub fn push(&self, result: Result<PageResponse>) {
        self.steps
            .lock()
            .unwrap()
            .push_back(Step { result, gate: None });
    }

    /// Queue a response held back until the returned gate is notified
    pub fn push_gated(&self, result: Result<PageResponse>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.steps.lock().unwrap().push_back(Step {
            result,
            gate: Some(Arc::clone(&gate)),
        });
        gate
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();
        let Some(step) = step else {
            return Err(Error::Other(format!("no scripted response for {request:?}")));
        };
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        step.result
    }
}

/// Controller over a scripted fetcher, plus the filter source feeding it
pub fn controller(
    page_size: u32,
) -> (
    Arc<ScriptedFetcher>,
    FilterSource,
    PaginationController<Arc<ScriptedFetcher>>,
) {
    let fetcher = ScriptedFetcher::new();
    let source = FilterSource::default();
    let controller =
        PaginationController::new(Arc::clone(&fetcher), source.subscribe(), page_size).unwrap();
    (fetcher, source, controller)
}

/// Wait until the observed state satisfies `pred`
pub async fn wait_for<P>(rx: &mut watch::Receiver<PaginationState>, pred: P)
where
    P: Fn(&PaginationState) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if pred(&rx.borrow_and_update()) {
                return;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("state never reached the expected condition");
}
