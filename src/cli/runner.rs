//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::fetcher::{HttpPageFetcher, PageFetcher};
use crate::filters::{parse_route, FilterSource};
use crate::pagination::{FetchOutcome, PaginationController};
use crate::presentation::{present, FeedView};
use crate::types::{PageRequest, FIRST_PAGE};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Browse { route, max_pages } => self.browse(route, *max_pages).await,
            Commands::Page { route, page } => self.page(route, *page).await,
            Commands::Config => self.show_config(),
        }
    }

    /// Load configuration: file (or defaults), then environment, then flags
    fn load_config(&self) -> Result<FeedConfig> {
        let mut config = match &self.cli.config {
            Some(path) => FeedConfig::from_file(path)?,
            None => FeedConfig::default(),
        };
        config.apply_env()?;

        if let Some(base) = &self.cli.api_base {
            config.api_base.clone_from(base);
        }
        if let Some(size) = self.cli.page_size {
            config.page_size = size;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load pages through the controller until the end of the list
    async fn browse(&self, route: &str, max_pages: Option<u32>) -> Result<()> {
        let config = self.load_config()?;
        let locale = config.number_locale();
        let fetcher = Arc::new(HttpPageFetcher::from_config(&config)?);
        let source = FilterSource::from_route(route)?;
        let controller =
            PaginationController::new(Arc::clone(&fetcher), source.subscribe(), config.page_size)?;

        info!(
            "Browsing {route} (filters: {:?}, page size {})",
            source.current(),
            config.page_size
        );

        let (interrupted, watcher) = watch_interrupt(&fetcher);
        let start = Instant::now();
        let mut pages = 0u32;
        let mut printed = 0usize;

        loop {
            if max_pages.is_some_and(|max| pages >= max) {
                info!("Stopping after {pages} pages (--max-pages)");
                break;
            }
            if !controller.state().can_advance() {
                break;
            }

            let outcome = controller.load_next().await;
            match outcome {
                FetchOutcome::Loaded { .. } | FetchOutcome::Empty => {
                    pages += 1;
                    if self.cli.format == OutputFormat::Json {
                        let state = controller.state();
                        for item in present(&state.items[printed..], &locale) {
                            self.output_message(&item);
                        }
                        printed = state.items.len();
                    }
                }
                FetchOutcome::Failed { transient } => {
                    let message = controller.state().error.clone().unwrap_or_default();
                    watcher.abort();
                    return Err(Error::Other(format!(
                        "Failed to load page {}: {message}{}",
                        controller.state().next_page(),
                        retry_hint(transient)
                    )));
                }
                FetchOutcome::Discarded if interrupted.load(Ordering::SeqCst) => {
                    warn!("Interrupted; stopping");
                    break;
                }
                FetchOutcome::Discarded | FetchOutcome::Skipped => {
                    debug!("Nothing loaded ({outcome:?})");
                    break;
                }
            }
        }
        watcher.abort();

        let state = controller.snapshot();
        if self.cli.format == OutputFormat::Pretty {
            self.output_message(&FeedView::from_state(&state, &locale));
        }

        info!(
            "Loaded {} items in {pages} pages ({:.2}s){}",
            state.items.len(),
            start.elapsed().as_secs_f64(),
            if state.reached_end { ", end of list" } else { "" }
        );
        Ok(())
    }

    /// Fetch a single page and print the raw response
    async fn page(&self, route: &str, page: u32) -> Result<()> {
        if page < FIRST_PAGE {
            return Err(Error::invalid_value(
                "page",
                format!("pages start at {FIRST_PAGE}"),
            ));
        }

        let config = self.load_config()?;
        let fetcher = Arc::new(HttpPageFetcher::from_config(&config)?);
        let request = PageRequest::new(parse_route(route)?, page, config.page_size);

        let (_, watcher) = watch_interrupt(&fetcher);
        let result = fetcher.fetch(&request).await;
        watcher.abort();

        let response = result.map_err(|e| {
            if e.is_transient() {
                Error::Other(format!("{e}{}", retry_hint(true)))
            } else {
                e
            }
        })?;
        info!("Page {page}: {} items", response.len());
        self.output_message(&response);
        Ok(())
    }

    /// Print the effective configuration
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&config)?),
            OutputFormat::Pretty => print!("{}", serde_yaml::to_string(&config)?),
        }
        Ok(())
    }

    /// Output a message
    fn output_message<T: Serialize>(&self, msg: &T) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Abort in-flight requests on Ctrl-C. The flag records that it happened.
fn watch_interrupt(fetcher: &Arc<HttpPageFetcher>) -> (Arc<AtomicBool>, JoinHandle<()>) {
    let interrupted = Arc::new(AtomicBool::new(false));
    let handle = {
        let fetcher = Arc::clone(fetcher);
        let interrupted = Arc::clone(&interrupted);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted.store(true, Ordering::SeqCst);
                fetcher.abort_all();
            }
        })
    };
    (interrupted, handle)
}

/// Suffix telling the user whether running the command again may help
fn retry_hint(transient: bool) -> &'static str {
    if transient {
        " (temporary failure; running the command again may succeed)"
    } else {
        ""
    }
}
