//! Background fetch tasks
//!
//! Each user-triggered fetch runs as its own tokio task and reports back to the
//! UI loop over a channel. Tasks are never cancelled; whichever result arrives
//! last is the one the UI shows.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::data::{EnrichmentResult, FeedEntry};
use crate::enrich::EnrichmentClient;
use crate::error::{FeedError, NetworkError};
use crate::feed::{FeedService, FeedSource};
use crate::range::DateRange;

/// Work the UI asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Default feed through the cache policy
    LoadDefault,
    /// Fresh random batch, bypassing the cache
    ReloadRandom,
    /// Validated date range, bypassing the cache
    QueryRange(DateRange),
    /// Encyclopedia summary for a title
    Enrich(String),
}

/// Which operation produced a feed result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    Default,
    Random,
    Range(DateRange),
}

/// Messages sent from background tasks to the UI loop
#[derive(Debug)]
pub enum FetchMessage {
    /// A feed request finished
    FeedLoaded {
        origin: FeedOrigin,
        result: Result<Vec<FeedEntry>, FeedError>,
    },
    /// An enrichment lookup finished
    EnrichmentLoaded {
        title: String,
        result: Result<Option<EnrichmentResult>, NetworkError>,
    },
}

/// Everything a fetch task may need
#[derive(Clone)]
pub struct Services {
    /// Cache-aware default feed
    pub feed: Arc<FeedService>,
    /// Direct remote access for random and range queries
    pub source: Arc<dyn FeedSource>,
    /// Encyclopedia lookups
    pub enrichment: EnrichmentClient,
    /// Batch size for random reloads
    pub random_count: u32,
}

/// Handle for dispatching fetch tasks and receiving their results
pub struct TaskHandle {
    /// Channel for receiving results
    pub receiver: mpsc::Receiver<FetchMessage>,
    sender: mpsc::Sender<FetchMessage>,
    services: Services,
}

impl TaskHandle {
    pub fn new(services: Services) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            receiver,
            sender,
            services,
        }
    }

    /// Spawns a task for `command`; must be called inside a tokio runtime
    pub fn dispatch(&self, command: Command) {
        let services = self.services.clone();
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let message = run(&services, command).await;
            if tx.send(message).await.is_err() {
                warn!("UI loop gone, dropping fetch result");
            }
        });
    }
}

/// Executes one command to completion
pub async fn run(services: &Services, command: Command) -> FetchMessage {
    match command {
        Command::LoadDefault => FetchMessage::FeedLoaded {
            origin: FeedOrigin::Default,
            result: services.feed.default_feed().await,
        },
        Command::ReloadRandom => FetchMessage::FeedLoaded {
            origin: FeedOrigin::Random,
            result: services.source.fetch_random(services.random_count).await,
        },
        Command::QueryRange(range) => FetchMessage::FeedLoaded {
            origin: FeedOrigin::Range(range),
            result: services.source.fetch_range(range).await,
        },
        Command::Enrich(title) => {
            let result = services.enrichment.lookup(&title).await;
            FetchMessage::EnrichmentLoaded { title, result }
        }
    }
}

/// Checks for a finished task without blocking
pub fn try_recv(handle: &mut TaskHandle) -> Option<FetchMessage> {
    handle.receiver.try_recv().ok()
}
