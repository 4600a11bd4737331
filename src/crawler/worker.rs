//! Per-seed worker
//!
//! A worker fetches one seed and forwards every item matched on it to the shared item
//! channel as soon as it is produced. The body is read on the async side and piped chunk by
//! chunk into a blocking thread that owns the tokenizer and extractor (the html5ever
//! tokenizer cannot move between threads, so it must not live across an `.await`).
//!
//! Every worker signals completion exactly once through a [`CompletionGuard`], whether it
//! succeeds, fails, or panics.

use crate::config::MatcherConfig;
use crate::crawler::fetcher::{body_encoding, fetch_page};
use crate::extractor::{Extractor, Item};
use crate::token::{StreamTokenizer, Token};
use crate::GleanError;
use encoding_rs::Encoding;
use reqwest::Client;
use tokio::sync::mpsc;

/// Body chunks buffered between the reader and the extraction thread
const CHUNK_BUFFER: usize = 16;

/// Completion signal sent by every worker
#[derive(Debug)]
pub(crate) struct WorkerDone {
    pub seed: String,
    /// Number of items sent, or why the seed failed
    pub outcome: Result<usize, GleanError>,
}

/// Sends the worker's completion signal when dropped
///
/// Dropping without [`CompletionGuard::complete`] (a panic or a cancelled task) reports the
/// worker as aborted. The completion channel is unbounded so the send never blocks.
pub(crate) struct CompletionGuard {
    seed: String,
    outcome: Option<Result<usize, GleanError>>,
    done_tx: mpsc::UnboundedSender<WorkerDone>,
}

impl CompletionGuard {
    pub fn new(seed: String, done_tx: mpsc::UnboundedSender<WorkerDone>) -> Self {
        Self {
            seed,
            outcome: None,
            done_tx,
        }
    }

    /// Records the outcome; the signal itself goes out on drop
    pub fn complete(mut self, outcome: Result<usize, GleanError>) {
        self.outcome = Some(outcome);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            Err(GleanError::WorkerAborted {
                url: self.seed.clone(),
            })
        });
        let done = WorkerDone {
            seed: std::mem::take(&mut self.seed),
            outcome,
        };
        // The coordinator only goes away after counting every worker
        let _ = self.done_tx.send(done);
    }
}

/// Runs one seed end to end and signals completion
pub(crate) async fn run_worker(
    client: Client,
    seed: String,
    rules: MatcherConfig,
    item_tx: mpsc::Sender<Item>,
    done_tx: mpsc::UnboundedSender<WorkerDone>,
) {
    let guard = CompletionGuard::new(seed.clone(), done_tx);

    let outcome = crawl_seed(&client, &seed, rules, item_tx).await;
    match &outcome {
        Ok(count) => tracing::debug!("Finished {}: {} items", seed, count),
        Err(e) => tracing::error!("Failed to crawl \"{}\": {}", seed, e),
    }

    guard.complete(outcome);
}

/// Fetches a seed and streams its body through the extractor
///
/// Items already sent stay sent if the body read fails partway; the partial item, if any,
/// is dropped.
async fn crawl_seed(
    client: &Client,
    url: &str,
    rules: MatcherConfig,
    item_tx: mpsc::Sender<Item>,
) -> Result<usize, GleanError> {
    let mut response = fetch_page(client, url).await?;
    let encoding = body_encoding(&response);

    let (chunk_tx, chunk_rx) = mpsc::channel(CHUNK_BUFFER);
    let page = url.to_string();
    let extraction = tokio::task::spawn_blocking(move || {
        extract_body(chunk_rx, encoding, rules, &item_tx, &page)
    });

    let read = loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                // Extraction stopped early (item channel closed); its error wins below
                if chunk_tx.send(chunk).await.is_err() {
                    break Ok(());
                }
            }
            Ok(None) => break Ok(()),
            Err(source) => {
                break Err(GleanError::Body {
                    url: url.to_string(),
                    source,
                })
            }
        }
    };
    drop(chunk_tx);

    let emitted = extraction.await.map_err(|_| GleanError::WorkerAborted {
        url: url.to_string(),
    })??;
    read.map(|()| emitted)
}

/// Tokenizes body chunks as they arrive and sends each matched item
fn extract_body<B: AsRef<[u8]>>(
    mut chunks: mpsc::Receiver<B>,
    encoding: &'static Encoding,
    rules: MatcherConfig,
    item_tx: &mpsc::Sender<Item>,
    url: &str,
) -> Result<usize, GleanError> {
    let mut tokenizer = StreamTokenizer::with_encoding(encoding);
    let mut extractor = Extractor::new(rules);
    let mut emitted = 0;

    while let Some(chunk) = chunks.blocking_recv() {
        emitted += forward(tokenizer.feed(chunk.as_ref()), &mut extractor, item_tx, url)?;
    }
    emitted += forward(tokenizer.finish(), &mut extractor, item_tx, url)?;

    Ok(emitted)
}

fn forward(
    tokens: impl Iterator<Item = Token>,
    extractor: &mut Extractor,
    item_tx: &mpsc::Sender<Item>,
    url: &str,
) -> Result<usize, GleanError> {
    let mut sent = 0;
    for token in tokens {
        if let Some(item) = extractor.push(&token) {
            tracing::trace!("Matched item '{}' on {}", item.id(), url);
            item_tx
                .blocking_send(item)
                .map_err(|_| GleanError::ChannelClosed {
                    url: url.to_string(),
                })?;
            sent += 1;
        }
    }
    Ok(sent)
}
