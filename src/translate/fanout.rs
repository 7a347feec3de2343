use crate::translate::{fetch_translation, TargetOutcome, TranslationRequest, Transport};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Statistics from one fan-out.
#[derive(Debug, Clone)]
pub struct FanoutStats {
    pub total_targets: usize,
    pub successful_targets: usize,
    pub failed_targets: usize,
    pub total_time: Duration,
}

/// Runs one request per target language concurrently.
pub struct FanoutCoordinator {
    transport: Arc<dyn Transport>,
    concurrency: usize,
    show_progress: bool,
}

impl FanoutCoordinator {
    pub fn new(transport: Arc<dyn Transport>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
            show_progress: false,
        }
    }

    /// Enable or disable progress bar display.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Issue every request and collect one outcome per request.
    ///
    /// Outcomes come back in completion order. A failed request yields an
    /// error outcome and does not affect its siblings.
    pub async fn run(&self, requests: Vec<TranslationRequest>) -> (Vec<TargetOutcome>, FanoutStats) {
        let total_targets = requests.len();
        let start_time = Instant::now();

        info!(
            "Translating to {} languages with {} concurrent requests",
            total_targets, self.concurrency
        );

        let progress_bar = if self.show_progress && total_targets > 0 {
            let pb = ProgressBar::new(total_targets as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} languages")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut futures = FuturesUnordered::new();

        for request in requests {
            let sem = semaphore.clone();
            let transport = self.transport.clone();
            let pb = progress_bar.clone();

            futures.push(async move {
                // The semaphore is never closed, so acquiring only waits.
                let _permit = sem.acquire().await.ok();

                let started = Instant::now();
                let url = request.url();
                let result =
                    fetch_translation(transport.as_ref(), &url, request.timeout, &request.proxies)
                        .await;
                let duration_ms = started.elapsed().as_millis() as u64;

                if let Some(ref pb) = pb {
                    pb.inc(1);
                }

                match result {
                    Ok(ref text) => debug!(
                        "{} done in {}ms ({} chars)",
                        request.target_language,
                        duration_ms,
                        text.chars().count()
                    ),
                    Err(ref e) => warn!("{} failed: {}", request.target_language, e),
                }

                TargetOutcome {
                    target: request.target_language,
                    result,
                    duration_ms,
                }
            });
        }

        let mut outcomes = Vec::with_capacity(total_targets);
        while let Some(outcome) = futures.next().await {
            outcomes.push(outcome);
        }

        if let Some(pb) = progress_bar {
            pb.finish_and_clear();
        }

        let successful_targets = outcomes.iter().filter(|o| o.is_ok()).count();
        let stats = FanoutStats {
            total_targets,
            successful_targets,
            failed_targets: total_targets - successful_targets,
            total_time: start_time.elapsed(),
        };

        info!(
            "Fan-out complete: {}/{} languages successful in {:.2}s",
            stats.successful_targets,
            stats.total_targets,
            stats.total_time.as_secs_f64()
        );

        (outcomes, stats)
    }
}
