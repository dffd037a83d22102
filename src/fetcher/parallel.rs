use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::Result;
use crate::fetcher::download::{DownloadOutcome, DownloadRequest, HttpDownloader};

pub const DEFAULT_WORKERS: usize = 4;

/// Runs several downloads at once, bounded by a worker count.
pub struct ParallelDownloader {
    downloader: Arc<HttpDownloader>,
    semaphore: Arc<Semaphore>,
}

impl ParallelDownloader {
    pub fn new(downloader: Arc<HttpDownloader>) -> Self {
        Self::with_workers(downloader, DEFAULT_WORKERS)
    }

    pub fn with_workers(downloader: Arc<HttpDownloader>, workers: usize) -> Self {
        Self {
            downloader,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Downloads every request; results come back in request order.
    pub async fn download_all(
        &self,
        requests: Vec<DownloadRequest>,
    ) -> Vec<(String, Result<DownloadOutcome>)> {
        let mut handles = Vec::new();

        for request in requests {
            let downloader = self.downloader.clone();
            let semaphore = self.semaphore.clone();

            let handle = tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => downloader.download(&request).await,
                    Err(e) => Err(crate::app::ArchiveError::Other(e.to_string())),
                };
                if let Err(e) = &result {
                    tracing::warn!("Download of {} failed: {}", request.file_name, e);
                }
                (request.file_name, result)
            });

            handles.push(handle);
        }

        let mut results = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        results
    }
}
