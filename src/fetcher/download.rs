//! Streaming file downloads.
//!
//! A download is fire-and-forget from the caller's point of view: the body
//! is streamed to `<dir>/<file name>` through a `.part` file and only the
//! final size is reported. A failed download leaves nothing behind.

use std::path::{Component, Path, PathBuf};

use futures::StreamExt;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::app::{ArchiveError, Result};

/// User agent sent with every file download.
pub const DOWNLOAD_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Clone)]
pub struct HttpDownloader {
    client: Client,
    user_agent: String,
    destination: PathBuf,
}

impl HttpDownloader {
    pub fn new(destination: PathBuf, user_agent: String) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            user_agent,
            destination,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub async fn download(&self, request: &DownloadRequest) -> Result<DownloadOutcome> {
        let path = self.destination.join(local_path(&request.file_name)?);
        let partial = partial_path(&path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .client
            .get(&request.url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?;

        let result = match write_body(response, &partial).await {
            Ok(bytes) => tokio::fs::rename(&partial, &path)
                .await
                .map(|_| bytes)
                .map_err(ArchiveError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                tracing::info!("Downloaded {} ({} bytes)", path.display(), bytes);
                Ok(DownloadOutcome { path, bytes })
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                Err(e)
            }
        }
    }
}

async fn write_body(response: reqwest::Response, partial: &Path) -> Result<u64> {
    let mut writer = BufWriter::new(File::create(partial).await?);
    let mut stream = response.bytes_stream();
    let mut bytes = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        bytes += chunk.len() as u64;
    }

    writer.flush().await?;
    Ok(bytes)
}

/// Archive file names are relative paths such as `disc1/track01.mp3`; the
/// same layout is kept under the destination. Absolute paths and `..` are
/// rejected.
pub fn local_path(name: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::Other(format!("Invalid file name: {}", name)));
            }
        }
    }

    if path.as_os_str().is_empty() {
        return Err(ArchiveError::Other(format!("Invalid file name: {}", name)));
    }
    Ok(path)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
