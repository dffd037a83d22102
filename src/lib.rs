//! # Archivist
//!
//! A command-line client for browsing, searching and downloading from
//! archive.org.
//!
//! ## Architecture
//!
//! ```text
//! ArchiveClient → FeedParser / SearchResponse → Aggregator → Session → CLI
//! ```
//!
//! - [`fetcher`]: HTTP boundary to the archive service and file downloads
//! - [`normalizer`]: Parses the latest-uploads RSS feed into items
//! - [`aggregator`]: Category tree, query building and pagination
//! - [`session`]: Screen state published as snapshots
//! - [`store`]: SQLite key-value store holding favorites
//!
//! ## Quick Start
//!
//! ```bash
//! # Latest uploads grouped by category
//! archivist latest
//!
//! # Search movies and audio, two pages
//! archivist search "apollo 11" --type movies --type audio --pages 2
//!
//! # Most downloaded this week
//! archivist hot week
//!
//! # Download an item's files
//! archivist download some-identifier
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// archive client, favorites and downloader.
pub mod app;

/// Category tree grouping, search query building and pagination.
pub mod aggregator;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/archivist/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`ArchiveItem`](domain::ArchiveItem): A catalog entry
/// - [`ArchiveCategory`](domain::ArchiveCategory): Node of the category tree
/// - [`ArchiveFile`](domain::ArchiveFile): A downloadable file of an item
/// - [`HotPeriod`](domain::HotPeriod): Window for popularity queries
pub mod domain;

/// Network access to the archive service.
///
/// - [`ArchiveClient`](fetcher::ArchiveClient): Async trait for feed, search and metadata
/// - [`HttpArchiveClient`](fetcher::http_fetcher::HttpArchiveClient): reqwest-based implementation
/// - [`ParallelDownloader`](fetcher::parallel::ParallelDownloader): Concurrent downloads with semaphore
pub mod fetcher;

/// RSS parsing into [`ArchiveItem`](domain::ArchiveItem)s.
pub mod normalizer;

/// Browsing state and the snapshots published to the display layer.
pub mod session;

/// SQLite persistence layer.
///
/// - [`KeyValueStore`](store::KeyValueStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
/// - [`FavoriteStore`](store::FavoriteStore): Favorites on top of a key-value store
pub mod store;
