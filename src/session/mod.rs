//! Screen state for browsing the archive.
//!
//! [`Session`] owns everything the display layer shows. Intent methods
//! (`fetch_latest`, `select_category`, `set_query`, `load_next_page`, ...)
//! update the state synchronously and start at most one network task each.
//! Finished tasks report back over a channel; [`Session::drain`] or
//! [`Session::settle`] apply those results on the caller's task, so the state
//! itself is never shared. Every change is published as a fresh
//! [`Snapshot`] on a watch channel.
//!
//! Each intent that changes what is on screen starts a new generation.
//! Results from an older generation are discarded, except that a late
//! latest-uploads result still refreshes the cached category tree.

pub mod state;

use std::future::Future;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::aggregator::{group_categories, Pager, SearchQuery};
use crate::app::{ArchiveError, Result};
use crate::domain::{ArchiveCategory, ArchiveItem, HotPeriod, SearchResponse, LATEST_CATEGORY};
use crate::fetcher::ArchiveClient;
use crate::normalizer::FeedParser;
use crate::store::FavoriteStore;

pub use state::{DisplayMode, DisplayPayload, Snapshot};

type SharedClient = Arc<dyn ArchiveClient + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Latest,
    Category { page: u32 },
    Search { page: u32 },
    Hot,
}

enum Fetched {
    Items(Vec<ArchiveItem>),
    SearchPage(SearchResponse),
}

struct Completion {
    generation: u64,
    request: Request,
    result: Result<Fetched>,
}

/// What `load_next_page` continues.
#[derive(Debug, Clone)]
enum Browse {
    Nothing,
    Category(String),
    Search {
        query: String,
        media_types: Vec<String>,
    },
}

pub struct Session {
    client: SharedClient,
    parser: FeedParser,
    favorites: FavoriteStore,
    rows: u32,
    tree: Option<ArchiveCategory>,
    last_category: Option<String>,
    browse: Browse,
    pager: Pager,
    generation: u64,
    loading: bool,
    search_task: Option<JoinHandle<()>>,
    view: Snapshot,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<Snapshot>,
}

impl Session {
    pub fn new(client: SharedClient, favorites: FavoriteStore, rows: u32) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(Snapshot::default());

        Self {
            client,
            parser: FeedParser::new(),
            favorites,
            rows,
            tree: None,
            last_category: None,
            browse: Browse::Nothing,
            pager: Pager::new(),
            generation: 0,
            loading: false,
            search_task: None,
            view: Snapshot::default(),
            completions_tx,
            completions_rx,
            snapshots,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.view
    }

    /// Category tree from the most recent successful latest-uploads fetch.
    pub fn category_tree(&self) -> Option<&ArchiveCategory> {
        self.tree.as_ref()
    }

    pub fn last_selected_category(&self) -> Option<&str> {
        self.last_category.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.pager.page()
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Home screen: fetch the RSS feed and group it into the category tree.
    pub fn fetch_latest(&mut self) {
        self.start_generation();
        self.browse = Browse::Nothing;
        self.last_category = None;
        // The cached tree stays visible until the refresh lands.
        let cached = self.tree.clone().map(|root| vec![root]).unwrap_or_default();
        self.show(
            DisplayMode::Home,
            "Latest Uploads".to_string(),
            Some(DisplayPayload::Categories(cached)),
        );
        self.view.error = None;

        tracing::info!("Fetching latest uploads");
        self.loading = true;
        let client = self.client.clone();
        let parser = self.parser.clone();
        self.spawn(Request::Latest, async move {
            let xml = client.latest_rss().await?;
            Ok(Fetched::Items(parser.parse(&xml)?))
        });
        self.publish();
    }

    /// `latest` lists the main categories of the cached tree; any other name
    /// starts paged server-side browsing of that category.
    pub fn select_category(&mut self, name: &str) {
        if name == LATEST_CATEGORY {
            let Some(root) = self.tree.clone() else {
                self.fetch_latest();
                return;
            };
            self.start_generation();
            self.browse = Browse::Nothing;
            self.last_category = Some(LATEST_CATEGORY.to_string());
            self.loading = false;
            self.show(
                DisplayMode::Category,
                root.display_name.clone(),
                Some(DisplayPayload::Categories(root.sub_categories)),
            );
            self.view.error = None;
            self.publish();
            return;
        }

        self.start_generation();
        self.last_category = Some(name.to_string());
        self.browse = Browse::Category(name.to_string());
        let page = self.pager.reset();
        self.show(
            DisplayMode::Category,
            name.to_string(),
            Some(DisplayPayload::Items(Vec::new())),
        );
        self.view.error = None;

        tracing::info!("Browsing category {}", name);
        self.request_category_page(name.to_string(), page);
        self.publish();
    }

    /// New free-text search. Any search still in flight is cancelled.
    pub fn set_query(&mut self, query: &str, media_types: &[String]) {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }

        self.start_generation();
        self.last_category = None;
        let query = query.trim();
        self.show(
            DisplayMode::Search,
            format!("Search: {}", query),
            Some(DisplayPayload::Items(Vec::new())),
        );
        self.view.error = None;

        if query.is_empty() {
            self.browse = Browse::Nothing;
            self.pager.finish();
            self.loading = false;
            self.publish();
            return;
        }

        self.browse = Browse::Search {
            query: query.to_string(),
            media_types: media_types.to_vec(),
        };
        let page = self.pager.reset();
        tracing::info!("Searching for {:?}", query);
        self.request_search_page(SearchQuery::text(query, media_types, page, self.rows));
        self.publish();
    }

    /// Continues the current category or search listing.
    ///
    /// Returns `false` without touching anything when there is nothing to
    /// continue, the last page was already loaded, or a page is in flight.
    pub fn load_next_page(&mut self) -> bool {
        let browse = self.browse.clone();
        if matches!(browse, Browse::Nothing) {
            return false;
        }
        let Some(page) = self.pager.begin_next() else {
            return false;
        };

        match browse {
            Browse::Category(name) => self.request_category_page(name, page),
            Browse::Search { query, media_types } => {
                let query = SearchQuery::text(&query, &media_types, page, self.rows);
                self.request_search_page(query);
            }
            Browse::Nothing => {}
        }
        self.publish();
        true
    }

    pub fn fetch_hot(&mut self, period: HotPeriod) {
        self.start_generation();
        self.browse = Browse::Nothing;
        self.last_category = None;
        self.show(
            DisplayMode::Hot,
            period.display_name().to_string(),
            Some(DisplayPayload::Items(Vec::new())),
        );
        self.view.error = None;

        let query = SearchQuery::hot(period, Local::now().date_naive(), self.rows);
        tracing::debug!("Hot query: {} sorts: {:?}", query.query, query.sorts);

        self.loading = true;
        let client = self.client.clone();
        self.spawn(Request::Hot, async move {
            let response = client.search(&query).await?;
            Ok(Fetched::Items(response.to_archive_items(client.base_url())))
        });
        self.publish();
    }

    pub fn show_favorites(&mut self) {
        self.start_generation();
        self.browse = Browse::Nothing;
        self.last_category = None;
        self.loading = false;
        self.show(DisplayMode::Favorites, "Favorites".to_string(), None);
        self.reload_favorites();
        self.publish();
    }

    /// Returns whether the item is a favorite afterwards.
    pub fn toggle_favorite(&mut self, item: &ArchiveItem) -> Result<bool> {
        let is_favorite = self.favorites.toggle(item)?;
        if self.view.mode == DisplayMode::Favorites {
            self.reload_favorites();
            self.publish();
        }
        Ok(is_favorite)
    }

    pub fn is_favorite(&self, identifier: &str) -> Result<bool> {
        self.favorites.is_favorite(identifier)
    }

    /// Steps one level up. Returns `false` when already home.
    pub fn go_back(&mut self) -> bool {
        match self.view.mode {
            DisplayMode::Home => false,
            DisplayMode::Category => {
                match self.last_category.clone() {
                    Some(name) if name != LATEST_CATEGORY => {
                        let parent = self.parent_of(&name);
                        self.select_category(&parent);
                    }
                    _ => self.show_home(),
                }
                true
            }
            DisplayMode::Search | DisplayMode::Favorites | DisplayMode::Hot => {
                self.show_home();
                true
            }
        }
    }

    /// Applies every result that has already arrived and returns how many.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Waits until the current request, if any, has been applied.
    pub async fn settle(&mut self) {
        while self.loading {
            match self.completions_rx.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    fn show_home(&mut self) {
        let Some(root) = self.tree.clone() else {
            self.fetch_latest();
            return;
        };
        self.start_generation();
        self.browse = Browse::Nothing;
        self.last_category = None;
        self.loading = false;
        self.show(
            DisplayMode::Home,
            "Latest Uploads".to_string(),
            Some(DisplayPayload::Categories(vec![root])),
        );
        self.view.error = None;
        self.publish();
    }

    fn parent_of(&self, name: &str) -> String {
        self.tree
            .as_ref()
            .and_then(|root| root.find(name))
            .and_then(|category| category.parent.clone())
            .or_else(|| name.split_once('/').map(|(main, _)| main.to_string()))
            .unwrap_or_else(|| LATEST_CATEGORY.to_string())
    }

    fn reload_favorites(&mut self) {
        match self.favorites.list() {
            Ok(items) => {
                self.view.payload = DisplayPayload::Items(items);
                self.view.error = None;
            }
            Err(e) => {
                tracing::error!("Failed to load favorites: {}", e);
                self.view.payload = DisplayPayload::Items(Vec::new());
                self.view.error = Some(format!("Failed to load favorites: {}", e));
            }
        }
    }

    fn request_category_page(&mut self, name: String, page: u32) {
        self.loading = true;
        let client = self.client.clone();
        let query = SearchQuery::category(&name, page, self.rows);
        self.spawn(Request::Category { page }, async move {
            let response = client.search(&query).await?;
            Ok(Fetched::Items(response.to_archive_items(client.base_url())))
        });
    }

    fn request_search_page(&mut self, query: SearchQuery) {
        self.loading = true;
        let client = self.client.clone();
        let page = query.page;
        let task = self.spawn(Request::Search { page }, async move {
            Ok(Fetched::SearchPage(client.search(&query).await?))
        });
        self.search_task = Some(task);
    }

    fn spawn<F>(&self, request: Request, fetch: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<Fetched>> + Send + 'static,
    {
        let tx = self.completions_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = fetch.await;
            // Only fails once the session is gone.
            let _ = tx.send(Completion {
                generation,
                request,
                result,
            });
        })
    }

    fn apply(&mut self, completion: Completion) {
        let Completion {
            generation,
            request,
            result,
        } = completion;
        let current = generation == self.generation;

        match (request, result) {
            (Request::Latest, Ok(Fetched::Items(items))) => {
                let root = group_categories(&items);
                tracing::info!(
                    "Fetched {} latest items in {} categories",
                    items.len(),
                    root.sub_categories.len()
                );
                self.tree = Some(root.clone());
                if current {
                    self.loading = false;
                    self.view.payload = DisplayPayload::Categories(vec![root]);
                    self.view.error = None;
                }
            }
            _ if !current => {
                tracing::debug!("Dropping stale {:?} result", request);
                return;
            }
            (Request::Category { page }, Ok(Fetched::Items(items))) => {
                self.pager.complete_items(items.len());
                self.merge_page(page, items);
            }
            (Request::Search { page }, Ok(Fetched::SearchPage(response))) => {
                let data = &response.response;
                self.pager
                    .complete(data.docs.len(), data.start, data.num_found);
                let items = response.to_archive_items(self.client.base_url());
                self.merge_page(page, items);
            }
            (Request::Hot, Ok(Fetched::Items(items))) => {
                tracing::info!("Fetched {} hot items", items.len());
                self.loading = false;
                self.view.payload = DisplayPayload::Items(items);
                self.view.error = None;
            }
            (request, Err(e)) => self.fail(request, e),
            (request, Ok(_)) => {
                tracing::warn!("Unexpected result shape for {:?}", request);
                self.loading = false;
            }
        }

        self.publish();
    }

    fn merge_page(&mut self, page: u32, items: Vec<ArchiveItem>) {
        tracing::debug!("Page {} returned {} items", page, items.len());
        self.loading = false;
        self.view.error = None;
        self.view.payload = if page <= 1 {
            DisplayPayload::Items(items)
        } else {
            let mut all = self.view.payload.items().to_vec();
            all.extend(items);
            DisplayPayload::Items(all)
        };
    }

    fn fail(&mut self, request: Request, error: ArchiveError) {
        self.loading = false;
        let message = match request {
            Request::Latest => {
                self.view.payload = DisplayPayload::Categories(Vec::new());
                error.to_string()
            }
            Request::Hot => {
                self.view.payload = DisplayPayload::Items(Vec::new());
                format!("Failed to fetch hot items: {}", error)
            }
            Request::Category { page } | Request::Search { page } => {
                self.pager.fail();
                if page <= 1 {
                    // Nothing to continue from; a later page would pose as the first.
                    self.pager.finish();
                    self.view.payload = DisplayPayload::Items(Vec::new());
                }
                match request {
                    Request::Search { .. } => format!("Search failed: {}", error),
                    _ => format!("Failed to fetch category items: {}", error),
                }
            }
        };

        tracing::error!("{}", message);
        self.view.error = Some(message);
    }

    fn start_generation(&mut self) {
        self.generation += 1;
    }

    fn show(&mut self, mode: DisplayMode, title: String, payload: Option<DisplayPayload>) {
        self.view.mode = mode;
        self.view.title = title;
        if let Some(payload) = payload {
            self.view.payload = payload;
        }
    }

    fn publish(&mut self) {
        self.view.is_loading = self.loading;
        self.view.is_last_page = match self.browse {
            Browse::Nothing => true,
            _ => self.pager.is_last_page(),
        };
        self.snapshots.send_replace(self.view.clone());
    }
}
