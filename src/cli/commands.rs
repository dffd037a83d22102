use crate::app::{AppContext, ArchiveError, Result};
use crate::domain::{ArchiveCategory, ArchiveItem, HotPeriod, MetadataResponse};
use crate::fetcher::download::DownloadRequest;
use crate::session::{DisplayPayload, Session, Snapshot};

pub async fn latest(ctx: &AppContext, tree: bool) -> Result<()> {
    let mut session = ctx.session();
    session.fetch_latest();
    session.settle().await;
    check(session.snapshot())?;

    match session.category_tree() {
        Some(root) if tree => print_tree(root, 0),
        Some(root) => {
            println!("{} ({} items)", root.display_name, root.items.len());
            for category in &root.sub_categories {
                println!("  {:<30} {}", category.name, category.total_item_count());
                for sub in &category.sub_categories {
                    println!("    {:<28} {}", sub.name, sub.total_item_count());
                }
            }
        }
        None => println!("No uploads"),
    }
    Ok(())
}

pub async fn browse_category(ctx: &AppContext, name: &str, pages: u32) -> Result<()> {
    let mut session = ctx.session();
    if name == crate::domain::LATEST_CATEGORY {
        // The latest list is built from the feed, so it has to be there first.
        session.fetch_latest();
        session.settle().await;
        check(session.snapshot())?;
    }

    session.select_category(name);
    load_pages(&mut session, pages).await?;
    print_snapshot(session.snapshot());
    Ok(())
}

pub async fn search(
    ctx: &AppContext,
    query: &str,
    media_types: &[String],
    pages: u32,
) -> Result<()> {
    let mut session = ctx.session();
    session.set_query(query, media_types);
    load_pages(&mut session, pages).await?;
    print_snapshot(session.snapshot());
    Ok(())
}

pub async fn hot(ctx: &AppContext, period: HotPeriod) -> Result<()> {
    let mut session = ctx.session();
    session.fetch_hot(period);
    session.settle().await;
    check(session.snapshot())?;
    print_snapshot(session.snapshot());
    Ok(())
}

pub async fn list_files(ctx: &AppContext, identifier: &str) -> Result<()> {
    let response = fetch_metadata(ctx, identifier).await?;

    println!("{}", display_or(&response.metadata.title, identifier));
    if !response.metadata.creator.is_empty() {
        println!("  by {}", response.metadata.creator);
    }

    if response.files.is_empty() {
        println!("No files");
        return Ok(());
    }

    for file in &response.files {
        println!("  {:>10}  {:<20} {}", file.display_size(), file.format, file.name);
    }
    Ok(())
}

pub async fn download(ctx: &AppContext, identifier: &str, names: &[String]) -> Result<()> {
    let response = fetch_metadata(ctx, identifier).await?;

    let mut requests = Vec::new();
    if names.is_empty() {
        for file in &response.files {
            requests.push(download_request(ctx, identifier, &file.name));
        }
    } else {
        for name in names {
            if response.files.iter().any(|f| &f.name == name) {
                requests.push(download_request(ctx, identifier, name));
            } else {
                eprintln!("  ! {} - no such file in {}", name, identifier);
            }
        }
    }

    if requests.is_empty() {
        println!("Nothing to download");
        return Ok(());
    }

    println!("Downloading {} files...", requests.len());
    let results = ctx.downloader.download_all(requests).await;

    let mut downloaded = 0;
    let mut errors = 0;
    for (file_name, result) in results {
        match result {
            Ok(outcome) => {
                downloaded += 1;
                println!("  + {} ({} bytes)", outcome.path.display(), outcome.bytes);
            }
            Err(e) => {
                errors += 1;
                eprintln!("  ! {} - {}", file_name, e);
            }
        }
    }

    println!("Download complete: {} files, {} errors", downloaded, errors);
    Ok(())
}

pub fn list_favorites(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.session();
    session.show_favorites();
    check(session.snapshot())?;

    if session.snapshot().payload.is_empty() {
        println!("No favorites");
        return Ok(());
    }
    print_snapshot(session.snapshot());
    Ok(())
}

pub async fn add_favorite(ctx: &AppContext, identifier: &str) -> Result<()> {
    let mut session = ctx.session();
    if session.is_favorite(identifier)? {
        println!("Already a favorite: {}", identifier);
        return Ok(());
    }

    let response = fetch_metadata(ctx, identifier).await?;
    let item = ArchiveItem::new(
        display_or(&response.metadata.title, identifier).to_string(),
        ctx.endpoints.details(identifier),
        response.metadata.mediatype.clone(),
    );

    session.toggle_favorite(&item)?;
    println!("Added favorite: {}", item.display_title());
    Ok(())
}

pub fn remove_favorite(ctx: &AppContext, identifier: &str) -> Result<()> {
    if !ctx.favorites.is_favorite(identifier)? {
        return Err(ArchiveError::ItemNotFound(identifier.to_string()));
    }
    ctx.favorites.remove(identifier)?;
    println!("Removed favorite: {}", identifier);
    Ok(())
}

pub fn open_item(ctx: &AppContext, identifier: &str) -> Result<()> {
    let url = ctx.endpoints.details(identifier);
    open::that(&url)?;
    println!("Opened {}", url);
    Ok(())
}

pub fn thumbnail(ctx: &AppContext, identifier: &str) -> Result<()> {
    println!("{}", ctx.endpoints.thumbnail(identifier));
    Ok(())
}

/// Loads up to `pages` pages, stopping early on the last page or an error.
async fn load_pages(session: &mut Session, pages: u32) -> Result<()> {
    session.settle().await;
    check(session.snapshot())?;

    for _ in 1..pages {
        if !session.load_next_page() {
            break;
        }
        session.settle().await;
        check(session.snapshot())?;
    }
    Ok(())
}

async fn fetch_metadata(ctx: &AppContext, identifier: &str) -> Result<MetadataResponse> {
    let response = ctx.client.metadata(identifier).await?;
    // Unknown identifiers come back as an empty object.
    if response.metadata.identifier.is_empty() && response.files.is_empty() {
        return Err(ArchiveError::ItemNotFound(identifier.to_string()));
    }
    Ok(response)
}

fn download_request(ctx: &AppContext, identifier: &str, file_name: &str) -> DownloadRequest {
    DownloadRequest {
        url: ctx.endpoints.download(identifier, file_name),
        file_name: file_name.to_string(),
    }
}

fn check(snapshot: &Snapshot) -> Result<()> {
    match &snapshot.error {
        Some(message) => Err(ArchiveError::Other(message.clone())),
        None => Ok(()),
    }
}

fn display_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("{}", snapshot.title);

    match &snapshot.payload {
        DisplayPayload::Categories(categories) => {
            if categories.is_empty() {
                println!("No categories");
            }
            for category in categories {
                println!(
                    "  {:<30} {}",
                    category.display_name,
                    category.total_item_count()
                );
            }
        }
        DisplayPayload::Items(items) => {
            if items.is_empty() {
                println!("No items");
            }
            for item in items {
                println!(
                    "  {:<40} {:<16} {}",
                    item.identifier,
                    item.category,
                    item.display_title()
                );
            }
        }
    }

    if !snapshot.is_last_page {
        println!("(more results available, use --pages)");
    }
}

fn print_tree(category: &ArchiveCategory, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}{} ({})",
        indent,
        category.display_name,
        category.total_item_count()
    );

    // The root repeats every item; its children list them once.
    if !category.is_root() {
        for item in &category.items {
            println!("{}  - {} [{}]", indent, item.display_title(), item.identifier);
        }
    }
    for sub in &category.sub_categories {
        print_tree(sub, depth + 1);
    }
}
