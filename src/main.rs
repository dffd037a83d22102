use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use archivist::app::AppContext;
use archivist::cli::{commands, Cli, Commands, FavoritesAction};
use archivist::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {}", e);
        Config::default()
    });
    cli.apply_overrides(&mut config);

    let ctx = AppContext::new(None, config)?;

    match cli.command {
        Commands::Latest { tree } => {
            commands::latest(&ctx, tree).await?;
        }
        Commands::Category { name, pages } => {
            commands::browse_category(&ctx, &name, pages).await?;
        }
        Commands::Search {
            query,
            media_types,
            pages,
        } => {
            commands::search(&ctx, &query, &media_types, pages).await?;
        }
        Commands::Hot { period } => {
            commands::hot(&ctx, period).await?;
        }
        Commands::Files { identifier } => {
            commands::list_files(&ctx, &identifier).await?;
        }
        Commands::Download {
            identifier, files, ..
        } => {
            commands::download(&ctx, &identifier, &files).await?;
        }
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&ctx)?,
            FavoritesAction::Add { identifier } => {
                commands::add_favorite(&ctx, &identifier).await?;
            }
            FavoritesAction::Remove { identifier } => {
                commands::remove_favorite(&ctx, &identifier)?;
            }
        },
        Commands::Open { identifier } => {
            commands::open_item(&ctx, &identifier)?;
        }
        Commands::Thumbnail { identifier } => {
            commands::thumbnail(&ctx, &identifier)?;
        }
    }

    Ok(())
}
