use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ControllerEvent, HttpCatalogClient, QueryController, Status};
use shared::domain::AVAILABLE_CATEGORIES;
use tracing::{info, warn};

mod config;

/// Terminal stand-in for the product browse view: commits one search against
/// the catalog service and walks forward through the result pages.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the catalog service; overrides desktop.toml and env.
    #[arg(long)]
    catalog_url: Option<String>,
    /// Free-text search term committed once at startup.
    #[arg(long, default_value = "")]
    name: String,
    /// Browse a predefined category instead of a free-text search.
    #[arg(long, conflicts_with = "name")]
    category: Option<String>,
    /// Maximum number of pages to walk forward through.
    #[arg(long, default_value_t = 3)]
    pages: u32,
    /// Items per page; overrides desktop.toml and env.
    #[arg(long)]
    page_size: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(url) = args.catalog_url {
        settings.catalog_url = url;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }

    let catalog = HttpCatalogClient::new(&settings.catalog_url)
        .context("bad catalog configuration")?;
    let controller = QueryController::with_page_size(Arc::new(catalog), settings.page_size);
    let mut events = controller.subscribe_events();

    match &args.category {
        Some(category) => {
            if !AVAILABLE_CATEGORIES.contains(&category.as_str()) {
                warn!(%category, "not a predefined category, searching anyway");
            }
            controller.select_category(category).await;
        }
        None => {
            controller.set_search_term(&args.name).await;
            controller.commit_search().await;
        }
    }

    let mut pages_shown = 0;
    'session: loop {
        loop {
            match events.recv().await.context("controller event stream ended")? {
                ControllerEvent::FetchStarted { query } => {
                    info!(term = %query.term, page = query.page_number, "fetching");
                }
                ControllerEvent::PageLoaded { .. } | ControllerEvent::FetchFailed { .. } => break,
            }
        }

        let snapshot = controller.snapshot().await;
        match snapshot.status {
            Status::Success => {
                let page = snapshot.data.as_ref().context("success without data")?;
                println!(
                    "-- page {} ({} items) --",
                    snapshot.query.page_number,
                    page.items.len()
                );
                for item in &page.items {
                    println!("{}", serde_json::to_string(item)?);
                }
            }
            Status::Empty => {
                println!("Oops! No data available.");
                break 'session;
            }
            Status::Error => {
                let error = snapshot.error.as_ref().context("error status without error")?;
                println!("Oops! An error occurred while loading: {error}");
                break 'session;
            }
            Status::RefetchError => {
                let error = snapshot.error.as_ref().context("error status without error")?;
                println!("Oops! An error occurred while loading: {error}");
                println!("(previous results are still shown)");
                break 'session;
            }
            Status::Idle | Status::Loading | Status::Refetching => {}
        }

        pages_shown += 1;
        if pages_shown >= args.pages || !controller.can_advance().await {
            break;
        }
        controller.next_page().await;
    }

    Ok(())
}
