//! Prints a shareable preview link for one catalog item.
//!
//! Uses the same configuration as the server, so the link verifies against a
//! server running with the same secret and expiration.

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use draftpass_core::{ContentStore, PreviewLinks, Registry};
use draftpass_preview::state::codec_for;
use draftpass_preview::{Catalog, Config};

/// Print a draft preview link.
#[derive(Parser, Debug)]
#[command(name = "draftpass-link")]
#[command(about = "Print a shareable preview link for a content item", long_about = None)]
struct Args {
    /// Content id.
    id: u64,

    /// Link to this page of a multi-page document.
    #[arg(long)]
    page: Option<u32>,

    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
    }

    let config = Config::from_env()?;
    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("loading {}", config.catalog_path.display()))?;

    let Some(item) = catalog.load_by_id(args.id) else {
        bail!("no content with id {} in the catalog", args.id);
    };

    if item.status.is_published() {
        eprintln!("note: item {} is published; the link will redirect", item.id);
    }
    if !catalog.is_enabled(item.id) {
        eprintln!(
            "note: item {} is not in preview_enabled; the link will not authorize",
            item.id
        );
    }

    let codec = Arc::new(codec_for(&config));
    let lifetime_hours = codec.lifetime().as_secs() / 3600;
    let links = PreviewLinks::new(&config.base_url, codec)?;

    let link = match args.page {
        Some(page) => links.page_link(&item, page),
        None => links.preview_link(&item),
    };

    println!("{link}");
    eprintln!(
        "valid for {}h to {}h",
        lifetime_hours.div_ceil(2),
        lifetime_hours
    );

    Ok(())
}
