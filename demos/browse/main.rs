//! Browse listings from a running Car Mart backend
//!
//! This example demonstrates:
//! - Loading configuration from YAML with environment overrides
//! - Restoring a session from disk
//! - Opening a listing view from a URL and paging through it
//! - Rendering cards
//!
//! ```text
//! CARMART_API_URL=http://localhost:5000/api cargo run --example browse -- \
//!     "https://carmart.example/vehicles?make=Toyota&sort=price_asc"
//! ```

use anyhow::Context;
use carmart::prelude::*;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "demos/browse/carmart.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("carmart=info")),
        )
        .init();

    println!("🚗 Car Mart Browser");
    println!("===================\n");

    // Load configuration
    let config = if Path::new(CONFIG_PATH).exists() {
        ClientConfig::from_yaml_file(CONFIG_PATH)?
    } else {
        ClientConfig::default()
    }
    .with_env_overrides()?;
    println!("✅ API: {}", config.base_url);

    // Restore the session, if one was saved
    let session = match &config.session_file {
        Some(path) => SessionStore::new(FileSessionBackend::new(path)),
        None => SessionStore::in_memory(),
    };
    if let Some(restored) = session.init().await? {
        let who = restored.user.as_ref().map(|u| u.display_name()).unwrap_or("unknown user");
        println!("✅ Restored session for {}", who);
    }

    let client = MarketClient::new(config, session).context("cannot create client")?;

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://carmart.example/vehicles".to_string());
    let mut view = ListingView::<Vehicle>::open(client.clone(), &url)?;

    view.refresh().await?;
    print_page(&view);

    while view.pagination().has_next_page && view.pagination().current_page < 3 {
        view.next_page();
        view.refresh().await?;
        print_page(&view);
    }

    println!("\n🔗 {}", view.url());
    Ok(())
}

fn print_page(view: &ListingView<Vehicle>) {
    let info = view.pagination();
    println!(
        "\n📄 Page {}/{} (items {}-{} of {})",
        info.current_page, info.total_pages, info.start_item, info.end_item, info.total_items
    );
    for card in view.cards() {
        let subtitle = card.subtitle.as_deref().unwrap_or("");
        println!("   - {:<32} {:>16}  {}", card.title, card.price_label, subtitle);
    }
}
