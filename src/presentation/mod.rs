//! Mapping listings to the card shape rendered by list views

use crate::config::ClientConfig;
use crate::core::entity::{ItemType, Listing};
use serde::{Deserialize, Serialize};

/// Label used when a listing has no price
pub const PRICE_ON_REQUEST: &str = "Price on request";

/// Normalized card data, identical for every listing kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub id: String,
    pub item_type: ItemType,
    pub title: String,
    pub subtitle: Option<String>,
    pub price_label: String,
    /// Cover image, or the configured placeholder
    pub image: String,
    pub location: Option<String>,
    pub badges: Vec<String>,
    /// Detail page path, e.g. `/vehicles/42`
    pub href: String,
}

/// Format an integer with `,` between groups of three digits
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `"{currency} {amount}"` with the amount rounded to a whole number
pub fn format_price(price: Option<f64>, currency: &str) -> String {
    match price {
        Some(p) if p.is_finite() && p >= 0.0 => {
            format!("{} {}", currency, group_thousands(p.round() as u64))
        }
        _ => PRICE_ON_REQUEST.to_string(),
    }
}

/// Build the card for one listing
pub fn to_card<T: Listing>(item: &T, config: &ClientConfig) -> CardView {
    CardView {
        id: item.id().to_string(),
        item_type: T::ITEM_TYPE,
        title: item.title(),
        subtitle: item.subtitle(),
        price_label: format_price(item.price(), &config.currency),
        image: item
            .images()
            .iter()
            .find(|url| !url.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| config.placeholder_image.clone()),
        location: item.location().map(str::to_string),
        badges: item.badges(),
        href: format!("/{}/{}", T::resource_name(), item.id()),
    }
}

/// Build cards for a page of listings, preserving order
pub fn to_cards<T: Listing>(items: &[T], config: &ClientConfig) -> Vec<CardView> {
    items.iter().map(|item| to_card(item, config)).collect()
}
