//! # Car Mart Client
//!
//! Typed client core for the Car Mart vehicle, parts and services marketplace.
//!
//! ## Features
//!
//! - **Filter State**: Ordered filter mapping that never stores empty values
//! - **URL Sync**: Filters, sort, page and layout mirrored into the query string
//! - **Pagination**: Clamped page math with change notifications
//! - **REST Client**: Typed envelope decoding for listings, favorites, auth and uploads
//! - **Favorites**: Per-item state machine that refetches after every mutation
//! - **Cancellation**: Requests tied to a view's lifetime via `ViewScope`
//! - **Configuration**: YAML config with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use carmart::prelude::*;
//!
//! let config = ClientConfig::default().with_env_overrides()?;
//! let client = MarketClient::new(config, SessionStore::in_memory())?;
//!
//! // A listing page opened from its URL
//! let mut view = ListingView::<Vehicle>::open(
//!     client.clone(),
//!     "https://carmart.example/vehicles?make=Toyota&color=red,blue",
//! )?;
//! view.refresh().await?;
//! for card in view.cards() {
//!     println!("{} - {}", card.title, card.price_label);
//! }
//!
//! // Narrowing the search rewrites the URL and goes back to page 1
//! view.set_filter("fuel_type", FilterValue::from("Diesel"));
//! view.refresh().await?;
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod entities;
pub mod presentation;
pub mod storage;
pub mod url_sync;
pub mod view;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core State ===
    pub use crate::core::{
        cancel::{ScopeHandle, ViewScope},
        compare::CompareList,
        entity::{ItemType, Listing},
        favorites::{FavoriteState, FavoritesApi, FavoritesController},
        pagination::{PaginationController, PaginationInfo},
        query::{FilterState, FilterValue, LayoutMode, ListQuery, SortOption, SortState},
        session::{Session, SessionBackend, SessionStore},
    };

    // === Errors ===
    pub use crate::core::error::{MarketError, Result, SessionError, ValidationError};

    // === Entities ===
    pub use crate::entities::{FavoriteEntry, FavoriteKey, Part, Service, User, Vehicle};

    // === Client ===
    pub use crate::client::{
        ApiEnvelope, Credentials, ListPage, MarketClient, Registration, UploadFile, UploadedImage,
    };

    // === Storage ===
    pub use crate::storage::{FileSessionBackend, InMemorySessionBackend};

    // === Config ===
    pub use crate::config::{ClientConfig, UploadLimits};

    // === URL, Presentation and Views ===
    pub use crate::presentation::{CardView, format_price, to_card, to_cards};
    pub use crate::url_sync::{ArrayEncoding, UrlSynchronizer};
    pub use crate::view::ListingView;
}
