//! Core module containing the state types, traits and errors of the client

pub mod cancel;
pub mod compare;
pub mod entity;
pub mod error;
pub mod favorites;
pub mod pagination;
pub mod query;
pub mod session;
pub mod validation;

pub use cancel::{ScopeHandle, ViewScope};
pub use compare::CompareList;
pub use entity::{ItemType, Listing};
pub use error::{MarketError, Result, SessionError, ValidationError};
pub use favorites::{FavoriteState, FavoritesApi, FavoritesController};
pub use pagination::{PaginationController, PaginationInfo};
pub use query::{FilterState, FilterValue, LayoutMode, ListQuery, SortOption, SortState};
pub use session::{Session, SessionBackend, SessionStore};
