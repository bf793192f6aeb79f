//! Marketplace listing types returned by the list and detail endpoints

#[macro_use]
mod macros;

pub mod favorite;
pub mod part;
pub mod service;
pub mod user;
pub mod vehicle;

pub use favorite::{FavoriteEntry, FavoriteKey};
pub use part::Part;
pub use service::Service;
pub use user::User;
pub use vehicle::Vehicle;
