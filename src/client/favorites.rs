//! Favorites endpoints

use super::{Auth, MarketClient};
use crate::core::error::Result;
use crate::core::favorites::FavoritesApi;
use crate::entities::{FavoriteEntry, FavoriteKey};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::IgnoredAny;

#[async_trait]
impl FavoritesApi for MarketClient {
    async fn fetch_favorites(&self) -> Result<Vec<FavoriteEntry>> {
        let url = self.endpoint(&["favorites"])?;
        let request = self.request(Method::GET, url, Auth::Required)?;
        let entries: Vec<FavoriteEntry> = self.execute(request).await?.into_data("/favorites")?;
        Ok(entries)
    }

    async fn add_favorite(&self, key: &FavoriteKey) -> Result<()> {
        let url = self.endpoint(&["favorites"])?;
        let request = self.request(Method::POST, url, Auth::Required)?.json(key);
        self.execute::<IgnoredAny>(request).await?;
        Ok(())
    }

    async fn remove_favorite(&self, key: &FavoriteKey) -> Result<()> {
        let url = self.endpoint(&["favorites", key.item_type.as_str(), key.item_id.as_str()])?;
        let request = self.request(Method::DELETE, url, Auth::Required)?;
        self.execute::<IgnoredAny>(request).await?;
        Ok(())
    }
}
