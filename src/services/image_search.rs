use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::config::required_env;

const API_URL: &str = "https://customsearch.googleapis.com/customsearch/v1";

/// Most results a single search request returns
pub const MAX_RESULTS: u8 = 10;

/// One image offered to the operator
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    pub title: String,
    pub full_url: String,
    pub width: u32,
    pub height: u32,
    /// Format taken from the MIME subtype, e.g. `jpeg`
    pub file_format: String,
}

/// Searches for candidate images and downloads the chosen one
pub trait ImageSearch {
    fn search(&self, query: &str, count: u8) -> impl Future<Output = Result<Vec<ImageResult>>>;

    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

/// Google Custom Search JSON API, restricted to freely licensed images
pub struct GoogleImageSearch {
    client: Client,
    api_key: String,
    engine_id: String,
}

impl GoogleImageSearch {
    pub fn new(api_key: String, engine_id: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            engine_id,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            required_env("GOOGLE_API_KEY")?,
            required_env("GOOGLE_SEARCH_ENGINE_ID")?,
        ))
    }
}

impl ImageSearch for GoogleImageSearch {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<ImageResult>> {
        let num = count.clamp(1, MAX_RESULTS).to_string();
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("searchType", "image"),
                ("num", num.as_str()),
                ("rights", "cc_publicdomain,cc_attribute,cc_sharealike"),
                ("safe", "active"),
                ("imgSize", "large"),
            ])
            .send()
            .await
            .context("Failed to send image search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Image search API error: {} - {}", status, body);
        }

        let response: SearchResponse = response
            .json()
            .await
            .context("Failed to parse image search response")?;

        Ok(response.into_results())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download image from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Image download failed: {} ({})", response.status(), url);
        }

        Ok(response
            .bytes()
            .await
            .context("Failed to read image body")?
            .to_vec())
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    mime: String,
    #[serde(default)]
    image: ItemImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemImage {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

impl SearchResponse {
    fn into_results(self) -> Vec<ImageResult> {
        self.items
            .into_iter()
            .filter(|item| !item.link.is_empty())
            .map(|item| ImageResult {
                file_format: item.mime.rsplit('/').next().unwrap_or_default().to_string(),
                title: item.title,
                full_url: item.link,
                width: item.image.width,
                height: item.image.height,
            })
            .collect()
    }
}
