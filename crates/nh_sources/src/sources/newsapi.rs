use async_trait::async_trait;
use chrono::{NaiveDate, SecondsFormat};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use nh_core::{Credentials, Error, Filters, Result};

use crate::sources::NewsSource;

/// Raw article shape returned by the NewsAPI `everything` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsApiArticle {
    pub title: String,
    pub description: Option<String>,
    pub source: NewsApiSourceRef,
    pub published_at: String,
    pub url: String,
    pub url_to_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewsApiSourceRef {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsApiResponse {
    articles: Option<Vec<NewsApiArticle>>,
}

/// Adapter for the generic news search API (NewsAPI).
pub struct NewsApiSource {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl NewsApiSource {
    const BASE_URL: &'static str = "https://newsapi.org/v2/everything";

    pub fn new(credentials: &Credentials) -> Self {
        Self {
            base_url: Self::BASE_URL.to_string(),
            api_key: credentials.newsapi_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the adapter at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the query URL. Only present filter fields are appended;
    /// dates expand to full ISO-8601 UTC timestamps at midnight.
    pub fn build_url(&self, filters: &Filters) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = &filters.query {
                pairs.append_pair("q", query);
            }
            if let Some(category) = &filters.category {
                pairs.append_pair("category", category);
            }
            if let Some(source) = &filters.source {
                pairs.append_pair("sources", source);
            }
            if let Some(from) = filters.from {
                pairs.append_pair("from", &to_timestamp(from));
            }
            if let Some(to) = filters.to {
                pairs.append_pair("to", &to_timestamp(to));
            }
            pairs.append_pair("apiKey", &self.api_key);
        }

        Ok(url)
    }
}

fn to_timestamp(date: NaiveDate) -> String {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl NewsSource for NewsApiSource {
    type Item = NewsApiArticle;

    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn search(&self, filters: &Filters) -> Result<Vec<NewsApiArticle>> {
        let url = self.build_url(filters)?;
        debug!(url = %url, "querying NewsAPI");

        let body: NewsApiResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.articles.unwrap_or_default())
    }
}
