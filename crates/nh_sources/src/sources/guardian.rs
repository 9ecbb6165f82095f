use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use nh_core::{Credentials, Error, Filters, Result};

use crate::sources::NewsSource;

/// Raw result item from the Guardian content API `search` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardianItem {
    pub web_title: String,
    pub web_publication_date: String,
    pub web_url: String,
    pub section_name: String,
    pub fields: Option<GuardianFields>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardianFields {
    pub thumbnail: Option<String>,
    pub body_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GuardianResponse {
    response: Option<GuardianEnvelope>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GuardianEnvelope {
    results: Option<Vec<GuardianItem>>,
}

/// Adapter for the newspaper content API (The Guardian).
pub struct GuardianSource {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GuardianSource {
    const BASE_URL: &'static str = "https://content.guardianapis.com/search";

    /// Extra fields requested on every search so the normalizer has a
    /// thumbnail and a body excerpt to work with.
    const SHOW_FIELDS: &'static str = "thumbnail,bodyText";

    pub fn new(credentials: &Credentials) -> Self {
        Self {
            base_url: Self::BASE_URL.to_string(),
            api_key: credentials.guardian_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the adapter at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the query URL. The category filter maps onto the provider's
    /// `tags` parameter; dates stay plain `YYYY-MM-DD` strings.
    pub fn build_url(&self, filters: &Filters) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = &filters.query {
                pairs.append_pair("q", query);
            }
            if let Some(category) = &filters.category {
                pairs.append_pair("tags", category);
            }
            if let Some(source) = &filters.source {
                pairs.append_pair("sources", source);
            }
            if let Some(from) = filters.from {
                pairs.append_pair("from-date", &from.format("%Y-%m-%d").to_string());
            }
            if let Some(to) = filters.to {
                pairs.append_pair("to-date", &to.format("%Y-%m-%d").to_string());
            }
            pairs.append_pair("show-fields", Self::SHOW_FIELDS);
            pairs.append_pair("api-key", &self.api_key);
        }

        Ok(url)
    }
}

#[async_trait]
impl NewsSource for GuardianSource {
    type Item = GuardianItem;

    fn name(&self) -> &str {
        "The Guardian"
    }

    async fn search(&self, filters: &Filters) -> Result<Vec<GuardianItem>> {
        let url = self.build_url(filters)?;
        debug!(url = %url, "querying Guardian API");

        let body: GuardianResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body
            .response
            .and_then(|envelope| envelope.results)
            .unwrap_or_default())
    }
}
