use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Canonical article shape handed to the presentation layer.
///
/// `url` doubles as the stable identity key. `title`, `source` and `url`
/// are always non-empty; `description` and `image_url` are best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub source: String,
    pub published_at: String,
    pub url: String,
    pub image_url: Option<String>,
}

/// Filter state passed by value into the aggregator on each fetch.
///
/// Absent fields are omitted from provider queries entirely, never sent
/// as empty strings. Dates use a single representation here; each
/// adapter converts at its own boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub query: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Filters {
    /// Set the start date, rejecting a range where `from > to`. On
    /// rejection the previous value is kept.
    pub fn set_from(&mut self, from: Option<NaiveDate>) -> Result<()> {
        if let (Some(f), Some(t)) = (from, self.to) {
            if f > t {
                return Err(Error::Filter(format!(
                    "start date {} is after end date {}",
                    f, t
                )));
            }
        }
        self.from = from;
        Ok(())
    }

    /// Set the end date, with the same range check as [`Filters::set_from`].
    pub fn set_to(&mut self, to: Option<NaiveDate>) -> Result<()> {
        if let (Some(f), Some(t)) = (self.from, to) {
            if f > t {
                return Err(Error::Filter(format!(
                    "start date {} is after end date {}",
                    f, t
                )));
            }
        }
        self.to = to;
        Ok(())
    }
}
