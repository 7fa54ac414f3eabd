use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::DirectoryError;
use crate::parse::parse_listing;
use crate::types::ScrapeResult;

pub const DEFAULT_BASE_URL: &str = "https://www.lybrate.com";

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// The directory serves a reduced page to non-browser agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Scraper for Lybrate's public `/{city}/{specialty}?page=N` listing pages.
///
/// One call fetches exactly one page. There is no retry and no pagination
/// beyond the page the caller asks for.
pub struct DirectoryScraper {
    client: Client,
    base_url: Url,
}

impl DirectoryScraper {
    /// Creates a scraper pointed at the production directory.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, DirectoryError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a scraper against a custom origin (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the client cannot be built, or
    /// [`DirectoryError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DirectoryError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, base_url })
    }

    /// Scheme, host and port of the directory, used to absolutise
    /// site-relative profile links.
    #[must_use]
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Listing URL for a city/specialty pair. Both are slugified.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::InvalidBaseUrl`] if the path cannot be
    /// joined onto the base URL.
    pub fn listing_url(
        &self,
        city: &str,
        specialty: &str,
        page: u32,
    ) -> Result<Url, DirectoryError> {
        let path = format!("{}/{}", slugify(city), slugify(specialty));
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| DirectoryError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Fetches one listing page and extracts its doctor cards.
    ///
    /// Never fails: a fetch error yields an empty result with `error` set.
    /// Records are tagged with the specialty slug and with the city from
    /// each profile link, falling back to the city slug.
    pub async fn scrape_page(&self, city: &str, specialty: &str, page: u32) -> ScrapeResult {
        let city = slugify(city);
        let specialty = slugify(specialty);
        let url = match self.listing_url(&city, &specialty, page) {
            Ok(url) => url,
            Err(e) => {
                return ScrapeResult::failed(
                    String::new(),
                    format!("Could not fetch Lybrate page: {e}"),
                )
            }
        };
        let page_url = url.to_string();

        let body = match self.fetch_listing(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    provider = "lybrate",
                    url = %page_url,
                    error = %e,
                    "directory page fetch failed"
                );
                return ScrapeResult::failed(page_url, format!("Could not fetch Lybrate page: {e}"));
            }
        };

        let listing = parse_listing(&body, &self.origin(), &city, &specialty);
        if listing.cards_found == 0 {
            tracing::warn!(
                provider = "lybrate",
                url = %page_url,
                "no doctor cards found; page structure may have changed"
            );
        } else if listing.doctors.is_empty() {
            tracing::warn!(
                provider = "lybrate",
                url = %page_url,
                cards = listing.cards_found,
                "doctor cards matched but no records extracted"
            );
        } else {
            tracing::debug!(
                provider = "lybrate",
                url = %page_url,
                cards = listing.cards_found,
                doctors = listing.doctors.len(),
                "directory page scraped"
            );
        }

        ScrapeResult::from_doctors(page_url, listing.doctors)
    }

    async fn fetch_listing(&self, url: &Url) -> Result<String, DirectoryError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Directory path segment for a free-form city or specialty:
/// lowercased, punctuation stripped, whitespace runs joined with `-`.
///
/// ```
/// assert_eq!(medfinder_directory::slugify("New Delhi"), "new-delhi");
/// assert_eq!(medfinder_directory::slugify("ENT / Otolaryngologist"), "ent-otolaryngologist");
/// ```
#[must_use]
pub fn slugify(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    kept.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
