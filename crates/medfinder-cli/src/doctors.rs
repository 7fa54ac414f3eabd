use medfinder_core::AppConfig;
use medfinder_directory::{slugify, DirectoryScraper};

use crate::print_json;

/// Scrapes one directory page and prints the result.
///
/// A fetch failure is reported in the printed `error` field and also makes
/// the command exit non-zero.
///
/// # Errors
///
/// Returns an error if the inputs slugify to nothing, the scraper cannot be
/// built, or the page could not be fetched.
pub(crate) async fn run_doctors(
    config: &AppConfig,
    city: &str,
    specialty: &str,
    page: u32,
) -> anyhow::Result<()> {
    if slugify(city).is_empty() || slugify(specialty).is_empty() {
        anyhow::bail!("city and specialty must contain letters or digits");
    }

    let scraper = DirectoryScraper::with_base_url(
        &config.directory_base_url,
        config.directory_timeout_secs,
        &config.directory_user_agent,
    )?;
    let result = scraper.scrape_page(city, specialty, page).await;
    print_json(&result)?;

    match result.error {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}
