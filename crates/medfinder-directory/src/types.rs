use serde::Serialize;

pub(crate) const DEFAULT_DEGREE: &str = "N/A";
pub(crate) const DEFAULT_ADDRESS: &str = "N/A";
pub(crate) const DEFAULT_RATING_VOTES: &str = "0%";
pub(crate) const DEFAULT_EXPERIENCE: &str = "0 years experience";
pub(crate) const DEFAULT_CHARGES: &str = "N/A";

/// One doctor card extracted from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorRecord {
    pub name: String,
    pub profile_link: String,
    pub degree: String,
    pub address: String,
    pub rating_votes: String,
    pub experience: String,
    pub charges: String,
    pub scraped_specialty: String,
    pub scraped_city: String,
}

/// Everything scraped from one listing page.
///
/// A fetch failure still produces a well-formed value: `doctors` is empty
/// and `error` describes what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    pub doctors: Vec<DoctorRecord>,
    pub page_url_scraped: String,
    pub doctors_found_on_page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    #[must_use]
    pub fn from_doctors(page_url: String, doctors: Vec<DoctorRecord>) -> Self {
        Self {
            doctors_found_on_page: doctors.len(),
            doctors,
            page_url_scraped: page_url,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(page_url: String, error: impl Into<String>) -> Self {
        Self {
            doctors: Vec::new(),
            page_url_scraped: page_url,
            doctors_found_on_page: 0,
            error: Some(error.into()),
        }
    }
}
