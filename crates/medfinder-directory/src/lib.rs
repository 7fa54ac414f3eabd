//! Lybrate doctor-directory scraper.
//!
//! Fetches one listing page per call and extracts doctor cards with layered
//! selector fallbacks; every field degrades to a default independently.

pub mod client;
pub mod error;
mod extract;
pub mod parse;
pub mod types;

pub use client::{slugify, DirectoryScraper};
pub use error::DirectoryError;
pub use parse::{parse_listing, resolve_profile_link, ParsedListing};
pub use types::{DoctorRecord, ScrapeResult};
