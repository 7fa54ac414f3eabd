//! Listing-page parsing: container lookup, card enumeration, record assembly.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::extract::{
    first_match, name_and_href, selector, Strategy, ADDRESS_STRATEGIES, CHARGES_STRATEGIES,
    DEGREE_STRATEGIES, EXPERIENCE_STRATEGIES, RATING_VOTES_STRATEGIES,
};
use crate::types::{
    DoctorRecord, DEFAULT_ADDRESS, DEFAULT_CHARGES, DEFAULT_DEGREE, DEFAULT_EXPERIENCE,
    DEFAULT_RATING_VOTES,
};

static LISTING_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class*="grid__col-lt-20"]"#));
static DOCTOR_CARD: LazyLock<Selector> = LazyLock::new(|| selector(r#"div[class*="ly-doctor"]"#));
static PLAIN_GRID: LazyLock<Selector> = LazyLock::new(|| selector("div.grid"));

type CardStrategy = for<'a> fn(ElementRef<'a>) -> Vec<ElementRef<'a>>;

/// Tried in order; the first strategy that yields any card wins.
const CARD_STRATEGIES: &[CardStrategy] = &[marked_doctor_cards, plain_grid_cards];

/// Records extracted from one page plus the number of candidate cards seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedListing {
    pub doctors: Vec<DoctorRecord>,
    pub cards_found: usize,
}

/// Parse a listing page into doctor records.
///
/// `origin` prefixes site-relative profile links. `city` is the fallback
/// when the profile link carries no city segment; `specialty` is copied
/// onto every record. Callers pass both already slugified.
#[must_use]
pub fn parse_listing(html: &str, origin: &str, city: &str, specialty: &str) -> ParsedListing {
    let document = Html::parse_document(html);
    let container = document
        .select(&LISTING_CONTAINER)
        .next()
        .unwrap_or_else(|| document.root_element());

    let cards = CARD_STRATEGIES
        .iter()
        .map(|strategy| strategy(container))
        .find(|cards| !cards.is_empty())
        .unwrap_or_default();

    let doctors = cards
        .iter()
        .filter_map(|card| doctor_from_card(*card, origin, city, specialty))
        .collect();

    ParsedListing {
        doctors,
        cards_found: cards.len(),
    }
}

/// Absolute links are kept, site-relative links get `origin` prepended,
/// anything else resolves to an empty string.
#[must_use]
pub fn resolve_profile_link(href: &str, origin: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{href}", origin.trim_end_matches('/'))
    } else {
        String::new()
    }
}

/// City slug from the profile link's path (`https://host/<city>/...`).
fn city_from_link(link: &str) -> Option<&str> {
    link.split('/').nth(3).filter(|segment| !segment.is_empty())
}

fn doctor_from_card(
    card: ElementRef<'_>,
    origin: &str,
    city: &str,
    specialty: &str,
) -> Option<DoctorRecord> {
    let (name, href) = name_and_href(card)?;
    let profile_link = resolve_profile_link(&href, origin);
    let scraped_city = city_from_link(&profile_link).unwrap_or(city).to_string();
    let field = |strategies: &[Strategy], default: &str| {
        first_match(card, strategies).unwrap_or_else(|| default.to_string())
    };

    Some(DoctorRecord {
        name,
        degree: field(DEGREE_STRATEGIES, DEFAULT_DEGREE),
        address: field(ADDRESS_STRATEGIES, DEFAULT_ADDRESS),
        rating_votes: field(RATING_VOTES_STRATEGIES, DEFAULT_RATING_VOTES),
        experience: field(EXPERIENCE_STRATEGIES, DEFAULT_EXPERIENCE),
        charges: field(CHARGES_STRATEGIES, DEFAULT_CHARGES),
        profile_link,
        scraped_specialty: specialty.to_string(),
        scraped_city,
    })
}

/// Divs whose class contains the doctor marker. A marked div nested inside
/// another marked div belongs to that card and is not a card of its own.
fn marked_doctor_cards(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    container
        .select(&DOCTOR_CARD)
        .filter(|card| {
            !card
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| DOCTOR_CARD.matches(&ancestor))
        })
        .collect()
}

/// Divs whose class list is exactly `grid`.
fn plain_grid_cards(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    container
        .select(&PLAIN_GRID)
        .filter(|card| card.value().classes().eq(["grid"]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.lybrate.com";

    fn card(body: &str) -> String {
        format!(r#"<div class="ly-doctor">{body}</div>"#)
    }

    fn named(name: &str, href: &str) -> String {
        format!(r#"<h2 itemprop="name"><a href="{href}">{name}</a></h2>"#)
    }

    fn page(cards: &str) -> String {
        format!(
            r#"<html><body><div class="grid__col-lt-20 lybMar-top-btm--half">{cards}</div></body></html>"#
        )
    }

    #[test]
    fn resolves_site_relative_link() {
        assert_eq!(
            resolve_profile_link("/doctor/x", ORIGIN),
            "https://www.lybrate.com/doctor/x"
        );
    }

    #[test]
    fn keeps_absolute_link() {
        let link = "https://www.lybrate.com/pune/doctor/dr-b";
        assert_eq!(resolve_profile_link(link, ORIGIN), link);
    }

    #[test]
    fn bare_relative_link_resolves_to_empty() {
        assert_eq!(resolve_profile_link("doctor/x", ORIGIN), "");
        assert_eq!(resolve_profile_link("", ORIGIN), "");
    }

    #[test]
    fn origin_trailing_slash_is_not_doubled() {
        assert_eq!(
            resolve_profile_link("/doctor/x", "http://127.0.0.1:9000/"),
            "http://127.0.0.1:9000/doctor/x"
        );
    }

    #[test]
    fn card_without_name_heading_is_dropped() {
        let html = page(&format!(
            "{}{}",
            card(r#"<div class="ly-doctor__degree">MBBS</div>"#),
            card(&named("Dr. Kept", "/delhi/doctor/dr-kept")),
        ));
        let parsed = parse_listing(&html, ORIGIN, "delhi", "dentist");
        assert_eq!(parsed.cards_found, 2);
        assert_eq!(parsed.doctors.len(), 1);
        assert_eq!(parsed.doctors[0].name, "Dr. Kept");
    }

    #[test]
    fn name_only_card_gets_every_default() {
        let html = page(&card(&named("Dr. Bare", "/bangalore/doctor/dr-bare")));
        let parsed = parse_listing(&html, ORIGIN, "bengaluru", "dentist");
        assert_eq!(
            parsed.doctors,
            vec![DoctorRecord {
                name: "Dr. Bare".to_string(),
                profile_link: "https://www.lybrate.com/bangalore/doctor/dr-bare".to_string(),
                degree: "N/A".to_string(),
                address: "N/A".to_string(),
                rating_votes: "0%".to_string(),
                experience: "0 years experience".to_string(),
                charges: "N/A".to_string(),
                scraped_specialty: "dentist".to_string(),
                scraped_city: "bangalore".to_string(),
            }]
        );
    }

    #[test]
    fn unresolvable_link_falls_back_to_query_city() {
        let html = page(&card(&named("Dr. C", "doctor/dr-c")));
        let parsed = parse_listing(&html, ORIGIN, "mumbai", "cardiologist");
        assert_eq!(parsed.doctors[0].profile_link, "");
        assert_eq!(parsed.doctors[0].scraped_city, "mumbai");
    }

    #[test]
    fn short_link_falls_back_to_query_city() {
        let html = page(&card(&named("Dr. D", "https://www.lybrate.com")));
        let parsed = parse_listing(&html, ORIGIN, "chennai", "dentist");
        assert_eq!(parsed.doctors[0].scraped_city, "chennai");
    }

    #[test]
    fn whole_document_is_searched_without_container() {
        let html = format!(
            "<html><body>{}</body></html>",
            card(&named("Dr. E", "/kolkata/doctor/dr-e"))
        );
        let parsed = parse_listing(&html, ORIGIN, "kolkata", "dentist");
        assert_eq!(parsed.doctors.len(), 1);
    }

    #[test]
    fn nested_marker_divs_do_not_duplicate_a_card() {
        let html = page(&card(&format!(
            r#"<div class="ly-doctor__header">{}</div><div class="ly-doctor__degree">MBBS, MD</div>"#,
            named("Dr. F", "/delhi/doctor/dr-f"),
        )));
        let parsed = parse_listing(&html, ORIGIN, "delhi", "physician");
        assert_eq!(parsed.cards_found, 1);
        assert_eq!(parsed.doctors.len(), 1);
        assert_eq!(parsed.doctors[0].degree, "MBBS; MD");
    }

    #[test]
    fn falls_back_to_plain_grid_cards() {
        let html = page(&format!(
            r#"<div class="grid">{}</div><div class="grid wide">{}</div>"#,
            named("Dr. G", "/pune/doctor/dr-g"),
            named("Dr. Skipped", "/pune/doctor/dr-skipped"),
        ));
        let parsed = parse_listing(&html, ORIGIN, "pune", "dentist");
        assert_eq!(parsed.cards_found, 1);
        assert_eq!(parsed.doctors[0].name, "Dr. G");
    }

    #[test]
    fn page_without_cards_yields_nothing() {
        let parsed = parse_listing("<html><body><p>captcha</p></body></html>", ORIGIN, "x", "y");
        assert_eq!(parsed.cards_found, 0);
        assert!(parsed.doctors.is_empty());
    }

    #[test]
    fn full_card_extracts_every_field() {
        let html = page(&card(&format!(
            r#"{}
            <div class="lybEllipsis ly-doctor__degree grid__col-20">BDS, MDS - Orthodontics</div>
            <span itemprop="streetAddress">HSR Layout, Bangalore</span>
            <span class="lybRating"><span class="lybRating__percentage">97%</span>
            <span class="lybRating__count">(210 votes)</span></span>
            <div class="grid__col-xs-10 grid--direction-row"><span>11 Years Experience</span></div>
            <span itemprop="priceRange">₹400</span>"#,
            named("Dr. Full", "/bangalore/doctor/dr-full"),
        )));
        let parsed = parse_listing(&html, ORIGIN, "bangalore", "dentist");
        let doctor = &parsed.doctors[0];
        assert_eq!(doctor.degree, "BDS; MDS - Orthodontics");
        assert_eq!(doctor.address, "HSR Layout; Bangalore");
        assert_eq!(doctor.rating_votes, "97% (210 votes)");
        assert_eq!(doctor.experience, "11 Years Experience");
        assert_eq!(doctor.charges, "₹400");
    }
}
