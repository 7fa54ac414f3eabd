//! Per-field extraction strategies for a single doctor card.
//!
//! Each field has an ordered list of [`Strategy`] functions. [`first_match`]
//! runs them in order and keeps the first non-empty value; the caller
//! supplies the default when every strategy comes up empty.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

pub(crate) type Strategy = fn(ElementRef<'_>) -> Option<String>;

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid css selector")
}

static NAME_HEADING: LazyLock<Selector> = LazyLock::new(|| selector(r#"h2[itemprop="name"]"#));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static DEGREE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class*="ly-doctor__degree"]"#));
static STREET_ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[itemprop="streetAddress"]"#));
static RATING_WIDGET: LazyLock<Selector> = LazyLock::new(|| selector(r#"span[class*="lybRating"]"#));
static RATING_PERCENTAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[class*="lybRating__percentage"]"#));
static RATING_COUNT: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[class*="lybRating__count"]"#));
static PRICE_RANGE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[itemprop="priceRange"]"#));
static INFO_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[class*="grid__col-xs-10"]"#));
static YEARS_EXPERIENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+ Years Experience").expect("valid experience regex"));

pub(crate) const DEGREE_STRATEGIES: &[Strategy] = &[degree_from_marker];
pub(crate) const ADDRESS_STRATEGIES: &[Strategy] = &[address_from_marker];
pub(crate) const RATING_VOTES_STRATEGIES: &[Strategy] =
    &[rating_from_widget, rating_from_info_blocks];
pub(crate) const EXPERIENCE_STRATEGIES: &[Strategy] =
    &[experience_from_text_node, experience_from_info_blocks];
pub(crate) const CHARGES_STRATEGIES: &[Strategy] =
    &[charges_from_price_range, charges_from_info_blocks];

pub(crate) fn first_match(card: ElementRef<'_>, strategies: &[Strategy]) -> Option<String> {
    strategies
        .iter()
        .find_map(|strategy| strategy(card).filter(|value| !value.is_empty()))
}

/// Concatenates the element's text nodes, each trimmed, empty ones dropped.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Newlines become spaces and commas become semicolons so values stay
/// single-line and CSV-safe.
fn clean_field(text: &str) -> String {
    text.replace('\n', " ").replace(',', ";")
}

/// Name and raw `href` from the card's name heading link.
///
/// Only the first name heading is considered.
pub(crate) fn name_and_href(card: ElementRef<'_>) -> Option<(String, String)> {
    let heading = card.select(&NAME_HEADING).next()?;
    let link = heading.select(&ANCHOR).next()?;
    let name = stripped_text(link);
    if name.is_empty() {
        return None;
    }
    let href = link.value().attr("href").unwrap_or_default().to_string();
    Some((name, href))
}

fn degree_from_marker(card: ElementRef<'_>) -> Option<String> {
    let tag = card.select(&DEGREE).next()?;
    Some(clean_field(&stripped_text(tag)))
}

fn address_from_marker(card: ElementRef<'_>) -> Option<String> {
    let tag = card.select(&STREET_ADDRESS).next()?;
    Some(clean_field(&stripped_text(tag)))
}

fn rating_from_widget(card: ElementRef<'_>) -> Option<String> {
    let widget = card.select(&RATING_WIDGET).next()?;
    let percentage = stripped_text(widget.select(&RATING_PERCENTAGE).next()?);
    let votes = widget
        .select(&RATING_COUNT)
        .next()
        .map(stripped_text)
        .unwrap_or_default();
    Some(format!("{percentage} {votes}").trim().to_string())
}

/// First generic info block whose text satisfies `predicate`, newlines
/// flattened.
fn info_block_matching(card: ElementRef<'_>, predicate: impl Fn(&str) -> bool) -> Option<String> {
    card.select(&INFO_BLOCK)
        .map(stripped_text)
        .find(|text| predicate(text.as_str()))
        .map(|text| text.replace('\n', " "))
}

fn rating_from_info_blocks(card: ElementRef<'_>) -> Option<String> {
    info_block_matching(card, |text| {
        text.contains('%') && text.to_lowercase().contains("vote")
    })
}

fn experience_from_text_node(card: ElementRef<'_>) -> Option<String> {
    card.text()
        .find(|node| YEARS_EXPERIENCE.is_match(node))
        .map(|node| node.trim().to_string())
}

fn experience_from_info_blocks(card: ElementRef<'_>) -> Option<String> {
    info_block_matching(card, |text| text.to_lowercase().contains("experience"))
}

fn charges_from_price_range(card: ElementRef<'_>) -> Option<String> {
    card.select(&PRICE_RANGE).next().map(stripped_text)
}

fn charges_from_info_blocks(card: ElementRef<'_>) -> Option<String> {
    info_block_matching(card, |text| {
        text.contains('₹') || text.to_lowercase().contains("consultation fee")
    })
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    static CARD: LazyLock<Selector> = LazyLock::new(|| selector("div.card"));

    fn with_card<T>(inner: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
        let html = Html::parse_fragment(&format!(r#"<div class="card">{inner}</div>"#));
        let card = html.select(&CARD).next().expect("card element");
        f(card)
    }

    #[test]
    fn first_match_skips_empty_values() {
        fn empty(_: ElementRef<'_>) -> Option<String> {
            Some(String::new())
        }
        fn fixed(_: ElementRef<'_>) -> Option<String> {
            Some("second".to_string())
        }
        let strategies: [Strategy; 2] = [empty, fixed];
        let value = with_card("", |card| first_match(card, &strategies));
        assert_eq!(value.as_deref(), Some("second"));
    }

    #[test]
    fn stripped_text_trims_each_node() {
        let text = with_card("<span>  Dr. A  </span>\n<span> Sharma </span>", stripped_text);
        assert_eq!(text, "Dr. ASharma");
    }

    #[test]
    fn name_requires_link_inside_heading() {
        let found = with_card(r#"<h2 itemprop="name">Dr. No Link</h2>"#, name_and_href);
        assert!(found.is_none());
    }

    #[test]
    fn name_reads_text_and_href() {
        let found = with_card(
            r#"<h2 itemprop="name"><a href="/bangalore/doctor/dr-a"> Dr. A </a></h2>"#,
            name_and_href,
        );
        assert_eq!(
            found,
            Some(("Dr. A".to_string(), "/bangalore/doctor/dr-a".to_string()))
        );
    }

    #[test]
    fn degree_replaces_commas() {
        let degree = with_card(
            r#"<div class="lybEllipsis ly-doctor__degree grid__col-20">BDS, MDS</div>"#,
            |card| first_match(card, DEGREE_STRATEGIES),
        );
        assert_eq!(degree.as_deref(), Some("BDS; MDS"));
    }

    #[test]
    fn rating_prefers_widget() {
        let rating = with_card(
            r#"<span class="lybRating"><span class="lybRating__percentage">96%</span>
               <span class="lybRating__count">(120 votes)</span></span>
               <div class="grid__col-xs-10">80% 3 votes</div>"#,
            |card| first_match(card, RATING_VOTES_STRATEGIES),
        );
        assert_eq!(rating.as_deref(), Some("96% (120 votes)"));
    }

    #[test]
    fn rating_widget_without_count_has_no_trailing_space() {
        let rating = with_card(
            r#"<span class="lybRating"><span class="lybRating__percentage">90%</span></span>"#,
            |card| first_match(card, RATING_VOTES_STRATEGIES),
        );
        assert_eq!(rating.as_deref(), Some("90%"));
    }

    #[test]
    fn rating_falls_back_to_info_block() {
        let rating = with_card(
            r#"<div class="grid__col-xs-10">12 Years Experience</div>
               <div class="grid__col-xs-10 grid--direction-row">88% 41 Votes</div>"#,
            |card| first_match(card, RATING_VOTES_STRATEGIES),
        );
        assert_eq!(rating.as_deref(), Some("88% 41 Votes"));
    }

    #[test]
    fn experience_matches_text_node_case_insensitively() {
        let experience = with_card(
            r"<div><span>  14 years experience </span></div>",
            |card| first_match(card, EXPERIENCE_STRATEGIES),
        );
        assert_eq!(experience.as_deref(), Some("14 years experience"));
    }

    #[test]
    fn experience_falls_back_to_info_block() {
        let experience = with_card(
            r#"<div class="grid__col-xs-10"><b>Experience:</b> <i>over a decade</i></div>"#,
            |card| first_match(card, EXPERIENCE_STRATEGIES),
        );
        assert_eq!(experience.as_deref(), Some("Experience:over a decade"));
    }

    #[test]
    fn charges_prefer_price_range() {
        let charges = with_card(
            r#"<span itemprop="priceRange"> ₹500 </span>
               <div class="grid__col-xs-10">₹900 at clinic</div>"#,
            |card| first_match(card, CHARGES_STRATEGIES),
        );
        assert_eq!(charges.as_deref(), Some("₹500"));
    }

    #[test]
    fn charges_fall_back_to_consultation_fee_block() {
        let charges = with_card(
            r#"<div class="grid__col-xs-10">Consultation Fee: Rs 400</div>"#,
            |card| first_match(card, CHARGES_STRATEGIES),
        );
        assert_eq!(charges.as_deref(), Some("Consultation Fee: Rs 400"));
    }

    #[test]
    fn every_strategy_list_is_empty_for_bare_card() {
        with_card("<p>nothing here</p>", |card| {
            for strategies in [
                DEGREE_STRATEGIES,
                ADDRESS_STRATEGIES,
                RATING_VOTES_STRATEGIES,
                EXPERIENCE_STRATEGIES,
                CHARGES_STRATEGIES,
            ] {
                assert!(first_match(card, strategies).is_none());
            }
        });
    }
}
