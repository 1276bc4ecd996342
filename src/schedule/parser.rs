use std::iter::once;

use anyhow::Context;
use athletic_scraping_utils::selector;
use scraper::{ElementRef, Html};

use super::{
    event::Location,
    selectors::{Pattern, OPEN_EVENT_SELECTORS},
};

pub const TITLE: &str = "span.title";
pub const DATE: &str = "small.date";
pub const VENUE_LINK: &str = "meet-venue-link";
pub const VENUE_ANCHOR: &str = "a";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EntrySummary {
    pub title: String,
    pub date: String,
}

/// One summary per element matched by `pattern`, in document order.
///
/// Entries lacking a title or a date keep an empty string so that the result
/// lines up with the clickable elements.
pub fn parse_entries(html: &Html, pattern: &Pattern) -> Vec<EntrySummary> {
    html.select(&pattern.selector).map(parse_entry).collect()
}

fn parse_entry(entry: ElementRef) -> EntrySummary {
    EntrySummary {
        title: first_text(entry, selector!(TITLE)),
        date: first_text(entry, selector!(DATE)),
    }
}

fn first_text(element: ElementRef, selector: &scraper::Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_owned())
        .unwrap_or_default()
}

/// What the page shows for one calendar entry after it was clicked.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expansion {
    Collapsed,
    /// Expanded, but without any `meet-venue-link` element.
    MissingVenueLink,
    /// Expanded with a `meet-venue-link` that holds no anchor text.
    EmptyVenueLink,
    Venue(String),
}
impl Expansion {
    pub fn into_location(self) -> Location {
        match self {
            Expansion::Venue(venue) => Location::Found(venue),
            Expansion::Collapsed | Expansion::EmptyVenueLink => Location::NotFound,
            Expansion::MissingVenueLink => Location::Error,
        }
    }
}

/// Reads the expansion state of the `index`-th entry matched by `pattern`.
///
/// Only the expanded item that is the entry itself or one of its ancestors is
/// considered, so an item left open by an earlier click is never read.
pub fn parse_expansion(html: &Html, pattern: &Pattern, index: usize) -> anyhow::Result<Expansion> {
    let entry = html
        .select(&pattern.selector)
        .nth(index)
        .with_context(|| format!("Event {} is no longer on the page", index + 1))?;
    let Some(item) = once(entry)
        .chain(entry.ancestors().filter_map(ElementRef::wrap))
        .find(|element| OPEN_EVENT_SELECTORS.matches(element))
    else {
        return Ok(Expansion::Collapsed);
    };
    let links: Vec<_> = item.select(selector!(VENUE_LINK)).collect();
    if links.is_empty() {
        return Ok(Expansion::MissingVenueLink);
    }
    Ok(links
        .into_iter()
        .map(|link| first_text(link, selector!(VENUE_ANCHOR)))
        .find(|text| !text.is_empty())
        .map_or(Expansion::EmptyVenueLink, Expansion::Venue))
}

/// Whether any calendar item is still expanded.
pub fn has_open_event(html: &Html) -> bool {
    OPEN_EVENT_SELECTORS.first_match(html).is_some()
}
