//! Player page interpretation
//!
//! Extracts a profile and the infobox "History" block from a player page's
//! rendered HTML. The infobox layout is semi-tabular and varies between
//! skins, so this is heuristic: find the History header cell, then parse the
//! enclosing (or next) table as (date-range, team) rows.

use crate::interpret::clean;
use crate::interpret::dates::{is_open_ended, split_range};
use scraper::{ElementRef, Html, Selector};

/// Infobox wrapper selectors, most common first
const INFOBOX_SELECTORS: &[&str] = &[".fo-nttax-infobox", ".infobox-leagueoflegends"];

/// Basic profile facts pulled from a player page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub display_name: Option<String>,
    pub country: Option<String>,
    pub role: Option<String>,
}

/// One contiguous team affiliation with a start and optional open end
#[derive(Debug, Clone, PartialEq)]
pub struct Stint {
    pub team: String,
    /// ISO date, `None` when unparsable
    pub joined: Option<String>,
    /// ISO date, `None` while ongoing
    pub left: Option<String>,
    pub note: Option<String>,
    pub source_url: String,
}

/// Interprets a player page into a profile and its team history
pub fn parse_player_page(html: &str, page_url: &str) -> (Profile, Vec<Stint>) {
    let document = Html::parse_document(html);

    let profile = extract_profile(&document);
    let stints = extract_history_stints(&document, page_url);

    (profile, stints)
}

fn extract_profile(document: &Html) -> Profile {
    Profile {
        display_name: extract_display_name(document),
        country: infobox_field(document, "Country"),
        role: infobox_field(document, "Role"),
    }
}

/// Page heading, falling back to the first bold lead-paragraph text
fn extract_display_name(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("h1#firstHeading") {
        if let Some(heading) = document.select(&selector).next() {
            let text = clean(&heading.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    let selector = Selector::parse("p b").ok()?;
    document
        .select(&selector)
        .next()
        .map(|b| clean(&b.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Value cell next to a labelled infobox description cell, e.g. "Country:"
fn infobox_field(document: &Html, label: &str) -> Option<String> {
    let infobox = find_infobox(document)?;
    let wanted = format!("{}:", label.to_lowercase());

    let selector = Selector::parse("div.infobox-cell-2").ok()?;
    let cells: Vec<ElementRef> = infobox.select(&selector).collect();

    for pair in cells.windows(2) {
        let cell_label = clean(&pair[0].text().collect::<String>()).to_lowercase();
        if cell_label == wanted || cell_label == label.to_lowercase() {
            let value = clean(&pair[1].text().collect::<String>());
            if !value.is_empty() {
                return Some(value);
            }
        }
    }

    None
}

fn find_infobox(document: &Html) -> Option<ElementRef<'_>> {
    for css in INFOBOX_SELECTORS {
        if let Ok(selector) = Selector::parse(css) {
            if let Some(element) = document.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

/// Parses the infobox History block into stints
///
/// Rows are expected as two columns: a date range on the left, the team on
/// the right. The team name prefers anchor text over the raw cell text. Rows
/// without a parsable start date are kept only when explicitly open-ended.
fn extract_history_stints(document: &Html, source_url: &str) -> Vec<Stint> {
    let mut stints = Vec::new();

    let Some(infobox) = find_infobox(document) else {
        return stints;
    };
    let Some(header) = find_history_header(infobox) else {
        return stints;
    };
    let Some(table) = enclosing_table(header).or_else(|| following_table(infobox, header)) else {
        return stints;
    };

    let Ok(row_selector) = Selector::parse("tr") else {
        return stints;
    };

    for row in table.select(&row_selector) {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "td" | "th"))
            .collect();
        if cells.len() < 2 {
            continue;
        }

        let range_text = clean(&cells[0].text().collect::<String>());
        let team_text = clean(&cells[1].text().collect::<String>());
        let (joined, left) = split_range(&range_text);

        let team = first_anchor_text(cells[1]).unwrap_or(team_text);
        if team.is_empty() {
            continue;
        }
        if joined.is_none() && !is_open_ended(&range_text) {
            continue;
        }

        stints.push(Stint {
            team,
            joined: joined.map(|d| d.to_string()),
            left: left.map(|d| d.to_string()),
            note: None,
            source_url: source_url.to_string(),
        });
    }

    stints
}

/// Cell whose entire text is "History", marking the start of the block
fn find_history_header(infobox: ElementRef<'_>) -> Option<ElementRef<'_>> {
    infobox
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "div" | "th" | "td"))
        .find(|e| clean(&e.text().collect::<String>()).eq_ignore_ascii_case("history"))
}

fn enclosing_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

/// First table after the header in document order, for layouts where the
/// header cell is a sibling div rather than a table row
fn following_table<'a>(infobox: ElementRef<'a>, header: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut seen_header = false;
    for element in infobox.descendants().filter_map(ElementRef::wrap) {
        if element.id() == header.id() {
            seen_header = true;
            continue;
        }
        if seen_header && element.value().name() == "table" {
            return Some(element);
        }
    }
    None
}

fn first_anchor_text(cell: ElementRef<'_>) -> Option<String> {
    cell.descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "a")
        .map(|a| clean(&a.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}
