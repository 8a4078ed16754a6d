//! Player discovery from an index/portal page
//!
//! Scans anchors on the rendered index page and keeps the ones that look
//! like player article links: directly under the wiki's article prefix, no
//! namespace, no sub-page path. Tournament pages use `/YEAR` sub-paths and
//! namespaced titles carry `:`, so both are dropped.

use crate::interpret::clean;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Title prefixes that are never player pages
const NON_PLAYER_PREFIXES: &[&str] = &["portal", "help", "special", "category"];

/// Extracts candidate player titles from index-page HTML
///
/// # Arguments
///
/// * `html` - The rendered index page
/// * `article_prefix` - Leading path of article links, e.g. `/leagueoflegends/`
///
/// # Returns
///
/// Sorted, deduplicated titles with underscores restored to spaces.
pub fn discover_player_titles(html: &str, article_prefix: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut titles = BTreeSet::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(rest) = href.strip_prefix(article_prefix) else {
                continue;
            };
            if rest.is_empty() || rest.contains('#') || rest.contains('?') {
                continue;
            }
            if rest.contains(':') || rest.contains('/') {
                continue;
            }

            let title = clean(&rest.replace('_', " "));
            if title.is_empty() {
                continue;
            }
            let lower = title.to_lowercase();
            if NON_PLAYER_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                continue;
            }

            titles.insert(title);
        }
    }

    titles.into_iter().collect()
}

/// Leading path under which article links live, derived from the wiki base URL
///
/// `https://liquipedia.net/leagueoflegends` yields `/leagueoflegends/`.
pub fn article_prefix(wiki_base: &str) -> String {
    match Url::parse(wiki_base) {
        Ok(parsed) => format!("{}/", parsed.path().trim_end_matches('/')),
        Err(_) => "/".to_string(),
    }
}
