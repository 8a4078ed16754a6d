//! Players stage: discover, resume, and scrape player pages
//!
//! Per item the stage does cache-or-fetch → interpret → store → advance, in
//! that order. Failure handling is deliberately asymmetric:
//!
//! - A hard rate limit stops the whole stage with the cursor left at the
//!   current item, because a provider-side block will not clear within this
//!   run. The stage outcome is still "expected"; the process exits cleanly.
//! - Any other per-item failure skips past the poison item (cursor moves to
//!   the next index) so one malformed page never blocks the rest of the run.

use crate::cache::ContentCache;
use crate::client::{FetchError, WikiClient};
use crate::config::Config;
use crate::interpret::{article_prefix, discover_player_titles, parse_player_page};
use crate::pipeline::StageOutcome;
use crate::storage::{PlayerRecord, StintRecord, Storage};
use crate::RosterError;

/// Checkpoint key for this stage's resume cursor
pub const STAGE_KEY: &str = "players:last_index";

/// Progress is logged every this many processed items
const PROGRESS_EVERY: usize = 25;

/// Runs the players stage to completion or rate-limit stop
pub async fn run<S: Storage>(
    storage: &mut S,
    client: &mut WikiClient,
    cache: &ContentCache,
    config: &Config,
) -> crate::Result<StageOutcome> {
    tracing::info!(
        "discovering players from index: {}",
        config.player_index_page
    );

    let mut titles = match discover_titles(client, cache, config).await {
        Ok(titles) => titles,
        Err(RosterError::Fetch(FetchError::RateLimited { request })) => {
            tracing::warn!("rate limited during discovery ({request}); stopping stage");
            return Ok(StageOutcome::RateLimited);
        }
        Err(e) => return Err(e),
    };

    if config.max_players > 0 {
        titles.truncate(config.max_players);
    }
    tracing::info!(
        "discovered {} player titles (max_players={})",
        titles.len(),
        config.max_players
    );

    let start_index = storage
        .get_checkpoint(STAGE_KEY)?
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    if start_index > 0 {
        tracing::info!("resuming from checkpoint index {start_index}");
    }

    for i in start_index..titles.len() {
        let title = &titles[i];
        let url = client.page_url(title);

        let html = match page_html(client, cache, title).await {
            Ok(html) => html,
            Err(RosterError::Fetch(FetchError::RateLimited { request })) => {
                tracing::warn!(
                    "rate limited while fetching {request}; stopping stage, \
                     checkpoint held at {i} for resume"
                );
                storage.set_checkpoint(STAGE_KEY, &i.to_string())?;
                return Ok(StageOutcome::RateLimited);
            }
            Err(e) => {
                tracing::error!("skipping {title} (index {i}): {e}");
                storage.set_checkpoint(STAGE_KEY, &(i + 1).to_string())?;
                continue;
            }
        };

        let (profile, stints) = parse_player_page(&html, &url);

        let player = PlayerRecord {
            page_title: title.clone(),
            page_url: url.clone(),
            display_name: profile.display_name,
            country: profile.country,
            role: profile.role,
        };
        let stints: Vec<StintRecord> = stints
            .into_iter()
            .map(|s| StintRecord {
                player_title: title.clone(),
                team: Some(s.team),
                joined: s.joined,
                left: s.left,
                note: s.note,
                source_url: Some(s.source_url),
            })
            .collect();

        storage.commit_player_item(&player, &stints, STAGE_KEY, i + 1)?;

        if (i + 1) % PROGRESS_EVERY == 0 {
            tracing::info!("processed {}/{}", i + 1, titles.len());
        }
    }

    tracing::info!("players stage complete");
    Ok(StageOutcome::Completed)
}

/// Discovers the ordered work list of player titles
///
/// A `Category:` index page goes through the paginated category-members API;
/// anything else is fetched as a full document and scanned for article links.
/// The index document is cached like any other page.
async fn discover_titles(
    client: &mut WikiClient,
    cache: &ContentCache,
    config: &Config,
) -> crate::Result<Vec<String>> {
    if config.player_index_page.starts_with("Category:") {
        return Ok(client
            .list_category_members(&config.player_index_page)
            .await?);
    }

    let prefix = article_prefix(&config.wiki_base);
    let key = format!("INDEX::{}", config.player_index_page);

    if let Some(html) = cache.get(&key)? {
        return Ok(discover_player_titles(&html, &prefix));
    }

    let url = client.page_url(&config.player_index_page);
    let html = client.fetch_document(&url).await?;
    cache.put(&key, &html)?;

    Ok(discover_player_titles(&html, &prefix))
}

/// Cache-or-fetch of one player page's rendered HTML
async fn page_html(
    client: &mut WikiClient,
    cache: &ContentCache,
    title: &str,
) -> crate::Result<String> {
    let key = format!("PLAYER::{title}");

    if let Some(html) = cache.get(&key)? {
        return Ok(html);
    }

    let html = client.fetch_page_html(title).await?;
    cache.put(&key, &html)?;

    Ok(html)
}
