//! Retrying wiki client
//!
//! Two call shapes share one retry skeleton: a MediaWiki API call expecting a
//! JSON payload, and a raw full-document fetch expecting arbitrary text.
//! Response classification, in priority order:
//!
//! 1. Hard rate limit (HTTP 429 or a known marker body) — never retried;
//!    surfaces as [`FetchError::RateLimited`] so the caller can stop the
//!    whole stage and resume later.
//! 2. Server error (5xx) — logged, backed off, retried.
//! 3. Transport/protocol failure (network error, non-JSON content type on the
//!    API endpoint, MediaWiki error payload) — logged, backed off, retried.
//! 4. Success — payload returned after a polite pacing delay.
//!
//! Every attempt consumes one rate-limiter slot before the request is sent.

use crate::client::backoff::{Backoff, RetryPolicy};
use crate::client::rate_limit::RateLimiter;
use crate::config::Config;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Body substrings that indicate a provider-side block even on an HTTP 200
const RATE_LIMIT_MARKERS: &[&str] = &["Rate Limited - Liquipedia"];

/// How much of a response body to keep for diagnostics
const PREVIEW_LEN: usize = 200;

/// Category-members page size per API request; kept small to stay polite
const CATEGORY_PAGE_SIZE: u32 = 50;

/// Errors surfaced by the fetch client
///
/// `RateLimited` is a control-flow signal, not a defect: the orchestrator
/// stops the stage and holds the checkpoint so the same item is retried on
/// the next run. The other variants are per-item failures.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("provider rate limit hit during {request}")]
    RateLimited { request: String },

    #[error(
        "retries exhausted for {request}: status={status:?} retry_after={retry_after:?} \
         preview={preview:?} last_error={detail}"
    )]
    Exhausted {
        request: String,
        status: Option<u16>,
        retry_after: Option<String>,
        preview: String,
        detail: String,
    },

    #[error("empty document extracted for {request}")]
    EmptyDocument { request: String },
}

/// HTTP client for a MediaWiki-style wiki with rate limiting and retries
pub struct WikiClient {
    http: Client,
    api_url: String,
    wiki_base: String,
    throttle: Duration,
    success_jitter: Duration,
    retry: RetryPolicy,
    limiter: RateLimiter,
}

impl WikiClient {
    /// Builds a client from configuration with the default retry policy and
    /// hourly request budget
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_s))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            api_url: config.mw_api.clone(),
            wiki_base: config.wiki_base.trim_end_matches('/').to_string(),
            throttle: Duration::from_secs_f64(config.throttle_s),
            success_jitter: Duration::from_secs_f64(2.5),
            retry: RetryPolicy::default(),
            limiter: RateLimiter::hourly(),
        })
    }

    /// Replaces the retry policy (primarily for tests with short delays)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the rate limiter
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Overrides the polite pacing applied after successful calls
    pub fn with_pacing(mut self, throttle: Duration, success_jitter: Duration) -> Self {
        self.throttle = throttle;
        self.success_jitter = success_jitter;
        self
    }

    /// Article URL for a page title
    pub fn page_url(&self, title: &str) -> String {
        format!("{}/{}", self.wiki_base, title.replace(' ', "_"))
    }

    /// MediaWiki API GET expecting a JSON payload
    pub async fn api_get(&mut self, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let request = request_label(params);
        let mut backoff = self.retry.backoff();
        let mut last = Diagnostics::default();

        for attempt in 1..=self.retry.max_attempts {
            self.limiter.acquire().await;

            let response = match self.http.get(&self.api_url).query(params).send().await {
                Ok(r) => r,
                Err(e) => {
                    last.detail = e.to_string();
                    self.retry_pause(&mut backoff, &request, attempt, &last.detail)
                        .await;
                    continue;
                }
            };

            let status = response.status();
            last.status = Some(status.as_u16());
            last.retry_after = header_string(&response, RETRY_AFTER);
            let content_type = header_string(&response, CONTENT_TYPE).unwrap_or_default();

            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    last.detail = format!("failed to read body: {e}");
                    self.retry_pause(&mut backoff, &request, attempt, &last.detail)
                        .await;
                    continue;
                }
            };
            last.preview = preview(&body);

            // The wiki often answers a rate limit with an HTML page, not a 429
            if is_rate_limited(status.as_u16(), &body) {
                return Err(FetchError::RateLimited { request });
            }

            if status.is_server_error() {
                last.detail = format!("server error {}", status.as_u16());
            } else if !status.is_success() {
                last.detail = format!("unexpected status {}", status.as_u16());
            } else if !content_type.to_lowercase().contains("application/json") {
                last.detail = format!("expected JSON but got Content-Type={content_type:?}");
            } else {
                match serde_json::from_str::<Value>(&body) {
                    Ok(payload) => {
                        // MediaWiki reports application errors inside a 200
                        if let Some(api_error) = payload.get("error") {
                            last.detail = format!("MediaWiki API error: {api_error}");
                        } else {
                            self.polite_pause(Duration::ZERO).await;
                            return Ok(payload);
                        }
                    }
                    Err(e) => {
                        last.detail = format!("invalid JSON: {e}");
                    }
                }
            }

            self.retry_pause(&mut backoff, &request, attempt, &last.detail)
                .await;
        }

        Err(last.into_exhausted(request))
    }

    /// Raw full-document GET (index/portal pages)
    ///
    /// Same classification as the API path: a hard rate limit aborts the call
    /// immediately rather than cooling down in-loop, so the caller's
    /// stop-and-checkpoint handling applies uniformly to both shapes.
    pub async fn fetch_document(&mut self, url: &str) -> Result<String, FetchError> {
        let request = url.to_string();
        let mut backoff = self.retry.backoff();
        let mut last = Diagnostics::default();

        for attempt in 1..=self.retry.max_attempts {
            self.limiter.acquire().await;

            let response = match self.http.get(url).send().await {
                Ok(r) => r,
                Err(e) => {
                    last.detail = e.to_string();
                    self.retry_pause(&mut backoff, &request, attempt, &last.detail)
                        .await;
                    continue;
                }
            };

            let status = response.status();
            last.status = Some(status.as_u16());
            last.retry_after = header_string(&response, RETRY_AFTER);

            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    last.detail = format!("failed to read body: {e}");
                    self.retry_pause(&mut backoff, &request, attempt, &last.detail)
                        .await;
                    continue;
                }
            };
            last.preview = preview(&body);

            if is_rate_limited(status.as_u16(), &body) {
                return Err(FetchError::RateLimited { request });
            }

            if !status.is_success() {
                last.detail = format!("unexpected status {}", status.as_u16());
                self.retry_pause(&mut backoff, &request, attempt, &last.detail)
                    .await;
                continue;
            }

            self.polite_pause(Duration::ZERO).await;
            return Ok(body);
        }

        Err(last.into_exhausted(request))
    }

    /// Rendered HTML of a page via the parse API
    ///
    /// Lighter on the provider than a full page fetch. An empty extracted
    /// document is malformed content, reported as `EmptyDocument`.
    pub async fn fetch_page_html(&mut self, title: &str) -> Result<String, FetchError> {
        let payload = self
            .api_get(&[
                ("action", "parse"),
                ("format", "json"),
                ("page", title),
                ("prop", "text"),
                ("redirects", "1"),
            ])
            .await?;

        let html = payload
            .pointer("/parse/text/*")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if html.is_empty() {
            return Err(FetchError::EmptyDocument {
                request: title.to_string(),
            });
        }

        Ok(html.to_string())
    }

    /// All member titles of a category, following `cmcontinue` pagination
    pub async fn list_category_members(
        &mut self,
        category_title: &str,
    ) -> Result<Vec<String>, FetchError> {
        let mut titles = Vec::new();
        let mut cont: Option<String> = None;
        let limit = CATEGORY_PAGE_SIZE.to_string();

        loop {
            let mut params = vec![
                ("action", "query"),
                ("format", "json"),
                ("list", "categorymembers"),
                ("cmtitle", category_title),
                ("cmlimit", limit.as_str()),
                ("cmnamespace", "0"),
            ];
            if let Some(ref token) = cont {
                params.push(("cmcontinue", token.as_str()));
            }

            let payload = self.api_get(&params).await?;

            if let Some(members) = payload
                .pointer("/query/categorymembers")
                .and_then(Value::as_array)
            {
                titles.extend(
                    members
                        .iter()
                        .filter_map(|m| m.get("title").and_then(Value::as_str))
                        .map(str::to_string),
                );
            }

            match payload
                .pointer("/continue/cmcontinue")
                .and_then(Value::as_str)
            {
                Some(token) => cont = Some(token.to_string()),
                None => break,
            }
        }

        Ok(titles)
    }

    /// Polite delay after a successful call: configured throttle plus jitter
    async fn polite_pause(&self, extra: Duration) {
        let jitter = self.success_jitter.mul_f64(fastrand::f64());
        sleep(self.throttle + extra + jitter).await;
    }

    async fn retry_pause(&self, backoff: &mut Backoff, request: &str, attempt: u32, detail: &str) {
        let wait = backoff.next_wait();
        tracing::warn!(
            "fetch failed for {request} (attempt {attempt}/{max}): {detail}; backing off {:.0}s",
            wait.as_secs_f64(),
            max = self.retry.max_attempts,
        );
        self.polite_pause(wait).await;
    }
}

/// Diagnostic context carried across attempts for the exhaustion report
#[derive(Debug, Default)]
struct Diagnostics {
    status: Option<u16>,
    retry_after: Option<String>,
    preview: String,
    detail: String,
}

impl Diagnostics {
    fn into_exhausted(self, request: String) -> FetchError {
        FetchError::Exhausted {
            request,
            status: self.status,
            retry_after: self.retry_after,
            preview: self.preview,
            detail: self.detail,
        }
    }
}

fn is_rate_limited(status: u16, body: &str) -> bool {
    status == 429 || RATE_LIMIT_MARKERS.iter().any(|m| body.contains(m))
}

fn preview(body: &str) -> String {
    body.chars()
        .take(PREVIEW_LEN)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Short request identity for logs and errors, e.g. "parse/Faker"
fn request_label(params: &[(&str, &str)]) -> String {
    let find = |key: &str| params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
    let action = find("action").unwrap_or("?");
    let target = find("page")
        .or_else(|| find("list"))
        .or_else(|| find("cmtitle"))
        .unwrap_or("?");
    format!("{action}/{target}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection_by_status() {
        assert!(is_rate_limited(429, ""));
        assert!(!is_rate_limited(200, "all good"));
        assert!(!is_rate_limited(500, "oops"));
    }

    #[test]
    fn test_rate_limit_detection_by_marker_body() {
        assert!(is_rate_limited(
            200,
            "<html><title>Rate Limited - Liquipedia</title></html>"
        ));
    }

    #[test]
    fn test_preview_truncates_and_flattens() {
        let body = format!("line one\nline two{}", "x".repeat(300));
        let p = preview(&body);
        assert_eq!(p.chars().count(), 200);
        assert!(!p.contains('\n'));
        assert!(p.starts_with("line one line two"));
    }

    #[test]
    fn test_request_label_prefers_page() {
        let label = request_label(&[("action", "parse"), ("page", "Faker")]);
        assert_eq!(label, "parse/Faker");
    }

    #[test]
    fn test_request_label_falls_back_to_list() {
        let label = request_label(&[
            ("action", "query"),
            ("list", "categorymembers"),
            ("cmtitle", "Category:Players"),
        ]);
        assert_eq!(label, "query/categorymembers");
    }
}
