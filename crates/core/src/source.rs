//! Candidate listing from Hacker News.
//!
//! [`AlgoliaLister`] asks the Algolia search API for yesterday's front-page
//! stories. When that yields nothing it falls back to the live Firebase
//! `topstories` list. Listing never fails: problems are logged and produce an
//! empty list.

use std::future::Future;

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::fetch::{FetchConfig, fetch_json};

pub const ALGOLIA_API: &str = "https://hn.algolia.com/api/v1";
pub const FIREBASE_API: &str = "https://hacker-news.firebaseio.com/v0";

/// Hits below this many points are skipped.
pub const MIN_POINTS: u64 = 10;

/// One ranked story from the source listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub score: u64,
    pub comment_count: u64,
    /// Creation time, seconds since the Unix epoch
    pub time: i64,
}

/// Anything that can produce ranked candidates for a run.
pub trait SourceLister {
    /// Up to `count` candidates in rank order.
    fn list(&self, count: usize) -> impl Future<Output = Vec<Candidate>> + Send;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "objectID", default)]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    author: Option<String>,
    points: Option<u64>,
    num_comments: Option<u64>,
    created_at_i: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Item {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    by: Option<String>,
    score: Option<u64>,
    descendants: Option<u64>,
    time: Option<i64>,
}

/// Algolia search with a Firebase fallback.
#[derive(Debug, Clone)]
pub struct AlgoliaLister {
    algolia_base: String,
    firebase_base: String,
    fetch: FetchConfig,
}

impl Default for AlgoliaLister {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl AlgoliaLister {
    pub fn new(fetch: FetchConfig) -> Self {
        Self { algolia_base: ALGOLIA_API.to_string(), firebase_base: FIREBASE_API.to_string(), fetch }
    }

    /// Points both APIs at other base URLs.
    pub fn with_endpoints(mut self, algolia_base: impl Into<String>, firebase_base: impl Into<String>) -> Self {
        self.algolia_base = algolia_base.into();
        self.firebase_base = firebase_base.into();
        self
    }

    async fn search_yesterday(&self, count: usize) -> Vec<Candidate> {
        let (start, end) = yesterday_window(Local::now().date_naive());
        let url = format!(
            "{}/search_by_date?tags=front_page&numericFilters=created_at_i>{},created_at_i<{}&hitsPerPage={}",
            self.algolia_base.trim_end_matches('/'),
            start,
            end,
            request_budget(count)
        );

        match fetch_json::<SearchResponse>(&url, &self.fetch).await {
            Ok(response) => candidates_from_hits(response.hits, count),
            Err(e) => {
                tracing::warn!(error = %e, "algolia search failed");
                Vec::new()
            }
        }
    }

    async fn live_top_stories(&self, count: usize) -> Vec<Candidate> {
        let base = self.firebase_base.trim_end_matches('/');
        let ids = match fetch_json::<Vec<u64>>(&format!("{}/topstories.json", base), &self.fetch).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "top stories request failed");
                return Vec::new();
            }
        };

        let mut candidates = Vec::new();
        for id in ids.into_iter().take(request_budget(count)) {
            if candidates.len() >= count {
                break;
            }
            match fetch_json::<Option<Item>>(&format!("{}/item/{}.json", base, id), &self.fetch).await {
                Ok(Some(item)) => candidates.extend(candidate_from_item(item)),
                Ok(None) => {}
                Err(e) => tracing::debug!(id, error = %e, "skipping story"),
            }
        }
        candidates
    }
}

impl SourceLister for AlgoliaLister {
    async fn list(&self, count: usize) -> Vec<Candidate> {
        let candidates = self.search_yesterday(count).await;
        if !candidates.is_empty() {
            tracing::info!(count = candidates.len(), "listed front page stories");
            return candidates;
        }

        tracing::warn!("front page search returned nothing, falling back to live top stories");
        let candidates = self.live_top_stories(count).await;
        tracing::info!(count = candidates.len(), "listed live top stories");
        candidates
    }
}

/// Local-midnight bounds of the day before `today`, as Unix seconds.
///
/// The end is one second before today's midnight.
pub fn yesterday_window(today: NaiveDate) -> (i64, i64) {
    let midnight = |date: NaiveDate| {
        let naive = date.and_time(NaiveTime::MIN);
        Local.from_local_datetime(&naive).earliest().map_or_else(|| naive.and_utc().timestamp(), |dt| dt.timestamp())
    };
    let end = midnight(today);
    let start = midnight(today - Duration::days(1));
    (start, end - 1)
}

/// How many stories to ask for so that `count` survive filtering.
fn request_budget(count: usize) -> usize {
    count.saturating_mul(2)
}

fn candidates_from_hits(hits: Vec<SearchHit>, count: usize) -> Vec<Candidate> {
    hits.into_iter()
        .filter_map(|hit| {
            let url = hit.url.filter(|url| !url.is_empty())?;
            let score = hit.points.unwrap_or(0);
            if score < MIN_POINTS {
                return None;
            }
            Some(Candidate {
                id: hit.object_id.parse().unwrap_or(0),
                title: hit.title.unwrap_or_else(|| "Untitled".to_string()),
                url,
                author: hit.author.unwrap_or_else(|| "Unknown".to_string()),
                score,
                comment_count: hit.num_comments.unwrap_or(0),
                time: hit.created_at_i.unwrap_or(0),
            })
        })
        .take(count)
        .collect()
}

fn candidate_from_item(item: Item) -> Option<Candidate> {
    let url = item.url.filter(|url| !url.is_empty())?;
    Some(Candidate {
        id: item.id,
        title: item.title.unwrap_or_else(|| "Untitled".to_string()),
        url,
        author: item.by.unwrap_or_else(|| "Unknown".to_string()),
        score: item.score.unwrap_or(0),
        comment_count: item.descendants.unwrap_or(0),
        time: item.time.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    fn hits(json: &str) -> Vec<SearchHit> {
        serde_json::from_str::<SearchResponse>(json).unwrap().hits
    }

    #[test]
    fn test_hits_are_filtered_in_api_order() {
        let json = r#"{"hits": [
            {"objectID": "1", "title": "Ask HN: no link", "points": 200},
            {"objectID": "2", "title": "Second", "url": "https://b.test", "author": "bob", "points": 50, "num_comments": 7, "created_at_i": 1700000000},
            {"objectID": "3", "title": "Low", "url": "https://c.test", "points": 3},
            {"objectID": "4", "url": "https://d.test", "points": 10}
        ]}"#;

        let candidates = candidates_from_hits(hits(json), 10);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, 2);
        assert_eq!(candidates[0].author, "bob");
        assert_eq!(candidates[0].comment_count, 7);
        assert_eq!(candidates[1].title, "Untitled");
        assert_eq!(candidates[1].author, "Unknown");
    }

    #[test]
    fn test_hits_are_truncated_to_count() {
        let json = r#"{"hits": [
            {"objectID": "1", "title": "A", "url": "https://a.test", "points": 11},
            {"objectID": "2", "title": "B", "url": "https://b.test", "points": 12},
            {"objectID": "3", "title": "C", "url": "https://c.test", "points": 13}
        ]}"#;
        let candidates = candidates_from_hits(hits(json), 2);
        assert_eq!(candidates.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_item_without_url_is_skipped() {
        let item: Item = serde_json::from_str(r#"{"id": 9, "title": "Ask HN", "by": "x"}"#).unwrap();
        assert!(candidate_from_item(item).is_none());

        let item: Item = serde_json::from_str(r#"{"id": 9, "url": "https://x.test", "by": "x", "score": 5}"#).unwrap();
        let candidate = candidate_from_item(item).unwrap();
        assert_eq!(candidate.author, "x");
        assert_eq!(candidate.score, 5);
    }

    #[test]
    fn test_yesterday_window_spans_one_day() {
        let (start, end) = yesterday_window(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert!(end > start);
        assert_eq!(end - start + 1, 86_400);
    }

    /// Serves canned JSON by path prefix, one response per connection.
    fn serve(routes: Vec<(&'static str, &'static str)>, connections: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for _ in 0..connections {
                let Ok((mut stream, _)) = listener.accept() else { return };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .iter()
                    .find(|(prefix, _)| path.starts_with(prefix))
                    .map(|(_, body)| ("200 OK", *body))
                    .unwrap_or(("404 Not Found", "null"));
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_falls_back_to_live_top_stories() {
        let base = serve(
            vec![
                ("/search_by_date", r#"{"hits": []}"#),
                ("/topstories.json", "[101, 102, 103]"),
                ("/item/101.json", r#"{"id": 101, "title": "Poll", "by": "a"}"#),
                ("/item/102.json", r#"{"id": 102, "title": "Linked", "url": "https://l.test", "by": "b", "score": 42}"#),
                ("/item/103.json", r#"{"id": 103, "title": "Also", "url": "https://m.test", "by": "c"}"#),
            ],
            5,
        );

        let lister = AlgoliaLister::new(FetchConfig::with_timeout(5)).with_endpoints(base.clone(), base);
        let candidates = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(async { lister.list(2).await })
        })
        .join()
        .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, 102);
        assert_eq!(candidates[0].score, 42);
        assert_eq!(candidates[1].id, 103);
    }

    #[test]
    fn test_request_budget_saturates() {
        assert_eq!(request_budget(15), 30);
        assert_eq!(request_budget(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_huge_count_lists_what_is_available() {
        let base = serve(
            vec![(
                "/search_by_date",
                r#"{"hits": [{"objectID": "7", "title": "Only", "url": "https://o.test", "points": 99}]}"#,
            )],
            1,
        );

        let lister = AlgoliaLister::new(FetchConfig::with_timeout(5)).with_endpoints(base.clone(), base);
        let candidates = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(async { lister.list(usize::MAX).await })
        })
        .join()
        .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, 7);
    }

    #[test]
    fn test_unreachable_sources_yield_empty_list() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let base = format!("http://127.0.0.1:{}", port);

        let lister = AlgoliaLister::new(FetchConfig::with_timeout(2)).with_endpoints(base.clone(), base);
        let candidates = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(async { lister.list(3).await })
        })
        .join()
        .unwrap();

        assert!(candidates.is_empty());
    }
}
