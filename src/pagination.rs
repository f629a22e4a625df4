//! Limit/offset pagination and the page envelope.

use axum::http::{header, HeaderMap, Uri};
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

pub const DEFAULT_LIMIT: u64 = 25;
pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_limit: u64,
    pub max_limit: Option<u64>,
    /// Origin used for `next`/`previous` links; falls back to the request `Host`.
    pub base_url: Option<String>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        PaginationSettings {
            default_limit: DEFAULT_LIMIT,
            max_limit: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}

impl Window {
    /// A limit that is not a positive integer falls back to the default; a bad offset becomes 0.
    pub fn from_query(query: &HashMap<String, String>, settings: &PaginationSettings) -> Self {
        let limit = query
            .get(LIMIT_PARAM)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(settings.default_limit);
        let limit = settings.max_limit.map_or(limit, |max| limit.min(max));
        let offset = query
            .get(OFFSET_PARAM)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Window { limit, offset }
    }

    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(len);
        let end = start
            .saturating_add(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .min(len);
        start..end
    }
}

/// Records of one window plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub count: u64,
    pub records: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(listing: Listing<T>, window: Window, url: Option<&Url>) -> Self {
        let next = url.and_then(|u| next_link(u, window, listing.count));
        let previous = url.and_then(|u| previous_link(u, window));
        Page {
            count: listing.count,
            next,
            previous,
            results: listing.records,
        }
    }
}

/// Absolute URL of the current request, used as the template for page links.
pub fn request_url(settings: &PaginationSettings, headers: &HeaderMap, uri: &Uri) -> Option<Url> {
    let origin = match &settings.base_url {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{}", host)
        }
    };
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    Url::parse(&format!("{}{}", origin, path_and_query)).ok()
}

fn next_link(url: &Url, window: Window, count: u64) -> Option<String> {
    if window.offset.saturating_add(window.limit) >= count {
        return None;
    }
    let offset = window.offset + window.limit;
    Some(with_params(url, &[(LIMIT_PARAM, Some(window.limit)), (OFFSET_PARAM, Some(offset))]))
}

fn previous_link(url: &Url, window: Window) -> Option<String> {
    if window.offset == 0 {
        return None;
    }
    let offset = window.offset.checked_sub(window.limit).filter(|o| *o > 0);
    Some(with_params(url, &[(LIMIT_PARAM, Some(window.limit)), (OFFSET_PARAM, offset)]))
}

/// Replace (or with `None`, drop) the given query parameters, keeping the rest sorted by key.
fn with_params(url: &Url, replace: &[(&str, Option<u64>)]) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !replace.iter().any(|(name, _)| &**k == *name))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    for (name, value) in replace {
        if let Some(v) = value {
            pairs.push((name.to_string(), v.to_string()));
        }
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let mut out = url.clone();
    if pairs.is_empty() {
        out.set_query(None);
    } else {
        out.query_pairs_mut().clear().extend_pairs(pairs);
    }
    out.to_string()
}
