// GET /api/search - cross-resource search
//
// One backend list call per requested type, run concurrently. A type whose
// call fails contributes an empty list; the failure is named in the
// `x-search-partial-failure` header instead of failing the whole answer.

use std::cmp::Ordering;
use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use futures::future::join_all;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::proxy::dispatch::fetch_json;
use crate::translate::Envelope;
use crate::types::AppState;

pub const PARTIAL_FAILURE_HEADER: &str = "x-search-partial-failure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Task,
    Event,
    Note,
    File,
}

impl ResultKind {
    pub const ALL: [ResultKind; 4] = [ResultKind::Task, ResultKind::Event, ResultKind::Note, ResultKind::File];

    /// Accepts singular or plural, any case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "task" | "tasks" => Some(ResultKind::Task),
            "event" | "events" => Some(ResultKind::Event),
            "note" | "notes" => Some(ResultKind::Note),
            "file" | "files" => Some(ResultKind::File),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResultKind::Task => "task",
            ResultKind::Event => "event",
            ResultKind::Note => "note",
            ResultKind::File => "file",
        }
    }

    fn collection(self) -> &'static str {
        match self {
            ResultKind::Task => "tasks",
            ResultKind::Event => "events",
            ResultKind::Note => "notes",
            ResultKind::File => "files",
        }
    }

    fn list_keys(self) -> [&'static str; 3] {
        [self.collection(), "items", "data"]
    }

    /// Fields the title is read from; also the fields the query is matched against
    fn title_keys(self) -> &'static [&'static str] {
        match self {
            ResultKind::Task | ResultKind::Event => &["title", "Title"],
            ResultKind::Note => &["title", "text"],
            ResultKind::File => &["filename", "fileName", "name", "originalName"],
        }
    }

    fn description_keys(self) -> &'static [&'static str] {
        match self {
            ResultKind::Task => &["description"],
            ResultKind::Event => &["description", "location"],
            ResultKind::Note => &["text"],
            ResultKind::File => &["mimeType", "contentType"],
        }
    }

    fn date_keys(self) -> &'static [&'static str] {
        match self {
            ResultKind::Task => &["dueDate", "updatedAt", "createdAt"],
            ResultKind::Event => &["startTime", "start", "createdAt"],
            ResultKind::Note => &["updatedAt", "createdAt"],
            ResultKind::File => &["uploadedAt", "createdAt"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub original: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub account_id: String,
    pub user_id: String,
    pub query: String,
    pub kinds: Vec<ResultKind>,
}

impl SearchParams {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ApiError> {
        let present = |name: &str| query.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let missing: Vec<String> = ["accountId", "userId"]
            .into_iter()
            .filter(|name| present(*name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ApiError::missing_fields(missing));
        }

        let kinds = match present("types") {
            None => ResultKind::ALL.to_vec(),
            Some(raw) => {
                let mut kinds = Vec::new();
                for kind in raw.split(',').filter_map(ResultKind::parse) {
                    if !kinds.contains(&kind) {
                        kinds.push(kind);
                    }
                }
                if kinds.is_empty() {
                    return Err(ApiError::bad_request(
                        "Invalid search types",
                        "Expected one or more of: task, event, note, file",
                    ));
                }
                kinds
            }
        };

        Ok(Self {
            account_id: present("accountId").unwrap_or_default().to_string(),
            user_id: present("userId").unwrap_or_default().to_string(),
            query: query.get("q").map(|q| q.trim().to_string()).unwrap_or_default(),
            kinds,
        })
    }
}

pub async fn search(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let params = SearchParams::from_query(&query)?;
    let auth = auth.map(|Extension(a)| a).unwrap_or_else(AuthContext::anonymous);

    let scope = [("accountId", params.account_id.as_str()), ("userId", params.user_id.as_str())];
    let calls = params.kinds.iter().map(|&kind| {
        let (state, auth) = (&state, &auth);
        async move { (kind, fetch_json(state, auth, kind.collection(), &scope).await) }
    });

    let mut results = Vec::new();
    let mut failed = Vec::new();
    for (kind, outcome) in join_all(calls).await {
        match outcome {
            Ok(body) => results.extend(collect(kind, body, &params.query)),
            Err(e) => {
                tracing::warn!(kind = kind.label(), error = %e, "Search source failed, treating as empty");
                failed.push(kind.label());
            }
        }
    }

    rank(&mut results, &params.query);
    tracing::info!(query = %params.query, count = results.len(), failed = failed.len(), "Search complete");

    let types: Vec<&str> = params.kinds.iter().map(|k| k.label()).collect();
    let count = results.len();
    let mut response = Json(json!({
        "results": results,
        "count": count,
        "query": params.query,
        "types": types,
    }))
    .into_response();

    if !failed.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&failed.join(",")) {
            response.headers_mut().insert(PARTIAL_FAILURE_HEADER, value);
        }
    }

    Ok(response)
}

/// Items of one backend answer that match `query`, as search results.
pub fn collect(kind: ResultKind, body: Value, query: &str) -> Vec<SearchResult> {
    let items = match Envelope::classify(body, &kind.list_keys()) {
        Envelope::Bare(items) | Envelope::Keyed { items, .. } => items,
        _ => Vec::new(),
    };

    let needle = query.to_lowercase();
    items
        .into_iter()
        .filter(|item| matches_query(kind, item, &needle))
        .filter_map(|item| to_result(kind, item))
        .collect()
}

fn matches_query(kind: ResultKind, item: &Value, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    kind.title_keys()
        .iter()
        .filter_map(|key| item.get(*key).and_then(Value::as_str))
        .any(|text| text.to_lowercase().contains(needle))
}

fn to_result(kind: ResultKind, item: Value) -> Option<SearchResult> {
    if !item.is_object() {
        return None;
    }

    let id = first_text(&item, &["id", "_id", "uniqueId", "UniqueId"]).unwrap_or_default();
    let title = first_text(&item, kind.title_keys()).unwrap_or_default();
    let description = first_text(&item, kind.description_keys()).filter(|d| *d != title);
    let date = first_text(&item, kind.date_keys());

    Some(SearchResult {
        id,
        title,
        description,
        kind,
        date,
        original: item,
    })
}

/// First of `keys` holding a string or number, rendered as text
fn first_text(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match item.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Exact (case-insensitive) title matches first, then newest first.
pub fn rank(results: &mut [SearchResult], query: &str) {
    let needle = query.to_lowercase();
    let exact = |r: &SearchResult| !needle.is_empty() && r.title.to_lowercase() == needle;

    results.sort_by(|a, b| match (exact(a), exact(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => timestamp(b.date.as_deref()).cmp(&timestamp(a.date.as_deref())),
    });
}

/// Milliseconds since the epoch; anything unparseable sorts as 0.
pub fn timestamp(date: Option<&str>) -> i64 {
    let raw = match date.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return 0,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_millis();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.and_utc().timestamp_millis();
    }
    if let Some(dt) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return dt.and_utc().timestamp_millis();
    }
    raw.parse::<i64>().unwrap_or(0)
}
