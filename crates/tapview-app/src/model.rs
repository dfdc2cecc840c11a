// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(i64);

impl RecordId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub host: String,
    pub method: String,
    pub path: String,
    pub extension: String,
    pub raw: String,
}

impl RequestData {
    pub fn new(
        host: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            host: host.into(),
            method: method.into(),
            path,
            extension,
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    pub status: u16,
    pub raw: String,
}

impl ResponseData {
    pub fn new(status: u16, raw: impl Into<String>) -> Self {
        Self {
            status,
            raw: raw.into(),
        }
    }
}

/// One captured request/response exchange plus optional user-edited
/// variants. `request` is always present; `response` stays absent while
/// the exchange is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub request: RequestData,
    pub edited_request: Option<RequestData>,
    pub response: Option<ResponseData>,
    pub edited_response: Option<ResponseData>,
    pub created_at: OffsetDateTime,
}

impl Record {
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|response| response.status)
    }

    /// Text the search filter runs over: raw request, then the edited
    /// request, response, and edited response when present, in that order.
    pub fn search_corpus(&self) -> String {
        let mut corpus = self.request.raw.clone();
        if let Some(edited) = &self.edited_request {
            corpus.push_str(&edited.raw);
        }
        if let Some(response) = &self.response {
            corpus.push_str(&response.raw);
        }
        if let Some(edited) = &self.edited_response {
            corpus.push_str(&edited.raw);
        }
        corpus
    }
}

/// Extension of the final path segment, with any query string stripped.
/// Empty when the segment has no `.` or the path is bare.
pub fn extension_of(path: &str) -> String {
    let path = path
        .split_once('?')
        .map_or(path, |(before, _)| before);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((prefix, extension)) if !prefix.is_empty() => extension.to_ascii_lowercase(),
        _ => String::new(),
    }
}
