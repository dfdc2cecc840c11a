// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Record;

/// Immutable snapshot of the active filter criteria. The default spec
/// matches every record. Changing any criterion means building a new spec
/// and recompiling, never patching a live one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Host-match patterns, each treated as a regex anchored at both ends.
    pub scope: Vec<String>,
    pub scope_only: bool,
    pub show: bool,
    pub show_ext: BTreeSet<String>,
    pub hide: bool,
    pub hide_ext: BTreeSet<String>,
    /// Bucket anchors: 200 means the 200-299 range. Empty disables the
    /// status stage entirely.
    pub status_buckets: BTreeSet<u16>,
    pub search: String,
}

/// A `FilterSpec` with its scope patterns compiled once. Patterns that
/// fail to compile are skipped and never match; they are not an error.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    spec: FilterSpec,
    scope: Vec<Regex>,
}

impl CompiledFilter {
    pub fn compile(spec: FilterSpec) -> Self {
        let mut scope = Vec::with_capacity(spec.scope.len());
        for pattern in &spec.scope {
            match Regex::new(&format!("^{pattern}$")) {
                Ok(regex) => scope.push(regex),
                Err(error) => {
                    tracing::warn!(pattern = %pattern, %error, "skipping invalid scope pattern");
                }
            }
        }
        Self { spec, scope }
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Row visibility under this filter. Stages are evaluated in order and
    /// a rejection is final, so later stages are skipped.
    pub fn accepts(&self, record: &Record) -> bool {
        self.passes_scope(record)
            && self.passes_show(record)
            && self.passes_hide(record)
            && self.passes_status(record)
            && self.passes_search(record)
    }

    fn passes_scope(&self, record: &Record) -> bool {
        if !self.spec.scope_only || self.spec.scope.is_empty() {
            return true;
        }
        self.scope
            .iter()
            .any(|regex| regex.is_match(&record.request.host))
    }

    // Show and hide both consult the original request's extension, even
    // when an edited request is attached.
    fn passes_show(&self, record: &Record) -> bool {
        !self.spec.show || self.spec.show_ext.contains(&record.request.extension)
    }

    fn passes_hide(&self, record: &Record) -> bool {
        !(self.spec.hide && self.spec.hide_ext.contains(&record.request.extension))
    }

    fn passes_status(&self, record: &Record) -> bool {
        if self.spec.status_buckets.is_empty() {
            return true;
        }
        // In-flight exchanges are never hidden by a status filter, and
        // anything above 599 always passes.
        match record.status_code() {
            None => true,
            Some(status) if status > 599 => true,
            Some(status) => self
                .spec
                .status_buckets
                .iter()
                .any(|bucket| status >= *bucket && status <= bucket.saturating_add(99)),
        }
    }

    fn passes_search(&self, record: &Record) -> bool {
        self.spec.search.is_empty() || record.search_corpus().contains(&self.spec.search)
    }
}

impl Default for CompiledFilter {
    fn default() -> Self {
        Self::compile(FilterSpec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{CompiledFilter, FilterSpec};
    use crate::model::{Record, RecordId, RequestData, ResponseData};
    use std::collections::BTreeSet;
    use time::OffsetDateTime;

    fn record(host: &str, path: &str, status: Option<u16>) -> Record {
        let raw = format!("GET {path} HTTP/1.1\r\nHost: {host}\r\n\r\n");
        Record {
            id: RecordId::new(1),
            request: RequestData::new(host, "GET", path, raw),
            edited_request: None,
            response: status.map(|status| {
                ResponseData::new(status, format!("HTTP/1.1 {status} X\r\n\r\n"))
            }),
            edited_response: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn extensions(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn default_spec_matches_everything() {
        let filter = CompiledFilter::default();
        assert!(filter.accepts(&record("a.com", "/", None)));
        assert!(filter.accepts(&record("b.com", "/app.js", Some(500))));
    }

    #[test]
    fn scope_patterns_are_anchored() {
        let filter = CompiledFilter::compile(FilterSpec {
            scope: vec!["a\\.com".to_owned()],
            scope_only: true,
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("a.com", "/", None)));
        assert!(!filter.accepts(&record("aa.com", "/", None)));
        assert!(!filter.accepts(&record("a.com.evil.net", "/", None)));
    }

    #[test]
    fn scope_rejection_ignores_all_other_fields() {
        let filter = CompiledFilter::compile(FilterSpec {
            scope: vec!["a\\.com".to_owned()],
            scope_only: true,
            ..FilterSpec::default()
        });
        assert!(!filter.accepts(&record("b.com", "/app.js", Some(200))));
    }

    #[test]
    fn scope_disabled_when_scope_only_false() {
        let filter = CompiledFilter::compile(FilterSpec {
            scope: vec!["a\\.com".to_owned()],
            scope_only: false,
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("b.com", "/", None)));
    }

    #[test]
    fn invalid_scope_pattern_is_skipped_not_fatal() {
        let filter = CompiledFilter::compile(FilterSpec {
            scope: vec!["(unclosed".to_owned(), "b\\.com".to_owned()],
            scope_only: true,
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("b.com", "/", None)));
        assert!(!filter.accepts(&record("(unclosed", "/", None)));
    }

    #[test]
    fn scope_of_only_invalid_patterns_rejects_all() {
        let filter = CompiledFilter::compile(FilterSpec {
            scope: vec!["(unclosed".to_owned()],
            scope_only: true,
            ..FilterSpec::default()
        });
        assert!(!filter.accepts(&record("a.com", "/", None)));
    }

    #[test]
    fn show_stage_requires_listed_extension() {
        let filter = CompiledFilter::compile(FilterSpec {
            show: true,
            show_ext: extensions(&["js", "css"]),
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("a.com", "/app.js", None)));
        assert!(!filter.accepts(&record("a.com", "/index.html", None)));
        assert!(!filter.accepts(&record("a.com", "/plain", None)));
    }

    #[test]
    fn hide_overrides_show() {
        let filter = CompiledFilter::compile(FilterSpec {
            show: true,
            show_ext: extensions(&["js"]),
            hide: true,
            hide_ext: extensions(&["js"]),
            ..FilterSpec::default()
        });
        assert!(!filter.accepts(&record("a.com", "/app.js", None)));
    }

    #[test]
    fn status_bucket_boundaries() {
        let filter = CompiledFilter::compile(FilterSpec {
            status_buckets: [200].into_iter().collect(),
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("a.com", "/", Some(200))));
        assert!(filter.accepts(&record("a.com", "/", Some(299))));
        assert!(!filter.accepts(&record("a.com", "/", Some(300))));
        assert!(!filter.accepts(&record("a.com", "/", Some(199))));
    }

    #[test]
    fn status_600_always_passes() {
        let filter = CompiledFilter::compile(FilterSpec {
            status_buckets: [200].into_iter().collect(),
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("a.com", "/", Some(600))));
        assert!(filter.accepts(&record("a.com", "/", Some(999))));
    }

    #[test]
    fn in_flight_exchange_passes_status_stage() {
        let filter = CompiledFilter::compile(FilterSpec {
            status_buckets: [400].into_iter().collect(),
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("a.com", "/", None)));
    }

    #[test]
    fn empty_bucket_set_disables_status_stage() {
        let filter = CompiledFilter::default();
        assert!(filter.accepts(&record("a.com", "/", Some(503))));
    }

    #[test]
    fn search_covers_edited_response() {
        let mut subject = record("a.com", "/", Some(200));
        subject.edited_response = Some(ResponseData::new(
            200,
            "HTTP/1.1 200 OK\r\n\r\ntoken123",
        ));

        let filter = CompiledFilter::compile(FilterSpec {
            search: "token123".to_owned(),
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&subject));

        let without_edit = record("a.com", "/", Some(200));
        assert!(!filter.accepts(&without_edit));
    }

    #[test]
    fn search_matches_request_host_text() {
        let filter = CompiledFilter::compile(FilterSpec {
            search: "b.com".to_owned(),
            ..FilterSpec::default()
        });
        assert!(filter.accepts(&record("b.com", "/", None)));
        assert!(!filter.accepts(&record("a.com", "/", None)));
    }

    #[test]
    fn loosening_scope_only_never_rejects_an_accepted_record() {
        let strict = FilterSpec {
            scope: vec!["a\\.com".to_owned()],
            scope_only: true,
            search: "a.com".to_owned(),
            ..FilterSpec::default()
        };
        let mut loose = strict.clone();
        loose.scope_only = false;

        let subject = record("a.com", "/", Some(204));
        assert!(CompiledFilter::compile(strict).accepts(&subject));
        assert!(CompiledFilter::compile(loose).accepts(&subject));
    }
}
