// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;

use tapview_app::{
    CompiledFilter, FilterSpec, Record, RecordId, SortColumn, SortDirection, apply_sort,
};

use crate::{RecordStore, StoreError};

const SUMMARY_MAX_CHARS: usize = 120;

/// What a table row resolves to for display. Full record detail comes from
/// `TrafficView::resolve` on selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: RecordId,
    pub host: String,
    pub extension: String,
    pub status: Option<u16>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Outcome of a sort request arriving from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStatus {
    Applied(SortColumn, SortDirection),
    Cleared,
    /// Sorting is best-effort: an unrecognized column label leaves the
    /// current order untouched.
    UnknownColumn,
}

/// The filtered, sorted sequence of rows currently shown to the user.
///
/// Rows are fully recomputed from a single point-in-time store snapshot on
/// every append the caller reports, every filter replacement, and every
/// sort change. Each recompute runs synchronously in the caller that
/// changed the inputs, so the published rows always reflect one consistent
/// (snapshot, filter, sort) combination and the latest change wins.
#[derive(Debug)]
pub struct TrafficView {
    store: Arc<RecordStore>,
    filter: CompiledFilter,
    sort: Option<SortSpec>,
    rows: Vec<Row>,
}

impl TrafficView {
    pub fn new(store: Arc<RecordStore>) -> Self {
        let mut view = Self {
            store,
            filter: CompiledFilter::default(),
            sort: None,
            rows: Vec::new(),
        };
        view.refresh();
        view
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filter_spec(&self) -> &FilterSpec {
        self.filter.spec()
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Replaces the active criteria wholesale and recomputes.
    pub fn set_filter(&mut self, spec: FilterSpec) {
        self.filter = CompiledFilter::compile(spec);
        self.refresh();
    }

    pub fn set_sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.sort = Some(SortSpec { column, direction });
        self.refresh();
    }

    /// String boundary for the presentation layer's column headers.
    pub fn sort_by_label(&mut self, label: &str, direction: SortDirection) -> SortStatus {
        match SortColumn::parse(label) {
            Some(column) => {
                self.set_sort(column, direction);
                SortStatus::Applied(column, direction)
            }
            None => {
                tracing::debug!(label, "ignoring sort on unknown column");
                SortStatus::UnknownColumn
            }
        }
    }

    /// Drops the sort key; rows fall back to creation order.
    pub fn clear_sort(&mut self) -> SortStatus {
        self.sort = None;
        self.refresh();
        SortStatus::Cleared
    }

    /// Recomputes the projection: snapshot under the store lock, then
    /// filter (creation order preserved), then sort, all lock-free.
    pub fn refresh(&mut self) {
        let mut records = self.store.all();
        records.retain(|record| self.filter.accepts(record));
        if let Some(sort) = self.sort {
            apply_sort(&mut records, sort.column, sort.direction);
        }
        self.rows = records.iter().map(project).collect();
    }

    /// Full record detail for a selected row.
    pub fn resolve(&self, id: RecordId) -> Result<Record, StoreError> {
        self.store.get(id)
    }
}

fn project(record: &Record) -> Row {
    Row {
        id: record.id,
        host: record.request.host.clone(),
        extension: record.request.extension.clone(),
        status: record.status_code(),
        summary: summarize(&record.request.raw),
    }
}

fn summarize(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or_default();
    first_line.chars().take(SUMMARY_MAX_CHARS).collect()
}
