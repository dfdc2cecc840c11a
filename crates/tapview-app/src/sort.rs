// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Display columns a user can sort the traffic table by. Column labels are
/// the presentation layer's strings; anything it sends that does not parse
/// is a no-op, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortColumn {
    Id,
    Host,
    Method,
    Path,
    Extension,
    Status,
    Time,
}

impl SortColumn {
    pub const ALL: [Self; 7] = [
        Self::Id,
        Self::Host,
        Self::Method,
        Self::Path,
        Self::Extension,
        Self::Status,
        Self::Time,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Host => "Host",
            Self::Method => "Method",
            Self::Path => "Path",
            Self::Extension => "Ext",
            Self::Status => "Status",
            Self::Time => "Time",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.label() == label)
    }
}

/// Re-orders `records` in place into a total order for display. Text
/// columns collate case-insensitively; records without a response sort
/// after every record with one on the Status column, in both directions;
/// ascending id breaks every tie.
pub fn apply_sort(records: &mut [Record], column: SortColumn, direction: SortDirection) {
    records.sort_by(|left, right| {
        let order = match compare(left, right, column) {
            ColumnOrder::Value(order) => match direction {
                SortDirection::Asc => order,
                SortDirection::Desc => order.reverse(),
            },
            ColumnOrder::NullsLast(order) => order,
        };
        order.then_with(|| left.id.cmp(&right.id))
    });
}

enum ColumnOrder {
    Value(Ordering),
    /// Already resolved against a missing value; direction must not flip it.
    NullsLast(Ordering),
}

fn compare(left: &Record, right: &Record, column: SortColumn) -> ColumnOrder {
    match column {
        SortColumn::Id => ColumnOrder::Value(left.id.cmp(&right.id)),
        SortColumn::Host => text_order(&left.request.host, &right.request.host),
        SortColumn::Method => text_order(&left.request.method, &right.request.method),
        SortColumn::Path => text_order(&left.request.path, &right.request.path),
        SortColumn::Extension => text_order(&left.request.extension, &right.request.extension),
        SortColumn::Status => match (left.status_code(), right.status_code()) {
            (Some(left), Some(right)) => ColumnOrder::Value(left.cmp(&right)),
            (None, Some(_)) => ColumnOrder::NullsLast(Ordering::Greater),
            (Some(_), None) => ColumnOrder::NullsLast(Ordering::Less),
            (None, None) => ColumnOrder::NullsLast(Ordering::Equal),
        },
        SortColumn::Time => ColumnOrder::Value(left.created_at.cmp(&right.created_at)),
    }
}

fn text_order(left: &str, right: &str) -> ColumnOrder {
    ColumnOrder::Value(left.to_ascii_lowercase().cmp(&right.to_ascii_lowercase()))
}
