// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::{Mutex, MutexGuard};

use tapview_app::{Record, RecordId, RequestData, ResponseData};
use thiserror::Error;
use time::OffsetDateTime;

pub mod view;

pub use view::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Ids only ever come from `append`, so an unknown id is a caller
    /// logic error; retrying will not help.
    #[error("record {0} not found")]
    NotFound(RecordId),
    /// Response and edited variants attach at most once and never revert.
    #[error("record {id} already has a {field} attached")]
    AlreadyAttached { id: RecordId, field: &'static str },
}

#[derive(Debug, Default)]
struct StoreInner {
    records: Vec<Record>,
    next_id: i64,
}

/// Ordered collection of captured exchanges, shared between the proxy
/// engine (producer) and the presentation side (reader). Every method
/// serializes against the others through one internal lock, so `all`
/// never observes a half-appended record and `attach_*` never races an
/// `append`.
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: Mutex<StoreInner>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next id and stores the record. Recomputing any view is
    /// the caller's responsibility.
    pub fn append(&self, request: RequestData) -> RecordId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = RecordId::new(inner.next_id);
        tracing::debug!(id = id.get(), host = %request.host, "record appended");
        inner.records.push(Record {
            id,
            request,
            edited_request: None,
            response: None,
            edited_response: None,
            created_at: OffsetDateTime::now_utc(),
        });
        id
    }

    pub fn get(&self, id: RecordId) -> Result<Record, StoreError> {
        let inner = self.lock();
        let index = find(&inner.records, id)?;
        Ok(inner.records[index].clone())
    }

    pub fn attach_response(&self, id: RecordId, response: ResponseData) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let index = find(&inner.records, id)?;
        let record = &mut inner.records[index];
        if record.response.is_some() {
            return Err(StoreError::AlreadyAttached {
                id,
                field: "response",
            });
        }
        tracing::debug!(id = id.get(), status = response.status, "response attached");
        record.response = Some(response);
        Ok(())
    }

    pub fn attach_edited_request(
        &self,
        id: RecordId,
        request: RequestData,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let index = find(&inner.records, id)?;
        let record = &mut inner.records[index];
        if record.edited_request.is_some() {
            return Err(StoreError::AlreadyAttached {
                id,
                field: "edited request",
            });
        }
        tracing::debug!(id = id.get(), "edited request attached");
        record.edited_request = Some(request);
        Ok(())
    }

    pub fn attach_edited_response(
        &self,
        id: RecordId,
        response: ResponseData,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let index = find(&inner.records, id)?;
        let record = &mut inner.records[index];
        if record.edited_response.is_some() {
            return Err(StoreError::AlreadyAttached {
                id,
                field: "edited response",
            });
        }
        tracing::debug!(id = id.get(), "edited response attached");
        record.edited_response = Some(response);
        Ok(())
    }

    /// Point-in-time snapshot in ascending id order. Filter and sort
    /// passes run over the returned snapshot, outside the store lock.
    pub fn all(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Every critical section is a bounded in-memory pass that leaves
        // the table consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn find(records: &[Record], id: RecordId) -> Result<usize, StoreError> {
    records
        .binary_search_by_key(&id, |record| record.id)
        .map_err(|_| StoreError::NotFound(id))
}
