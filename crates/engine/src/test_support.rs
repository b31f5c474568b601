//! In-crate ports for unit tests.

use crate::domains::CallNumberRecord;
use crate::error::PortError;
use crate::port::{
    BrowseEntry, BrowseSlice, CountRequest, DirectionalQueryPort, SliceRequest, SortOrder,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Sorted call-number entries keyed verbatim; ignores scope and predicates.
pub(crate) struct FakePort {
    entries: Vec<BrowseEntry<CallNumberRecord>>,
    always_more: bool,
}

impl FakePort {
    pub(crate) fn with_keys(keys: &[&str]) -> Self {
        let mut entries: Vec<_> = keys
            .iter()
            .enumerate()
            .map(|(index, key)| BrowseEntry {
                key: key.to_string(),
                type_id: None,
                record: CallNumberRecord::new(format!("r{index:03}"), "college", *key),
            })
            .collect();
        entries.sort_by(|a, b| (&a.key, &a.record.id).cmp(&(&b.key, &b.record.id)));
        Self {
            entries,
            always_more: false,
        }
    }

    pub(crate) fn always_more(mut self) -> Self {
        self.always_more = true;
        self
    }
}

#[async_trait]
impl DirectionalQueryPort<CallNumberRecord> for FakePort {
    async fn fetch(
        &self,
        request: &SliceRequest,
    ) -> Result<BrowseSlice<CallNumberRecord>, PortError> {
        let mut matching: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| request.comparator.admits(&entry.key, &request.key))
            .cloned()
            .collect();
        if request.order() == SortOrder::Descending {
            matching.reverse();
        }
        let has_more_beyond = self.always_more || matching.len() > request.size;
        matching.truncate(request.size);
        Ok(BrowseSlice {
            entries: matching,
            has_more_beyond,
        })
    }

    async fn count(&self, _request: &CountRequest) -> Result<u64, PortError> {
        Ok(self.entries.len() as u64)
    }
}

/// Remembers the page size of every fetch.
pub(crate) struct RecordingPort {
    inner: FakePort,
    sizes: Mutex<Vec<usize>>,
}

impl RecordingPort {
    pub(crate) fn new(inner: FakePort) -> Self {
        Self {
            inner,
            sizes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sizes(&self) -> Vec<usize> {
        self.sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectionalQueryPort<CallNumberRecord> for RecordingPort {
    async fn fetch(
        &self,
        request: &SliceRequest,
    ) -> Result<BrowseSlice<CallNumberRecord>, PortError> {
        self.sizes.lock().unwrap().push(request.size);
        self.inner.fetch(request).await
    }

    async fn count(&self, request: &CountRequest) -> Result<u64, PortError> {
        self.inner.count(request).await
    }
}

/// Fails the test if any query reaches it.
pub(crate) struct UntouchablePort;

#[async_trait]
impl<R: Send + Sync + 'static> DirectionalQueryPort<R> for UntouchablePort {
    async fn fetch(&self, request: &SliceRequest) -> Result<BrowseSlice<R>, PortError> {
        panic!("unexpected fetch {} '{}'", request.comparator, request.key);
    }

    async fn count(&self, _request: &CountRequest) -> Result<u64, PortError> {
        panic!("unexpected count");
    }
}
