//! In-memory `GeoStore` that records every call.

use std::cell::{Cell, RefCell};

use super::{
    CreateRequest, GeoStore, GeoStreamsError, RemoteResource, ResourceId, ResourceKind,
};
use crate::data_mgmt::models::ObservationRecord;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    List(ResourceKind, String),
    Create(ResourceKind, String),
    Upload(ResourceId, usize),
}

#[derive(Default)]
pub struct FakeStore {
    resources: RefCell<Vec<(ResourceKind, String, ResourceId)>>,
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u64>,
    fail_lookups: Vec<ResourceKind>,
    fail_creates: bool,
    omit_created_id: bool,
    /// Number of bulk uploads that succeed before the next one fails
    fail_upload_after: Option<usize>,
    uploaded: RefCell<Vec<ObservationRecord>>,
}

fn rejected() -> GeoStreamsError {
    GeoStreamsError::Transport {
        url: "fake://geostreams".into(),
        source: ureq::Error::StatusCode(500),
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(self, kind: ResourceKind, name: &str, id: &str) -> Self {
        self.resources
            .borrow_mut()
            .push((kind, name.to_string(), ResourceId::new(id)));
        self
    }

    pub fn failing_lookups(self) -> Self {
        self.failing_lookups_of(ResourceKind::Sensor)
            .failing_lookups_of(ResourceKind::Stream)
    }

    pub fn failing_lookups_of(mut self, kind: ResourceKind) -> Self {
        self.fail_lookups.push(kind);
        self
    }

    pub fn failing_creates(mut self) -> Self {
        self.fail_creates = true;
        self
    }

    pub fn without_created_ids(mut self) -> Self {
        self.omit_created_id = true;
        self
    }

    pub fn failing_upload_after(mut self, successful: usize) -> Self {
        self.fail_upload_after = Some(successful);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn creates(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Create(..)))
            .count()
    }

    pub fn lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List(..)))
            .count()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                Call::Upload(_, n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn uploaded(&self) -> Vec<ObservationRecord> {
        self.uploaded.borrow().clone()
    }
}

impl GeoStore for FakeStore {
    fn list_by_name(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<Vec<RemoteResource>, GeoStreamsError> {
        self.calls
            .borrow_mut()
            .push(Call::List(kind, name.to_string()));
        if self.fail_lookups.contains(&kind) {
            return Err(rejected());
        }
        // Mimic the server's substring filter so exact matching is exercised
        Ok(self
            .resources
            .borrow()
            .iter()
            .filter(|(k, n, _)| *k == kind && n.contains(name))
            .map(|(_, n, id)| RemoteResource {
                id: Some(id.clone()),
                name: Some(n.clone()),
            })
            .collect())
    }

    fn create(&self, request: &CreateRequest) -> Result<Option<ResourceId>, GeoStreamsError> {
        self.calls
            .borrow_mut()
            .push(Call::Create(request.kind(), request.name().to_string()));
        if self.fail_creates {
            return Err(rejected());
        }
        self.next_id.set(self.next_id.get() + 1);
        let id = ResourceId::new(format!("{}-{}", request.kind(), self.next_id.get()));
        self.resources
            .borrow_mut()
            .push((request.kind(), request.name().to_string(), id.clone()));
        Ok((!self.omit_created_id).then_some(id))
    }

    fn add_datapoints(
        &self,
        stream_id: &ResourceId,
        records: &[ObservationRecord],
    ) -> Result<(), GeoStreamsError> {
        let previous = self.batch_sizes().len();
        self.calls
            .borrow_mut()
            .push(Call::Upload(stream_id.clone(), records.len()));
        if self.fail_upload_after.is_some_and(|n| previous >= n) {
            return Err(rejected());
        }
        self.uploaded.borrow_mut().extend_from_slice(records);
        Ok(())
    }
}
