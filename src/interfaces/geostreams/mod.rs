//! GeoStreams remote store: sensors, streams and their datapoints.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::data_mgmt::models::{Geometry, ObservationRecord, Properties};

mod client;
#[cfg(test)]
pub mod fake;

pub use client::{api_url, GeoStreamsClient};

#[derive(Error, Debug)]
pub enum GeoStreamsError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: ureq::Error,
    },
    #[error("base URL '{0}' cannot be extended with a GeoStreams path")]
    CannotBeABase(String),
}

impl GeoStreamsError {
    /// HTTP status of a rejected request, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            GeoStreamsError::Transport {
                source: ureq::Error::StatusCode(code),
                ..
            } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Sensor,
    Stream,
}

impl ResourceKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceKind::Sensor => "sensors",
            ResourceKind::Stream => "streams",
        }
    }

    pub fn name_query_key(&self) -> &'static str {
        match self {
            ResourceKind::Sensor => "sensor_name",
            ResourceKind::Stream => "stream_name",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Sensor => write!(f, "sensor"),
            ResourceKind::Stream => write!(f, "stream"),
        }
    }
}

/// Identifier assigned by the store; numeric IDs are kept in their decimal form
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "RawId", into = "String")]
pub struct ResourceId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for ResourceId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => ResourceId(s),
            RawId::Number(n) => ResourceId(n.to_string()),
        }
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        ResourceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a name-filtered listing. Entries the store returns without
/// a name or an ID are kept so the caller can decide what to do with them.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RemoteResource {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SensorType {
    pub id: String,
    pub title: String,
    #[serde(rename = "sensorType")]
    pub sensor_type: i32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SensorProperties {
    #[serde(rename = "popupContent")]
    pub popup_content: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub name: String,
    pub region: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewSensor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: SensorProperties,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewStream {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: serde_json::Map<String, Value>,
    pub sensor_id: ResourceId,
}

/// Body of a creation request
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CreateRequest {
    Sensor(NewSensor),
    Stream(NewStream),
}

impl CreateRequest {
    pub fn kind(&self) -> ResourceKind {
        match self {
            CreateRequest::Sensor(_) => ResourceKind::Sensor,
            CreateRequest::Stream(_) => ResourceKind::Stream,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CreateRequest::Sensor(s) => &s.name,
            CreateRequest::Stream(s) => &s.name,
        }
    }
}

#[derive(Debug, Serialize)]
struct Datapoint<'a> {
    start_time: chrono::DateTime<chrono::Utc>,
    end_time: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "type")]
    kind: &'static str,
    geometry: &'a Geometry,
    properties: &'a Properties,
}

impl<'a> From<&'a ObservationRecord> for Datapoint<'a> {
    fn from(record: &'a ObservationRecord) -> Self {
        Datapoint {
            start_time: record.start_time(),
            end_time: record.end_time(),
            kind: "Point",
            geometry: record.geometry(),
            properties: record.all_fields(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BulkDatapoints<'a> {
    datapoints: Vec<Datapoint<'a>>,
    stream_id: &'a ResourceId,
}

impl<'a> BulkDatapoints<'a> {
    fn new(stream_id: &'a ResourceId, records: &'a [ObservationRecord]) -> Self {
        BulkDatapoints {
            datapoints: records.iter().map(Datapoint::from).collect(),
            stream_id,
        }
    }
}

/// Operations the loader needs from a GeoStreams store
pub trait GeoStore {
    /// Name-filtered listing; the store may return near matches too
    fn list_by_name(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<Vec<RemoteResource>, GeoStreamsError>;

    /// Creates a resource, returning the ID from the response when it carries one
    fn create(&self, request: &CreateRequest) -> Result<Option<ResourceId>, GeoStreamsError>;

    /// Submits records to a stream as a single bulk request
    fn add_datapoints(
        &self,
        stream_id: &ResourceId,
        records: &[ObservationRecord],
    ) -> Result<(), GeoStreamsError>;
}
