use std::collections::BTreeMap;

use chrono::{DateTime, offset::Utc};
use serde::{Deserialize, Serialize};

/// Scalar value of an observation property
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RtValue {
    Int(i64),
    Float(f64),
    String(String),
}

/// GeoJSON geometry of an observation or a remote resource
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Vec<f64> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
}

impl Geometry {
    pub fn point(coordinates: &[f64]) -> Self {
        Geometry::Point {
            coordinates: coordinates.to_vec(),
        }
    }
}

pub type Properties = BTreeMap<String, RtValue>;

/// One timestamped, geo-located observation
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationRecord {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    geometry: Geometry,
    properties: Properties,
}

impl ObservationRecord {
    pub fn new(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        geometry: Geometry,
        properties: Properties,
    ) -> Self {
        ObservationRecord {
            start_time,
            end_time,
            geometry,
            properties,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn get_field(&self, key: &str) -> Option<&RtValue> {
        self.properties.get(key)
    }

    pub fn all_fields(&self) -> &Properties {
        &self.properties
    }
}
